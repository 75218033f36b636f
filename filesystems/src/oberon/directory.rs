// Oberon floppy directory decoding
// The directory is a flat array of 32-byte records in blocks 7..=13.
// Slot 0 of block 7 is the volume label; files follow until the first
// unused or deleted slot.

use super::constants::*;
use super::detection::MediaKind;
use super::record::{read_i16, read_i32, read_u16, read_u8, slice_at};
use super::timestamps::oberon_datetime_to_local;
use ceres_core::{CeresError, FileEntry, ImageBuffer};
use chrono::{DateTime, Local};
use log::{debug, trace};

/// One 32-byte directory record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirectoryEntry {
    pub name: [u8; MAX_NAME_LEN],
    pub packed_time: u16,
    pub packed_date: u16,
    /// First allocation unit, relative to the data area
    pub head: i16,
    pub size: i32,
}

impl DirectoryEntry {
    /// Decode the record in `slot` of a directory block
    pub fn from_bytes(buf: &[u8], slot: usize) -> Result<Self, CeresError> {
        let base = slot * RECORD_SIZE;
        let record = slice_at(buf, base, RECORD_SIZE)?;

        let mut name = [0u8; MAX_NAME_LEN];
        name.copy_from_slice(slice_at(record, REC_NAME, MAX_NAME_LEN)?);

        Ok(Self {
            name,
            packed_time: read_u16(record, REC_TIME)?,
            packed_date: read_u16(record, REC_DATE)?,
            head: read_i16(record, REC_HEAD)?,
            size: read_i32(record, REC_SIZE)?,
        })
    }

    /// Name up to the first NUL byte
    pub fn name(&self) -> String {
        let len = self
            .name
            .iter()
            .position(|&b| b == NAME_UNUSED)
            .unwrap_or(MAX_NAME_LEN);
        String::from_utf8_lossy(&self.name[..len]).into_owned()
    }

    /// Unused and deleted slots end the listing
    pub fn is_end_marker(&self) -> bool {
        matches!(self.name[0], NAME_UNUSED | NAME_DELETED)
    }

    pub fn is_volume_label(&self) -> bool {
        self.name[REC_LABEL_ATTR] == ATTR_VOLUME_ID
    }

    pub fn timestamp(&self) -> Option<DateTime<Local>> {
        oberon_datetime_to_local(self.packed_date, self.packed_time)
    }

    /// Recorded size in bytes; a negative size marks a corrupt record
    pub fn byte_len(&self) -> Result<usize, CeresError> {
        usize::try_from(self.size).map_err(|_| {
            CeresError::CorruptDirectory(format!(
                "File {:?} has negative size {}",
                self.name(),
                self.size
            ))
        })
    }

    pub fn to_file_entry(&self) -> Result<FileEntry, CeresError> {
        Ok(FileEntry {
            name: self.name(),
            size: self.byte_len()? as u64,
            modified: self.timestamp(),
        })
    }
}

/// Validates the image header and walks the directory region
pub struct DirectoryReader<'a> {
    image: &'a ImageBuffer,
}

impl<'a> DirectoryReader<'a> {
    pub fn new(image: &'a ImageBuffer) -> Self {
        Self { image }
    }

    /// Check the boot sector media descriptor
    pub fn media_kind(&self) -> Result<MediaKind, CeresError> {
        let boot = self.image.block(BOOT_SECTOR_BLOCK)?;
        let descriptor = read_u8(boot, BPB_MEDIA)?;

        MediaKind::from_descriptor(descriptor).ok_or_else(|| {
            CeresError::UnsupportedFormat(format!(
                "Neither Oberon nor MSDOS formatted diskette (media descriptor {:#04x})",
                descriptor
            ))
        })
    }

    /// Decode every record of one directory block
    pub fn read_dir_block(&self, block: usize) -> Result<Vec<DirectoryEntry>, CeresError> {
        let buf = self.image.block(block)?;
        (0..RECORDS_PER_BLOCK)
            .map(|slot| DirectoryEntry::from_bytes(buf, slot))
            .collect()
    }

    /// Read and validate the volume label in the first directory slot
    pub fn volume_label(&self) -> Result<DirectoryEntry, CeresError> {
        let buf = self.image.block(DIR_START_BLOCK)?;
        let label = DirectoryEntry::from_bytes(buf, 0)?;

        if !label.is_volume_label() {
            return Err(CeresError::CorruptDirectory(format!(
                "Block {} does not contain a valid volume label",
                DIR_START_BLOCK
            )));
        }

        let first = label.name[0];
        if first != NAME_UNUSED && first < NAME_DELETED {
            return Err(CeresError::UnsupportedFormat(format!(
                "Not Oberon format (volume label starts with {:#04x})",
                first
            )));
        }

        Ok(label)
    }

    /// List files in on-disk order
    pub fn list(&self) -> Result<Vec<DirectoryEntry>, CeresError> {
        let kind = self.media_kind()?;
        self.volume_label()?;
        debug!("Reading {} directory", kind.name());

        let mut entries = Vec::new();
        for block in DIR_START_BLOCK..DIR_END_BLOCK {
            // Slot 0 of the first block holds the label
            let first_slot = if block == DIR_START_BLOCK { 1 } else { 0 };
            let records = self.read_dir_block(block)?;

            for (slot, entry) in records.into_iter().enumerate().skip(first_slot) {
                if entry.is_end_marker() {
                    trace!("End of directory at block {} slot {}", block, slot);
                    return Ok(entries);
                }
                trace!("Entry {:?} at block {} slot {}", entry.name(), block, slot);
                entries.push(entry);
            }
        }

        debug!("Directory region exhausted after {} entries", entries.len());
        Ok(entries)
    }
}
