// Test helpers for building synthetic Oberon floppy images

use crate::oberon::constants::*;
use ceres_core::{ImageBuffer, BLOCK_SIZE};

/// Pack two signed 12-bit links into one 3-byte table group
pub fn pack_links(first: i32, second: i32) -> [u8; 3] {
    let group = (first as u32 & 0xFFF) | ((second as u32 & 0xFFF) << 12);
    let bytes = group.to_le_bytes();
    [bytes[0], bytes[1], bytes[2]]
}

pub fn pack_date(years_since_1900: u16, month: u16, day: u16) -> u16 {
    (years_since_1900 & 0x7F) << 9 | (month & 0x0F) << 5 | (day & 0x1F)
}

pub fn pack_time(hour: u16, minute: u16, half_seconds: u16) -> u16 {
    (hour & 0x1F) << 11 | (minute & 0x3F) << 5 | (half_seconds & 0x1F)
}

/// A file to place in a test image
pub struct TestFile {
    name: String,
    content: Vec<u8>,
    units: Option<Vec<usize>>,
    head: Option<i16>,
    size: Option<i32>,
    date: u16,
    time: u16,
}

impl TestFile {
    pub fn new(name: &str, content: &[u8]) -> Self {
        Self {
            name: name.to_string(),
            content: content.to_vec(),
            units: None,
            head: None,
            size: None,
            date: pack_date(123, 6, 15),
            time: pack_time(10, 30, 21),
        }
    }

    /// Store the content in these units instead of the next free ones
    pub fn units(mut self, units: &[usize]) -> Self {
        self.units = Some(units.to_vec());
        self
    }

    /// Override the recorded head unit
    pub fn head(mut self, head: i16) -> Self {
        self.head = Some(head);
        self
    }

    /// Override the recorded size
    pub fn size(mut self, size: i32) -> Self {
        self.size = Some(size);
        self
    }

    pub fn timestamp(mut self, date: u16, time: u16) -> Self {
        self.date = date;
        self.time = time;
        self
    }
}

/// Builds a 720-block image with a boot sector, volume label, table and files
pub struct FloppyImageBuilder {
    data: Vec<u8>,
    links: Vec<i32>,
    next_slot: usize,
    next_unit: usize,
    total_blocks: usize,
}

impl FloppyImageBuilder {
    pub fn new() -> Self {
        let mut data = vec![0u8; TABLE_ENTRIES * BLOCK_SIZE];
        data[BPB_MEDIA] = MEDIA_DOS_720K;
        data[DIR_START_BLOCK * BLOCK_SIZE + REC_LABEL_ATTR] = ATTR_VOLUME_ID;

        let mut links = vec![0i32; TABLE_ENTRIES];
        links[0] = LINK_NONE;
        links[1] = LINK_NONE;

        Self {
            data,
            links,
            next_slot: 1,
            next_unit: TABLE_RESERVED_ENTRIES,
            total_blocks: TABLE_ENTRIES,
        }
    }

    pub fn media_descriptor(mut self, descriptor: u8) -> Self {
        self.data[BPB_MEDIA] = descriptor;
        self
    }

    /// Set one allocation table link
    pub fn link(mut self, unit: usize, next: i32) -> Self {
        self.set_link(unit, next);
        self
    }

    // Entries 0 and 1 are never read back, so only the end marker may go there
    fn set_link(&mut self, unit: usize, next: i32) {
        assert!(
            unit >= TABLE_RESERVED_ENTRIES || next == LINK_NONE,
            "unit {} is a reserved table entry",
            unit
        );
        self.links[unit] = next;
    }

    /// Keep only the first `blocks` blocks of the image
    pub fn truncate_blocks(mut self, blocks: usize) -> Self {
        self.total_blocks = blocks;
        self
    }

    /// Edit the raw bytes of one directory record
    pub fn raw_record<F: FnOnce(&mut [u8])>(mut self, block: usize, slot: usize, edit: F) -> Self {
        let base = block * BLOCK_SIZE + slot * RECORD_SIZE;
        edit(&mut self.data[base..base + RECORD_SIZE]);
        self
    }

    /// Store a file's content and chain, then append its directory record
    pub fn file(mut self, file: TestFile) -> Self {
        let unit_count = (file.content.len() + UNIT_SIZE - 1) / UNIT_SIZE;
        let units = file.units.clone().unwrap_or_else(|| {
            let start = self.next_unit;
            self.next_unit += unit_count;
            (start..start + unit_count).collect()
        });
        assert_eq!(units.len(), unit_count, "unit list does not match content length");

        for (i, chunk) in file.content.chunks(UNIT_SIZE).enumerate() {
            let base = (DATA_AREA_ORIGIN + BLOCKS_PER_UNIT * units[i]) * BLOCK_SIZE;
            self.data[base..base + chunk.len()].copy_from_slice(chunk);
        }
        for pair in units.windows(2) {
            self.set_link(pair[0], pair[1] as i32);
        }
        if let Some(&last) = units.last() {
            self.set_link(last, LINK_NONE);
        }

        let head = file.head.unwrap_or_else(|| units.first().map_or(0, |&u| u as i16));
        let size = file.size.unwrap_or(file.content.len() as i32);
        let name = file.name.as_bytes();
        let slot = self.next_slot;
        self.next_slot += 1;

        self.raw_record(DIR_START_BLOCK + slot / RECORDS_PER_BLOCK, slot % RECORDS_PER_BLOCK, |r| {
            r[..name.len()].copy_from_slice(name);
            r[REC_TIME..REC_TIME + 2].copy_from_slice(&file.time.to_le_bytes());
            r[REC_DATE..REC_DATE + 2].copy_from_slice(&file.date.to_le_bytes());
            r[REC_HEAD..REC_HEAD + 2].copy_from_slice(&head.to_le_bytes());
            r[REC_SIZE..REC_SIZE + 4].copy_from_slice(&size.to_le_bytes());
        })
    }

    pub fn build(mut self) -> ImageBuffer {
        let table_base = TABLE_START_BLOCK * BLOCK_SIZE;
        for (i, pair) in self.links.chunks_exact(2).enumerate() {
            let offset = table_base + i * TABLE_GROUP_SIZE;
            self.data[offset..offset + TABLE_GROUP_SIZE].copy_from_slice(&pack_links(pair[0], pair[1]));
        }
        self.data.truncate(self.total_blocks * BLOCK_SIZE);
        ImageBuffer::new(self.data)
    }
}

impl Default for FloppyImageBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oberon::fat_table::AllocationTable;

    #[test]
    fn test_builder_skips_reserved_units() {
        let image = FloppyImageBuilder::new()
            .file(TestFile::new("A", b"a"))
            .file(TestFile::new("B", &[b'b'; 2500]))
            .build();
        let table = AllocationTable::decode(&image).unwrap();

        assert_eq!(table.get(2), Some(LINK_NONE));
        assert_eq!(table.get(3), Some(4));
        assert_eq!(table.get(4), Some(5));
        assert_eq!(table.get(5), Some(LINK_NONE));
    }

    #[test]
    #[should_panic(expected = "reserved table entry")]
    fn test_link_rejects_reserved_entry() {
        let _ = FloppyImageBuilder::new().link(1, 1);
    }
}
