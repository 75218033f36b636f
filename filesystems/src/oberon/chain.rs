// File reassembly by following allocation chains
// Content lives in 1024-byte units; unit i starts at block 10 + 2*i

use super::constants::{FloppyGeometry, UNIT_SIZE};
use super::directory::DirectoryEntry;
use super::fat_table::AllocationTable;
use ceres_core::{CeresError, ImageBuffer};
use log::{debug, trace};
use std::collections::HashSet;

pub struct FileAssembler<'a> {
    image: &'a ImageBuffer,
    table: &'a AllocationTable,
    geometry: FloppyGeometry,
}

impl<'a> FileAssembler<'a> {
    pub fn new(image: &'a ImageBuffer, table: &'a AllocationTable) -> Self {
        Self {
            image,
            table,
            geometry: FloppyGeometry::CERES_720K,
        }
    }

    /// Borrow the bytes of one allocation unit
    pub fn read_unit(&self, unit: usize) -> Result<&'a [u8], CeresError> {
        let block = self.geometry.unit_to_block(unit).ok_or_else(|| {
            CeresError::OutOfRange(format!("Allocation unit {} has no block address", unit))
        })?;
        self.image.blocks(block, self.geometry.blocks_per_unit)
    }

    /// Reassemble exactly `entry.size` bytes of content
    pub fn read(&self, entry: &DirectoryEntry) -> Result<Vec<u8>, CeresError> {
        let size = entry.byte_len()?;
        if size > self.geometry.data_area_bytes() {
            return Err(CeresError::CorruptDirectory(format!(
                "File {:?} claims {} bytes but the data area holds {}",
                entry.name(),
                size,
                self.geometry.data_area_bytes()
            )));
        }
        if size == 0 {
            return Ok(Vec::new());
        }

        let mut unit = usize::try_from(entry.head).map_err(|_| {
            CeresError::OutOfRange(format!(
                "File {:?} starts at negative unit {}",
                entry.name(),
                entry.head
            ))
        })?;

        debug!("Reading {:?}: {} bytes from unit {}", entry.name(), size, unit);

        let mut data = Vec::with_capacity(size);
        let mut remaining = size;
        let mut visited = HashSet::new();

        loop {
            if !visited.insert(unit) {
                return Err(CeresError::CorruptChain(format!(
                    "Circular allocation chain in {:?} at unit {}",
                    entry.name(),
                    unit
                )));
            }

            trace!("  unit {} ({} bytes remaining)", unit, remaining);
            let buf = self.read_unit(unit)?;

            if remaining <= UNIT_SIZE {
                // Drop the slack at the end of the last unit
                data.extend_from_slice(&buf[..remaining]);
                break;
            }

            data.extend_from_slice(buf);
            remaining -= UNIT_SIZE;
            unit = self.table.next_unit(unit)?;
        }

        Ok(data)
    }
}
