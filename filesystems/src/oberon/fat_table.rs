// Packed allocation table decoding
// Two signed 12-bit links share each little-endian 3-byte group

use super::constants::*;
use super::record::read_u24;
use ceres_core::{CeresError, ImageBuffer};
use log::debug;

/// Decoded block-chain table, built once per image and read-only afterwards
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllocationTable {
    links: Vec<i32>,
}

/// Sign-extend a 12-bit value stored in the low bits of `raw`
fn sign_extend_12(raw: u32) -> i32 {
    let value = (raw % 4096) as i32;
    if value > 2047 {
        value - 4096
    } else {
        value
    }
}

/// Split one 3-byte group into its two links (low 12 bits first)
pub fn unpack_group(group: u32) -> (i32, i32) {
    (sign_extend_12(group % 4096), sign_extend_12(group / 4096))
}

impl AllocationTable {
    /// Decode the table region (blocks 1..=3) of `image`
    pub fn decode(image: &ImageBuffer) -> Result<Self, CeresError> {
        let region = image.blocks(TABLE_START_BLOCK, TABLE_BLOCKS)?;
        let mut links = vec![0i32; TABLE_ENTRIES];
        links[0] = LINK_NONE;
        links[1] = LINK_NONE;

        // Entries 0 and 1 occupy the first group
        let mut offset = TABLE_GROUP_SIZE;
        for pair in links[TABLE_RESERVED_ENTRIES..].chunks_exact_mut(2) {
            let (n0, n1) = unpack_group(read_u24(region, offset)?);
            pair[0] = n0;
            pair[1] = n1;
            offset += TABLE_GROUP_SIZE;
        }

        debug!(
            "Decoded allocation table: {} entries, {} in use",
            links.len(),
            links[TABLE_RESERVED_ENTRIES..].iter().filter(|&&l| l != 0).count()
        );

        Ok(Self { links })
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<i32> {
        self.links.get(index).copied()
    }

    pub fn as_slice(&self) -> &[i32] {
        &self.links
    }

    /// Follow the link stored for `unit`, rejecting links that leave the table
    pub fn next_unit(&self, unit: usize) -> Result<usize, CeresError> {
        let link = self.get(unit).ok_or_else(|| {
            CeresError::CorruptChain(format!("Unit {} is outside the allocation table", unit))
        })?;

        usize::try_from(link)
            .ok()
            .filter(|&next| next < self.links.len())
            .ok_or_else(|| {
                CeresError::CorruptChain(format!("Unit {} links to invalid unit {}", unit, link))
            })
    }
}
