// Ceres/Oberon floppy layout constants
// The medium carries no geometry description, so everything here is fixed

use ceres_core::BLOCK_SIZE;
use static_assertions::const_assert_eq;

// Boot sector
pub const BOOT_SECTOR_BLOCK: usize = 0;
pub const BPB_MEDIA: usize = 0x15;

// Media descriptors
pub const MEDIA_DOS_720K: u8 = 0xF9;
pub const MEDIA_OBERON: u8 = 0xE9;

// Allocation table: blocks 1..=3, two 12-bit links per 3-byte group
pub const TABLE_START_BLOCK: usize = 1;
pub const TABLE_BLOCKS: usize = 3;
pub const TABLE_ENTRIES: usize = 720;
pub const TABLE_GROUP_SIZE: usize = 3;
pub const TABLE_RESERVED_ENTRIES: usize = 2;
pub const LINK_NONE: i32 = -1;

// Directory region: blocks 7..=13
pub const DIR_START_BLOCK: usize = 7;
pub const DIR_BLOCKS: usize = 7;
pub const DIR_END_BLOCK: usize = DIR_START_BLOCK + DIR_BLOCKS;
pub const RECORD_SIZE: usize = 32;
pub const RECORDS_PER_BLOCK: usize = BLOCK_SIZE / RECORD_SIZE;

// Directory record layout
pub const MAX_NAME_LEN: usize = 22;
pub const REC_NAME: usize = 0x00;
pub const REC_TIME: usize = 0x16;
pub const REC_DATE: usize = 0x18;
pub const REC_HEAD: usize = 0x1A;
pub const REC_SIZE: usize = 0x1C;
pub const REC_LABEL_ATTR: usize = 0x0B;

// Name markers
pub const NAME_UNUSED: u8 = 0x00;
pub const NAME_DELETED: u8 = 0xE5;
pub const ATTR_VOLUME_ID: u8 = 0x08;

// Data area: 2-block allocation units starting at block 10
pub const DATA_AREA_ORIGIN: usize = 10;
pub const BLOCKS_PER_UNIT: usize = 2;
pub const UNIT_SIZE: usize = BLOCKS_PER_UNIT * BLOCK_SIZE;

// Timestamps
pub const YEAR_BASE: i32 = 1900;

const_assert_eq!(BLOCK_SIZE % RECORD_SIZE, 0);
const_assert_eq!(RECORDS_PER_BLOCK, 16);
const_assert_eq!(UNIT_SIZE, 1024);
const_assert_eq!(REC_SIZE + 4, RECORD_SIZE);

/// The fixed geometry of the supported medium
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FloppyGeometry {
    pub block_size: usize,
    pub total_blocks: usize,
    pub dir_start_block: usize,
    pub dir_blocks: usize,
    pub data_area_origin: usize,
    pub blocks_per_unit: usize,
}

impl FloppyGeometry {
    /// 3.5" double density, 80 tracks, 9 sectors, 2 sides
    pub const CERES_720K: FloppyGeometry = FloppyGeometry {
        block_size: BLOCK_SIZE,
        total_blocks: TABLE_ENTRIES,
        dir_start_block: DIR_START_BLOCK,
        dir_blocks: DIR_BLOCKS,
        data_area_origin: DATA_AREA_ORIGIN,
        blocks_per_unit: BLOCKS_PER_UNIT,
    };

    pub fn total_bytes(&self) -> u64 {
        (self.total_blocks * self.block_size) as u64
    }

    pub fn unit_size(&self) -> usize {
        self.blocks_per_unit * self.block_size
    }

    /// Number of whole allocation units after the data area origin
    pub fn data_units(&self) -> usize {
        self.total_blocks.saturating_sub(self.data_area_origin) / self.blocks_per_unit
    }

    /// Largest file the data area can hold
    pub fn data_area_bytes(&self) -> usize {
        self.data_units() * self.unit_size()
    }

    /// Absolute block address of allocation unit `unit`
    pub fn unit_to_block(&self, unit: usize) -> Option<usize> {
        unit.checked_mul(self.blocks_per_unit)
            .and_then(|offset| offset.checked_add(self.data_area_origin))
    }
}
