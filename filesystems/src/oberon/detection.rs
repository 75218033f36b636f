// Boot sector media descriptor probing

use super::constants::*;
use super::record::{read_u8, slice_at};
use ceres_core::BLOCK_SIZE;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Disk variants accepted by the reader, keyed by media descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MediaKind {
    /// Diskette formatted by Oberon on Ceres (descriptor 0xE9)
    Oberon,
    /// 720K diskette carrying a DOS media descriptor (0xF9)
    Dos720,
}

impl MediaKind {
    pub fn from_descriptor(descriptor: u8) -> Option<Self> {
        match descriptor {
            MEDIA_OBERON => Some(MediaKind::Oberon),
            MEDIA_DOS_720K => Some(MediaKind::Dos720),
            _ => None,
        }
    }

    pub fn descriptor(&self) -> u8 {
        match self {
            MediaKind::Oberon => MEDIA_OBERON,
            MediaKind::Dos720 => MEDIA_DOS_720K,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            MediaKind::Oberon => "Oberon",
            MediaKind::Dos720 => "DOS 720K",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (media {:#04x})", self.name(), self.descriptor())
    }
}

/// Probe raw image bytes without failing
///
/// Only the boot sector is inspected; a match does not guarantee that the
/// directory region is readable.
pub fn detect(image: &[u8]) -> Option<MediaKind> {
    let boot = slice_at(image, BOOT_SECTOR_BLOCK * BLOCK_SIZE, BLOCK_SIZE).ok()?;
    read_u8(boot, BPB_MEDIA).ok().and_then(MediaKind::from_descriptor)
}
