// In-memory disk image with bounds-checked block access
// Every offset computed by the decoders funnels through `blocks()`

use crate::CeresError;
use log::{debug, trace};
use std::path::Path;

/// Size of one block (sector) on the medium
pub const BLOCK_SIZE: usize = 512;

/// Immutable raw image bytes, addressed in 512-byte blocks
#[derive(Debug, Clone)]
pub struct ImageBuffer {
    data: Vec<u8>,
}

impl ImageBuffer {
    pub fn new(data: Vec<u8>) -> Self {
        Self { data }
    }

    /// Load a whole image file into memory
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, CeresError> {
        let path = path.as_ref();
        let data = std::fs::read(path)?;
        debug!("Loaded image {} ({} bytes)", path.display(), data.len());
        Ok(Self::new(data))
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Number of complete blocks held by the image
    pub fn block_count(&self) -> usize {
        self.data.len() / BLOCK_SIZE
    }

    /// Borrow `count` consecutive blocks starting at block `start`
    pub fn blocks(&self, start: usize, count: usize) -> Result<&[u8], CeresError> {
        let range = start
            .checked_mul(BLOCK_SIZE)
            .and_then(|begin| {
                count
                    .checked_mul(BLOCK_SIZE)
                    .and_then(|len| begin.checked_add(len))
                    .map(|end| begin..end)
            })
            .ok_or_else(|| {
                CeresError::OutOfRange(format!("Block range {}+{} overflows", start, count))
            })?;

        trace!("Reading blocks {}..{} (bytes {:#x}..{:#x})", start, start + count, range.start, range.end);

        if range.end > self.data.len() {
            return Err(CeresError::OutOfRange(format!(
                "Blocks {}..{} exceed image of {} bytes",
                start,
                start + count,
                self.data.len()
            )));
        }

        Ok(&self.data[range])
    }

    pub fn block(&self, index: usize) -> Result<&[u8], CeresError> {
        self.blocks(index, 1)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }
}

impl From<Vec<u8>> for ImageBuffer {
    fn from(data: Vec<u8>) -> Self {
        Self::new(data)
    }
}
