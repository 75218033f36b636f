pub mod error;
pub mod filesystem;
pub mod image;

pub use error::CeresError;
pub use filesystem::{FileEntry, FilesystemInfo, FilesystemReader};
pub use image::{ImageBuffer, BLOCK_SIZE};
