use crate::CeresError;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// One file as presented to callers that do not care about on-disk layout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    pub name: String,
    pub size: u64,
    pub modified: Option<DateTime<Local>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilesystemInfo {
    pub fs_type: String,
    pub label: Option<String>,
    pub total_bytes: u64,
    pub used_bytes: u64,
    pub file_count: usize,
    pub cluster_size: Option<u32>,
}

/// Read-only access to a flat filesystem held in an image
///
/// Implementations never mutate the underlying image, so every method
/// takes `&self` and may be called repeatedly with the same result.
pub trait FilesystemReader {
    /// List files in on-disk order
    fn list_directory(&self) -> Result<Vec<FileEntry>, CeresError>;

    /// Read file contents by exact name
    fn read_file(&self, name: &str) -> Result<Vec<u8>, CeresError>;

    /// Get filesystem information
    fn get_info(&self) -> Result<FilesystemInfo, CeresError>;
}
