// Extraction of floppy files to the host filesystem
// Each file is written under its on-disk name and keeps its recorded timestamp

use crate::oberon::{DirectoryEntry, OberonFloppy};
use ceres_core::CeresError;
use chrono::{DateTime, Local};
use log::{debug, info, warn};
use std::fs::{File, FileTimes};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Reject names that would escape the destination directory
pub fn safe_file_name(name: &str) -> Result<&str, CeresError> {
    let unsafe_name = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains(['/', '\\', '\0']);

    if unsafe_name {
        return Err(CeresError::InvalidInput(format!(
            "Refusing to extract file with unsafe name {:?}",
            name
        )));
    }
    Ok(name)
}

/// Write `content` to `dest_dir/name` and stamp it with `timestamp`
pub fn write_file(
    dest_dir: &Path,
    name: &str,
    content: &[u8],
    timestamp: Option<DateTime<Local>>,
) -> Result<PathBuf, CeresError> {
    let path = dest_dir.join(safe_file_name(name)?);

    let mut file = File::create(&path)?;
    file.write_all(content)?;

    match timestamp {
        Some(ts) => {
            let time = SystemTime::from(ts);
            file.set_times(FileTimes::new().set_accessed(time).set_modified(time))?;
        }
        None => warn!("{}: timestamp could not be decoded, leaving current time", name),
    }

    debug!("Wrote {} bytes to {}", content.len(), path.display());
    Ok(path)
}

/// Extract one listed file into `dest_dir`
pub fn extract_entry(
    floppy: &OberonFloppy,
    entry: &DirectoryEntry,
    dest_dir: &Path,
) -> Result<PathBuf, CeresError> {
    let name = entry.name();
    let content = floppy.read_file(entry)?;
    write_file(dest_dir, &name, &content, entry.timestamp())
}

/// Extract every listed file, stopping at the first failure
///
/// Files extracted before the failure stay on disk.
pub fn extract_all(floppy: &OberonFloppy, dest_dir: &Path) -> Result<Vec<PathBuf>, CeresError> {
    let entries = floppy.list_files()?;
    info!("Extracting {} files to {}", entries.len(), dest_dir.display());

    entries
        .iter()
        .map(|entry| extract_entry(floppy, entry, dest_dir))
        .collect()
}
