// Oberon floppy reader
// Owns the image and its allocation table; all operations are read-only

use super::chain::FileAssembler;
use super::constants::FloppyGeometry;
use super::detection::MediaKind;
use super::directory::{DirectoryEntry, DirectoryReader};
use super::fat_table::AllocationTable;
use ceres_core::{CeresError, FileEntry, FilesystemInfo, FilesystemReader, ImageBuffer};
use log::info;
use std::path::Path;

pub struct OberonFloppy {
    image: ImageBuffer,
    table: AllocationTable,
}

impl OberonFloppy {
    /// Wrap an image, decoding its allocation table once
    pub fn new(image: ImageBuffer) -> Result<Self, CeresError> {
        let table = AllocationTable::decode(&image)?;
        Ok(Self { image, table })
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, CeresError> {
        let path = path.as_ref();
        info!("Opening Oberon floppy image: {}", path.display());
        Self::new(ImageBuffer::from_file(path)?)
    }

    pub fn image(&self) -> &ImageBuffer {
        &self.image
    }

    pub fn allocation_table(&self) -> &AllocationTable {
        &self.table
    }

    pub fn media_kind(&self) -> Result<MediaKind, CeresError> {
        DirectoryReader::new(&self.image).media_kind()
    }

    pub fn volume_label(&self) -> Result<DirectoryEntry, CeresError> {
        let reader = DirectoryReader::new(&self.image);
        reader.media_kind()?;
        reader.volume_label()
    }

    pub fn list_files(&self) -> Result<Vec<DirectoryEntry>, CeresError> {
        DirectoryReader::new(&self.image).list()
    }

    pub fn read_file(&self, entry: &DirectoryEntry) -> Result<Vec<u8>, CeresError> {
        FileAssembler::new(&self.image, &self.table).read(entry)
    }

    /// Look up a file by exact, case-sensitive name
    pub fn find_file(&self, name: &str) -> Result<DirectoryEntry, CeresError> {
        self.list_files()?
            .into_iter()
            .find(|e| e.name() == name)
            .ok_or_else(|| CeresError::NotFound(name.to_string()))
    }

    pub fn info(&self) -> Result<FilesystemInfo, CeresError> {
        let kind = self.media_kind()?;
        let label = self.volume_label()?.name();
        let files = self.list_directory()?;
        let geometry = FloppyGeometry::CERES_720K;

        Ok(FilesystemInfo {
            fs_type: kind.name().to_string(),
            label: Some(label).filter(|l| !l.is_empty() && l.is_ascii()),
            total_bytes: geometry.total_bytes(),
            used_bytes: files.iter().map(|f| f.size).sum(),
            file_count: files.len(),
            cluster_size: Some(geometry.unit_size() as u32),
        })
    }
}

impl FilesystemReader for OberonFloppy {
    fn list_directory(&self) -> Result<Vec<FileEntry>, CeresError> {
        self.list_files()?.iter().map(DirectoryEntry::to_file_entry).collect()
    }

    fn read_file(&self, name: &str) -> Result<Vec<u8>, CeresError> {
        let entry = self.find_file(name)?;
        OberonFloppy::read_file(self, &entry)
    }

    fn get_info(&self) -> Result<FilesystemInfo, CeresError> {
        self.info()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{FloppyImageBuilder, TestFile};

    fn sample() -> OberonFloppy {
        let image = FloppyImageBuilder::new()
            .media_descriptor(0xE9)
            .file(TestFile::new("System.Tool", b"System.Directory"))
            .file(TestFile::new("Big.Text", &vec![b'z'; 2500]))
            .build();
        OberonFloppy::new(image).unwrap()
    }

    #[test]
    fn test_find_file() {
        let floppy = sample();
        let entry = floppy.find_file("Big.Text").unwrap();
        assert_eq!(entry.size, 2500);

        // Names are matched exactly
        assert!(matches!(floppy.find_file("big.text"), Err(CeresError::NotFound(_))));
        assert!(matches!(floppy.find_file("Missing"), Err(CeresError::NotFound(ref n)) if n == "Missing"));
    }

    #[test]
    fn test_reader_trait() {
        let floppy = sample();
        let reader: &dyn FilesystemReader = &floppy;

        let listing = reader.list_directory().unwrap();
        assert_eq!(listing.len(), 2);
        assert_eq!(listing[0].name, "System.Tool");
        assert_eq!(listing[0].size, 16);
        assert!(listing[0].modified.is_some());

        assert_eq!(reader.read_file("System.Tool").unwrap(), b"System.Directory");
    }

    #[test]
    fn test_info() {
        let info = sample().info().unwrap();
        assert_eq!(info.fs_type, "Oberon");
        assert_eq!(info.label, None);
        assert_eq!(info.file_count, 2);
        assert_eq!(info.used_bytes, 2516);
        assert_eq!(info.total_bytes, 720 * 512);
        assert_eq!(info.cluster_size, Some(1024));
    }

    #[test]
    fn test_repeated_reads_are_identical() {
        let floppy = sample();
        let first = floppy.list_files().unwrap();
        let second = floppy.list_files().unwrap();
        assert_eq!(first, second);

        let entry = &first[1];
        assert_eq!(floppy.read_file(entry).unwrap(), floppy.read_file(entry).unwrap());
    }

    #[test]
    fn test_unsupported_format_blocks_everything() {
        let image = FloppyImageBuilder::new()
            .media_descriptor(0x00)
            .file(TestFile::new("A", b"a"))
            .build();
        let floppy = OberonFloppy::new(image).unwrap();

        assert!(matches!(floppy.list_files(), Err(CeresError::UnsupportedFormat(_))));
        assert!(matches!(floppy.find_file("A"), Err(CeresError::UnsupportedFormat(_))));
        assert!(matches!(floppy.info(), Err(CeresError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_negative_size_is_reported_consistently() {
        let image = FloppyImageBuilder::new()
            .file(TestFile::new("Good", b"ok"))
            .file(TestFile::new("Bad", b"abc").size(-1))
            .build();
        let floppy = OberonFloppy::new(image).unwrap();

        let entries = floppy.list_files().unwrap();
        assert_eq!(entries.len(), 2);
        assert!(matches!(floppy.read_file(&entries[1]), Err(CeresError::CorruptDirectory(_))));
        assert!(matches!(floppy.list_directory(), Err(CeresError::CorruptDirectory(_))));
        assert!(matches!(floppy.info(), Err(CeresError::CorruptDirectory(_))));
    }

    #[test]
    fn test_image_too_small_for_table() {
        let result = OberonFloppy::new(ImageBuffer::new(vec![0u8; 1024]));
        assert!(matches!(result, Err(CeresError::OutOfRange(_))));
    }
}
