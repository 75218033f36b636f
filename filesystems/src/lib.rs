// Oberon floppy filesystem support
pub mod oberon;
pub mod extract;

#[cfg(test)]
pub mod test_helpers;

// Re-export the reader and its building blocks
pub use oberon::{
    detect, AllocationTable, DirectoryEntry, DirectoryReader, FileAssembler, FloppyGeometry,
    MediaKind, OberonFloppy,
};

// Re-export extraction
pub use extract::{extract_all, extract_entry, write_file};
