// Oberon (Ceres workstation) floppy filesystem - read-only

pub mod constants;
pub mod record;
pub mod fat_table;
pub mod timestamps;
pub mod detection;
pub mod directory;
pub mod chain;
pub mod reader;

pub use chain::FileAssembler;
pub use constants::FloppyGeometry;
pub use detection::{detect, MediaKind};
pub use directory::{DirectoryEntry, DirectoryReader};
pub use fat_table::AllocationTable;
pub use reader::OberonFloppy;
