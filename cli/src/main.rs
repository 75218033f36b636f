use anyhow::Context;
use ceres_core::FilesystemReader;
use ceres_filesystems::{extract_all, extract_entry, DirectoryEntry, OberonFloppy};
use clap::{Parser, Subcommand};
use log::LevelFilter;
use std::io::Write;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ceres")]
#[command(about = "Read files from Oberon (Ceres) floppy disk images", long_about = None)]
struct Cli {
    /// Raw floppy image file
    image: PathBuf,

    /// Enable debug logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List all files
    #[command(alias = "l")]
    List {
        /// Print the listing as JSON
        #[arg(long)]
        json: bool,
    },
    /// Write one file to stdout
    #[command(alias = "d")]
    Dump {
        /// File name on the floppy
        name: String,
    },
    /// Copy one file to a directory
    #[command(alias = "x")]
    Extract {
        /// File name on the floppy
        name: String,
        /// Destination directory
        #[arg(short, long, default_value = ".")]
        output: PathBuf,
    },
    /// Copy all files to a directory
    #[command(name = "extractall", alias = "xa")]
    ExtractAll {
        /// Destination directory
        #[arg(short, long, default_value = ".")]
        output: PathBuf,
    },
    /// Show format and usage information
    Info,
}

fn init_logging(verbose: bool) {
    let default = if verbose { LevelFilter::Debug } else { LevelFilter::Warn };
    env_logger::Builder::new()
        .filter_level(default)
        .parse_default_env()
        .init();
}

fn format_entry(entry: &DirectoryEntry) -> String {
    let timestamp = entry
        .timestamp()
        .map(|ts| ts.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| "????-??-?? ??:??:??".to_string());
    format!("{:>5}  {}  {:<23}", entry.size, timestamp, entry.name())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let floppy = OberonFloppy::open(&cli.image)
        .with_context(|| format!("Failed to open image {}", cli.image.display()))?;

    match cli.command {
        Commands::List { json } => {
            if json {
                let listing = floppy.list_directory()?;
                println!("{}", serde_json::to_string_pretty(&listing)?);
            } else {
                for entry in floppy.list_files()? {
                    println!("{}", format_entry(&entry));
                }
            }
        }
        Commands::Dump { name } => {
            let entry = floppy.find_file(&name)?;
            let data = floppy.read_file(&entry)?;
            let stdout = std::io::stdout();
            let mut out = stdout.lock();
            out.write_all(&data)?;
            out.flush()?;
        }
        Commands::Extract { name, output } => {
            let entry = floppy.find_file(&name)?;
            let path = extract_entry(&floppy, &entry, &output)
                .with_context(|| format!("Failed to extract {}", name))?;
            eprintln!("Extracted {} ({} bytes)", path.display(), entry.size);
        }
        Commands::ExtractAll { output } => {
            let paths = extract_all(&floppy, &output)
                .with_context(|| format!("Failed to extract files to {}", output.display()))?;
            eprintln!("Extracted {} files to {}", paths.len(), output.display());
        }
        Commands::Info => {
            let info = floppy.get_info()?;
            println!("Format:     {}", floppy.media_kind()?);
            println!("Label:      {}", info.label.as_deref().unwrap_or("(none)"));
            println!("Files:      {}", info.file_count);
            println!("Used:       {} bytes", info.used_bytes);
            println!("Capacity:   {} bytes", info.total_bytes);
            if let Some(unit) = info.cluster_size {
                println!("Unit size:  {} bytes", unit);
            }
        }
    }

    Ok(())
}
