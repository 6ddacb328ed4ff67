//! Reads one or more D88 disk images, decodes the FAT8 filesystem on each
//! disk they contain, and unpacks every recoverable file alongside a text
//! analysis log. Spec §6.

use std::path::PathBuf;

use clap::Parser;

#[derive(Parser)]
#[command(about = "Analyze and unpack D88 floppy images holding a FAT8 filesystem")]
struct Cli {
    /// One or more .d88 files to analyze and unpack.
    #[arg(required = true)]
    files: Vec<PathBuf>,
}

fn main() -> d88fat8::StdResult {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    d88fat8::commands::extract::run(&cli.files)
}
