//! Encodes a raster image to PC-88 RBYTE bytes. Spec §6.

use std::path::PathBuf;

use clap::Parser;
use d88fat8::commands::encode::{self, Variant};

#[derive(Parser)]
#[command(about = "Encode an image to PC-88 RBYTE bytes")]
struct Cli {
    image: PathBuf,
}

fn main() -> d88fat8::StdResult {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    encode::run(Variant::Pc88, &cli.image)?;
    Ok(())
}
