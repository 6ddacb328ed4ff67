//! Encodes a raster image to PC-98 RBYTE bytes. Spec §6.

use std::path::PathBuf;

use clap::Parser;
use d88fat8::commands::encode::{self, Variant};

#[derive(Parser)]
#[command(about = "Encode an image to PC-98 RBYTE bytes")]
struct Cli {
    image: PathBuf,
    /// Reference-line search depth (0..32); only level 0 (always emit
    /// literal rows) is implemented, higher levels are accepted and logged
    /// but have no effect on the bytes produced.
    #[arg(short = 'O', long, default_value_t = 0)]
    optimize: u32,
}

fn main() -> d88fat8::StdResult {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    if cli.optimize != 0 {
        log::warn!("-O{} requested but only level 0 is implemented; encoding at level 0", cli.optimize);
    }
    encode::run(Variant::Pc98, &cli.image)?;
    Ok(())
}
