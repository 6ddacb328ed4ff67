//! Decodes a BLOAD-wrapped PC-98 RBYTE bitmap to a PNG. Spec §6.

use std::path::PathBuf;

use clap::Parser;
use d88fat8::commands::decode::{self, Variant};

#[derive(Parser)]
#[command(about = "Decode a PC-98 RBYTE image to PNG")]
struct Cli {
    file: PathBuf,
    /// Canvas x/y offset; when given, the image is composited onto a
    /// 640x400 canvas instead of written at its own size.
    xoff: Option<usize>,
    yoff: Option<usize>,
}

fn main() -> d88fat8::StdResult {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    let offset = match (cli.xoff, cli.yoff) {
        (Some(x), Some(y)) => Some((x, y)),
        _ => None,
    };
    decode::run(Variant::Pc98, &cli.file, offset)?;
    Ok(())
}
