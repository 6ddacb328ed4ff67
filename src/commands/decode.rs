//! `rbyte`/`rbyte88` business logic: decode one RBYTE image and write it
//! out as a PNG. Spec §6.

use std::path::{Path, PathBuf};

use crate::rbyte::{self, composite_on_canvas};

use super::{CommandError, Result};

#[derive(Clone, Copy)]
pub enum Variant {
    Pc98,
    Pc88,
}

/// `offset` is `Some((x, y))` when the caller passed the optional canvas
/// position arguments; otherwise the bitmap is written at its own natural
/// size with no compositing.
pub fn run(variant: Variant, path: &Path, offset: Option<(usize, usize)>) -> Result<()> {
    let bytes = std::fs::read(path).map_err(|source| CommandError::Io { path: path.to_path_buf(), source })?;
    let to_err = |source| CommandError::Rbyte { path: path.to_path_buf(), source };

    let bitmap = match variant {
        Variant::Pc98 => {
            let payload = rbyte::read_bload_wrapped(&bytes).map_err(to_err)?;
            rbyte::pc98::decode(payload).map_err(to_err)?
        }
        Variant::Pc88 => {
            let payload = rbyte::strip_trailing_padding(&bytes, 256, 2).map_err(to_err)?;
            rbyte::pc88::decode(payload).map_err(to_err)?
        }
    };

    let (width, height, rgb_or_rgba, is_rgba) = match offset {
        Some((x, y)) => {
            let (w, h, canvas) = composite_on_canvas(&bitmap, x, y);
            (w, h, canvas, true)
        }
        None => {
            let (w, h, rgb) = bitmap.to_rgb8();
            (w, h, rgb, false)
        }
    };

    let suffix = match variant {
        Variant::Pc98 => "rbyte",
        Variant::Pc88 => "rbyte88",
    };
    let out_path = output_path(path, offset, suffix);
    if is_rgba {
        write_rgba_png(&out_path, width, height, &rgb_or_rgba).map_err(to_err)?;
    } else {
        rbyte::write_png(&out_path, width, height, &rgb_or_rgba).map_err(to_err)?;
    }
    Ok(())
}

fn output_path(path: &Path, offset: Option<(usize, usize)>, suffix: &str) -> PathBuf {
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("image");
    let name = match offset {
        Some((x, y)) => format!("{stem}_{x}_{y}_{suffix}.png"),
        None => format!("{stem}_{suffix}.png"),
    };
    parent.join(name)
}

fn write_rgba_png(path: &Path, width: usize, height: usize, rgba: &[u8]) -> rbyte::Result<()> {
    let file = std::fs::File::create(path)?;
    let writer = std::io::BufWriter::new(file);
    let mut encoder = png::Encoder::new(writer, width as u32, height as u32);
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    encoder.set_source_gamma(png::ScaledFloat::new(0.45455));
    let mut writer = encoder.write_header()?;
    writer.write_image_data(rgba)?;
    Ok(())
}
