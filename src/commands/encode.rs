//! `rbyte_enc`/`rbyte88_enc` business logic: load a raster image, resize it
//! to fit the format's bounds, run it through the stipple quantizer, and
//! write the resulting RBYTE bytes. Spec §4.K/§6.

use std::path::{Path, PathBuf};

use crate::rbyte::{pc88, pc98};

use super::{CommandError, Result};

#[derive(Clone, Copy)]
pub enum Variant {
    Pc98,
    Pc88,
}

pub fn run(variant: Variant, path: &Path) -> Result<()> {
    let (src_width, src_height, rgb) = read_png_rgb8(path)?;

    let (max_width_px, max_height_px) = match variant {
        Variant::Pc98 => (640, 400),
        Variant::Pc88 => (640, 400),
    };
    let (width, height, resized) = resize_nearest_to_fit(src_width, src_height, &rgb, max_width_px, max_height_px);

    let bytes = match variant {
        Variant::Pc98 => pc98::encode(&pc98::quantize_image(width, height, &resized)),
        Variant::Pc88 => pc88::encode(&pc88::quantize_image(width, height, &resized)),
    };

    let suffix = match variant {
        Variant::Pc98 => "rbyte",
        Variant::Pc88 => "rbyte88",
    };
    let out_path = output_path(path, suffix);
    std::fs::write(&out_path, bytes).map_err(|source| CommandError::Io { path: out_path, source })?;
    Ok(())
}

fn output_path(path: &Path, suffix: &str) -> PathBuf {
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("image");
    parent.join(format!("{stem}_{suffix}.bin"))
}

fn read_png_rgb8(path: &Path) -> Result<(usize, usize, Vec<u8>)> {
    let file = std::fs::File::open(path).map_err(|source| CommandError::Io { path: path.to_path_buf(), source })?;
    let decoder = png::Decoder::new(std::io::BufReader::new(file));
    let mut reader = decoder
        .read_info()
        .map_err(|source| CommandError::Image { path: path.to_path_buf(), source })?;
    let mut buf = vec![0u8; reader.output_buffer_size()];
    let info = reader
        .next_frame(&mut buf)
        .map_err(|source| CommandError::Image { path: path.to_path_buf(), source })?;
    let width = info.width as usize;
    let height = info.height as usize;
    let rgb = to_rgb8(info.color_type, &buf[..info.buffer_size()]);
    Ok((width, height, rgb))
}

fn to_rgb8(color_type: png::ColorType, buf: &[u8]) -> Vec<u8> {
    match color_type {
        png::ColorType::Rgb => buf.to_vec(),
        png::ColorType::Rgba => buf.chunks_exact(4).flat_map(|p| [p[0], p[1], p[2]]).collect(),
        png::ColorType::Grayscale => buf.iter().flat_map(|&g| [g, g, g]).collect(),
        png::ColorType::GrayscaleAlpha => buf.chunks_exact(2).flat_map(|p| [p[0], p[0], p[0]]).collect(),
        png::ColorType::Indexed => buf.iter().flat_map(|&i| [i, i, i]).collect(),
    }
}

/// Scales the source raster down (never up) with nearest-neighbor sampling
/// so it fits within `max_width` x `max_height`, preserving aspect ratio.
fn resize_nearest_to_fit(
    src_width: usize,
    src_height: usize,
    rgb: &[u8],
    max_width: usize,
    max_height: usize,
) -> (usize, usize, Vec<u8>) {
    if src_width <= max_width && src_height <= max_height {
        return (src_width, src_height, rgb.to_vec());
    }
    let scale = f64::min(max_width as f64 / src_width as f64, max_height as f64 / src_height as f64);
    let dst_width = ((src_width as f64 * scale) as usize).max(1);
    let dst_height = ((src_height as f64 * scale) as usize).max(1);
    let mut out = vec![0u8; dst_width * dst_height * 3];
    for y in 0..dst_height {
        let sy = (y * src_height / dst_height).min(src_height - 1);
        for x in 0..dst_width {
            let sx = (x * src_width / dst_width).min(src_width - 1);
            let src_off = (sy * src_width + sx) * 3;
            let dst_off = (y * dst_width + x) * 3;
            out[dst_off..dst_off + 3].copy_from_slice(&rgb[src_off..src_off + 3]);
        }
    }
    (dst_width, dst_height, out)
}
