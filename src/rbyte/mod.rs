//! RBYTE bitmap codec: a proprietary run-length-encoded graphics format
//! used by some BASIC program disks on these platforms, completely
//! unrelated to the FAT8 filesystem above it. Two variants exist, PC-98
//! (`pc98`) and PC-88 (`pc88`); both decode to the same three-plane
//! [`Bitmap`] representation, which [`write_png`] turns into an actual
//! raster image.

pub mod pc88;
pub mod pc98;
mod stipple;

use thiserror::Error;

/// Height bound quoted by the reference decoder's copy routine; the bound
/// itself is almost certainly a typo for a row-count check rather than a
/// meaningful limit (see `pc98::reference_row`), but images never exceed
/// it under the §3 header constraint (`height ≤ 200`) so it is kept as a
/// documented, logged advisory rather than an error.
pub const RBYTE_MAX_IMAGE_HEIGHT: usize = 200;

#[derive(Error, Debug)]
pub enum Error {
    #[error("RBYTE header out of range: width={width} height={height}")]
    HeaderOutOfRange { width: usize, height: usize },
    #[error("line command {0:#04x} is not a recognized opcode")]
    UnknownOpcode(u8),
    #[error("row emitted {emitted} bytes, expected exactly {expected}")]
    RowOverrun { emitted: usize, expected: usize },
    #[error("row ran out of input before emitting its {expected} bytes (only {emitted} produced)")]
    RowUnderrun { emitted: usize, expected: usize },
    #[error("line command requested row {requested} rows back but only {available} rows are available")]
    DeflectionExceedsRow { requested: usize, available: usize },
    #[error("CMD_COPY_PREVIOUS_LINE with zero deflection")]
    ZeroDeflection,
    #[error("repeat count of 0x00 in CMD_REPEAT_UNTIL_FF")]
    ZeroRepeatCount,
    #[error("BLOAD header's load address {0:#06x} is below the minimum 0x1e0")]
    BloadLoadAddressTooLow(u16),
    #[error("trailing padding does not begin with the 0x1A marker")]
    BadTrailingPadding,
    #[error("trailing padding is larger than {max_sectors} sector(s) of {sector_size} bytes")]
    TrailingPaddingTooLarge { max_sectors: usize, sector_size: usize },
    #[error("input is too short to hold an RBYTE header")]
    TooShortForHeader,
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Png(#[from] png::EncodingError),
}

pub type Result<T> = std::result::Result<T, Error>;

/// One color channel's pixels, packed 8-per-byte (bit 7 leftmost), `height`
/// rows of `width_bytes` bytes each.
#[derive(Debug, Clone)]
pub struct PackedPlane {
    pub width_bytes: usize,
    pub height: usize,
    pub rows: Vec<Vec<u8>>,
}

impl PackedPlane {
    fn new(width_bytes: usize, height: usize) -> Self {
        PackedPlane { width_bytes, height, rows: Vec::with_capacity(height) }
    }
}

/// A fully decoded RBYTE image: three packed planes in Blue, Red, Green
/// order (the format's fixed plane order, see spec's glossary), and
/// whether the source recommends scan-doubling rows for display (PC-98
/// sources always do; PC-88 never does).
#[derive(Debug, Clone)]
pub struct Bitmap {
    pub blue: PackedPlane,
    pub red: PackedPlane,
    pub green: PackedPlane,
    pub scan_double: bool,
}

impl Bitmap {
    pub fn width_bytes(&self) -> usize {
        self.blue.width_bytes
    }

    pub fn height(&self) -> usize {
        self.blue.height
    }

    /// Expands the packed planes into an 8-bit-per-channel RGB raster,
    /// `width_bytes*8` pixels wide and `height` (or `2*height` if
    /// `scan_double`) pixels tall.
    pub fn to_rgb8(&self) -> (usize, usize, Vec<u8>) {
        let px_width = self.width_bytes() * 8;
        let row_multiplier = if self.scan_double { 2 } else { 1 };
        let px_height = self.height() * row_multiplier;
        let mut out = vec![0u8; px_width * px_height * 3];
        for src_row in 0..self.height() {
            for copy in 0..row_multiplier {
                let dst_row = src_row * row_multiplier + copy;
                for col_byte in 0..self.width_bytes() {
                    let b = self.blue.rows[src_row][col_byte];
                    let r = self.red.rows[src_row][col_byte];
                    let g = self.green.rows[src_row][col_byte];
                    for bit in 0..8 {
                        let mask = 0x80u8 >> bit;
                        let px = col_byte * 8 + bit;
                        let offset = (dst_row * px_width + px) * 3;
                        out[offset] = if r & mask != 0 { 255 } else { 0 };
                        out[offset + 1] = if g & mask != 0 { 255 } else { 0 };
                        out[offset + 2] = if b & mask != 0 { 255 } else { 0 };
                    }
                }
            }
        }
        (px_width, px_height, out)
    }
}

/// Composites a decoded bitmap onto a transparent 640x400 canvas at
/// (`x_offset`, `y_offset`), filling everywhere else (including inside the
/// placed rectangle before it's overwritten, matching the reference
/// decoder's "noise so you can see what changed" debug aid) with a cheap
/// deterministic pattern rather than actual randomness, since this crate
/// never calls an RNG for reproducibility.
pub fn composite_on_canvas(bitmap: &Bitmap, x_offset: usize, y_offset: usize) -> (usize, usize, Vec<u8>) {
    const CANVAS_W: usize = 640;
    const CANVAS_H: usize = 400;
    let mut canvas = vec![0u8; CANVAS_W * CANVAS_H * 4];
    for (i, px) in canvas.chunks_exact_mut(4).enumerate() {
        let x = i % CANVAS_W;
        let y = i / CANVAS_W;
        let n = lcg_noise(x, y);
        px[0] = n;
        px[1] = n.wrapping_mul(3);
        px[2] = n.wrapping_mul(7);
        px[3] = 0; // transparent outside the decoded rectangle
    }
    let (bw, bh, rgb) = bitmap.to_rgb8();
    for row in 0..bh {
        let cy = y_offset + row;
        if cy >= CANVAS_H {
            break;
        }
        for col in 0..bw {
            let cx = x_offset + col;
            if cx >= CANVAS_W {
                break;
            }
            let src = (row * bw + col) * 3;
            let dst = (cy * CANVAS_W + cx) * 4;
            canvas[dst] = rgb[src];
            canvas[dst + 1] = rgb[src + 1];
            canvas[dst + 2] = rgb[src + 2];
            canvas[dst + 3] = 255;
        }
    }
    (CANVAS_W, CANVAS_H, canvas)
}

fn lcg_noise(x: usize, y: usize) -> u8 {
    let seed = (x as u32).wrapping_mul(1103515245).wrapping_add(y as u32).wrapping_add(12345);
    (seed >> 16) as u8
}

/// Reads a BLOAD-wrapped file: 4-byte header (`load_addr`, `stop_addr`,
/// both LE16), then payload, then optional padding that must start with
/// `0x1A` and span at most one 512-byte sector.
pub fn read_bload_wrapped(bytes: &[u8]) -> Result<&[u8]> {
    if bytes.len() < 4 {
        return Err(Error::TooShortForHeader);
    }
    let load_addr = u16::from_le_bytes([bytes[0], bytes[1]]);
    if load_addr < 0x1e0 {
        return Err(Error::BloadLoadAddressTooLow(load_addr));
    }
    strip_trailing_padding(&bytes[4..], 512, 1)
}

/// Strips trailing sector padding from a payload that may have been
/// rounded up to a sector boundary. Any data beyond a full multiple of
/// `sector_size` and up to `max_sectors` sectors must start with `0x1A`.
pub fn strip_trailing_padding(bytes: &[u8], sector_size: usize, max_sectors: usize) -> Result<&[u8]> {
    let full_sectors = bytes.len() / sector_size;
    let remainder = bytes.len() % sector_size;
    if remainder == 0 {
        return Ok(bytes);
    }
    let payload_len = full_sectors * sector_size;
    let trailing = &bytes[payload_len..];
    if trailing.first() != Some(&0x1a) {
        return Err(Error::BadTrailingPadding);
    }
    if trailing.len() > sector_size * max_sectors {
        return Err(Error::TrailingPaddingTooLarge { max_sectors, sector_size });
    }
    Ok(&bytes[..payload_len])
}

/// Writes an RGB8 raster as a PNG with `gAMA` set to 45455 (the reference
/// tool's fixed gamma value), matching spec §6's interface requirement.
/// Any conforming PNG encoder satisfies this; `png` is used here because
/// it's already a direct, small dependency with no transitive image stack.
pub fn write_png(path: &std::path::Path, width: usize, height: usize, rgb: &[u8]) -> Result<()> {
    let file = std::fs::File::create(path)?;
    let writer = std::io::BufWriter::new(file);
    let mut encoder = png::Encoder::new(writer, width as u32, height as u32);
    encoder.set_color(png::ColorType::Rgb);
    encoder.set_depth(png::BitDepth::Eight);
    encoder.set_source_gamma(png::ScaledFloat::new(0.45455));
    let mut writer = encoder.write_header()?;
    writer.write_image_data(rgb)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bload_wrapper_rejects_low_load_address() {
        let bytes = [0x00, 0x00, 0x00, 0x02];
        let err = read_bload_wrapped(&bytes).unwrap_err();
        assert!(matches!(err, Error::BloadLoadAddressTooLow(0)));
    }

    #[test]
    fn bload_wrapper_extracts_payload_with_no_padding() {
        let mut bytes = vec![0xe0, 0x01, 0x00, 0x02];
        bytes.extend_from_slice(b"hello");
        let payload = read_bload_wrapped(&bytes).unwrap();
        assert_eq!(payload, b"hello");
    }

    #[test]
    fn trailing_padding_must_start_with_eof_marker() {
        let mut bytes = vec![0u8; 300];
        bytes[250] = 0x42; // not 0x1a
        let err = strip_trailing_padding(&bytes, 256, 1).unwrap_err();
        assert!(matches!(err, Error::BadTrailingPadding));
    }

    #[test]
    fn trailing_padding_is_stripped_when_well_formed() {
        let mut bytes = vec![1u8; 256];
        bytes.push(0x1a);
        bytes.extend_from_slice(&[0u8; 30]);
        let payload = strip_trailing_padding(&bytes, 256, 1).unwrap();
        assert_eq!(payload.len(), 256);
    }

    #[test]
    fn bitmap_expands_one_byte_plane_to_eight_pixels() {
        let mut blue = PackedPlane::new(1, 1);
        blue.rows.push(vec![0b1010_0000]);
        let mut red = PackedPlane::new(1, 1);
        red.rows.push(vec![0x00]);
        let mut green = PackedPlane::new(1, 1);
        green.rows.push(vec![0x00]);
        let bmp = Bitmap { blue, red, green, scan_double: false };
        let (w, h, rgb) = bmp.to_rgb8();
        assert_eq!((w, h), (8, 1));
        assert_eq!(&rgb[0..3], &[0, 0, 255]);
        assert_eq!(&rgb[3..6], &[0, 0, 0]);
        assert_eq!(&rgb[6..9], &[0, 0, 255]);
    }

    #[test]
    fn scan_doubling_duplicates_each_row() {
        let mut blue = PackedPlane::new(1, 1);
        blue.rows.push(vec![0xff]);
        let mut red = PackedPlane::new(1, 1);
        red.rows.push(vec![0x00]);
        let mut green = PackedPlane::new(1, 1);
        green.rows.push(vec![0x00]);
        let bmp = Bitmap { blue, red, green, scan_double: true };
        let (_, h, _) = bmp.to_rgb8();
        assert_eq!(h, 2);
    }
}
