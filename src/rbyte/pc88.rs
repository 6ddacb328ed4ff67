//! RBYTE (PC-88) decoder and encoder. Spec §4.J / §4.K.
//!
//! Unlike the PC-98 variant, PC-88 RBYTE data carries no per-row command
//! byte at all: each plane is one flat run of double-byte-repeat RLE, and
//! the header's high bit picks whether that flat stream fills the plane
//! row-major or column-major.

use super::{stipple, Bitmap, Error, PackedPlane, Result};

pub const MAX_IMAGE_WIDTH_BYTES: usize = 640 / 8;
pub const MAX_IMAGE_HEIGHT: usize = 200;
const FAT8_SECTOR_SIZE: usize = 256;

/// State of the "have we just seen two equal bytes in a row" detector. A
/// byte seen once is tracked as `One`; a second matching byte promotes it
/// to `Pair`, and the byte immediately after a pair is always consumed as
/// a repeat count (itself minus one, since the pair's two literal copies
/// already account for one repeat) rather than as ordinary data — even if
/// that byte happens to fall in the next plane. The pair state is force-
/// reset whenever decoded output crosses a plane boundary, which can cut
/// a detector mid-pair: the byte right after such a boundary always
/// starts fresh as a new literal, never as a stray repeat count.
#[derive(Clone, Copy, PartialEq, Eq)]
enum PairState {
    Empty,
    One(u8),
    Pair(u8),
}

/// Runs the whole three-plane RLE stream in one pass, exactly mirroring
/// the reference decoder's single byte-at-a-time scan: plane size is
/// `width * height` and the detector resets every time decoded output
/// crosses a `plane_size` boundary, not just once per plane.
fn decode_rle_stream(body: &[u8], plane_size: usize) -> Result<(Vec<u8>, usize)> {
    let total = 3 * plane_size;
    let mut out = Vec::with_capacity(total);
    let mut state = PairState::Empty;
    let mut pos = 0;

    while out.len() < total {
        let b = *body.get(pos).ok_or(Error::RowUnderrun { emitted: out.len(), expected: total })?;
        pos += 1;
        match state {
            PairState::Empty => {
                out.push(b);
                state = PairState::One(b);
            }
            PairState::One(prev) if prev == b => {
                out.push(b);
                state = PairState::Pair(b);
            }
            PairState::One(_) => {
                out.push(b);
                state = PairState::One(b);
            }
            PairState::Pair(prev) => {
                if b == 0 {
                    return Err(Error::ZeroRepeatCount);
                }
                let repeat_count = (b - 1) as usize;
                let room = total - out.len();
                out.extend(std::iter::repeat(prev).take(repeat_count.min(room)));
                if repeat_count > room {
                    return Err(Error::RowOverrun { emitted: out.len() + (repeat_count - room), expected: total });
                }
                state = PairState::Empty;
            }
        }
        if out.len() % plane_size == 0 {
            state = PairState::Empty;
        }
    }
    Ok((out, pos))
}

/// Scatters a flat, plane-sized byte run into row-major plane storage
/// according to the header's traversal direction.
fn scatter(flat: &[u8], width: usize, height: usize, vertical: bool) -> Vec<Vec<u8>> {
    let mut rows = vec![vec![0u8; width]; height];
    let mut idx = 0;
    if vertical {
        for x in 0..width {
            for y in 0..height {
                rows[y][x] = flat[idx];
                idx += 1;
            }
        }
    } else {
        for y in 0..height {
            for x in 0..width {
                rows[y][x] = flat[idx];
                idx += 1;
            }
        }
    }
    rows
}

/// Gathers row-major plane storage back into a flat run in the given
/// traversal order, inverse of [`scatter`].
fn gather(rows: &[Vec<u8>], width: usize, height: usize, vertical: bool) -> Vec<u8> {
    let mut flat = Vec::with_capacity(width * height);
    if vertical {
        for x in 0..width {
            for y in 0..height {
                flat.push(rows[y][x]);
            }
        }
    } else {
        for y in 0..height {
            for x in 0..width {
                flat.push(rows[y][x]);
            }
        }
    }
    flat
}

/// Decodes a full RBYTE (PC-88) image from its 2-byte header onward.
pub fn decode(bytes: &[u8]) -> Result<Bitmap> {
    if bytes.len() < 2 {
        return Err(Error::TooShortForHeader);
    }
    let vertical = bytes[0] & 0x80 != 0;
    let width = (bytes[0] & 0x7f) as usize;
    let height = bytes[1] as usize;
    if width == 0 || width > MAX_IMAGE_WIDTH_BYTES || height == 0 || height > MAX_IMAGE_HEIGHT {
        return Err(Error::HeaderOutOfRange { width, height });
    }

    let body = &bytes[2..];
    let plane_size = width * height;

    let (flat, consumed) = decode_rle_stream(body, plane_size)?;
    let (blue_flat, rest) = flat.split_at(plane_size);
    let (red_flat, green_flat) = rest.split_at(plane_size);

    if consumed < body.len() {
        let extra = &body[consumed..];
        if extra[0] != 0x1a {
            return Err(Error::BadTrailingPadding);
        }
        if extra.len() > 2 * FAT8_SECTOR_SIZE {
            return Err(Error::TrailingPaddingTooLarge { max_sectors: 2, sector_size: FAT8_SECTOR_SIZE });
        }
        if bytes.len() % FAT8_SECTOR_SIZE != 0 {
            return Err(Error::BadTrailingPadding);
        }
    }

    Ok(Bitmap {
        blue: PackedPlane { width_bytes: width, height, rows: scatter(&blue_flat, width, height, vertical) },
        red: PackedPlane { width_bytes: width, height, rows: scatter(&red_flat, width, height, vertical) },
        green: PackedPlane { width_bytes: width, height, rows: scatter(&green_flat, width, height, vertical) },
        scan_double: true,
    })
}

fn encode_plane_rle(flat: &[u8], out: &mut Vec<u8>) {
    let mut i = 0;
    while i < flat.len() {
        let b = flat[i];
        let mut run = 1;
        while i + run < flat.len() && flat[i + run] == b {
            run += 1;
        }
        if run == 1 {
            out.push(b);
            i += 1;
        } else {
            out.push(b);
            out.push(b);
            // already emitted 2 literal copies; remaining repeats encoded as count+1
            let remaining = run - 2;
            out.push((remaining + 1) as u8);
            i += run;
        }
    }
}

/// Encodes a [`Bitmap`] back to RBYTE (PC-88) bytes, always row-major
/// (`vertical = false`); a real encoder would try both traversal orders
/// and keep whichever compresses smaller, but round-tripping only needs
/// one consistent choice.
pub fn encode(bitmap: &Bitmap) -> Vec<u8> {
    let width = bitmap.width_bytes();
    let height = bitmap.height();
    let mut out = Vec::new();
    out.push(width as u8);
    out.push(height as u8);
    for plane in [&bitmap.blue, &bitmap.red, &bitmap.green] {
        let flat = gather(&plane.rows, width, height, false);
        encode_plane_rle(&flat, &mut out);
    }
    out
}

/// Quantizes an RGB8 raster down to a PC-88 [`Bitmap`], always row-major.
/// Like [`super::pc98::quantize_image`], vertical resolution is halved
/// (scan-doubled back on display) and each output bit comes from the same
/// ordered-dither table the PC-98 encoder uses.
pub fn quantize_image(width_px: usize, height_px: usize, rgb: &[u8]) -> Bitmap {
    let width_bytes = (width_px + 7) / 8;
    let height = (height_px + 1) / 2;
    let mut blue = PackedPlane::new(width_bytes, height);
    let mut red = PackedPlane::new(width_bytes, height);
    let mut green = PackedPlane::new(width_bytes, height);

    for y in 0..height {
        let src_row = (2 * y).min(height_px.saturating_sub(1));
        let mut brow = vec![0u8; width_bytes];
        let mut rrow = vec![0u8; width_bytes];
        let mut grow = vec![0u8; width_bytes];
        for xb in 0..width_bytes {
            for bit in 0..8 {
                let px = xb * 8 + bit;
                if px >= width_px {
                    continue;
                }
                let offset = (src_row * width_px + px) * 3;
                let (r, g, b) = (rgb[offset], rgb[offset + 1], rgb[offset + 2]);
                let mask = 0x80u8 >> bit;
                if stipple::quantize(r, px, y) {
                    rrow[xb] |= mask;
                }
                if stipple::quantize(g, px, y) {
                    grow[xb] |= mask;
                }
                if stipple::quantize(b, px, y) {
                    brow[xb] |= mask;
                }
            }
        }
        blue.rows.push(brow);
        red.rows.push(rrow);
        green.rows.push(grow);
    }
    Bitmap { blue, red, green, scan_double: true }
}
