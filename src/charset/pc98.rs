//! PC-9800 (and Toshiba Pasopia, which reuses this table unmodified) 8-bit
//! charset.

use super::tables::{PC98_COMPAT, PC98_TABLE};
use super::{Charset, Error, MINIMAL_CONTROLS};

struct Pc98;

impl Charset for Pc98 {
    fn table(&self) -> &'static [char; 256] {
        &PC98_TABLE
    }
    fn compat(&self) -> &'static [(&'static str, u8)] {
        &PC98_COMPAT
    }
}

/// Decodes a byte string using the PC-98 8-bit table. `preserve` lists byte
/// values that should come through as their raw code point rather than the
/// table's control-picture glyph; pass [`super::MINIMAL_CONTROLS`] unless a
/// caller has a reason to show every control byte literally.
pub fn decode(bytes: &[u8], preserve: &[u8]) -> String {
    Pc98.decode(bytes, preserve)
}

/// Decodes with the default preserve set (`NUL, CR, LF, SUB, DEL`).
pub fn decode_default(bytes: &[u8]) -> String {
    Pc98.decode(bytes, MINIMAL_CONTROLS)
}

/// Encodes text back to PC-98 8-bit bytes. When `strict` is false, fullwidth
/// halfwidth-kana and a handful of punctuation marks are folded to their
/// halfwidth byte via the compatibility table before giving up.
pub fn encode(text: &str, strict: bool) -> Result<Vec<u8>, Error> {
    Pc98.encode(text, strict)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_round_trips() {
        let bytes: Vec<u8> = (0x20..0x7f).collect();
        let text = decode_default(&bytes);
        assert_eq!(encode(&text, true).unwrap(), bytes);
    }

    #[test]
    fn full_byte_range_round_trips() {
        let bytes: Vec<u8> = (0..=255).collect();
        Pc98.round_trip_check(&bytes, MINIMAL_CONTROLS).unwrap();
    }

    #[test]
    fn yen_sign_replaces_backslash() {
        assert_eq!(decode_default(&[0x5c]), "\u{a5}");
        assert_eq!(encode("\u{a5}", true).unwrap(), vec![0x5c]);
    }

    #[test]
    fn fullwidth_circle_folds_to_halfwidth_byte() {
        assert_eq!(encode("\u{25cb}", false).unwrap(), vec![0xed]);
        assert!(encode("\u{25cb}", true).is_err());
    }

    #[test]
    fn unmapped_kanji_is_an_error() {
        assert_eq!(encode("\u{9ad8}", true), Err(Error::Unmappable));
    }
}
