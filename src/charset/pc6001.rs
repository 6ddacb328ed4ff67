//! PC-6001/PC-6601 8-bit charset, including the 32-glyph alternate page
//! reached by prefixing a byte in `0x30..=0x4f` with `0x14`.

use super::tables::{PC6001_ALT_TABLE, PC6001_COMPAT, PC6001_TABLE};
use super::{Charset, Error, MINIMAL_CONTROLS};

const ALT_PREFIX: u8 = 0x14;
const ALT_BASE: u8 = 0x30;

struct Pc6001;

impl Charset for Pc6001 {
    fn table(&self) -> &'static [char; 256] {
        &PC6001_TABLE
    }
    fn compat(&self) -> &'static [(&'static str, u8)] {
        &PC6001_COMPAT
    }

    fn decode_extra(&self, bytes: &[u8]) -> Option<(char, usize)> {
        if bytes.first() != Some(&ALT_PREFIX) {
            return None;
        }
        let second = *bytes.get(1)?;
        let index = second.checked_sub(ALT_BASE)? as usize;
        PC6001_ALT_TABLE.get(index).map(|&c| (c, 2))
    }

    fn encode_extra(&self, c: char) -> Option<Vec<u8>> {
        let index = PC6001_ALT_TABLE.iter().position(|&t| t == c)?;
        Some(vec![ALT_PREFIX, ALT_BASE + index as u8])
    }
}

/// Decodes a byte string using the PC-6001 8-bit table, following `0x14`
/// prefix bytes into the alternate 32-glyph page.
pub fn decode(bytes: &[u8], preserve: &[u8]) -> String {
    Pc6001.decode(bytes, preserve)
}

/// Decodes with the default preserve set (`NUL, CR, LF, SUB, DEL`).
pub fn decode_default(bytes: &[u8]) -> String {
    Pc6001.decode(bytes, MINIMAL_CONTROLS)
}

/// Encodes text back to PC-6001 8-bit bytes, emitting the `0x14` prefix
/// sequence for characters that only live on the alternate page.
pub fn encode(text: &str, strict: bool) -> Result<Vec<u8>, Error> {
    Pc6001.encode(text, strict)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_byte_range_round_trips() {
        let bytes: Vec<u8> = (0..=255).collect();
        Pc6001.round_trip_check(&bytes, MINIMAL_CONTROLS).unwrap();
    }

    #[test]
    fn alternate_page_day_names_round_trip() {
        // 0x14 0x31 -> "\u{6708}" (month/Monday kanji)
        let bytes = [ALT_PREFIX, ALT_BASE + 1];
        let text = decode_default(&bytes);
        assert_eq!(text, "\u{6708}");
        assert_eq!(encode(&text, true).unwrap(), bytes);
    }

    #[test]
    fn hiragana_round_trips() {
        let bytes = [0x91]; // '\u{3042}' (あ) in PC6001_TABLE
        let text = decode_default(&bytes);
        assert_eq!(text, "\u{3042}");
        assert_eq!(encode(&text, true).unwrap(), bytes);
    }

    #[test]
    fn truncated_alt_prefix_falls_back_to_plain_table() {
        // trailing lone 0x14 with nothing after it: decode_extra returns
        // None (out of bytes), so the plain table entry for 0x14 applies.
        let text = decode_default(&[ALT_PREFIX]);
        assert_eq!(text.chars().count(), 1);
    }
}
