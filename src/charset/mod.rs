//! # Charset Module
//!
//! The BASIC interpreters on these machines display an 8-bit-clean character
//! ROM, not anything Unicode-aware. This module maps bytes read off disk to
//! the Unicode text a modern tool wants to print, and back, for the two
//! charsets the formats in [`crate::fs::fat8::format`] reference:
//! `pc98` (NEC PC-9800 series, also used unmodified by the Toshiba Pasopia)
//! and `pc6001` (NEC PC-6001/6601 series, with an alternate 32-glyph page).
//!
//! The mapping is only asked to be correct at the interface: every byte
//! decodes to some `char`, and encoding that `char` back (with the same
//! `strict` setting) recovers the original byte. Actual glyph shapes are not
//! this module's concern.

pub mod pc6001;
pub mod pc98;
mod tables;

use thiserror::Error;

/// Control bytes that [`decode`] preserves as their raw code point rather
/// than mapping through the symbol table, by default just enough to keep
/// text round-trippable through common editors (NUL, CR, LF, SUB/EOF, DEL).
pub const MINIMAL_CONTROLS: &[u8] = &[0x00, 0x0d, 0x0a, 0x1a, 0x7f];

/// All C0 control bytes plus DEL. Some dumps want every byte below 0x20
/// shown as its raw code point instead of the control-picture glyphs the
/// charset tables otherwise use.
pub const ASCII_CONTROLS: &[u8] = &[
    0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0a, 0x0b, 0x0c, 0x0d, 0x0e,
    0x0f, 0x10, 0x11, 0x12, 0x13, 0x14, 0x15, 0x16, 0x17, 0x18, 0x19, 0x1a, 0x1b, 0x1c, 0x1d,
    0x1e, 0x1f, 0x7f,
];

#[derive(Error, Debug, PartialEq, Eq)]
pub enum Error {
    #[error("character has no representation in this charset")]
    Unmappable,
    #[error("decode then re-encode did not reproduce the original bytes")]
    RoundTripFailure,
}

/// A single 8-bit charset: a 256-entry forward table plus a small reverse
/// table of NFKD compatibility folds used when `strict` encoding is off.
pub(crate) trait Charset {
    fn table(&self) -> &'static [char; 256];
    fn compat(&self) -> &'static [(&'static str, u8)];
    /// Byte values handled outside the plain 256-entry table (PC-6001's
    /// `0x14`-prefixed alternate page). Returns `None` for charsets without
    /// one.
    fn decode_extra(&self, _bytes: &[u8]) -> Option<(char, usize)> {
        None
    }
    fn encode_extra(&self, _c: char) -> Option<Vec<u8>> {
        None
    }

    fn decode(&self, bytes: &[u8], preserve: &[u8]) -> String {
        let mut out = String::with_capacity(bytes.len());
        let mut i = 0;
        while i < bytes.len() {
            if let Some((c, consumed)) = self.decode_extra(&bytes[i..]) {
                out.push(c);
                i += consumed;
                continue;
            }
            let b = bytes[i];
            if preserve.contains(&b) {
                out.push(b as char);
            } else {
                out.push(self.table()[b as usize]);
            }
            i += 1;
        }
        out
    }

    fn encode(&self, text: &str, strict: bool) -> Result<Vec<u8>, Error> {
        let mut out = Vec::with_capacity(text.len());
        for c in text.chars() {
            out.extend(self.encode_char(c, strict)?);
        }
        Ok(out)
    }

    fn encode_char(&self, c: char, strict: bool) -> Result<Vec<u8>, Error> {
        if (c as u32) < 0x80 {
            return Ok(vec![c as u8]);
        }
        if let Some(pos) = self.table().iter().position(|&t| t == c) {
            return Ok(vec![pos as u8]);
        }
        if let Some(bytes) = self.encode_extra(c) {
            return Ok(bytes);
        }
        if !strict {
            if let Some(&(_, byte)) = self.compat().iter().find(|(s, _)| *s == c.to_string()) {
                return Ok(vec![byte]);
            }
            // try_harder: fold through NFKD and retry the plain table only,
            // catching the case where the input used a precomposed form of
            // something the compat table lists decomposed.
            let folded: String = unicode_nfkd(c);
            if folded.chars().count() == 1 {
                let f = folded.chars().next().unwrap();
                if f != c {
                    if let Some(pos) = self.table().iter().position(|&t| t == f) {
                        return Ok(vec![pos as u8]);
                    }
                }
            }
        }
        Err(Error::Unmappable)
    }

    /// Internal self-check used by the unit tests and, at debug-assertion
    /// level, by callers that want to catch a malformed table immediately
    /// rather than silently mis-round-tripping.
    fn round_trip_check(&self, bytes: &[u8], preserve: &[u8]) -> Result<(), Error> {
        let text = self.decode(bytes, preserve);
        let back = self.encode(&text, true).map_err(|_| Error::RoundTripFailure)?;
        if back == bytes {
            Ok(())
        } else {
            Err(Error::RoundTripFailure)
        }
    }
}

/// Minimal NFKD decomposition helper for the single-character fallback used
/// in `try_harder` encoding. Full Unicode decomposition is out of scope
/// here: only the forms that matter for fullwidth punctuation vs the
/// halfwidth forms already present in the charset tables, namely the
/// combining voiced/semi-voiced sound marks, are folded. Anything else is
/// returned unchanged.
fn unicode_nfkd(c: char) -> String {
    match c {
        '\u{309b}' => "\u{3099}".to_string(),
        '\u{309c}' => "\u{309a}".to_string(),
        other => other.to_string(),
    }
}
