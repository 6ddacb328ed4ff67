//! Host filename generation (spec §4.H): turn a 6+3 on-disk name into
//! something safe to write as a path component on MS-DOS, UNIX, macOS, and
//! Windows all at once, then disambiguate it against siblings.

use super::directory::Attribute;
use super::format::CharsetKind;
use std::collections::HashSet;

const UNSAFE_CHARS: &str = "\"*+,/:;<=>?[\\]|\u{7f}\u{a5}\u{a6}";

fn is_control(c: char) -> bool {
    (c as u32) < 0x20
}

fn is_reserved_device_name(upper: &str) -> bool {
    matches!(upper, "CLOCK$" | "CON" | "PRN" | "AUX" | "NUL")
        || (upper.len() == 4 && (upper.starts_with("COM") || upper.starts_with("LPT"))
            && upper.as_bytes()[3].is_ascii_digit()
            && upper.as_bytes()[3] != b'0')
}

/// Builds the raw `NAME.EXT` host-safe form (step 1-3 of spec §4.H), not yet
/// carrying the attribute suffix or disambiguation.
fn escape_name(name: &str, ext: &str, charset: CharsetKind) -> String {
    let name_trimmed = name.trim_end_matches(' ');
    let ext_trimmed = ext.trim_end_matches(' ');
    let dot_pos = name_trimmed.chars().count();
    let filename: String = if ext_trimmed.is_empty() {
        name_trimmed.to_string()
    } else {
        format!("{}.{}", name_trimmed, ext_trimmed)
    };
    let upper = filename.to_uppercase();
    let is_all_dots = !filename.is_empty() && filename.chars().all(|c| c == '.');
    let chars: Vec<char> = filename.chars().collect();
    let last_index = chars.len().saturating_sub(1);
    let mut out = String::new();
    for (i, &c) in chars.iter().enumerate() {
        let mut unsafe_char = UNSAFE_CHARS.contains(c) || is_control(c);
        if (is_reserved_device_name(&upper) || is_all_dots) && i == 0 {
            unsafe_char = true;
        }
        if c == '.' && i != dot_pos {
            unsafe_char = true;
        }
        if i == 0 && c == ' ' {
            unsafe_char = true;
        }
        if i == last_index && (c == ' ' || c == '.') {
            unsafe_char = true;
        }
        if ('\u{e000}'..='\u{f8ff}').contains(&c) {
            unsafe_char = true;
        }
        if unsafe_char || c == '%' {
            let bytes = charset
                .encode(&c.to_string(), true)
                .unwrap_or_else(|_| vec![b'?']);
            for b in bytes {
                out.push_str(&format!("%{:02X}", b));
            }
        } else {
            out.push(c);
        }
    }
    if out.is_empty() || out.starts_with('.') {
        out = format!("(empty){}", out);
    }
    out
}

fn attribute_suffix(attrs: &HashSet<Attribute>, natural_suffix: &str) -> String {
    let mut tags: Vec<&str> = Vec::new();
    if attrs.contains(&Attribute::Unused) {
        tags.push("---");
    }
    if attrs.contains(&Attribute::NonAscii)
        && !matches!(natural_suffix, "bas" | "n88" | "nip" | "hd")
    {
        tags.push("bas");
    }
    if attrs.contains(&Attribute::Binary) && !matches!(natural_suffix, "bin" | "cod") {
        tags.push("bin");
    }
    if attrs.contains(&Attribute::Deleted) {
        tags.push("era");
    }
    if attrs.contains(&Attribute::Reserved1) {
        tags.push("r-1");
    }
    if attrs.contains(&Attribute::Reserved2) {
        tags.push("r-2");
    }
    if attrs.contains(&Attribute::Reserved3) {
        tags.push("r-3");
    }
    if attrs.contains(&Attribute::ReadOnly) {
        tags.push("r-o");
    }
    if attrs.contains(&Attribute::Obfuscated) {
        tags.push("obf");
    }
    if !attrs.contains(&Attribute::NonAscii)
        && !attrs.contains(&Attribute::Binary)
        && !matches!(natural_suffix, "asc" | "txt")
    {
        tags.push("asc");
    }
    if attrs.contains(&Attribute::ReadAfterWrite) {
        tags.push("vfy");
    }
    tags.sort_unstable();
    tags.join(".")
}

/// Full host filename: escaped name, attribute suffix, all before
/// disambiguation. Matches spec §4.H steps 1-4.
pub fn to_host_fs_name(name: &str, ext: &str, attrs: &HashSet<Attribute>, charset: CharsetKind) -> String {
    let base = escape_name(name, ext, charset);
    let natural_suffix = base
        .splitn(2, '.')
        .nth(1)
        .unwrap_or("")
        .to_lowercase()
        .replace('.', "");
    let tags = attribute_suffix(attrs, &natural_suffix);
    let joiner = if base.contains('.') { "." } else { ".." };
    if tags.is_empty() {
        base
    } else {
        format!("{}{}{}", base, joiner, tags)
    }
}

/// Appends ` (N)` (incrementing `n` until the lowercased result is unique in
/// `used`) before any extension, and records the chosen name in `used`.
pub fn disambiguate(candidate: &str, used: &mut HashSet<String>) -> String {
    let lower = candidate.to_lowercase();
    if used.insert(lower) {
        return candidate.to_string();
    }
    let mut n = 1;
    loop {
        let (stem, rest) = match candidate.find('.') {
            Some(pos) => (&candidate[..pos], &candidate[pos..]),
            None => (candidate, ""),
        };
        let attempt = format!("{} ({}){}", stem, n, rest);
        let lower = attempt.to_lowercase();
        if used.insert(lower) {
            return attempt;
        }
        n += 1;
    }
}
