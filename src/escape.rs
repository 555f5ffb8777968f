//! Helpers for the string escape syntax, shared by the lexer (decoding) and
//! node rendering (encoding).

use std::fmt::{self, Write};

/// Map a single-character escape (the character after the backslash) to the
/// character it stands for.
pub fn simple_escape(ch: char) -> Option<char> {
    match ch {
        'b' => Some('\x08'),
        'f' => Some('\x0C'),
        'n' => Some('\n'),
        'r' => Some('\r'),
        't' => Some('\t'),
        'v' => Some('\x0B'),
        '"' => Some('"'),
        '\\' => Some('\\'),
        '/' => Some('/'),
        _ => None,
    }
}

pub fn is_high_surrogate(code_point: u32) -> bool {
    (0xD800..=0xDBFF).contains(&code_point)
}

pub fn is_low_surrogate(code_point: u32) -> bool {
    (0xDC00..=0xDFFF).contains(&code_point)
}

pub fn combine_surrogates(high: u32, low: u32) -> u32 {
    0x10000 + (((high & 0x03FF) << 10) | (low & 0x03FF))
}

/// Write `value` as a double-quoted string literal that the lexer reads back
/// unchanged.
pub fn write_quoted<W: Write>(w: &mut W, value: &str) -> fmt::Result {
    w.write_char('"')?;
    for ch in value.chars() {
        match ch {
            '"' => w.write_str("\\\"")?,
            '\\' => w.write_str("\\\\")?,
            '\x08' => w.write_str("\\b")?,
            '\x0C' => w.write_str("\\f")?,
            '\n' => w.write_str("\\n")?,
            '\r' => w.write_str("\\r")?,
            '\t' => w.write_str("\\t")?,
            c if (c as u32) < 0x20 => write!(w, "\\u{:04x}", c as u32)?,
            c => w.write_char(c)?,
        }
    }
    w.write_char('"')
}
