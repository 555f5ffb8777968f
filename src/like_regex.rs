//! `like_regex` flag parsing and pattern compilation.
//!
//! The flag mini-language is `i` (case-insensitive), `s` (dot matches
//! newline), `m` (multi-line anchors), `x` (expanded syntax, unsupported) and
//! `q` (quote the whole pattern). When `q` is set, `m`, `s` and `x` have no
//! effect.
use std::fmt::{self, Write};

use regex::{Regex, RegexBuilder};

use crate::errors::JSONPathError;

/// A set of `like_regex` flags.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default, Hash)]
pub struct RegexFlags(u8);

impl RegexFlags {
    pub const ICASE: RegexFlags = RegexFlags(0x01);
    pub const DOTALL: RegexFlags = RegexFlags(0x02);
    pub const MLINE: RegexFlags = RegexFlags(0x04);
    pub const WSPACE: RegexFlags = RegexFlags(0x08);
    pub const QUOTE: RegexFlags = RegexFlags(0x10);

    const ORDER: [(RegexFlags, char); 5] = [
        (Self::ICASE, 'i'),
        (Self::DOTALL, 's'),
        (Self::MLINE, 'm'),
        (Self::WSPACE, 'x'),
        (Self::QUOTE, 'q'),
    ];

    pub fn empty() -> Self {
        RegexFlags(0)
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn contains(&self, other: RegexFlags) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn insert(&mut self, other: RegexFlags) {
        self.0 |= other.0;
    }

    /// Parse a flag string. Duplicates are allowed; any character other
    /// than `i`, `s`, `m`, `x` or `q` is an error.
    pub fn parse(flags: &str) -> Result<Self, JSONPathError> {
        let mut rv = RegexFlags::empty();
        for ch in flags.chars() {
            match Self::ORDER.iter().find(|(_, c)| *c == ch) {
                Some((flag, _)) => rv.insert(*flag),
                None => {
                    return Err(JSONPathError::ast(format!(
                        "unrecognized flag character {:?} in LIKE_REGEX predicate",
                        ch
                    )))
                }
            }
        }
        Ok(rv)
    }
}

impl fmt::Display for RegexFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (flag, ch) in Self::ORDER {
            if self.contains(flag) {
                f.write_char(ch)?;
            }
        }
        Ok(())
    }
}

/// Compile `pattern` under `flags`, failing if the flags are unsupported or
/// the pattern is not a valid regular expression.
pub fn compile(pattern: &str, flags: RegexFlags) -> Result<Regex, JSONPathError> {
    let mut builder = if flags.contains(RegexFlags::QUOTE) {
        RegexBuilder::new(&regex::escape(pattern))
    } else {
        if flags.contains(RegexFlags::WSPACE) {
            return Err(JSONPathError::ast(String::from(
                "XQuery \"x\" flag (expanded regular expressions) is not implemented",
            )));
        }

        let mut builder = RegexBuilder::new(pattern);
        builder
            .dot_matches_new_line(flags.contains(RegexFlags::DOTALL))
            .multi_line(flags.contains(RegexFlags::MLINE));
        builder
    };

    builder
        .case_insensitive(flags.contains(RegexFlags::ICASE))
        .build()
        .map_err(|err| {
            JSONPathError::ast(format!(
                "invalid regular expression {:?}: {}",
                pattern,
                err.to_string().lines().last().unwrap_or_default().trim()
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_flags() {
        let flags = RegexFlags::parse("ism").unwrap();
        assert!(flags.contains(RegexFlags::ICASE));
        assert!(flags.contains(RegexFlags::DOTALL));
        assert!(flags.contains(RegexFlags::MLINE));
        assert!(!flags.contains(RegexFlags::QUOTE));
    }

    #[test]
    fn empty_flags() {
        let flags = RegexFlags::parse("").unwrap();
        assert!(flags.is_empty());
        assert_eq!(flags.to_string(), "");
    }

    #[test]
    fn render_in_fixed_order() {
        assert_eq!(RegexFlags::parse("smixq").unwrap().to_string(), "ismxq");
        assert_eq!(RegexFlags::parse("qi").unwrap().to_string(), "iq");
    }

    #[test]
    fn duplicates_collapse() {
        assert_eq!(RegexFlags::parse("iiimmi").unwrap().to_string(), "im");
    }

    #[test]
    fn unknown_flag() {
        let err = RegexFlags::parse("ia").unwrap_err();
        assert_eq!(
            err.msg,
            "unrecognized flag character 'a' in LIKE_REGEX predicate"
        );
    }

    #[test]
    fn expanded_flag_is_unsupported() {
        let flags = RegexFlags::parse("x").unwrap();
        assert!(compile("abc", flags).is_err());
    }

    #[test]
    fn quote_suppresses_expanded_flag() {
        let flags = RegexFlags::parse("xq").unwrap();
        let re = compile("a.c", flags).unwrap();
        assert!(re.is_match("a.c"));
        assert!(!re.is_match("abc"));
    }

    #[test]
    fn case_insensitive() {
        let re = compile("^abc$", RegexFlags::ICASE).unwrap();
        assert!(re.is_match("ABC"));
    }

    #[test]
    fn case_insensitive_quoted() {
        let mut flags = RegexFlags::ICASE;
        flags.insert(RegexFlags::QUOTE);
        let re = compile("a+", flags).unwrap();
        assert!(re.is_match("A+"));
        assert!(!re.is_match("aa"));
    }

    #[test]
    fn dot_all_and_multi_line() {
        assert!(!compile("a.b", RegexFlags::empty()).unwrap().is_match("a\nb"));
        assert!(compile("a.b", RegexFlags::DOTALL).unwrap().is_match("a\nb"));
        assert!(compile("^b$", RegexFlags::MLINE).unwrap().is_match("a\nb\nc"));
    }

    #[test]
    fn invalid_pattern() {
        let err = compile("(abc", RegexFlags::empty()).unwrap_err();
        assert!(err.msg.starts_with("invalid regular expression \"(abc\""));
    }
}
