//! String escaping for DXF values
//!
//! Control characters (U+0000 to U+001F) cannot appear raw in a DXF value;
//! they are written as `^` followed by the character offset by 0x40, and a
//! literal caret becomes `^ `. Files up to AutoCAD 2004 also carry non-ASCII
//! text as `\U+XXXX` UTF-16 code unit escapes.

use std::borrow::Cow;

use crate::error::{DxfError, Result};

/// Escape control characters and carets.
pub fn escape_control_characters(value: &str) -> Cow<'_, str> {
    if !value.chars().any(|c| c == '^' || (c as u32) < 0x20) {
        return Cow::Borrowed(value);
    }
    let mut escaped = String::with_capacity(value.len() + 4);
    for c in value.chars() {
        match c {
            '^' => escaped.push_str("^ "),
            c if (c as u32) < 0x20 => {
                escaped.push('^');
                escaped.push(char::from(c as u8 + 0x40));
            }
            c => escaped.push(c),
        }
    }
    Cow::Owned(escaped)
}

/// Reverse [`escape_control_characters`].
///
/// `offset` is only used for the error. A caret followed by anything other
/// than a space or a character in `@`..=`_` is rejected; a caret ending the
/// value has nothing to map and is kept.
pub fn unescape_control_characters(value: &str, offset: usize) -> Result<Cow<'_, str>> {
    if !value.contains('^') {
        return Ok(Cow::Borrowed(value));
    }
    let mut unescaped = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c != '^' {
            unescaped.push(c);
            continue;
        }
        match chars.next() {
            None => unescaped.push('^'),
            Some(' ') => unescaped.push('^'),
            Some(next @ '@'..='_') => unescaped.push(char::from(next as u8 - 0x40)),
            Some(character) => {
                return Err(DxfError::InvalidControlCharacter { offset, character });
            }
        }
    }
    Ok(Cow::Owned(unescaped))
}

/// Replace every non-ASCII character with `\U+XXXX` escapes, one per UTF-16 code unit.
pub fn escape_unicode(value: &str) -> Cow<'_, str> {
    if value.is_ascii() {
        return Cow::Borrowed(value);
    }
    let mut escaped = String::with_capacity(value.len() + 8);
    let mut units = [0u16; 2];
    for c in value.chars() {
        if c.is_ascii() {
            escaped.push(c);
        } else {
            for unit in c.encode_utf16(&mut units) {
                escaped.push_str(&format!("\\U+{:04X}", unit));
            }
        }
    }
    Cow::Owned(escaped)
}

/// Decode `\U+XXXX` escapes.
///
/// Four characters that are not hex decode to `?`. Surrogate pairs written
/// as two consecutive escapes are combined; an unpaired surrogate becomes `?`.
pub fn unescape_unicode(value: &str) -> Cow<'_, str> {
    if !value.contains("\\U+") {
        return Cow::Borrowed(value);
    }
    let mut decoded = String::with_capacity(value.len());
    let mut pending_high: Option<u16> = None;
    let mut rest = value;
    while let Some(position) = rest.find("\\U+") {
        let (before, after) = rest.split_at(position);
        let digits = &after[3..];
        let hex: Option<&str> = digits.get(..4).filter(|d| d.chars().count() == 4);
        let Some(hex) = hex else {
            break;
        };
        if !before.is_empty() {
            flush_high_surrogate(&mut decoded, &mut pending_high);
            decoded.push_str(before);
        }
        match u16::from_str_radix(hex, 16).ok().filter(|_| hex.bytes().all(|b| b.is_ascii_hexdigit())) {
            Some(unit) => push_code_unit(&mut decoded, &mut pending_high, unit),
            None => {
                flush_high_surrogate(&mut decoded, &mut pending_high);
                decoded.push('?');
            }
        }
        rest = &digits[4..];
    }
    flush_high_surrogate(&mut decoded, &mut pending_high);
    decoded.push_str(rest);
    Cow::Owned(decoded)
}

fn push_code_unit(decoded: &mut String, pending_high: &mut Option<u16>, unit: u16) {
    match unit {
        0xD800..=0xDBFF => {
            flush_high_surrogate(decoded, pending_high);
            *pending_high = Some(unit);
        }
        0xDC00..=0xDFFF => match pending_high.take() {
            Some(high) => {
                let combined = 0x10000 + (((high as u32) - 0xD800) << 10) + ((unit as u32) - 0xDC00);
                decoded.push(char::from_u32(combined).unwrap_or('?'));
            }
            None => decoded.push('?'),
        },
        _ => {
            flush_high_surrogate(decoded, pending_high);
            decoded.push(char::from_u32(unit as u32).unwrap_or('?'));
        }
    }
}

fn flush_high_surrogate(decoded: &mut String, pending_high: &mut Option<u16>) {
    if pending_high.take().is_some() {
        decoded.push('?');
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_escape_control_characters() {
        assert_eq!(escape_control_characters("a\tb"), "a^Ib");
        assert_eq!(escape_control_characters("\0"), "^@");
        assert_eq!(escape_control_characters("\x1F"), "^_");
        assert_eq!(escape_control_characters("x^y"), "x^ y");
        assert!(matches!(escape_control_characters("plain"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_unescape_control_characters() {
        assert_eq!(unescape_control_characters("a^Jb", 0).unwrap(), "a\nb");
        assert_eq!(unescape_control_characters("^ ^@", 0).unwrap(), "^\0");
        assert_eq!(unescape_control_characters("end^", 0).unwrap(), "end^");
    }

    #[test]
    fn test_unknown_control_character_is_error() {
        let err = unescape_control_characters("a^ab", 17).unwrap_err();
        assert!(matches!(
            err,
            DxfError::InvalidControlCharacter {
                offset: 17,
                character: 'a'
            }
        ));
    }

    #[test]
    fn test_unicode_escapes() {
        assert_eq!(escape_unicode("caf\u{e9}"), "caf\\U+00E9");
        assert_eq!(unescape_unicode("caf\\U+00E9!"), "caf\u{e9}!");
        assert_eq!(unescape_unicode("\\U+00e9"), "\u{e9}");
        assert_eq!(unescape_unicode("\\U+ZZZZtail"), "?tail");
        assert_eq!(unescape_unicode("short \\U+00"), "short \\U+00");
    }

    #[test]
    fn test_astral_characters_use_surrogate_pairs() {
        let escaped = escape_unicode("\u{1F600}");
        assert_eq!(escaped, "\\U+D83D\\U+DE00");
        assert_eq!(unescape_unicode(&escaped), "\u{1F600}");
        assert_eq!(unescape_unicode("\\U+D83Dx"), "?x");
    }

    proptest! {
        #[test]
        fn control_escape_round_trips(s in any::<String>()) {
            let escaped = escape_control_characters(&s).into_owned();
            prop_assert!(!escaped.chars().any(|c| (c as u32) < 0x20));
            let unescaped = unescape_control_characters(&escaped, 0).unwrap();
            prop_assert_eq!(unescaped, s);
        }

        #[test]
        fn unicode_escape_round_trips(s in "[^\\\\]*") {
            let escaped = escape_unicode(&s).into_owned();
            prop_assert!(escaped.is_ascii());
            prop_assert_eq!(unescape_unicode(&escaped), s);
        }
    }
}
