//! DXF ASCII text reader

use std::io::BufRead;

use encoding_rs::Encoding;

use super::stream_reader::DxfStreamReader;
use crate::error::{DxfError, Result};
use crate::io::dxf::control_chars::{unescape_control_characters, unescape_unicode};
use crate::io::dxf::{CodePair, CodePairValue, GroupCodeValueType};

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// How value lines are turned into text.
#[derive(Debug, Clone, Copy)]
enum TextDecoding {
    /// Pre-2007 text: single-byte code page (Latin-1 when unknown) plus
    /// `\U+XXXX` escapes.
    Legacy(Option<&'static Encoding>),
    Utf8,
}

/// Tokenizes ASCII DXF into code pairs, two lines at a time.
///
/// Pair offsets are the 1-based line number of the code line.
pub struct DxfTextReader<R: BufRead> {
    reader: R,
    line_number: usize,
    decoding: TextDecoding,
    buffer: Vec<u8>,
    finished: bool,
}

impl<R: BufRead> DxfTextReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line_number: 0,
            decoding: TextDecoding::Legacy(None),
            buffer: Vec::with_capacity(128),
            finished: false,
        }
    }

    /// Start in UTF-8 mode, e.g. when the caller knows the file is 2007+.
    pub fn utf8(reader: R) -> Self {
        let mut r = Self::new(reader);
        r.decoding = TextDecoding::Utf8;
        r
    }

    /// Start with a fixed legacy encoding.
    pub fn with_encoding(reader: R, encoding: &'static Encoding) -> Self {
        let mut r = Self::new(reader);
        r.decoding = TextDecoding::Legacy(Some(encoding));
        r
    }

    pub fn line_number(&self) -> usize {
        self.line_number
    }

    fn read_line(&mut self) -> Result<Option<String>> {
        self.buffer.clear();
        if self.reader.read_until(b'\n', &mut self.buffer)? == 0 {
            return Ok(None);
        }
        self.line_number += 1;

        let mut bytes = self.buffer.as_slice();
        if self.line_number == 1 && bytes.starts_with(UTF8_BOM) {
            bytes = &bytes[UTF8_BOM.len()..];
        }
        while let Some((&last, rest)) = bytes.split_last() {
            if last == b'\n' || last == b'\r' {
                bytes = rest;
            } else {
                break;
            }
        }

        let line = match self.decoding {
            TextDecoding::Utf8 => String::from_utf8_lossy(bytes).into_owned(),
            TextDecoding::Legacy(_) if bytes.is_ascii() => {
                // ASCII is identical in every supported code page
                String::from_utf8_lossy(bytes).into_owned()
            }
            TextDecoding::Legacy(Some(encoding)) => {
                encoding.decode_without_bom_handling(bytes).0.into_owned()
            }
            TextDecoding::Legacy(None) => bytes.iter().map(|&b| b as char).collect(),
        };
        Ok(Some(line))
    }

    fn read_pair_internal(&mut self) -> Result<Option<CodePair>> {
        let code_line = match self.read_line()? {
            Some(line) => line,
            None => return Ok(None),
        };
        let code_text = code_line.trim();
        if code_text.is_empty() {
            return Ok(None);
        }
        let offset = self.line_number;
        let code: i32 = code_text
            .parse()
            .map_err(|_| DxfError::parse(offset, format!("invalid group code '{}'", code_text)))?;

        let value_line = self
            .read_line()?
            .ok_or(DxfError::UnexpectedEof { offset: self.line_number })?;
        let value = self.parse_value(code, value_line.trim(), offset)?;
        Ok(Some(CodePair { code, value, offset }))
    }

    fn parse_value(&self, code: i32, text: &str, offset: usize) -> Result<CodePairValue> {
        let invalid = || DxfError::InvalidValue {
            code,
            offset,
            value: text.to_string(),
        };
        let value = match GroupCodeValueType::from_code(code) {
            GroupCodeValueType::String => {
                let text = match self.decoding {
                    TextDecoding::Legacy(_) => unescape_unicode(text),
                    TextDecoding::Utf8 => text.into(),
                };
                let unescaped = unescape_control_characters(&text, offset)?;
                CodePairValue::Str(unescaped.into_owned())
            }
            GroupCodeValueType::Double => {
                CodePairValue::Double(text.parse().map_err(|_| invalid())?)
            }
            GroupCodeValueType::Int16 => CodePairValue::Short(
                parse_clamped(text, i16::MIN as i64, i16::MAX as i64).ok_or_else(invalid)? as i16,
            ),
            GroupCodeValueType::Int32 => CodePairValue::Integer(
                parse_clamped(text, i32::MIN as i64, i32::MAX as i64).ok_or_else(invalid)? as i32,
            ),
            GroupCodeValueType::Int64 => {
                CodePairValue::Long(parse_clamped(text, i64::MIN, i64::MAX).ok_or_else(invalid)?)
            }
            GroupCodeValueType::Bool => {
                let number: f64 = text.parse().map_err(|_| invalid())?;
                CodePairValue::Boolean(number != 0.0)
            }
        };
        Ok(value)
    }
}

/// Parse an integer, falling back to a double clamped into `min..=max`.
///
/// Real files contain values like `99999` in 16-bit fields and `1.0` in
/// integer fields.
pub(crate) fn parse_clamped(text: &str, min: i64, max: i64) -> Option<i64> {
    if let Ok(value) = text.parse::<i64>() {
        return Some(value.clamp(min, max));
    }
    let value: f64 = text.parse().ok()?;
    if value.is_nan() {
        return None;
    }
    tracing::trace!(text, "integer value parsed as double");
    Some(value.clamp(min as f64, max as f64) as i64)
}

impl<R: BufRead> DxfStreamReader for DxfTextReader<R> {
    fn read_pair(&mut self) -> Result<Option<CodePair>> {
        if self.finished {
            return Ok(None);
        }
        let result = self.read_pair_internal();
        if !matches!(result, Ok(Some(_))) {
            self.finished = true;
        }
        result
    }

    fn switch_to_utf8(&mut self) {
        self.decoding = TextDecoding::Utf8;
    }

    fn set_encoding(&mut self, encoding: &'static Encoding) {
        if let TextDecoding::Legacy(_) = self.decoding {
            self.decoding = TextDecoding::Legacy(Some(encoding));
        }
    }
}

impl<R: BufRead> Iterator for DxfTextReader<R> {
    type Item = Result<CodePair>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read_pair().transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn reader(text: &str) -> DxfTextReader<Cursor<Vec<u8>>> {
        DxfTextReader::new(Cursor::new(text.as_bytes().to_vec()))
    }

    fn pairs(text: &str) -> Vec<CodePair> {
        reader(text).collect::<Result<Vec<_>>>().unwrap()
    }

    #[test]
    fn test_read_typed_pairs() {
        let read = pairs("  0\r\nSECTION\r\n 10\r\n1.5\r\n 70\r\n     3\r\n 90\r\n42\r\n160\r\n7\r\n290\r\n1\r\n");
        let values: Vec<&CodePairValue> = read.iter().map(|p| &p.value).collect();
        assert_eq!(
            values,
            [
                &CodePairValue::Str("SECTION".into()),
                &CodePairValue::Double(1.5),
                &CodePairValue::Short(3),
                &CodePairValue::Integer(42),
                &CodePairValue::Long(7),
                &CodePairValue::Boolean(true),
            ]
        );
        assert_eq!(read[0].offset, 1);
        assert_eq!(read[1].offset, 3);
    }

    #[test]
    fn test_out_of_range_short_is_clamped() {
        let read = pairs("70\n99999\n71\n-99999\n72\n2.7\n");
        assert_eq!(read[0].value, CodePairValue::Short(i16::MAX));
        assert_eq!(read[1].value, CodePairValue::Short(i16::MIN));
        assert_eq!(read[2].value, CodePairValue::Short(2));
    }

    #[test]
    fn test_bool_from_double_text() {
        let read = pairs("290\n0.0\n291\n2\n");
        assert_eq!(read[0].value, CodePairValue::Boolean(false));
        assert_eq!(read[1].value, CodePairValue::Boolean(true));
    }

    #[test]
    fn test_bad_double_is_error() {
        let err = reader("10\nabc\n").read_pair().unwrap_err();
        assert!(matches!(err, DxfError::InvalidValue { code: 10, offset: 1, .. }));
    }

    #[test]
    fn test_bad_code_is_error() {
        let err = reader("0\nSECTION\nxx\nfoo\n").collect::<Result<Vec<_>>>().unwrap_err();
        assert!(matches!(err, DxfError::Parse { offset: 3, .. }));
    }

    #[test]
    fn test_missing_value_line() {
        let err = reader("0\nSECTION\n8").collect::<Result<Vec<_>>>().unwrap_err();
        assert!(matches!(err, DxfError::UnexpectedEof { .. }));
    }

    #[test]
    fn test_blank_code_line_ends_stream() {
        let read = pairs("0\nSECTION\n\n0\nEOF\n");
        assert_eq!(read.len(), 1);
    }

    #[test]
    fn test_bom_is_stripped() {
        let mut bytes = UTF8_BOM.to_vec();
        bytes.extend_from_slice(b"0\nEOF\n");
        let read: Vec<CodePair> = DxfTextReader::new(Cursor::new(bytes))
            .collect::<Result<Vec<_>>>()
            .unwrap();
        assert_eq!(read[0].code, 0);
        assert_eq!(read[0].as_str(), Some("EOF"));
    }

    #[test]
    fn test_legacy_strings_decode_escapes() {
        let mut bytes = b"1\ncaf\\U+00E9 ^J".to_vec();
        bytes.extend_from_slice(&[0xE9, b'\n']);
        let read: Vec<CodePair> = DxfTextReader::new(Cursor::new(bytes))
            .collect::<Result<Vec<_>>>()
            .unwrap();
        assert_eq!(read[0].as_str(), Some("caf\u{e9} \n\u{e9}"));
    }

    #[test]
    fn test_utf8_mode_keeps_escape_text() {
        let mut r = reader("1\na\\U+00E9\n");
        r.switch_to_utf8();
        let pair = r.read_pair().unwrap().unwrap();
        assert_eq!(pair.as_str(), Some("a\\U+00E9"));
    }

    #[test]
    fn test_invalid_control_character() {
        let err = reader("1\nbad^a\n").read_pair().unwrap_err();
        assert!(matches!(err, DxfError::InvalidControlCharacter { offset: 1, character: 'a' }));
    }

    #[test]
    fn test_code_page_encoding() {
        let mut r = DxfTextReader::new(Cursor::new(vec![b'1', b'\n', 0xC0, b'\n']));
        r.set_encoding(encoding_rs::WINDOWS_1251);
        assert_eq!(r.read_pair().unwrap().unwrap().as_str(), Some("\u{410}"));
    }
}
