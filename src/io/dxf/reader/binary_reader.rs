//! Binary DXF reader

use std::io::{self, BufRead};

use byteorder::{LittleEndian, ReadBytesExt};
use encoding_rs::Encoding;

use super::stream_reader::DxfStreamReader;
use crate::error::{DxfError, Result};
use crate::io::dxf::control_chars::{unescape_control_characters, unescape_unicode};
use crate::io::dxf::{CodePair, CodePairValue, GroupCodeValueType, BINARY_DXF_SENTINEL};

/// Tokenizes binary DXF.
///
/// Files from Release 13 on store codes as 2-byte little-endian integers;
/// older files use one byte with 255 escaping a following 2-byte code. The
/// width is detected from the first pair, which is always `0/SECTION`: a
/// zero byte followed by another zero byte can only be a 2-byte code.
/// Pair offsets are byte positions from the start of the file.
pub struct DxfBinaryReader<R: BufRead> {
    reader: R,
    offset: usize,
    first_pair: bool,
    wide_codes: bool,
    utf8: bool,
    encoding: Option<&'static Encoding>,
    finished: bool,
}

impl<R: BufRead> DxfBinaryReader<R> {
    /// Consume and validate the sentinel.
    pub fn new(mut reader: R) -> Result<Self> {
        let mut sentinel = [0u8; BINARY_DXF_SENTINEL.len()];
        reader
            .read_exact(&mut sentinel)
            .map_err(|_| DxfError::InvalidSentinel("binary DXF sentinel is truncated".into()))?;
        if sentinel[..] != *BINARY_DXF_SENTINEL {
            return Err(DxfError::InvalidSentinel(format!(
                "expected binary DXF sentinel, found {:?}",
                String::from_utf8_lossy(&sentinel)
            )));
        }
        Ok(Self {
            reader,
            offset: BINARY_DXF_SENTINEL.len(),
            first_pair: true,
            wide_codes: false,
            utf8: false,
            encoding: None,
            finished: false,
        })
    }

    /// Whether the file uses 2-byte codes; known after the first pair.
    pub fn uses_wide_codes(&self) -> bool {
        self.wide_codes
    }

    fn peek_byte(&mut self) -> Result<Option<u8>> {
        Ok(self.reader.fill_buf()?.first().copied())
    }

    /// Run a fixed-size read, mapping a short read to `None`.
    fn read_fixed<T>(&mut self, size: usize, read: impl FnOnce(&mut R) -> io::Result<T>) -> Result<Option<T>> {
        match read(&mut self.reader) {
            Ok(value) => {
                self.offset += size;
                Ok(Some(value))
            }
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn read_code(&mut self) -> Result<Option<i32>> {
        let Some(first) = self.read_fixed(1, |r| r.read_u8())? else {
            return Ok(None);
        };
        if self.first_pair {
            self.first_pair = false;
            if first == 0 && self.peek_byte()? == Some(0) {
                self.wide_codes = true;
                self.reader.consume(1);
                self.offset += 1;
                tracing::debug!("binary DXF uses 2-byte group codes");
                return Ok(Some(0));
            }
        }
        if self.wide_codes {
            let Some(second) = self.read_fixed(1, |r| r.read_u8())? else {
                return Ok(None);
            };
            return Ok(Some(i16::from_le_bytes([first, second]) as i32));
        }
        if first == 255 {
            return Ok(self
                .read_fixed(2, |r| r.read_i16::<LittleEndian>())?
                .map(|code| code as i32));
        }
        Ok(Some(first as i32))
    }

    fn read_string(&mut self, offset: usize) -> Result<Option<String>> {
        let mut bytes = Vec::new();
        let read = self.reader.read_until(0, &mut bytes)?;
        self.offset += read;
        if bytes.pop() != Some(0) {
            return Ok(None);
        }
        let text = match std::str::from_utf8(&bytes) {
            Ok(s) => s.to_string(),
            Err(_) if self.utf8 => String::from_utf8_lossy(&bytes).into_owned(),
            Err(_) => match self.encoding {
                Some(encoding) => encoding.decode_without_bom_handling(&bytes).0.into_owned(),
                None => bytes.iter().map(|&b| b as char).collect(),
            },
        };
        let text = if self.utf8 {
            text
        } else {
            unescape_unicode(&text).into_owned()
        };
        Ok(Some(unescape_control_characters(&text, offset)?.into_owned()))
    }

    fn read_pair_internal(&mut self) -> Result<Option<CodePair>> {
        let offset = self.offset;
        let Some(code) = self.read_code()? else {
            return Ok(None);
        };
        let value = match GroupCodeValueType::from_code(code) {
            GroupCodeValueType::String => self.read_string(offset)?.map(CodePairValue::Str),
            GroupCodeValueType::Double => self
                .read_fixed(8, |r| r.read_f64::<LittleEndian>())?
                .map(CodePairValue::Double),
            GroupCodeValueType::Int16 => self
                .read_fixed(2, |r| r.read_i16::<LittleEndian>())?
                .map(CodePairValue::Short),
            GroupCodeValueType::Int32 => self
                .read_fixed(4, |r| r.read_i32::<LittleEndian>())?
                .map(CodePairValue::Integer),
            GroupCodeValueType::Int64 => self
                .read_fixed(8, |r| r.read_i64::<LittleEndian>())?
                .map(CodePairValue::Long),
            GroupCodeValueType::Bool if self.wide_codes => self
                .read_fixed(1, |r| r.read_u8())?
                .map(|b| CodePairValue::Boolean(b != 0)),
            GroupCodeValueType::Bool => self
                .read_fixed(2, |r| r.read_i16::<LittleEndian>())?
                .map(|v| CodePairValue::Boolean(v != 0)),
        };
        match value {
            Some(value) => Ok(Some(CodePair { code, value, offset })),
            None => {
                tracing::debug!(code, offset, "binary DXF ends inside a value");
                Ok(None)
            }
        }
    }
}

impl<R: BufRead> DxfStreamReader for DxfBinaryReader<R> {
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
        self.utf8 = true;
    }

    fn set_encoding(&mut self, encoding: &'static Encoding) {
        self.encoding = Some(encoding);
    }
}

impl<R: BufRead> Iterator for DxfBinaryReader<R> {
    type Item = Result<CodePair>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read_pair().transpose()
    }
}
