//! Binary DXF writer

use std::io::Write;

use byteorder::{LittleEndian, WriteBytesExt};

use super::stream_writer::DxfStreamWriter;
use crate::error::Result;
use crate::io::dxf::control_chars::{escape_control_characters, escape_unicode};
use crate::io::dxf::BINARY_DXF_SENTINEL;
use crate::types::DxfVersion;

/// Binary DXF stream writer
///
/// Release 13 and later use 2-byte codes and 1-byte booleans; older
/// versions use 1-byte codes (255 escapes a 2-byte code) and 2-byte
/// booleans.
pub struct DxfBinaryWriter<W: Write> {
    writer: W,
    version: DxfVersion,
}

impl<W: Write> DxfBinaryWriter<W> {
    /// Create a new binary DXF writer; writes the sentinel immediately.
    pub fn new(mut writer: W, version: DxfVersion) -> Result<Self> {
        writer.write_all(BINARY_DXF_SENTINEL)?;
        Ok(Self { writer, version })
    }

    fn write_code(&mut self, code: i32) -> Result<()> {
        if self.version.uses_wide_binary_codes() {
            self.writer.write_i16::<LittleEndian>(code as i16)?;
        } else if (0..255).contains(&code) {
            self.writer.write_u8(code as u8)?;
        } else {
            self.writer.write_u8(255)?;
            self.writer.write_i16::<LittleEndian>(code as i16)?;
        }
        Ok(())
    }

    /// Get the inner writer
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> DxfStreamWriter for DxfBinaryWriter<W> {
    fn write_string(&mut self, code: i32, value: &str) -> Result<()> {
        self.write_code(code)?;
        let escaped = escape_control_characters(value);
        if self.version.uses_unicode_escapes() {
            self.writer.write_all(escape_unicode(&escaped).as_bytes())?;
        } else {
            self.writer.write_all(escaped.as_bytes())?;
        }
        self.writer.write_u8(0)?;
        Ok(())
    }

    fn write_i16(&mut self, code: i32, value: i16) -> Result<()> {
        self.write_code(code)?;
        self.writer.write_i16::<LittleEndian>(value)?;
        Ok(())
    }

    fn write_i32(&mut self, code: i32, value: i32) -> Result<()> {
        self.write_code(code)?;
        self.writer.write_i32::<LittleEndian>(value)?;
        Ok(())
    }

    fn write_i64(&mut self, code: i32, value: i64) -> Result<()> {
        self.write_code(code)?;
        self.writer.write_i64::<LittleEndian>(value)?;
        Ok(())
    }

    fn write_double(&mut self, code: i32, value: f64) -> Result<()> {
        self.write_code(code)?;
        self.writer.write_f64::<LittleEndian>(value)?;
        Ok(())
    }

    fn write_bool(&mut self, code: i32, value: bool) -> Result<()> {
        self.write_code(code)?;
        if self.version.uses_wide_binary_codes() {
            self.writer.write_u8(u8::from(value))?;
        } else {
            self.writer.write_i16::<LittleEndian>(i16::from(value))?;
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
