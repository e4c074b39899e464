//! ASCII DXF writer

use std::io::Write;

use super::stream_writer::DxfStreamWriter;
use crate::error::Result;
use crate::io::dxf::control_chars::{escape_control_characters, escape_unicode};
use crate::types::DxfVersion;

/// Format a double with at least one digit on each side of the point and
/// at most 15 fractional digits, trailing zeros dropped.
pub fn format_double(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let mut text = format!("{:.15}", value);
    let trimmed = text.trim_end_matches('0').len();
    text.truncate(trimmed);
    if text.ends_with('.') {
        text.push('0');
    }
    text
}

/// ASCII DXF stream writer
///
/// Codes are right-aligned in three columns, 16-bit values in six and
/// 32-bit values in nine. Lines end with CRLF.
pub struct DxfTextWriter<W: Write> {
    writer: W,
    version: DxfVersion,
}

impl<W: Write> DxfTextWriter<W> {
    /// Create a new ASCII DXF writer; `version` selects how non-ASCII text
    /// is written.
    pub fn new(writer: W, version: DxfVersion) -> Self {
        Self { writer, version }
    }

    fn write_code(&mut self, code: i32) -> Result<()> {
        write!(self.writer, "{:>3}\r\n", code)?;
        Ok(())
    }

    /// Get the inner writer
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> DxfStreamWriter for DxfTextWriter<W> {
    fn write_string(&mut self, code: i32, value: &str) -> Result<()> {
        self.write_code(code)?;
        let escaped = escape_control_characters(value);
        if self.version.uses_unicode_escapes() {
            write!(self.writer, "{}\r\n", escape_unicode(&escaped))?;
        } else {
            write!(self.writer, "{}\r\n", escaped)?;
        }
        Ok(())
    }

    fn write_i16(&mut self, code: i32, value: i16) -> Result<()> {
        self.write_code(code)?;
        write!(self.writer, "{:>6}\r\n", value)?;
        Ok(())
    }

    fn write_i32(&mut self, code: i32, value: i32) -> Result<()> {
        self.write_code(code)?;
        write!(self.writer, "{:>9}\r\n", value)?;
        Ok(())
    }

    fn write_i64(&mut self, code: i32, value: i64) -> Result<()> {
        self.write_code(code)?;
        write!(self.writer, "{}\r\n", value)?;
        Ok(())
    }

    fn write_double(&mut self, code: i32, value: f64) -> Result<()> {
        self.write_code(code)?;
        write!(self.writer, "{}\r\n", format_double(value))?;
        Ok(())
    }

    fn write_bool(&mut self, code: i32, value: bool) -> Result<()> {
        self.write_i16(code, i16::from(value))
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
