//! DXF stream writer trait

use crate::error::Result;
use crate::io::dxf::{CodePair, CodePairValue};

/// Trait for writing DXF code/value pairs
///
/// Implementors format one primitive at a time; [`write_pair`](Self::write_pair)
/// picks the primitive from the code's value type.
pub trait DxfStreamWriter {
    /// Write a code/value pair with a string value
    fn write_string(&mut self, code: i32, value: &str) -> Result<()>;

    /// Write a code/value pair with an i16 value
    fn write_i16(&mut self, code: i32, value: i16) -> Result<()>;

    /// Write a code/value pair with an i32 value
    fn write_i32(&mut self, code: i32, value: i32) -> Result<()>;

    /// Write a code/value pair with an i64 value
    fn write_i64(&mut self, code: i32, value: i64) -> Result<()>;

    /// Write a code/value pair with a double value
    fn write_double(&mut self, code: i32, value: f64) -> Result<()>;

    /// Write a code/value pair with a boolean value
    fn write_bool(&mut self, code: i32, value: bool) -> Result<()>;

    /// Flush the writer
    fn flush(&mut self) -> Result<()>;

    /// Write a pair, converting its value to the type its code calls for.
    fn write_pair(&mut self, pair: &CodePair) -> Result<()> {
        let expected = pair.expected_type();
        let converted;
        let value = if pair.value.value_type() == expected {
            &pair.value
        } else {
            tracing::trace!(code = pair.code, "converting value to the code's type");
            converted = pair.value.coerce(expected);
            &converted
        };
        match value {
            CodePairValue::Str(s) => self.write_string(pair.code, s),
            CodePairValue::Double(v) => self.write_double(pair.code, *v),
            CodePairValue::Short(v) => self.write_i16(pair.code, *v),
            CodePairValue::Integer(v) => self.write_i32(pair.code, *v),
            CodePairValue::Long(v) => self.write_i64(pair.code, *v),
            CodePairValue::Boolean(v) => self.write_bool(pair.code, *v),
        }
    }
}

/// Extension trait for convenient writing operations
pub trait DxfStreamWriterExt: DxfStreamWriter {
    fn write_pairs(&mut self, pairs: &[CodePair]) -> Result<()> {
        for pair in pairs {
            self.write_pair(pair)?;
        }
        Ok(())
    }

    /// Write section start
    fn write_section_start(&mut self, section_name: &str) -> Result<()> {
        self.write_string(0, "SECTION")?;
        self.write_string(2, section_name)
    }

    /// Write section end
    fn write_section_end(&mut self) -> Result<()> {
        self.write_string(0, "ENDSEC")
    }

    /// Write end of file
    fn write_eof(&mut self) -> Result<()> {
        self.write_string(0, "EOF")
    }
}

// Auto-implement the extension trait for all stream writers
impl<T: DxfStreamWriter + ?Sized> DxfStreamWriterExt for T {}
