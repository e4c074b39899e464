//! Code pairs, the unit of DXF content

use std::fmt;

use super::group_code_value::GroupCodeValueType;
use crate::types::Handle;

/// A typed DXF value.
#[derive(Debug, Clone, PartialEq)]
pub enum CodePairValue {
    Str(String),
    Double(f64),
    Short(i16),
    Integer(i32),
    Long(i64),
    Boolean(bool),
}

impl CodePairValue {
    pub fn value_type(&self) -> GroupCodeValueType {
        match self {
            CodePairValue::Str(_) => GroupCodeValueType::String,
            CodePairValue::Double(_) => GroupCodeValueType::Double,
            CodePairValue::Short(_) => GroupCodeValueType::Int16,
            CodePairValue::Integer(_) => GroupCodeValueType::Int32,
            CodePairValue::Long(_) => GroupCodeValueType::Int64,
            CodePairValue::Boolean(_) => GroupCodeValueType::Bool,
        }
    }

    /// Convert to `target`, used when a caller built a pair whose value type
    /// does not match its code. Lossy conversions saturate.
    pub fn coerce(&self, target: GroupCodeValueType) -> CodePairValue {
        if self.value_type() == target {
            return self.clone();
        }
        match target {
            GroupCodeValueType::String => CodePairValue::Str(self.to_string()),
            GroupCodeValueType::Double => CodePairValue::Double(self.as_f64()),
            GroupCodeValueType::Int16 => {
                CodePairValue::Short(self.as_i64().clamp(i16::MIN as i64, i16::MAX as i64) as i16)
            }
            GroupCodeValueType::Int32 => {
                CodePairValue::Integer(self.as_i64().clamp(i32::MIN as i64, i32::MAX as i64) as i32)
            }
            GroupCodeValueType::Int64 => CodePairValue::Long(self.as_i64()),
            GroupCodeValueType::Bool => CodePairValue::Boolean(self.as_f64() != 0.0),
        }
    }

    fn as_f64(&self) -> f64 {
        match self {
            CodePairValue::Str(s) => s.trim().parse().unwrap_or(0.0),
            CodePairValue::Double(v) => *v,
            CodePairValue::Short(v) => *v as f64,
            CodePairValue::Integer(v) => *v as f64,
            CodePairValue::Long(v) => *v as f64,
            CodePairValue::Boolean(b) => f64::from(u8::from(*b)),
        }
    }

    fn as_i64(&self) -> i64 {
        match self {
            CodePairValue::Short(v) => *v as i64,
            CodePairValue::Integer(v) => *v as i64,
            CodePairValue::Long(v) => *v,
            CodePairValue::Boolean(b) => i64::from(*b),
            other => other.as_f64() as i64,
        }
    }
}

impl fmt::Display for CodePairValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodePairValue::Str(s) => f.write_str(s),
            CodePairValue::Double(v) => write!(f, "{}", v),
            CodePairValue::Short(v) => write!(f, "{}", v),
            CodePairValue::Integer(v) => write!(f, "{}", v),
            CodePairValue::Long(v) => write!(f, "{}", v),
            CodePairValue::Boolean(b) => write!(f, "{}", u8::from(*b)),
        }
    }
}

impl From<String> for CodePairValue {
    fn from(v: String) -> Self {
        CodePairValue::Str(v)
    }
}

impl From<&str> for CodePairValue {
    fn from(v: &str) -> Self {
        CodePairValue::Str(v.to_string())
    }
}

impl From<f64> for CodePairValue {
    fn from(v: f64) -> Self {
        CodePairValue::Double(v)
    }
}

impl From<i16> for CodePairValue {
    fn from(v: i16) -> Self {
        CodePairValue::Short(v)
    }
}

impl From<i32> for CodePairValue {
    fn from(v: i32) -> Self {
        CodePairValue::Integer(v)
    }
}

impl From<i64> for CodePairValue {
    fn from(v: i64) -> Self {
        CodePairValue::Long(v)
    }
}

impl From<bool> for CodePairValue {
    fn from(v: bool) -> Self {
        CodePairValue::Boolean(v)
    }
}

/// A group code with its value and the position it was read from.
///
/// `offset` is the 1-based line number of the code line in ASCII files and
/// the byte position of the code in binary files; 0 for constructed pairs.
#[derive(Debug, Clone, PartialEq)]
pub struct CodePair {
    pub code: i32,
    pub value: CodePairValue,
    pub offset: usize,
}

impl CodePair {
    pub fn new(code: i32, value: impl Into<CodePairValue>) -> Self {
        CodePair {
            code,
            value: value.into(),
            offset: 0,
        }
    }

    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    pub fn string(code: i32, value: impl Into<String>) -> Self {
        CodePair::new(code, CodePairValue::Str(value.into()))
    }

    pub fn double(code: i32, value: f64) -> Self {
        CodePair::new(code, CodePairValue::Double(value))
    }

    pub fn short(code: i32, value: i16) -> Self {
        CodePair::new(code, CodePairValue::Short(value))
    }

    pub fn integer(code: i32, value: i32) -> Self {
        CodePair::new(code, CodePairValue::Integer(value))
    }

    pub fn long(code: i32, value: i64) -> Self {
        CodePair::new(code, CodePairValue::Long(value))
    }

    pub fn boolean(code: i32, value: bool) -> Self {
        CodePair::new(code, CodePairValue::Boolean(value))
    }

    /// A handle written as uppercase hex text.
    pub fn handle(code: i32, value: Handle) -> Self {
        CodePair::string(code, value.to_hex())
    }

    /// The type the code calls for.
    pub fn expected_type(&self) -> GroupCodeValueType {
        GroupCodeValueType::from_code(self.code)
    }

    pub fn as_str(&self) -> Option<&str> {
        match &self.value {
            CodePairValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self.value {
            CodePairValue::Double(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_i16(&self) -> Option<i16> {
        match self.value {
            CodePairValue::Short(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_i32(&self) -> Option<i32> {
        match self.value {
            CodePairValue::Integer(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self.value {
            CodePairValue::Long(v) => Some(v),
            _ => None,
        }
    }

    /// Boolean view. Shorts are accepted since older files store flags in 2xx shorts.
    pub fn as_bool(&self) -> Option<bool> {
        match self.value {
            CodePairValue::Boolean(b) => Some(b),
            CodePairValue::Short(v) => Some(v != 0),
            _ => None,
        }
    }

    /// String value, empty for other types.
    pub fn string_value(&self) -> String {
        self.as_str().unwrap_or_default().to_string()
    }

    /// Double value; integers widen, other types yield 0.0.
    pub fn double_value(&self) -> f64 {
        match self.value {
            CodePairValue::Double(v) => v,
            CodePairValue::Short(v) => v as f64,
            CodePairValue::Integer(v) => v as f64,
            CodePairValue::Long(v) => v as f64,
            _ => 0.0,
        }
    }

    /// Short value; wider integers saturate, other types yield 0.
    pub fn short_value(&self) -> i16 {
        match self.value {
            CodePairValue::Short(v) => v,
            CodePairValue::Integer(v) => v.clamp(i16::MIN as i32, i16::MAX as i32) as i16,
            CodePairValue::Long(v) => v.clamp(i16::MIN as i64, i16::MAX as i64) as i16,
            CodePairValue::Boolean(b) => i16::from(b),
            _ => 0,
        }
    }

    /// Integer value; shorts widen, longs saturate, other types yield 0.
    pub fn integer_value(&self) -> i32 {
        match self.value {
            CodePairValue::Integer(v) => v,
            CodePairValue::Short(v) => v as i32,
            CodePairValue::Long(v) => v.clamp(i32::MIN as i64, i32::MAX as i64) as i32,
            CodePairValue::Boolean(b) => i32::from(b),
            _ => 0,
        }
    }

    pub fn long_value(&self) -> i64 {
        match self.value {
            CodePairValue::Long(v) => v,
            CodePairValue::Integer(v) => v as i64,
            CodePairValue::Short(v) => v as i64,
            _ => 0,
        }
    }

    pub fn bool_value(&self) -> bool {
        self.as_bool().unwrap_or(false)
    }

    /// Parse the string value as a hex handle; null when it is not one.
    pub fn handle_value(&self) -> Handle {
        self.as_str().and_then(Handle::from_hex).unwrap_or(Handle::NULL)
    }
}

impl fmt::Display for CodePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}/{}]", self.code, self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typed_accessors() {
        let pair = CodePair::double(10, 1.5);
        assert_eq!(pair.as_f64(), Some(1.5));
        assert_eq!(pair.as_str(), None);
        assert_eq!(pair.expected_type(), GroupCodeValueType::Double);

        let pair = CodePair::short(70, 3);
        assert_eq!(pair.integer_value(), 3);
        assert_eq!(pair.double_value(), 3.0);
    }

    #[test]
    fn test_bool_accepts_short() {
        assert_eq!(CodePair::short(280, 1).as_bool(), Some(true));
        assert_eq!(CodePair::boolean(290, false).as_bool(), Some(false));
        assert_eq!(CodePair::string(1, "x").as_bool(), None);
    }

    #[test]
    fn test_handle_value() {
        assert_eq!(CodePair::string(330, "1F").handle_value(), Handle::new(0x1F));
        assert_eq!(CodePair::string(330, "").handle_value(), Handle::NULL);
        assert_eq!(CodePair::handle(5, Handle::new(255)).as_str(), Some("FF"));
    }

    #[test]
    fn test_coerce_saturates() {
        let value = CodePairValue::Integer(99_999).coerce(GroupCodeValueType::Int16);
        assert_eq!(value, CodePairValue::Short(i16::MAX));
        let value = CodePairValue::Short(2).coerce(GroupCodeValueType::Bool);
        assert_eq!(value, CodePairValue::Boolean(true));
        let value = CodePairValue::Double(2.5).coerce(GroupCodeValueType::String);
        assert_eq!(value, CodePairValue::Str("2.5".to_string()));
    }

    #[test]
    fn test_display() {
        assert_eq!(CodePair::string(0, "LINE").to_string(), "[0/LINE]");
        assert_eq!(CodePair::boolean(290, true).to_string(), "[290/1]");
    }
}
