//! Error types for DXF and DXB reading and writing

use std::io;
use thiserror::Error;

/// Main error type for codec operations
///
/// Offsets are line numbers for ASCII DXF and byte positions for binary
/// DXF and DXB.
#[derive(Debug, Error)]
pub enum DxfError {
    /// IO error occurred during file operations
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Malformed code line or other structural problem
    #[error("Parse error at {offset}: {message}")]
    Parse { offset: usize, message: String },

    /// A value that could not be converted to the type its group code requires
    #[error("Invalid value for code {code} at {offset}: {value:?}")]
    InvalidValue {
        code: i32,
        offset: usize,
        value: String,
    },

    /// `^` followed by a character outside the control-character escape set
    #[error("Invalid control character escape '^{character}' at {offset}")]
    InvalidControlCharacter { offset: usize, character: char },

    /// A value was expected but the stream ended
    #[error("Unexpected end of input at {offset}")]
    UnexpectedEof { offset: usize },

    /// Binary DXF or DXB sentinel did not match
    #[error("Invalid sentinel: {0}")]
    InvalidSentinel(String),

    /// A record whose parsed pairs are inconsistent
    #[error("Invalid {record} record: {message}")]
    InvalidRecord { record: String, message: String },

    /// Unsupported file version
    #[error("Unsupported DXF version: {0:?}")]
    UnsupportedVersion(String),

    /// Text encoding problem
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// Generic error with custom message
    #[error("{0}")]
    Custom(String),
}

/// Result type alias for codec operations
pub type Result<T> = std::result::Result<T, DxfError>;

impl DxfError {
    pub(crate) fn parse(offset: usize, message: impl Into<String>) -> Self {
        DxfError::Parse {
            offset,
            message: message.into(),
        }
    }

    pub(crate) fn invalid_record(record: impl Into<String>, message: impl Into<String>) -> Self {
        DxfError::InvalidRecord {
            record: record.into(),
            message: message.into(),
        }
    }
}

impl From<String> for DxfError {
    fn from(s: String) -> Self {
        DxfError::Custom(s)
    }
}

impl From<&str> for DxfError {
    fn from(s: &str) -> Self {
        DxfError::Custom(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DxfError::InvalidValue {
            code: 40,
            offset: 12,
            value: "abc".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid value for code 40 at 12: \"abc\"");
    }

    #[test]
    fn test_control_character_display() {
        let err = DxfError::InvalidControlCharacter {
            offset: 4,
            character: 'a',
        };
        assert!(err.to_string().contains("'^a'"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let dxf_err: DxfError = io_err.into();
        assert!(matches!(dxf_err, DxfError::Io(_)));
    }
}
