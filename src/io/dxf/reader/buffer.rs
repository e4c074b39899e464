//! One-pair lookahead over a code pair stream

use encoding_rs::Encoding;

use super::stream_reader::{DxfStreamReader, PairListReader};
use crate::error::{DxfError, Result};
use crate::io::dxf::CodePair;

/// Buffered, peekable pair stream used by every record parser.
///
/// Comment pairs (code 999) never surface: they are skipped whenever the
/// buffer advances.
pub struct CodePairBuffer<'a> {
    reader: Box<dyn DxfStreamReader + 'a>,
    current: Option<CodePair>,
    last_offset: usize,
}

impl<'a> CodePairBuffer<'a> {
    /// Wrap a reader and prime the first pair.
    pub fn new(reader: Box<dyn DxfStreamReader + 'a>) -> Result<Self> {
        let mut buffer = Self {
            reader,
            current: None,
            last_offset: 0,
        };
        buffer.advance()?;
        Ok(buffer)
    }

    /// Buffer over pairs already in memory.
    pub fn from_pairs(pairs: impl IntoIterator<Item = CodePair>) -> Result<CodePairBuffer<'static>> {
        CodePairBuffer::new(Box::new(PairListReader::new(pairs)))
    }

    pub fn items_remain(&self) -> bool {
        self.current.is_some()
    }

    /// The current pair, or `None` once the stream is exhausted.
    pub fn try_peek(&self) -> Option<&CodePair> {
        self.current.as_ref()
    }

    /// The current pair; an error once the stream is exhausted.
    pub fn peek(&self) -> Result<&CodePair> {
        self.current.as_ref().ok_or(DxfError::UnexpectedEof {
            offset: self.last_offset,
        })
    }

    /// Whether the current pair is `code` with string value `value`.
    pub fn is_at(&self, code: i32, value: &str) -> bool {
        self.current
            .as_ref()
            .is_some_and(|p| p.code == code && p.as_str() == Some(value))
    }

    /// Move to the next non-comment pair.
    pub fn advance(&mut self) -> Result<()> {
        loop {
            match self.reader.read_pair()? {
                Some(pair) if pair.code == 999 => {
                    tracing::trace!(offset = pair.offset, "skipping comment");
                }
                Some(pair) => {
                    self.last_offset = pair.offset;
                    self.current = Some(pair);
                    return Ok(());
                }
                None => {
                    self.current = None;
                    return Ok(());
                }
            }
        }
    }

    /// Return the current pair and advance past it.
    pub fn take(&mut self) -> Result<Option<CodePair>> {
        let pair = self.current.take();
        if pair.is_some() {
            self.advance()?;
        }
        Ok(pair)
    }

    /// Forwarded to the underlying reader. The already-buffered pair keeps
    /// its decoding.
    pub fn switch_to_utf8(&mut self) {
        self.reader.switch_to_utf8();
    }

    pub fn set_encoding(&mut self, encoding: &'static Encoding) {
        self.reader.set_encoding(encoding);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comments_are_skipped() {
        let mut buffer = CodePairBuffer::from_pairs([
            CodePair::string(999, "leading comment"),
            CodePair::string(0, "SECTION"),
            CodePair::string(999, "inner comment"),
            CodePair::string(2, "HEADER"),
        ])
        .unwrap();
        assert!(buffer.is_at(0, "SECTION"));
        buffer.advance().unwrap();
        assert!(buffer.is_at(2, "HEADER"));
        assert_eq!(buffer.take().unwrap().map(|p| p.code), Some(2));
        assert!(!buffer.items_remain());
        assert!(buffer.peek().is_err());
        assert!(buffer.take().unwrap().is_none());
    }
}
