//! Code pair stream reader trait

use std::collections::VecDeque;

use encoding_rs::Encoding;

use crate::error::Result;
use crate::io::dxf::CodePair;

/// A forward-only source of code pairs.
///
/// `Ok(None)` marks the end of the stream. Readers are stateful: once the
/// header announces a UTF-8 version, [`switch_to_utf8`](Self::switch_to_utf8)
/// changes how the remaining string values are decoded.
pub trait DxfStreamReader {
    /// Read the next code pair
    fn read_pair(&mut self) -> Result<Option<CodePair>>;

    /// Decode all further strings as UTF-8.
    fn switch_to_utf8(&mut self) {}

    /// Decode further non-UTF-8 strings with `encoding` (from `$DWGCODEPAGE`).
    fn set_encoding(&mut self, _encoding: &'static Encoding) {}
}

impl<T: DxfStreamReader + ?Sized> DxfStreamReader for Box<T> {
    fn read_pair(&mut self) -> Result<Option<CodePair>> {
        (**self).read_pair()
    }

    fn switch_to_utf8(&mut self) {
        (**self).switch_to_utf8()
    }

    fn set_encoding(&mut self, encoding: &'static Encoding) {
        (**self).set_encoding(encoding)
    }
}

/// Replays an in-memory list of pairs, e.g. pairs produced by a writer.
#[derive(Debug, Clone, Default)]
pub struct PairListReader {
    pairs: VecDeque<CodePair>,
}

impl PairListReader {
    pub fn new(pairs: impl IntoIterator<Item = CodePair>) -> Self {
        Self {
            pairs: pairs.into_iter().collect(),
        }
    }
}

impl DxfStreamReader for PairListReader {
    fn read_pair(&mut self) -> Result<Option<CodePair>> {
        Ok(self.pairs.pop_front())
    }
}
