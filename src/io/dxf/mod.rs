//! DXF (Drawing Exchange Format) reading and writing
//!
//! The codec works on [`CodePair`]s: the tokenizers in [`reader`] turn text
//! or binary input into pairs, [`reader::CodePairBuffer`] gives records a
//! one-pair lookahead over them, and the stream writers in [`writer`] turn
//! pairs back into bytes.

mod code_pair;
mod code_pair_group;
pub mod code_page;
pub mod control_chars;
mod group_code_value;
pub mod reader;
pub mod writer;

pub use code_pair::{CodePair, CodePairValue};
pub use code_pair_group::{CodePairGroup, CodePairGroupItem};
pub use group_code_value::{is_handle_code, GroupCodeValueType};
pub use reader::{DxfReader, DxfReaderConfiguration};
pub use writer::{DxfWriter, DxfWriterConfiguration};

/// First bytes of a binary DXF file.
pub const BINARY_DXF_SENTINEL: &[u8] = b"AutoCAD Binary DXF\r\n\x1a\x00";
