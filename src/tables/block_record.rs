//! Block record table entry

use crate::io::dxf::CodePair;
use crate::item::Pointer;
use crate::record::push_handle;
use crate::types::DxfVersion;

/// Bytes of preview data per `310` pair
const PREVIEW_CHUNK: usize = 127;

/// A `BLOCK_RECORD` entry. Entities of the block (and of model and paper
/// space) name this record's handle as their owner.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockRecord {
    /// Layout object for `*Model_Space` and paper space blocks (code 340)
    pub layout: Pointer,
    /// Insertion units (code 70)
    pub units: i16,
    pub is_explodable: bool,
    pub can_scale_uniformly: bool,
    /// Thumbnail bitmap (code 310 chunks)
    pub preview: Vec<u8>,
}

impl BlockRecord {
    pub fn new() -> Self {
        BlockRecord {
            layout: Pointer::default(),
            units: 0,
            is_explodable: true,
            can_scale_uniformly: false,
            preview: Vec::new(),
        }
    }

    pub(crate) fn try_set_pair(&mut self, pair: &CodePair) -> bool {
        match pair.code {
            340 => self.layout = Pointer::new(pair.handle_value()),
            70 => self.units = pair.short_value(),
            280 => self.is_explodable = pair.bool_value(),
            281 => self.can_scale_uniformly = pair.bool_value(),
            310 => match hex::decode(pair.as_str().unwrap_or_default()) {
                Ok(bytes) => self.preview.extend(bytes),
                Err(err) => {
                    tracing::warn!(offset = pair.offset, %err, "invalid block preview chunk");
                }
            },
            _ => return false,
        }
        true
    }

    pub(crate) fn add_value_pairs(&self, pairs: &mut Vec<CodePair>, version: DxfVersion) {
        if self.layout.handle.is_valid() {
            push_handle(pairs, 340, self.layout.handle);
        }
        if version >= DxfVersion::AC1015 {
            pairs.push(CodePair::short(70, self.units));
            pairs.push(CodePair::short(280, self.is_explodable as i16));
            pairs.push(CodePair::short(281, self.can_scale_uniformly as i16));
        }
        for chunk in self.preview.chunks(PREVIEW_CHUNK) {
            pairs.push(CodePair::string(310, hex::encode_upper(chunk)));
        }
    }
}

impl Default for BlockRecord {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_chunks_concatenate() {
        let mut record = BlockRecord::new();
        assert!(record.try_set_pair(&CodePair::string(310, "0102")));
        assert!(record.try_set_pair(&CodePair::string(310, "FF")));
        assert_eq!(record.preview, vec![1, 2, 255]);

        let mut pairs = Vec::new();
        record.add_value_pairs(&mut pairs, DxfVersion::AC1015);
        assert!(pairs.contains(&CodePair::string(310, "0102FF")));
    }
}
