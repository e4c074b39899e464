//! Block definitions
//!
//! A block in the BLOCKS section is a `BLOCK` record, the entities of the
//! definition, and a closing `ENDBLK`. [`Block`] owns the entities and the
//! end marker by [`ItemId`].

use crate::io::dxf::CodePair;
use crate::item::{Item, ItemId};
use crate::record::{push_handle, push_point, set_point_component, DxfRecord, RecordExtras};
use crate::types::{DxfVersion, Handle, Vector3};

/// Block type flags (code 70)
pub mod block_flags {
    pub const ANONYMOUS: i16 = 1;
    pub const HAS_ATTRIBUTES: i16 = 2;
    pub const XREF: i16 = 4;
    pub const XREF_OVERLAY: i16 = 8;
    pub const EXTERNALLY_DEPENDENT: i16 = 16;
}

/// Writes the shared `AcDbEntity` part of `BLOCK` and `ENDBLK`.
#[allow(clippy::too_many_arguments)]
fn add_entity_pairs(
    pairs: &mut Vec<CodePair>,
    version: DxfVersion,
    output_handles: bool,
    handle: Handle,
    owner: Handle,
    extras: &RecordExtras,
    layer: &str,
    is_in_paper_space: bool,
) {
    if output_handles && handle.is_valid() {
        push_handle(pairs, 5, handle);
    }
    if version.has_object_model() {
        extras.add_extension_data_pairs(pairs);
        if owner.is_valid() {
            push_handle(pairs, 330, owner);
        }
        pairs.push(CodePair::string(100, "AcDbEntity"));
    }
    if is_in_paper_space {
        pairs.push(CodePair::short(67, 1));
    }
    pairs.push(CodePair::string(8, layer));
}

/// Start of a block definition.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub handle: Handle,
    /// The block record this definition belongs to
    pub owner_handle: Handle,
    pub layer: String,
    /// Must match the block record's name
    pub name: String,
    pub flags: i16,
    pub base_point: Vector3,
    pub xref_path: String,
    pub description: String,
    pub is_in_paper_space: bool,
    pub entities: Vec<ItemId>,
    pub end: Option<ItemId>,
    pub extras: RecordExtras,
}

impl Block {
    pub fn new(name: impl Into<String>) -> Self {
        Block {
            handle: Handle::NULL,
            owner_handle: Handle::NULL,
            layer: "0".to_string(),
            name: name.into(),
            flags: 0,
            base_point: Vector3::ZERO,
            xref_path: String::new(),
            description: String::new(),
            is_in_paper_space: false,
            entities: Vec::new(),
            end: None,
            extras: RecordExtras::default(),
        }
    }

    pub fn with_base_point(mut self, base_point: Vector3) -> Self {
        self.base_point = base_point;
        self
    }

    pub fn is_anonymous(&self) -> bool {
        self.flags & block_flags::ANONYMOUS != 0
    }

    pub fn is_xref(&self) -> bool {
        self.flags & (block_flags::XREF | block_flags::XREF_OVERLAY) != 0
    }

    /// Write the `BLOCK` record using `default_owner` when the block has no
    /// owner handle of its own.
    pub fn add_value_pairs_owned_by(
        &self,
        pairs: &mut Vec<CodePair>,
        version: DxfVersion,
        output_handles: bool,
        default_owner: Handle,
    ) {
        pairs.push(CodePair::string(0, "BLOCK"));
        let owner = if self.owner_handle.is_valid() {
            self.owner_handle
        } else {
            default_owner
        };
        add_entity_pairs(
            pairs,
            version,
            output_handles,
            self.handle,
            owner,
            &self.extras,
            &self.layer,
            self.is_in_paper_space,
        );
        if version.has_object_model() {
            pairs.push(CodePair::string(100, "AcDbBlockBegin"));
        }
        pairs.push(CodePair::string(2, self.name.as_str()));
        pairs.push(CodePair::short(70, self.flags));
        push_point(pairs, 10, &self.base_point);
        pairs.push(CodePair::string(3, self.name.as_str()));
        pairs.push(CodePair::string(1, self.xref_path.as_str()));
        if !self.description.is_empty() {
            pairs.push(CodePair::string(4, self.description.as_str()));
        }
        self.extras.add_xdata_pairs(pairs);
    }
}

impl DxfRecord for Block {
    type ReadState = ();

    fn try_set_pair(&mut self, pair: &CodePair, _state: &mut ()) -> bool {
        match pair.code {
            5 => self.handle = pair.handle_value(),
            330 => self.owner_handle = pair.handle_value(),
            8 => self.layer = pair.string_value(),
            67 => self.is_in_paper_space = pair.bool_value(),
            2 => self.name = pair.string_value(),
            // repeats the name
            3 => {
                if self.name.is_empty() {
                    self.name = pair.string_value();
                }
            }
            70 => self.flags = pair.short_value(),
            10 | 20 | 30 => return set_point_component(&mut self.base_point, 10, pair),
            1 => self.xref_path = pair.string_value(),
            4 => self.description = pair.string_value(),
            100 => {}
            _ => return false,
        }
        true
    }

    fn extras_mut(&mut self) -> &mut RecordExtras {
        &mut self.extras
    }

    fn add_value_pairs(&self, pairs: &mut Vec<CodePair>, version: DxfVersion, output_handles: bool) {
        self.add_value_pairs_owned_by(pairs, version, output_handles, Handle::NULL);
    }
}

impl Item for Block {
    fn handle(&self) -> Handle {
        self.handle
    }

    fn set_handle(&mut self, handle: Handle) {
        self.handle = handle;
    }

    fn owner_handle(&self) -> Handle {
        self.owner_handle
    }

    fn set_owner_handle(&mut self, handle: Handle) {
        self.owner_handle = handle;
    }

    fn child_items(&self) -> Vec<ItemId> {
        self.entities.iter().copied().chain(self.end).collect()
    }

    fn is_entity(&self) -> bool {
        true
    }
}

/// End of a block definition.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockEnd {
    pub handle: Handle,
    pub owner_handle: Handle,
    pub layer: String,
    pub is_in_paper_space: bool,
    pub extras: RecordExtras,
}

impl BlockEnd {
    pub fn new() -> Self {
        BlockEnd {
            handle: Handle::NULL,
            owner_handle: Handle::NULL,
            layer: "0".to_string(),
            is_in_paper_space: false,
            extras: RecordExtras::default(),
        }
    }

    pub fn add_value_pairs_owned_by(
        &self,
        pairs: &mut Vec<CodePair>,
        version: DxfVersion,
        output_handles: bool,
        default_owner: Handle,
    ) {
        pairs.push(CodePair::string(0, "ENDBLK"));
        let owner = if self.owner_handle.is_valid() {
            self.owner_handle
        } else {
            default_owner
        };
        add_entity_pairs(
            pairs,
            version,
            output_handles,
            self.handle,
            owner,
            &self.extras,
            &self.layer,
            self.is_in_paper_space,
        );
        if version.has_object_model() {
            pairs.push(CodePair::string(100, "AcDbBlockEnd"));
        }
        self.extras.add_xdata_pairs(pairs);
    }
}

impl Default for BlockEnd {
    fn default() -> Self {
        Self::new()
    }
}

impl DxfRecord for BlockEnd {
    type ReadState = ();

    fn try_set_pair(&mut self, pair: &CodePair, _state: &mut ()) -> bool {
        match pair.code {
            5 => self.handle = pair.handle_value(),
            330 => self.owner_handle = pair.handle_value(),
            8 => self.layer = pair.string_value(),
            67 => self.is_in_paper_space = pair.bool_value(),
            100 => {}
            _ => return false,
        }
        true
    }

    fn extras_mut(&mut self) -> &mut RecordExtras {
        &mut self.extras
    }

    fn add_value_pairs(&self, pairs: &mut Vec<CodePair>, version: DxfVersion, output_handles: bool) {
        self.add_value_pairs_owned_by(pairs, version, output_handles, Handle::NULL);
    }
}

impl Item for BlockEnd {
    fn handle(&self) -> Handle {
        self.handle
    }

    fn set_handle(&mut self, handle: Handle) {
        self.handle = handle;
    }

    fn owner_handle(&self) -> Handle {
        self.owner_handle
    }

    fn set_owner_handle(&mut self, handle: Handle) {
        self.owner_handle = handle;
    }

    fn is_entity(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_r12_block_header() {
        let block = Block::new("DOOR").with_base_point(Vector3::new(1.0, 2.0, 0.0));
        let mut pairs = Vec::new();
        block.add_value_pairs(&mut pairs, DxfVersion::AC1009, false);
        assert_eq!(
            pairs,
            vec![
                CodePair::string(0, "BLOCK"),
                CodePair::string(8, "0"),
                CodePair::string(2, "DOOR"),
                CodePair::short(70, 0),
                CodePair::double(10, 1.0),
                CodePair::double(20, 2.0),
                CodePair::double(30, 0.0),
                CodePair::string(3, "DOOR"),
                CodePair::string(1, ""),
            ]
        );
    }

    #[test]
    fn test_end_uses_default_owner() {
        let end = BlockEnd::new();
        let mut pairs = Vec::new();
        end.add_value_pairs_owned_by(&mut pairs, DxfVersion::AC1015, true, Handle::new(0x1F));
        assert!(pairs.contains(&CodePair::string(330, "1F")));
        assert_eq!(pairs.last(), Some(&CodePair::string(100, "AcDbBlockEnd")));
    }
}
