//! INSERT entity (block reference)

use crate::io::dxf::CodePair;
use crate::item::ItemId;
use crate::record::{push_normal, push_point, set_point_component};
use crate::types::{DxfVersion, Vector3};

/// A reference to a named block, optionally arrayed in rows and columns.
///
/// Attached `ATTRIB` records follow the insert in the stream and are closed
/// by a `SEQEND`; they are held here as arena ids.
#[derive(Debug, Clone, PartialEq)]
pub struct Insert {
    pub block_name: String,
    pub location: Vector3,
    pub x_scale: f64,
    pub y_scale: f64,
    pub z_scale: f64,
    pub rotation: f64,
    pub column_count: i16,
    pub row_count: i16,
    pub column_spacing: f64,
    pub row_spacing: f64,
    pub normal: Vector3,
    pub attributes: Vec<ItemId>,
    pub seqend: Option<ItemId>,
}

impl Insert {
    pub fn new() -> Self {
        Insert {
            block_name: String::new(),
            location: Vector3::ZERO,
            x_scale: 1.0,
            y_scale: 1.0,
            z_scale: 1.0,
            rotation: 0.0,
            column_count: 1,
            row_count: 1,
            column_spacing: 0.0,
            row_spacing: 0.0,
            normal: Vector3::UNIT_Z,
            attributes: Vec::new(),
            seqend: None,
        }
    }

    pub fn of_block(block_name: impl Into<String>, location: Vector3) -> Self {
        Insert {
            block_name: block_name.into(),
            location,
            ..Self::new()
        }
    }

    pub fn is_array(&self) -> bool {
        self.column_count > 1 || self.row_count > 1
    }

    pub(crate) fn try_set_pair(&mut self, pair: &CodePair) -> bool {
        match pair.code {
            // attributes-follow flag; the children themselves decide
            66 => {}
            2 => self.block_name = pair.string_value(),
            10 | 20 | 30 => return set_point_component(&mut self.location, 10, pair),
            41 => self.x_scale = pair.double_value(),
            42 => self.y_scale = pair.double_value(),
            43 => self.z_scale = pair.double_value(),
            50 => self.rotation = pair.double_value(),
            70 => self.column_count = pair.short_value(),
            71 => self.row_count = pair.short_value(),
            44 => self.column_spacing = pair.double_value(),
            45 => self.row_spacing = pair.double_value(),
            210 | 220 | 230 => return set_point_component(&mut self.normal, 210, pair),
            _ => return false,
        }
        true
    }

    pub(crate) fn add_value_pairs(&self, pairs: &mut Vec<CodePair>, version: DxfVersion) {
        if version.has_object_model() {
            let marker = if self.is_array() {
                "AcDbMInsertBlock"
            } else {
                "AcDbBlockReference"
            };
            pairs.push(CodePair::string(100, marker));
        }
        if !self.attributes.is_empty() {
            pairs.push(CodePair::short(66, 1));
        }
        pairs.push(CodePair::string(2, self.block_name.as_str()));
        push_point(pairs, 10, &self.location);
        if self.x_scale != 1.0 {
            pairs.push(CodePair::double(41, self.x_scale));
        }
        if self.y_scale != 1.0 {
            pairs.push(CodePair::double(42, self.y_scale));
        }
        if self.z_scale != 1.0 {
            pairs.push(CodePair::double(43, self.z_scale));
        }
        if self.rotation != 0.0 {
            pairs.push(CodePair::double(50, self.rotation));
        }
        if self.is_array() {
            pairs.push(CodePair::short(70, self.column_count));
            pairs.push(CodePair::short(71, self.row_count));
            pairs.push(CodePair::double(44, self.column_spacing));
            pairs.push(CodePair::double(45, self.row_spacing));
        }
        push_normal(pairs, 210, &self.normal);
    }
}

impl Default for Insert {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_array_insert_marker() {
        let mut insert = Insert::of_block("DOOR", Vector3::new(1.0, 2.0, 0.0));
        insert.column_count = 3;
        let mut pairs = Vec::new();
        insert.add_value_pairs(&mut pairs, DxfVersion::AC1015);
        assert_eq!(pairs[0], CodePair::string(100, "AcDbMInsertBlock"));
        assert!(pairs.contains(&CodePair::short(70, 3)));
        assert!(!pairs.iter().any(|p| p.code == 66));
    }

    #[test]
    fn test_scales_default_to_one() {
        let mut insert = Insert::new();
        assert!(insert.try_set_pair(&CodePair::double(42, 2.5)));
        assert_eq!(insert.x_scale, 1.0);
        assert_eq!(insert.y_scale, 2.5);
    }
}
