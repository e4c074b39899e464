//! 3DFACE entity

use crate::io::dxf::CodePair;
use crate::record::{push_point, set_point_component};
use crate::types::{DxfVersion, Vector3};

#[derive(Debug, Clone, PartialEq)]
pub struct Face3D {
    pub first_corner: Vector3,
    pub second_corner: Vector3,
    pub third_corner: Vector3,
    pub fourth_corner: Vector3,
    /// Bit per edge, 1 through 8
    pub invisible_edges: i16,
}

impl Face3D {
    pub fn new() -> Self {
        Face3D {
            first_corner: Vector3::ZERO,
            second_corner: Vector3::ZERO,
            third_corner: Vector3::ZERO,
            fourth_corner: Vector3::ZERO,
            invisible_edges: 0,
        }
    }

    pub fn from_corners(first: Vector3, second: Vector3, third: Vector3, fourth: Vector3) -> Self {
        Face3D {
            first_corner: first,
            second_corner: second,
            third_corner: third,
            fourth_corner: fourth,
            invisible_edges: 0,
        }
    }

    pub(crate) fn try_set_pair(&mut self, pair: &CodePair) -> bool {
        match pair.code {
            10 | 20 | 30 => set_point_component(&mut self.first_corner, 10, pair),
            11 | 21 | 31 => set_point_component(&mut self.second_corner, 11, pair),
            12 | 22 | 32 => set_point_component(&mut self.third_corner, 12, pair),
            13 | 23 | 33 => set_point_component(&mut self.fourth_corner, 13, pair),
            70 => {
                self.invisible_edges = pair.short_value();
                true
            }
            _ => false,
        }
    }

    pub(crate) fn add_value_pairs(&self, pairs: &mut Vec<CodePair>, version: DxfVersion) {
        if version.has_object_model() {
            pairs.push(CodePair::string(100, "AcDbFace"));
        }
        push_point(pairs, 10, &self.first_corner);
        push_point(pairs, 11, &self.second_corner);
        push_point(pairs, 12, &self.third_corner);
        push_point(pairs, 13, &self.fourth_corner);
        if self.invisible_edges != 0 {
            pairs.push(CodePair::short(70, self.invisible_edges));
        }
    }
}

impl Default for Face3D {
    fn default() -> Self {
        Self::new()
    }
}
