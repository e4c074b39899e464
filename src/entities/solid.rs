//! SOLID and TRACE entities (filled quadrilaterals)

use crate::io::dxf::CodePair;
use crate::record::{push_normal, push_point, set_point_component};
use crate::types::{DxfVersion, Vector3};

/// Four corners; a triangle repeats the third corner as the fourth.
#[derive(Debug, Clone, PartialEq)]
pub struct Solid {
    pub first_corner: Vector3,
    pub second_corner: Vector3,
    pub third_corner: Vector3,
    pub fourth_corner: Vector3,
    pub thickness: f64,
    pub normal: Vector3,
}

impl Solid {
    pub fn new() -> Self {
        Solid {
            first_corner: Vector3::ZERO,
            second_corner: Vector3::ZERO,
            third_corner: Vector3::ZERO,
            fourth_corner: Vector3::ZERO,
            thickness: 0.0,
            normal: Vector3::UNIT_Z,
        }
    }

    pub fn from_corners(first: Vector3, second: Vector3, third: Vector3, fourth: Vector3) -> Self {
        Solid {
            first_corner: first,
            second_corner: second,
            third_corner: third,
            fourth_corner: fourth,
            ..Self::new()
        }
    }

    pub(crate) fn try_set_pair(&mut self, pair: &CodePair) -> bool {
        match pair.code {
            10 | 20 | 30 => set_point_component(&mut self.first_corner, 10, pair),
            11 | 21 | 31 => set_point_component(&mut self.second_corner, 11, pair),
            12 | 22 | 32 => set_point_component(&mut self.third_corner, 12, pair),
            13 | 23 | 33 => set_point_component(&mut self.fourth_corner, 13, pair),
            210 | 220 | 230 => set_point_component(&mut self.normal, 210, pair),
            39 => {
                self.thickness = pair.double_value();
                true
            }
            _ => false,
        }
    }

    pub(crate) fn add_value_pairs(&self, pairs: &mut Vec<CodePair>, version: DxfVersion) {
        if version.has_object_model() {
            pairs.push(CodePair::string(100, "AcDbTrace"));
        }
        push_point(pairs, 10, &self.first_corner);
        push_point(pairs, 11, &self.second_corner);
        push_point(pairs, 12, &self.third_corner);
        push_point(pairs, 13, &self.fourth_corner);
        if self.thickness != 0.0 {
            pairs.push(CodePair::double(39, self.thickness));
        }
        push_normal(pairs, 210, &self.normal);
    }
}

impl Default for Solid {
    fn default() -> Self {
        Self::new()
    }
}
