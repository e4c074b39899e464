//! UCS table entry

use crate::io::dxf::CodePair;
use crate::record::{push_point, set_point_component};
use crate::types::{DxfVersion, Vector3};

/// A named user coordinate system
#[derive(Debug, Clone, PartialEq)]
pub struct Ucs {
    pub origin: Vector3,
    pub x_axis: Vector3,
    pub y_axis: Vector3,
}

impl Ucs {
    pub fn new() -> Self {
        Ucs {
            origin: Vector3::ZERO,
            x_axis: Vector3::UNIT_X,
            y_axis: Vector3::new(0.0, 1.0, 0.0),
        }
    }

    pub(crate) fn try_set_pair(&mut self, pair: &CodePair) -> bool {
        match pair.code {
            10 | 20 | 30 => set_point_component(&mut self.origin, 10, pair),
            11 | 21 | 31 => set_point_component(&mut self.x_axis, 11, pair),
            12 | 22 | 32 => set_point_component(&mut self.y_axis, 12, pair),
            _ => false,
        }
    }

    pub(crate) fn add_value_pairs(&self, pairs: &mut Vec<CodePair>, _version: DxfVersion) {
        push_point(pairs, 10, &self.origin);
        push_point(pairs, 11, &self.x_axis);
        push_point(pairs, 12, &self.y_axis);
    }
}

impl Default for Ucs {
    fn default() -> Self {
        Self::new()
    }
}
