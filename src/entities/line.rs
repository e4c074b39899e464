//! Line entity

use crate::io::dxf::CodePair;
use crate::record::{push_normal, push_point, set_point_component};
use crate::types::{DxfVersion, Vector3};

/// A line segment between two points
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub start: Vector3,
    pub end: Vector3,
    pub thickness: f64,
    pub normal: Vector3,
}

impl Line {
    pub fn new() -> Self {
        Line {
            start: Vector3::ZERO,
            end: Vector3::ZERO,
            thickness: 0.0,
            normal: Vector3::UNIT_Z,
        }
    }

    pub fn from_points(start: Vector3, end: Vector3) -> Self {
        Line {
            start,
            end,
            ..Self::new()
        }
    }

    pub(crate) fn try_set_pair(&mut self, pair: &CodePair) -> bool {
        match pair.code {
            10 | 20 | 30 => set_point_component(&mut self.start, 10, pair),
            11 | 21 | 31 => set_point_component(&mut self.end, 11, pair),
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
            pairs.push(CodePair::string(100, "AcDbLine"));
        }
        if self.thickness != 0.0 {
            pairs.push(CodePair::double(39, self.thickness));
        }
        push_point(pairs, 10, &self.start);
        push_point(pairs, 11, &self.end);
        push_normal(pairs, 210, &self.normal);
    }
}

impl Default for Line {
    fn default() -> Self {
        Self::new()
    }
}
