//! Circle entity

use crate::io::dxf::CodePair;
use crate::record::{push_normal, push_point, set_point_component};
use crate::types::{DxfVersion, Vector3};

#[derive(Debug, Clone, PartialEq)]
pub struct Circle {
    pub center: Vector3,
    pub radius: f64,
    pub thickness: f64,
    pub normal: Vector3,
}

impl Circle {
    pub fn new() -> Self {
        Circle {
            center: Vector3::ZERO,
            radius: 1.0,
            thickness: 0.0,
            normal: Vector3::UNIT_Z,
        }
    }

    pub fn from_center_radius(center: Vector3, radius: f64) -> Self {
        Circle {
            center,
            radius,
            ..Self::new()
        }
    }

    pub(crate) fn try_set_pair(&mut self, pair: &CodePair) -> bool {
        match pair.code {
            10 | 20 | 30 => set_point_component(&mut self.center, 10, pair),
            210 | 220 | 230 => set_point_component(&mut self.normal, 210, pair),
            40 => {
                self.radius = pair.double_value();
                true
            }
            39 => {
                self.thickness = pair.double_value();
                true
            }
            _ => false,
        }
    }

    pub(crate) fn add_value_pairs(&self, pairs: &mut Vec<CodePair>, version: DxfVersion) {
        if version.has_object_model() {
            pairs.push(CodePair::string(100, "AcDbCircle"));
        }
        if self.thickness != 0.0 {
            pairs.push(CodePair::double(39, self.thickness));
        }
        push_point(pairs, 10, &self.center);
        pairs.push(CodePair::double(40, self.radius));
        push_normal(pairs, 210, &self.normal);
    }
}

impl Default for Circle {
    fn default() -> Self {
        Self::new()
    }
}
