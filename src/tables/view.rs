//! Named view table entry

use crate::io::dxf::CodePair;
use crate::record::{push_point, push_point2, set_point_component};
use crate::types::{DxfVersion, Vector2, Vector3};

#[derive(Debug, Clone, PartialEq)]
pub struct View {
    pub height: f64,
    pub width: f64,
    pub center: Vector2,
    pub direction: Vector3,
    pub target: Vector3,
    pub lens_length: f64,
    pub front_clipping: f64,
    pub back_clipping: f64,
    pub twist_angle: f64,
    pub view_mode: i16,
}

impl View {
    pub fn new() -> Self {
        View {
            height: 1.0,
            width: 1.0,
            center: Vector2::ZERO,
            direction: Vector3::UNIT_Z,
            target: Vector3::ZERO,
            lens_length: 50.0,
            front_clipping: 0.0,
            back_clipping: 0.0,
            twist_angle: 0.0,
            view_mode: 0,
        }
    }

    pub(crate) fn try_set_pair(&mut self, pair: &CodePair) -> bool {
        match pair.code {
            40 => self.height = pair.double_value(),
            41 => self.width = pair.double_value(),
            10 => self.center.x = pair.double_value(),
            20 => self.center.y = pair.double_value(),
            11 | 21 | 31 => return set_point_component(&mut self.direction, 11, pair),
            12 | 22 | 32 => return set_point_component(&mut self.target, 12, pair),
            42 => self.lens_length = pair.double_value(),
            43 => self.front_clipping = pair.double_value(),
            44 => self.back_clipping = pair.double_value(),
            50 => self.twist_angle = pair.double_value(),
            71 => self.view_mode = pair.short_value(),
            _ => return false,
        }
        true
    }

    pub(crate) fn add_value_pairs(&self, pairs: &mut Vec<CodePair>, _version: DxfVersion) {
        pairs.push(CodePair::double(40, self.height));
        push_point2(pairs, 10, &self.center);
        pairs.push(CodePair::double(41, self.width));
        push_point(pairs, 11, &self.direction);
        push_point(pairs, 12, &self.target);
        pairs.push(CodePair::double(42, self.lens_length));
        pairs.push(CodePair::double(43, self.front_clipping));
        pairs.push(CodePair::double(44, self.back_clipping));
        pairs.push(CodePair::double(50, self.twist_angle));
        pairs.push(CodePair::short(71, self.view_mode));
    }
}

impl Default for View {
    fn default() -> Self {
        Self::new()
    }
}
