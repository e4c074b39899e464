//! Viewport table entry

use crate::io::dxf::CodePair;
use crate::record::{push_point, push_point2, set_point_component};
use crate::types::{DxfVersion, Vector2, Vector3};

/// A viewport configuration entry; `*ACTIVE` is the current one.
#[derive(Debug, Clone, PartialEq)]
pub struct VPort {
    pub lower_left: Vector2,
    pub upper_right: Vector2,
    pub view_center: Vector2,
    pub snap_base: Vector2,
    pub snap_spacing: Vector2,
    pub grid_spacing: Vector2,
    pub view_direction: Vector3,
    pub view_target: Vector3,
    pub view_height: f64,
    pub aspect_ratio: f64,
    pub lens_length: f64,
    pub front_clipping: f64,
    pub back_clipping: f64,
    pub snap_rotation: f64,
    pub twist_angle: f64,
    pub view_mode: i16,
    pub circle_sides: i16,
    pub snap_on: bool,
    pub grid_on: bool,
}

impl VPort {
    pub fn new() -> Self {
        VPort {
            lower_left: Vector2::ZERO,
            upper_right: Vector2::new(1.0, 1.0),
            view_center: Vector2::ZERO,
            snap_base: Vector2::ZERO,
            snap_spacing: Vector2::new(0.5, 0.5),
            grid_spacing: Vector2::new(10.0, 10.0),
            view_direction: Vector3::UNIT_Z,
            view_target: Vector3::ZERO,
            view_height: 10.0,
            aspect_ratio: 1.0,
            lens_length: 50.0,
            front_clipping: 0.0,
            back_clipping: 0.0,
            snap_rotation: 0.0,
            twist_angle: 0.0,
            view_mode: 0,
            circle_sides: 1000,
            snap_on: false,
            grid_on: false,
        }
    }

    pub(crate) fn try_set_pair(&mut self, pair: &CodePair) -> bool {
        let value = pair.double_value();
        match pair.code {
            10 => self.lower_left.x = value,
            20 => self.lower_left.y = value,
            11 => self.upper_right.x = value,
            21 => self.upper_right.y = value,
            12 => self.view_center.x = value,
            22 => self.view_center.y = value,
            13 => self.snap_base.x = value,
            23 => self.snap_base.y = value,
            14 => self.snap_spacing.x = value,
            24 => self.snap_spacing.y = value,
            15 => self.grid_spacing.x = value,
            25 => self.grid_spacing.y = value,
            16 | 26 | 36 => return set_point_component(&mut self.view_direction, 16, pair),
            17 | 27 | 37 => return set_point_component(&mut self.view_target, 17, pair),
            40 => self.view_height = value,
            41 => self.aspect_ratio = value,
            42 => self.lens_length = value,
            43 => self.front_clipping = value,
            44 => self.back_clipping = value,
            50 => self.snap_rotation = value,
            51 => self.twist_angle = value,
            71 => self.view_mode = pair.short_value(),
            72 => self.circle_sides = pair.short_value(),
            75 => self.snap_on = pair.bool_value(),
            76 => self.grid_on = pair.bool_value(),
            _ => return false,
        }
        true
    }

    pub(crate) fn add_value_pairs(&self, pairs: &mut Vec<CodePair>, _version: DxfVersion) {
        push_point2(pairs, 10, &self.lower_left);
        push_point2(pairs, 11, &self.upper_right);
        push_point2(pairs, 12, &self.view_center);
        push_point2(pairs, 13, &self.snap_base);
        push_point2(pairs, 14, &self.snap_spacing);
        push_point2(pairs, 15, &self.grid_spacing);
        push_point(pairs, 16, &self.view_direction);
        push_point(pairs, 17, &self.view_target);
        pairs.push(CodePair::double(40, self.view_height));
        pairs.push(CodePair::double(41, self.aspect_ratio));
        pairs.push(CodePair::double(42, self.lens_length));
        pairs.push(CodePair::double(43, self.front_clipping));
        pairs.push(CodePair::double(44, self.back_clipping));
        pairs.push(CodePair::double(50, self.snap_rotation));
        pairs.push(CodePair::double(51, self.twist_angle));
        pairs.push(CodePair::short(71, self.view_mode));
        pairs.push(CodePair::short(72, self.circle_sides));
        pairs.push(CodePair::short(75, self.snap_on as i16));
        pairs.push(CodePair::short(76, self.grid_on as i16));
    }
}

impl Default for VPort {
    fn default() -> Self {
        Self::new()
    }
}
