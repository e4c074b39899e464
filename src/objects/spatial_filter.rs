//! SPATIAL_FILTER object (block reference clipping)
//!
//! Code 40 appears up to 26 times, each occurrence meaning a different
//! field: the front clip distance (if enabled by 72), the back clip distance
//! (if enabled by 73), then the 12 values of the inverse block transform and
//! the 12 values of the clip transform.

use crate::io::dxf::CodePair;
use crate::record::{push_point, push_point2, set_point_component, short_count};
use crate::types::{Vector2, Vector3};

/// A 3x4 row-major affine matrix.
pub type Matrix3x4 = [f64; 12];

const IDENTITY: Matrix3x4 = [1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0];

#[derive(Debug, Clone, PartialEq)]
pub struct SpatialFilter {
    /// Clip boundary in the filter's coordinate system
    pub boundary: Vec<Vector2>,
    pub normal: Vector3,
    pub origin: Vector3,
    pub display_boundary: bool,
    pub clip_front: bool,
    pub front_distance: f64,
    pub clip_back: bool,
    pub back_distance: f64,
    pub inverse_block_transform: Matrix3x4,
    pub transform: Matrix3x4,
}

impl SpatialFilter {
    pub fn new() -> Self {
        SpatialFilter {
            boundary: Vec::new(),
            normal: Vector3::UNIT_Z,
            origin: Vector3::ZERO,
            display_boundary: false,
            clip_front: false,
            front_distance: 0.0,
            clip_back: false,
            back_distance: 0.0,
            inverse_block_transform: IDENTITY,
            transform: IDENTITY,
        }
    }

    /// Store the `index`-th occurrence of code 40.
    fn set_code_40(&mut self, index: usize, value: f64) -> bool {
        let mut index = index;
        if self.clip_front {
            if index == 0 {
                self.front_distance = value;
                return true;
            }
            index -= 1;
        }
        if self.clip_back {
            if index == 0 {
                self.back_distance = value;
                return true;
            }
            index -= 1;
        }
        match index {
            0..=11 => self.inverse_block_transform[index] = value,
            12..=23 => self.transform[index - 12] = value,
            _ => return false,
        }
        true
    }

    pub(crate) fn try_set_pair(&mut self, pair: &CodePair, code_40_index: &mut usize) -> bool {
        match pair.code {
            // boundary point count
            70 => {}
            10 => self.boundary.push(Vector2::new(pair.double_value(), 0.0)),
            20 => match self.boundary.last_mut() {
                Some(point) => point.y = pair.double_value(),
                None => return false,
            },
            210 | 220 | 230 => return set_point_component(&mut self.normal, 210, pair),
            11 | 21 | 31 => return set_point_component(&mut self.origin, 11, pair),
            71 => self.display_boundary = pair.bool_value(),
            72 => self.clip_front = pair.bool_value(),
            73 => self.clip_back = pair.bool_value(),
            40 => {
                let index = *code_40_index;
                *code_40_index += 1;
                if !self.set_code_40(index, pair.double_value()) {
                    tracing::warn!(offset = pair.offset, index, "unexpected extra code 40 in SPATIAL_FILTER");
                }
            }
            _ => return false,
        }
        true
    }

    pub(crate) fn add_value_pairs(&self, pairs: &mut Vec<CodePair>) {
        pairs.push(CodePair::string(100, "AcDbFilter"));
        pairs.push(CodePair::string(100, "AcDbSpatialFilter"));
        pairs.push(CodePair::short(70, short_count(self.boundary.len())));
        for point in &self.boundary {
            push_point2(pairs, 10, point);
        }
        push_point(pairs, 210, &self.normal);
        push_point(pairs, 11, &self.origin);
        pairs.push(CodePair::short(71, self.display_boundary as i16));
        pairs.push(CodePair::short(72, self.clip_front as i16));
        if self.clip_front {
            pairs.push(CodePair::double(40, self.front_distance));
        }
        pairs.push(CodePair::short(73, self.clip_back as i16));
        if self.clip_back {
            pairs.push(CodePair::double(40, self.back_distance));
        }
        for value in self.inverse_block_transform.iter().chain(&self.transform) {
            pairs.push(CodePair::double(40, *value));
        }
    }
}

impl Default for SpatialFilter {
    fn default() -> Self {
        Self::new()
    }
}
