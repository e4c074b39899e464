//! Point entity

use crate::io::dxf::CodePair;
use crate::record::{push_normal, push_point, set_point_component};
use crate::types::{DxfVersion, Vector3};

/// A point entity in 3D space
#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    pub location: Vector3,
    pub thickness: f64,
    pub normal: Vector3,
    /// Angle of the X axis for the UCS in effect when the point was drawn
    pub x_axis_angle: f64,
}

impl Point {
    pub fn new() -> Self {
        Point {
            location: Vector3::ZERO,
            thickness: 0.0,
            normal: Vector3::UNIT_Z,
            x_axis_angle: 0.0,
        }
    }

    pub fn at(location: Vector3) -> Self {
        Point {
            location,
            ..Self::new()
        }
    }

    pub fn from_coords(x: f64, y: f64, z: f64) -> Self {
        Point::at(Vector3::new(x, y, z))
    }

    pub(crate) fn try_set_pair(&mut self, pair: &CodePair) -> bool {
        match pair.code {
            10 | 20 | 30 => set_point_component(&mut self.location, 10, pair),
            210 | 220 | 230 => set_point_component(&mut self.normal, 210, pair),
            39 => {
                self.thickness = pair.double_value();
                true
            }
            50 => {
                self.x_axis_angle = pair.double_value();
                true
            }
            _ => false,
        }
    }

    pub(crate) fn add_value_pairs(&self, pairs: &mut Vec<CodePair>, version: DxfVersion) {
        if version.has_object_model() {
            pairs.push(CodePair::string(100, "AcDbPoint"));
        }
        push_point(pairs, 10, &self.location);
        if self.thickness != 0.0 {
            pairs.push(CodePair::double(39, self.thickness));
        }
        push_normal(pairs, 210, &self.normal);
        if self.x_axis_angle != 0.0 {
            pairs.push(CodePair::double(50, self.x_axis_angle));
        }
    }
}

impl Default for Point {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_pairs() {
        let point = Point::from_coords(1.0, 2.0, 3.0);
        let mut pairs = Vec::new();
        point.add_value_pairs(&mut pairs, DxfVersion::AC1015);
        assert_eq!(
            pairs,
            vec![
                CodePair::string(100, "AcDbPoint"),
                CodePair::double(10, 1.0),
                CodePair::double(20, 2.0),
                CodePair::double(30, 3.0),
            ]
        );
    }

    #[test]
    fn test_point_fields() {
        let mut point = Point::new();
        assert!(point.try_set_pair(&CodePair::double(20, 4.0)));
        assert!(point.try_set_pair(&CodePair::double(39, 0.5)));
        assert!(!point.try_set_pair(&CodePair::double(40, 1.0)));
        assert_eq!(point.location.y, 4.0);
        assert_eq!(point.thickness, 0.5);
    }
}
