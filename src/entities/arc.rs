//! Arc entity

use crate::io::dxf::CodePair;
use crate::record::{push_normal, push_point, set_point_component};
use crate::types::{DxfVersion, Vector3};

/// A circular arc; angles are in degrees, counterclockwise from start to end.
#[derive(Debug, Clone, PartialEq)]
pub struct Arc {
    pub center: Vector3,
    pub radius: f64,
    pub start_angle: f64,
    pub end_angle: f64,
    pub thickness: f64,
    pub normal: Vector3,
}

impl Arc {
    pub fn new() -> Self {
        Arc {
            center: Vector3::ZERO,
            radius: 1.0,
            start_angle: 0.0,
            end_angle: 360.0,
            thickness: 0.0,
            normal: Vector3::UNIT_Z,
        }
    }

    pub fn from_center_radius_angles(center: Vector3, radius: f64, start_angle: f64, end_angle: f64) -> Self {
        Arc {
            center,
            radius,
            start_angle,
            end_angle,
            ..Self::new()
        }
    }

    pub(crate) fn try_set_pair(&mut self, pair: &CodePair) -> bool {
        match pair.code {
            10 | 20 | 30 => return set_point_component(&mut self.center, 10, pair),
            210 | 220 | 230 => return set_point_component(&mut self.normal, 210, pair),
            40 => self.radius = pair.double_value(),
            50 => self.start_angle = pair.double_value(),
            51 => self.end_angle = pair.double_value(),
            39 => self.thickness = pair.double_value(),
            _ => return false,
        }
        true
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
        if version.has_object_model() {
            pairs.push(CodePair::string(100, "AcDbArc"));
        }
        pairs.push(CodePair::double(50, self.start_angle));
        pairs.push(CodePair::double(51, self.end_angle));
    }
}

impl Default for Arc {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arc_markers_follow_version() {
        let arc = Arc::from_center_radius_angles(Vector3::ZERO, 2.0, 0.0, 90.0);
        let mut pairs = Vec::new();
        arc.add_value_pairs(&mut pairs, DxfVersion::AC1009);
        assert!(pairs.iter().all(|p| p.code != 100));

        pairs.clear();
        arc.add_value_pairs(&mut pairs, DxfVersion::AC1018);
        let markers: Vec<&str> = pairs.iter().filter(|p| p.code == 100).filter_map(|p| p.as_str()).collect();
        assert_eq!(markers, ["AcDbCircle", "AcDbArc"]);
    }
}
