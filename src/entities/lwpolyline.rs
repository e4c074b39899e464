//! Lightweight polyline entity

use crate::io::dxf::CodePair;
use crate::record::{integer_count, push_normal, set_point_component};
use crate::types::{DxfVersion, Vector2, Vector3};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LwVertex {
    pub location: Vector2,
    pub start_width: f64,
    pub end_width: f64,
    pub bulge: f64,
    pub id: i32,
}

impl LwVertex {
    pub fn new(location: Vector2) -> Self {
        LwVertex {
            location,
            ..Default::default()
        }
    }
}

/// A 2D polyline stored in a single record.
///
/// Each `10` starts a new vertex; the following 20/40/41/42/91 pairs apply
/// to the vertex most recently started.
#[derive(Debug, Clone, PartialEq)]
pub struct LwPolyline {
    pub flags: i16,
    pub constant_width: f64,
    pub elevation: f64,
    pub thickness: f64,
    pub vertices: Vec<LwVertex>,
    pub normal: Vector3,
}

impl LwPolyline {
    pub fn new() -> Self {
        LwPolyline {
            flags: 0,
            constant_width: 0.0,
            elevation: 0.0,
            thickness: 0.0,
            vertices: Vec::new(),
            normal: Vector3::UNIT_Z,
        }
    }

    pub fn from_points(points: impl IntoIterator<Item = Vector2>) -> Self {
        LwPolyline {
            vertices: points.into_iter().map(LwVertex::new).collect(),
            ..Self::new()
        }
    }

    pub fn is_closed(&self) -> bool {
        self.flags & 1 != 0
    }

    pub fn set_closed(&mut self, closed: bool) {
        if closed {
            self.flags |= 1;
        } else {
            self.flags &= !1;
        }
    }

    pub(crate) fn try_set_pair(&mut self, pair: &CodePair) -> bool {
        match pair.code {
            10 => self.vertices.push(LwVertex::new(Vector2::new(pair.double_value(), 0.0))),
            20 | 40 | 41 | 42 | 91 => {
                let Some(vertex) = self.vertices.last_mut() else {
                    return false;
                };
                match pair.code {
                    20 => vertex.location.y = pair.double_value(),
                    40 => vertex.start_width = pair.double_value(),
                    41 => vertex.end_width = pair.double_value(),
                    42 => vertex.bulge = pair.double_value(),
                    _ => vertex.id = pair.integer_value(),
                }
            }
            210 | 220 | 230 => return set_point_component(&mut self.normal, 210, pair),
            70 => self.flags = pair.short_value(),
            43 => self.constant_width = pair.double_value(),
            38 => self.elevation = pair.double_value(),
            39 => self.thickness = pair.double_value(),
            // vertex count, implied by the vertices themselves
            90 => {}
            _ => return false,
        }
        true
    }

    pub(crate) fn add_value_pairs(&self, pairs: &mut Vec<CodePair>, version: DxfVersion) {
        if version.has_object_model() {
            pairs.push(CodePair::string(100, "AcDbPolyline"));
        }
        pairs.push(CodePair::integer(90, integer_count(self.vertices.len())));
        pairs.push(CodePair::short(70, self.flags));
        if self.constant_width != 0.0 {
            pairs.push(CodePair::double(43, self.constant_width));
        }
        if self.elevation != 0.0 {
            pairs.push(CodePair::double(38, self.elevation));
        }
        if self.thickness != 0.0 {
            pairs.push(CodePair::double(39, self.thickness));
        }
        for vertex in &self.vertices {
            pairs.push(CodePair::double(10, vertex.location.x));
            pairs.push(CodePair::double(20, vertex.location.y));
            if vertex.start_width != 0.0 || vertex.end_width != 0.0 {
                pairs.push(CodePair::double(40, vertex.start_width));
                pairs.push(CodePair::double(41, vertex.end_width));
            }
            if vertex.bulge != 0.0 {
                pairs.push(CodePair::double(42, vertex.bulge));
            }
        }
        push_normal(pairs, 210, &self.normal);
    }
}

impl Default for LwPolyline {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_fields_apply_to_last_vertex() {
        let mut polyline = LwPolyline::new();
        for pair in [
            CodePair::integer(90, 2),
            CodePair::short(70, 1),
            CodePair::double(10, 1.0),
            CodePair::double(20, 2.0),
            CodePair::double(42, 0.5),
            CodePair::double(10, 3.0),
            CodePair::double(20, 4.0),
        ] {
            assert!(polyline.try_set_pair(&pair));
        }
        assert!(polyline.is_closed());
        assert_eq!(polyline.vertices.len(), 2);
        assert_eq!(polyline.vertices[0].bulge, 0.5);
        assert_eq!(polyline.vertices[1].location, Vector2::new(3.0, 4.0));
    }

    #[test]
    fn test_vertex_field_before_any_vertex_is_unclaimed() {
        let mut polyline = LwPolyline::new();
        assert!(!polyline.try_set_pair(&CodePair::double(42, 1.0)));
    }
}
