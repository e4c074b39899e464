//! POLYLINE entity and its VERTEX children

use crate::io::dxf::CodePair;
use crate::item::ItemId;
use crate::record::{push_normal, push_point, set_point_component};
use crate::types::{DxfVersion, Vector3};

/// Polyline flag bits (code 70)
pub mod polyline_flags {
    pub const CLOSED: i16 = 1;
    pub const CURVE_FIT: i16 = 2;
    pub const SPLINE_FIT: i16 = 4;
    pub const POLYLINE_3D: i16 = 8;
    pub const POLYGON_MESH: i16 = 16;
    pub const MESH_CLOSED_N: i16 = 32;
    pub const POLYFACE_MESH: i16 = 64;
    pub const CONTINUOUS_LINETYPE: i16 = 128;
}

/// Vertex flag bits (code 70)
pub mod vertex_flags {
    pub const EXTRA_CURVE_FIT: i16 = 1;
    pub const CURVE_FIT_TANGENT: i16 = 2;
    pub const SPLINE_VERTEX: i16 = 8;
    pub const SPLINE_FRAME_CONTROL: i16 = 16;
    pub const POLYLINE_3D_VERTEX: i16 = 32;
    pub const POLYGON_MESH_VERTEX: i16 = 64;
    pub const POLYFACE_MESH_VERTEX: i16 = 128;
}

/// A heavy polyline. Its vertices are separate `VERTEX` records that follow
/// it in the stream and are closed by a `SEQEND`.
#[derive(Debug, Clone, PartialEq)]
pub struct Polyline {
    pub flags: i16,
    pub elevation: f64,
    pub default_start_width: f64,
    pub default_end_width: f64,
    pub thickness: f64,
    pub mesh_m_count: i16,
    pub mesh_n_count: i16,
    pub smooth_m_density: i16,
    pub smooth_n_density: i16,
    pub surface_type: i16,
    pub normal: Vector3,
    pub vertices: Vec<ItemId>,
    pub seqend: Option<ItemId>,
}

impl Polyline {
    pub fn new() -> Self {
        Polyline {
            flags: 0,
            elevation: 0.0,
            default_start_width: 0.0,
            default_end_width: 0.0,
            thickness: 0.0,
            mesh_m_count: 0,
            mesh_n_count: 0,
            smooth_m_density: 0,
            smooth_n_density: 0,
            surface_type: 0,
            normal: Vector3::UNIT_Z,
            vertices: Vec::new(),
            seqend: None,
        }
    }

    pub fn is_closed(&self) -> bool {
        self.flags & polyline_flags::CLOSED != 0
    }

    fn subclass_marker(&self) -> &'static str {
        if self.flags & polyline_flags::POLYLINE_3D != 0 {
            "AcDb3dPolyline"
        } else if self.flags & polyline_flags::POLYGON_MESH != 0 {
            "AcDbPolygonMesh"
        } else if self.flags & polyline_flags::POLYFACE_MESH != 0 {
            "AcDbPolyFaceMesh"
        } else {
            "AcDb2dPolyline"
        }
    }

    pub(crate) fn try_set_pair(&mut self, pair: &CodePair) -> bool {
        match pair.code {
            // entities-follow flag and the dummy location
            66 | 10 | 20 => {}
            30 => self.elevation = pair.double_value(),
            70 => self.flags = pair.short_value(),
            40 => self.default_start_width = pair.double_value(),
            41 => self.default_end_width = pair.double_value(),
            39 => self.thickness = pair.double_value(),
            71 => self.mesh_m_count = pair.short_value(),
            72 => self.mesh_n_count = pair.short_value(),
            73 => self.smooth_m_density = pair.short_value(),
            74 => self.smooth_n_density = pair.short_value(),
            75 => self.surface_type = pair.short_value(),
            210 | 220 | 230 => return set_point_component(&mut self.normal, 210, pair),
            _ => return false,
        }
        true
    }

    pub(crate) fn add_value_pairs(&self, pairs: &mut Vec<CodePair>, version: DxfVersion) {
        if version.has_object_model() {
            pairs.push(CodePair::string(100, self.subclass_marker()));
        }
        pairs.push(CodePair::short(66, 1));
        push_point(pairs, 10, &Vector3::new(0.0, 0.0, self.elevation));
        if self.thickness != 0.0 {
            pairs.push(CodePair::double(39, self.thickness));
        }
        pairs.push(CodePair::short(70, self.flags));
        if self.default_start_width != 0.0 {
            pairs.push(CodePair::double(40, self.default_start_width));
        }
        if self.default_end_width != 0.0 {
            pairs.push(CodePair::double(41, self.default_end_width));
        }
        let mesh = self.flags & (polyline_flags::POLYGON_MESH | polyline_flags::POLYFACE_MESH) != 0;
        if mesh {
            pairs.push(CodePair::short(71, self.mesh_m_count));
            pairs.push(CodePair::short(72, self.mesh_n_count));
        }
        if self.smooth_m_density != 0 || self.smooth_n_density != 0 {
            pairs.push(CodePair::short(73, self.smooth_m_density));
            pairs.push(CodePair::short(74, self.smooth_n_density));
        }
        if self.surface_type != 0 {
            pairs.push(CodePair::short(75, self.surface_type));
        }
        push_normal(pairs, 210, &self.normal);
    }
}

impl Default for Polyline {
    fn default() -> Self {
        Self::new()
    }
}

/// One `VERTEX` of a heavy polyline.
#[derive(Debug, Clone, PartialEq)]
pub struct Vertex {
    pub location: Vector3,
    pub start_width: f64,
    pub end_width: f64,
    pub bulge: f64,
    pub flags: i16,
    pub curve_fit_tangent_direction: f64,
    /// Polyface mesh face indices (71..74)
    pub face_indices: [i16; 4],
    pub identifier: i32,
}

impl Vertex {
    pub fn new() -> Self {
        Vertex {
            location: Vector3::ZERO,
            start_width: 0.0,
            end_width: 0.0,
            bulge: 0.0,
            flags: 0,
            curve_fit_tangent_direction: 0.0,
            face_indices: [0; 4],
            identifier: 0,
        }
    }

    pub fn at(location: Vector3) -> Self {
        Vertex {
            location,
            ..Self::new()
        }
    }

    pub fn with_bulge(mut self, bulge: f64) -> Self {
        self.bulge = bulge;
        self
    }

    fn subclass_markers(&self) -> &'static [&'static str] {
        let polyface = vertex_flags::POLYFACE_MESH_VERTEX;
        let mesh = vertex_flags::POLYGON_MESH_VERTEX;
        if self.flags & polyface != 0 && self.flags & mesh != 0 {
            &["AcDbVertex", "AcDbPolyFaceMeshVertex"]
        } else if self.flags & polyface != 0 {
            &["AcDbFaceRecord"]
        } else if self.flags & mesh != 0 {
            &["AcDbVertex", "AcDbPolygonMeshVertex"]
        } else if self.flags & vertex_flags::POLYLINE_3D_VERTEX != 0 {
            &["AcDbVertex", "AcDb3dPolylineVertex"]
        } else {
            &["AcDbVertex", "AcDb2dVertex"]
        }
    }

    pub(crate) fn try_set_pair(&mut self, pair: &CodePair) -> bool {
        match pair.code {
            10 | 20 | 30 => return set_point_component(&mut self.location, 10, pair),
            40 => self.start_width = pair.double_value(),
            41 => self.end_width = pair.double_value(),
            42 => self.bulge = pair.double_value(),
            70 => self.flags = pair.short_value(),
            50 => self.curve_fit_tangent_direction = pair.double_value(),
            71..=74 => self.face_indices[(pair.code - 71) as usize] = pair.short_value(),
            91 => self.identifier = pair.integer_value(),
            _ => return false,
        }
        true
    }

    pub(crate) fn add_value_pairs(&self, pairs: &mut Vec<CodePair>, version: DxfVersion) {
        if version.has_object_model() {
            for marker in self.subclass_markers() {
                pairs.push(CodePair::string(100, *marker));
            }
        }
        push_point(pairs, 10, &self.location);
        if self.start_width != 0.0 {
            pairs.push(CodePair::double(40, self.start_width));
        }
        if self.end_width != 0.0 {
            pairs.push(CodePair::double(41, self.end_width));
        }
        if self.bulge != 0.0 {
            pairs.push(CodePair::double(42, self.bulge));
        }
        pairs.push(CodePair::short(70, self.flags));
        if self.flags & vertex_flags::CURVE_FIT_TANGENT != 0 {
            pairs.push(CodePair::double(50, self.curve_fit_tangent_direction));
        }
        if self.flags & vertex_flags::POLYFACE_MESH_VERTEX != 0 {
            for (index, value) in self.face_indices.iter().enumerate() {
                if *value != 0 {
                    pairs.push(CodePair::short(71 + index as i32, *value));
                }
            }
        }
        if self.identifier != 0 && version >= DxfVersion::AC1024 {
            pairs.push(CodePair::integer(91, self.identifier));
        }
    }
}

impl Default for Vertex {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_polyline_marker_follows_flags() {
        let mut polyline = Polyline::new();
        let mut pairs = Vec::new();
        polyline.add_value_pairs(&mut pairs, DxfVersion::AC1015);
        assert_eq!(pairs[0], CodePair::string(100, "AcDb2dPolyline"));

        polyline.flags = polyline_flags::POLYLINE_3D;
        pairs.clear();
        polyline.add_value_pairs(&mut pairs, DxfVersion::AC1015);
        assert_eq!(pairs[0], CodePair::string(100, "AcDb3dPolyline"));
    }

    #[test]
    fn test_vertex_reads_bulge_and_faces() {
        let mut vertex = Vertex::new();
        assert!(vertex.try_set_pair(&CodePair::double(42, 1.0)));
        assert!(vertex.try_set_pair(&CodePair::short(72, 3)));
        assert_eq!(vertex.bulge, 1.0);
        assert_eq!(vertex.face_indices, [0, 3, 0, 0]);
        assert!(!vertex.try_set_pair(&CodePair::string(2, "x")));
    }
}
