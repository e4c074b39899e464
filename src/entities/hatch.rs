//! HATCH entity
//!
//! A hatch reuses the same codes in several nested contexts (boundary paths,
//! their edges, pattern definition lines, seed points). Reading keeps a small
//! mode machine in [`HatchReadState`]: the innermost open sub-record is offered
//! each pair first and, if it declines, the pair falls through to the main
//! hatch fields, which may switch the mode.

use crate::io::dxf::CodePair;
use crate::item::Pointer;
use crate::record::{integer_count, push_handle, push_point, push_point2, set_point_component, short_count};
use crate::types::{DxfVersion, Handle, Vector2, Vector3};

/// Boundary path flag bits (code 92)
pub mod boundary_path_flags {
    pub const EXTERNAL: i32 = 1;
    pub const POLYLINE: i32 = 2;
    pub const DERIVED: i32 = 4;
    pub const TEXTBOX: i32 = 8;
    pub const OUTERMOST: i32 = 16;
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PolylineBoundaryVertex {
    pub location: Vector2,
    pub bulge: f64,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PolylineBoundary {
    pub has_bulge: bool,
    pub is_closed: bool,
    pub vertices: Vec<PolylineBoundaryVertex>,
}

/// One edge of a non-polyline boundary path.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundaryEdge {
    Line {
        start: Vector2,
        end: Vector2,
    },
    CircularArc {
        center: Vector2,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
        counter_clockwise: bool,
    },
    EllipticArc {
        center: Vector2,
        major_axis: Vector2,
        minor_axis_ratio: f64,
        start_angle: f64,
        end_angle: f64,
        counter_clockwise: bool,
    },
    Spline {
        degree: i32,
        rational: bool,
        periodic: bool,
        knots: Vec<f64>,
        control_points: Vec<Vector2>,
        weights: Vec<f64>,
        fit_points: Vec<Vector2>,
        start_tangent: Vector2,
        end_tangent: Vector2,
    },
}

impl BoundaryEdge {
    fn from_type_code(code: i16) -> Option<Self> {
        match code {
            1 => Some(BoundaryEdge::Line {
                start: Vector2::ZERO,
                end: Vector2::ZERO,
            }),
            2 => Some(BoundaryEdge::CircularArc {
                center: Vector2::ZERO,
                radius: 0.0,
                start_angle: 0.0,
                end_angle: 360.0,
                counter_clockwise: true,
            }),
            3 => Some(BoundaryEdge::EllipticArc {
                center: Vector2::ZERO,
                major_axis: Vector2::new(1.0, 0.0),
                minor_axis_ratio: 1.0,
                start_angle: 0.0,
                end_angle: 360.0,
                counter_clockwise: true,
            }),
            4 => Some(BoundaryEdge::Spline {
                degree: 3,
                rational: false,
                periodic: false,
                knots: Vec::new(),
                control_points: Vec::new(),
                weights: Vec::new(),
                fit_points: Vec::new(),
                start_tangent: Vector2::ZERO,
                end_tangent: Vector2::ZERO,
            }),
            _ => None,
        }
    }

    fn type_code(&self) -> i16 {
        match self {
            BoundaryEdge::Line { .. } => 1,
            BoundaryEdge::CircularArc { .. } => 2,
            BoundaryEdge::EllipticArc { .. } => 3,
            BoundaryEdge::Spline { .. } => 4,
        }
    }

    fn try_set_pair(&mut self, pair: &CodePair) -> bool {
        let value = pair.double_value();
        match self {
            BoundaryEdge::Line { start, end } => match pair.code {
                10 => start.x = value,
                20 => start.y = value,
                11 => end.x = value,
                21 => end.y = value,
                _ => return false,
            },
            BoundaryEdge::CircularArc {
                center,
                radius,
                start_angle,
                end_angle,
                counter_clockwise,
            } => match pair.code {
                10 => center.x = value,
                20 => center.y = value,
                40 => *radius = value,
                50 => *start_angle = value,
                51 => *end_angle = value,
                73 => *counter_clockwise = pair.bool_value(),
                _ => return false,
            },
            BoundaryEdge::EllipticArc {
                center,
                major_axis,
                minor_axis_ratio,
                start_angle,
                end_angle,
                counter_clockwise,
            } => match pair.code {
                10 => center.x = value,
                20 => center.y = value,
                11 => major_axis.x = value,
                21 => major_axis.y = value,
                40 => *minor_axis_ratio = value,
                50 => *start_angle = value,
                51 => *end_angle = value,
                73 => *counter_clockwise = pair.bool_value(),
                _ => return false,
            },
            BoundaryEdge::Spline {
                degree,
                rational,
                periodic,
                knots,
                control_points,
                weights,
                fit_points,
                start_tangent,
                end_tangent,
            } => match pair.code {
                94 => *degree = pair.integer_value(),
                73 => *rational = pair.bool_value(),
                74 => *periodic = pair.bool_value(),
                // knot, control and fit counts
                95 | 96 | 97 => {}
                40 => knots.push(value),
                10 => control_points.push(Vector2::new(value, 0.0)),
                20 => match control_points.last_mut() {
                    Some(point) => point.y = value,
                    None => return false,
                },
                42 => weights.push(value),
                11 => fit_points.push(Vector2::new(value, 0.0)),
                21 => match fit_points.last_mut() {
                    Some(point) => point.y = value,
                    None => return false,
                },
                12 => start_tangent.x = value,
                22 => start_tangent.y = value,
                13 => end_tangent.x = value,
                23 => end_tangent.y = value,
                _ => return false,
            },
        }
        true
    }

    fn add_value_pairs(&self, pairs: &mut Vec<CodePair>) {
        pairs.push(CodePair::short(72, self.type_code()));
        match self {
            BoundaryEdge::Line { start, end } => {
                push_point2(pairs, 10, start);
                push_point2(pairs, 11, end);
            }
            BoundaryEdge::CircularArc {
                center,
                radius,
                start_angle,
                end_angle,
                counter_clockwise,
            } => {
                push_point2(pairs, 10, center);
                pairs.push(CodePair::double(40, *radius));
                pairs.push(CodePair::double(50, *start_angle));
                pairs.push(CodePair::double(51, *end_angle));
                pairs.push(CodePair::short(73, *counter_clockwise as i16));
            }
            BoundaryEdge::EllipticArc {
                center,
                major_axis,
                minor_axis_ratio,
                start_angle,
                end_angle,
                counter_clockwise,
            } => {
                push_point2(pairs, 10, center);
                push_point2(pairs, 11, major_axis);
                pairs.push(CodePair::double(40, *minor_axis_ratio));
                pairs.push(CodePair::double(50, *start_angle));
                pairs.push(CodePair::double(51, *end_angle));
                pairs.push(CodePair::short(73, *counter_clockwise as i16));
            }
            BoundaryEdge::Spline {
                degree,
                rational,
                periodic,
                knots,
                control_points,
                weights,
                fit_points,
                start_tangent,
                end_tangent,
            } => {
                pairs.push(CodePair::integer(94, *degree));
                pairs.push(CodePair::short(73, *rational as i16));
                pairs.push(CodePair::short(74, *periodic as i16));
                pairs.push(CodePair::integer(95, integer_count(knots.len())));
                pairs.push(CodePair::integer(96, integer_count(control_points.len())));
                for knot in knots {
                    pairs.push(CodePair::double(40, *knot));
                }
                for (index, point) in control_points.iter().enumerate() {
                    push_point2(pairs, 10, point);
                    if let Some(weight) = weights.get(index) {
                        pairs.push(CodePair::double(42, *weight));
                    }
                }
                if !fit_points.is_empty() {
                    pairs.push(CodePair::integer(97, integer_count(fit_points.len())));
                    for point in fit_points {
                        push_point2(pairs, 11, point);
                    }
                    push_point2(pairs, 12, start_tangent);
                    push_point2(pairs, 13, end_tangent);
                }
            }
        }
    }
}

/// A closed loop bounding the hatch: either a polyline or a list of edges.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BoundaryPath {
    pub flags: i32,
    pub polyline: Option<PolylineBoundary>,
    pub edges: Vec<BoundaryEdge>,
    /// Entities this path was derived from (code 330)
    pub source_boundaries: Vec<Pointer>,
}

impl BoundaryPath {
    pub fn new(flags: i32) -> Self {
        BoundaryPath {
            flags,
            polyline: (flags & boundary_path_flags::POLYLINE != 0).then(PolylineBoundary::default),
            edges: Vec::new(),
            source_boundaries: Vec::new(),
        }
    }

    pub fn is_polyline(&self) -> bool {
        self.polyline.is_some()
    }

    pub fn is_external(&self) -> bool {
        self.flags & boundary_path_flags::EXTERNAL != 0
    }

    pub fn is_derived(&self) -> bool {
        self.flags & boundary_path_flags::DERIVED != 0
    }

    pub fn is_textbox(&self) -> bool {
        self.flags & boundary_path_flags::TEXTBOX != 0
    }

    pub fn is_outermost(&self) -> bool {
        self.flags & boundary_path_flags::OUTERMOST != 0
    }

    fn try_set_pair(&mut self, pair: &CodePair) -> bool {
        match pair.code {
            // edge and source counts; implied by the lists
            93 | 97 => return true,
            330 => {
                self.source_boundaries.push(Pointer::new(pair.handle_value()));
                return true;
            }
            _ => {}
        }
        if let Some(polyline) = self.polyline.as_mut() {
            match pair.code {
                72 => polyline.has_bulge = pair.bool_value(),
                73 => polyline.is_closed = pair.bool_value(),
                10 => polyline.vertices.push(PolylineBoundaryVertex {
                    location: Vector2::new(pair.double_value(), 0.0),
                    bulge: 0.0,
                }),
                20 | 42 => {
                    let Some(vertex) = polyline.vertices.last_mut() else {
                        return false;
                    };
                    if pair.code == 20 {
                        vertex.location.y = pair.double_value();
                    } else {
                        vertex.bulge = pair.double_value();
                    }
                }
                _ => return false,
            }
            return true;
        }
        if pair.code == 72 {
            return match BoundaryEdge::from_type_code(pair.short_value()) {
                Some(edge) => {
                    self.edges.push(edge);
                    true
                }
                None => false,
            };
        }
        match self.edges.last_mut() {
            Some(edge) => edge.try_set_pair(pair),
            None => false,
        }
    }

    fn add_value_pairs(&self, pairs: &mut Vec<CodePair>) {
        pairs.push(CodePair::integer(92, self.flags));
        match &self.polyline {
            Some(polyline) => {
                pairs.push(CodePair::short(72, polyline.has_bulge as i16));
                pairs.push(CodePair::short(73, polyline.is_closed as i16));
                pairs.push(CodePair::integer(93, integer_count(polyline.vertices.len())));
                for vertex in &polyline.vertices {
                    push_point2(pairs, 10, &vertex.location);
                    if polyline.has_bulge {
                        pairs.push(CodePair::double(42, vertex.bulge));
                    }
                }
            }
            None => {
                pairs.push(CodePair::integer(93, integer_count(self.edges.len())));
                for edge in &self.edges {
                    edge.add_value_pairs(pairs);
                }
            }
        }
        pairs.push(CodePair::integer(97, integer_count(self.source_boundaries.len())));
        for pointer in &self.source_boundaries {
            push_handle(pairs, 330, pointer.handle);
        }
    }
}

/// One line family of a hatch pattern.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HatchPatternLine {
    pub angle: f64,
    pub base_point: Vector2,
    pub offset: Vector2,
    pub dash_lengths: Vec<f64>,
}

impl HatchPatternLine {
    fn try_set_pair(&mut self, pair: &CodePair) -> bool {
        match pair.code {
            43 => self.base_point.x = pair.double_value(),
            44 => self.base_point.y = pair.double_value(),
            45 => self.offset.x = pair.double_value(),
            46 => self.offset.y = pair.double_value(),
            79 => {}
            49 => self.dash_lengths.push(pair.double_value()),
            _ => return false,
        }
        true
    }

    fn add_value_pairs(&self, pairs: &mut Vec<CodePair>) {
        pairs.push(CodePair::double(53, self.angle));
        pairs.push(CodePair::double(43, self.base_point.x));
        pairs.push(CodePair::double(44, self.base_point.y));
        pairs.push(CodePair::double(45, self.offset.x));
        pairs.push(CodePair::double(46, self.offset.y));
        pairs.push(CodePair::short(79, short_count(self.dash_lengths.len())));
        for dash in &self.dash_lengths {
            pairs.push(CodePair::double(49, *dash));
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum HatchReadMode {
    #[default]
    Header,
    BoundaryPaths,
    PatternLines,
    SeedPoints,
}

#[derive(Debug, Default)]
pub struct HatchReadState {
    mode: HatchReadMode,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Hatch {
    pub elevation: f64,
    pub normal: Vector3,
    pub pattern_name: String,
    pub is_solid: bool,
    pub is_associative: bool,
    pub boundary_paths: Vec<BoundaryPath>,
    pub style: i16,
    pub pattern_type: i16,
    pub pattern_angle: f64,
    pub pattern_scale: f64,
    pub is_double: bool,
    pub pattern_lines: Vec<HatchPatternLine>,
    pub pixel_size: f64,
    pub seed_points: Vec<Vector2>,
}

impl Hatch {
    pub fn new() -> Self {
        Hatch {
            elevation: 0.0,
            normal: Vector3::UNIT_Z,
            pattern_name: String::from("SOLID"),
            is_solid: true,
            is_associative: false,
            boundary_paths: Vec::new(),
            style: 0,
            pattern_type: 1,
            pattern_angle: 0.0,
            pattern_scale: 1.0,
            is_double: false,
            pattern_lines: Vec::new(),
            pixel_size: 0.0,
            seed_points: Vec::new(),
        }
    }

    pub(crate) fn try_set_pair(&mut self, pair: &CodePair, state: &mut HatchReadState) -> bool {
        match state.mode {
            HatchReadMode::Header => {}
            HatchReadMode::BoundaryPaths => {
                if pair.code == 92 {
                    self.boundary_paths.push(BoundaryPath::new(pair.integer_value()));
                    return true;
                }
                if let Some(path) = self.boundary_paths.last_mut() {
                    if path.try_set_pair(pair) {
                        return true;
                    }
                }
            }
            HatchReadMode::PatternLines => {
                if pair.code == 53 {
                    self.pattern_lines.push(HatchPatternLine {
                        angle: pair.double_value(),
                        ..Default::default()
                    });
                    return true;
                }
                if let Some(line) = self.pattern_lines.last_mut() {
                    if line.try_set_pair(pair) {
                        return true;
                    }
                }
            }
            HatchReadMode::SeedPoints => match pair.code {
                10 => {
                    self.seed_points.push(Vector2::new(pair.double_value(), 0.0));
                    return true;
                }
                20 => {
                    if let Some(point) = self.seed_points.last_mut() {
                        point.y = pair.double_value();
                        return true;
                    }
                }
                _ => {}
            },
        }
        self.try_set_main_pair(pair, state)
    }

    fn try_set_main_pair(&mut self, pair: &CodePair, state: &mut HatchReadState) -> bool {
        match pair.code {
            // elevation point; only Z is meaningful
            10 | 20 if state.mode == HatchReadMode::Header => {}
            30 if state.mode == HatchReadMode::Header => self.elevation = pair.double_value(),
            210 | 220 | 230 => return set_point_component(&mut self.normal, 210, pair),
            2 => self.pattern_name = pair.string_value(),
            70 => self.is_solid = pair.bool_value(),
            71 => self.is_associative = pair.bool_value(),
            91 => state.mode = HatchReadMode::BoundaryPaths,
            75 => self.style = pair.short_value(),
            76 => self.pattern_type = pair.short_value(),
            52 => self.pattern_angle = pair.double_value(),
            41 => self.pattern_scale = pair.double_value(),
            77 => self.is_double = pair.bool_value(),
            78 => state.mode = HatchReadMode::PatternLines,
            47 => self.pixel_size = pair.double_value(),
            98 => state.mode = HatchReadMode::SeedPoints,
            _ => return false,
        }
        true
    }

    pub(crate) fn add_value_pairs(&self, pairs: &mut Vec<CodePair>, version: DxfVersion) {
        if version.has_object_model() {
            pairs.push(CodePair::string(100, "AcDbHatch"));
        }
        push_point(pairs, 10, &Vector3::new(0.0, 0.0, self.elevation));
        push_point(pairs, 210, &self.normal);
        pairs.push(CodePair::string(2, self.pattern_name.as_str()));
        pairs.push(CodePair::short(70, self.is_solid as i16));
        pairs.push(CodePair::short(71, self.is_associative as i16));
        pairs.push(CodePair::integer(91, integer_count(self.boundary_paths.len())));
        for path in &self.boundary_paths {
            path.add_value_pairs(pairs);
        }
        pairs.push(CodePair::short(75, self.style));
        pairs.push(CodePair::short(76, self.pattern_type));
        if !self.is_solid {
            pairs.push(CodePair::double(52, self.pattern_angle));
            pairs.push(CodePair::double(41, self.pattern_scale));
            pairs.push(CodePair::short(77, self.is_double as i16));
            pairs.push(CodePair::short(78, short_count(self.pattern_lines.len())));
            for line in &self.pattern_lines {
                line.add_value_pairs(pairs);
            }
        }
        if self.pixel_size != 0.0 {
            pairs.push(CodePair::double(47, self.pixel_size));
        }
        pairs.push(CodePair::integer(98, integer_count(self.seed_points.len())));
        for seed in &self.seed_points {
            push_point2(pairs, 10, seed);
        }
    }

    /// Source boundary handles of all paths, in order.
    pub fn source_boundary_handles(&self) -> Vec<Handle> {
        self.boundary_paths
            .iter()
            .flat_map(|path| path.source_boundaries.iter().map(|p| p.handle))
            .collect()
    }
}

impl Default for Hatch {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read(pairs: &[CodePair]) -> Hatch {
        let mut hatch = Hatch::new();
        let mut state = HatchReadState::default();
        for pair in pairs {
            assert!(hatch.try_set_pair(pair, &mut state), "unclaimed {}", pair);
        }
        hatch
    }

    #[test]
    fn test_polyline_path_and_seeds() {
        let hatch = read(&[
            CodePair::double(30, 2.0),
            CodePair::string(2, "SOLID"),
            CodePair::short(70, 1),
            CodePair::integer(91, 1),
            CodePair::integer(92, 2),
            CodePair::short(72, 1),
            CodePair::short(73, 1),
            CodePair::integer(93, 2),
            CodePair::double(10, 0.0),
            CodePair::double(20, 0.0),
            CodePair::double(42, 0.5),
            CodePair::double(10, 1.0),
            CodePair::double(20, 1.0),
            CodePair::double(42, 0.0),
            CodePair::integer(97, 1),
            CodePair::string(330, "2A"),
            CodePair::short(75, 0),
            CodePair::short(76, 1),
            CodePair::integer(98, 1),
            CodePair::double(10, 5.0),
            CodePair::double(20, 6.0),
        ]);
        assert_eq!(hatch.elevation, 2.0);
        let path = &hatch.boundary_paths[0];
        let polyline = path.polyline.as_ref().unwrap();
        assert!(polyline.is_closed);
        assert_eq!(polyline.vertices.len(), 2);
        assert_eq!(polyline.vertices[0].bulge, 0.5);
        assert_eq!(hatch.source_boundary_handles(), vec![Handle::new(0x2A)]);
        assert_eq!(hatch.seed_points, vec![Vector2::new(5.0, 6.0)]);
    }

    #[test]
    fn test_edge_path_falls_back_to_main_fields() {
        let hatch = read(&[
            CodePair::short(70, 0),
            CodePair::integer(91, 1),
            CodePair::integer(92, 1),
            CodePair::integer(93, 2),
            CodePair::short(72, 1),
            CodePair::double(10, 0.0),
            CodePair::double(20, 0.0),
            CodePair::double(11, 1.0),
            CodePair::double(21, 0.0),
            CodePair::short(72, 2),
            CodePair::double(10, 1.0),
            CodePair::double(20, 1.0),
            CodePair::double(40, 0.5),
            CodePair::double(50, 0.0),
            CodePair::double(51, 90.0),
            CodePair::short(73, 1),
            CodePair::integer(97, 0),
            CodePair::short(75, 1),
            CodePair::short(76, 1),
            CodePair::double(52, 45.0),
            CodePair::double(41, 2.0),
            CodePair::short(77, 0),
            CodePair::short(78, 1),
            CodePair::double(53, 45.0),
            CodePair::double(43, 0.0),
            CodePair::double(44, 0.0),
            CodePair::double(45, -0.1),
            CodePair::double(46, 0.1),
            CodePair::short(79, 0),
            CodePair::integer(98, 0),
        ]);
        let path = &hatch.boundary_paths[0];
        assert_eq!(path.edges.len(), 2);
        assert!(matches!(path.edges[1], BoundaryEdge::CircularArc { radius, .. } if radius == 0.5));
        assert_eq!(hatch.style, 1);
        assert_eq!(hatch.pattern_angle, 45.0);
        assert_eq!(hatch.pattern_scale, 2.0);
        assert_eq!(hatch.pattern_lines.len(), 1);
        assert_eq!(hatch.pattern_lines[0].offset, Vector2::new(-0.1, 0.1));
    }

    #[test]
    fn test_written_pairs_read_back() {
        let mut hatch = Hatch::new();
        let mut path = BoundaryPath::new(boundary_path_flags::EXTERNAL);
        path.edges.push(BoundaryEdge::Line {
            start: Vector2::new(0.0, 0.0),
            end: Vector2::new(3.0, 0.0),
        });
        hatch.boundary_paths.push(path);
        hatch.seed_points.push(Vector2::new(1.0, 1.0));

        let mut pairs = Vec::new();
        hatch.add_value_pairs(&mut pairs, DxfVersion::AC1015);
        let reread = read(&pairs[1..]);
        assert_eq!(reread, hatch);
    }

    #[test]
    fn test_boundary_path_flag_accessors() {
        let path = BoundaryPath::new(
            boundary_path_flags::EXTERNAL
                | boundary_path_flags::POLYLINE
                | boundary_path_flags::OUTERMOST,
        );
        assert!(path.is_external());
        assert!(path.is_polyline());
        assert!(path.is_outermost());
        assert!(!path.is_derived());
        assert!(!path.is_textbox());

        let derived = BoundaryPath::new(boundary_path_flags::DERIVED | boundary_path_flags::TEXTBOX);
        assert!(derived.is_derived() && derived.is_textbox());
        assert!(!derived.is_polyline());
    }
}
