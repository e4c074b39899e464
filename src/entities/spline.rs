//! SPLINE entity

use crate::error::{DxfError, Result};
use crate::io::dxf::CodePair;
use crate::record::{push_normal, push_point, set_point_component, short_count};
use crate::types::{DxfVersion, Vector3};

/// Coordinates collected while reading; zipped into points afterwards.
#[derive(Debug, Default)]
pub struct SplineReadState {
    control_xs: Vec<f64>,
    control_ys: Vec<f64>,
    control_zs: Vec<f64>,
    fit_xs: Vec<f64>,
    fit_ys: Vec<f64>,
    fit_zs: Vec<f64>,
}

/// Zip parallel coordinate lists. A missing Z list means a planar set.
fn zip_points(what: &str, xs: Vec<f64>, ys: Vec<f64>, zs: Vec<f64>) -> Result<Vec<Vector3>> {
    if ys.len() != xs.len() || (!zs.is_empty() && zs.len() != xs.len()) {
        return Err(DxfError::invalid_record(
            "SPLINE",
            format!(
                "{} coordinate counts differ: {} x, {} y, {} z",
                what,
                xs.len(),
                ys.len(),
                zs.len()
            ),
        ));
    }
    Ok(xs
        .into_iter()
        .zip(ys)
        .enumerate()
        .map(|(i, (x, y))| Vector3::new(x, y, zs.get(i).copied().unwrap_or(0.0)))
        .collect())
}

#[derive(Debug, Clone, PartialEq)]
pub struct Spline {
    pub normal: Vector3,
    pub flags: i16,
    pub degree: i16,
    pub knot_tolerance: f64,
    pub control_point_tolerance: f64,
    pub fit_tolerance: f64,
    pub start_tangent: Vector3,
    pub end_tangent: Vector3,
    pub knots: Vec<f64>,
    pub weights: Vec<f64>,
    pub control_points: Vec<Vector3>,
    pub fit_points: Vec<Vector3>,
}

impl Spline {
    pub fn new() -> Self {
        Spline {
            normal: Vector3::UNIT_Z,
            flags: 0,
            degree: 3,
            knot_tolerance: 0.0000001,
            control_point_tolerance: 0.0000001,
            fit_tolerance: 0.0000000001,
            start_tangent: Vector3::ZERO,
            end_tangent: Vector3::ZERO,
            knots: Vec::new(),
            weights: Vec::new(),
            control_points: Vec::new(),
            fit_points: Vec::new(),
        }
    }

    pub fn is_closed(&self) -> bool {
        self.flags & 1 != 0
    }

    pub fn is_rational(&self) -> bool {
        self.flags & 4 != 0
    }

    pub(crate) fn try_set_pair(&mut self, pair: &CodePair, state: &mut SplineReadState) -> bool {
        match pair.code {
            210 | 220 | 230 => return set_point_component(&mut self.normal, 210, pair),
            12 | 22 | 32 => return set_point_component(&mut self.start_tangent, 12, pair),
            13 | 23 | 33 => return set_point_component(&mut self.end_tangent, 13, pair),
            70 => self.flags = pair.short_value(),
            71 => self.degree = pair.short_value(),
            // knot, control and fit counts; implied by the lists
            72 | 73 | 74 => {}
            42 => self.knot_tolerance = pair.double_value(),
            43 => self.control_point_tolerance = pair.double_value(),
            44 => self.fit_tolerance = pair.double_value(),
            40 => self.knots.push(pair.double_value()),
            41 => self.weights.push(pair.double_value()),
            10 => state.control_xs.push(pair.double_value()),
            20 => state.control_ys.push(pair.double_value()),
            30 => state.control_zs.push(pair.double_value()),
            11 => state.fit_xs.push(pair.double_value()),
            21 => state.fit_ys.push(pair.double_value()),
            31 => state.fit_zs.push(pair.double_value()),
            _ => return false,
        }
        true
    }

    pub(crate) fn after_read(&mut self, state: SplineReadState) -> Result<()> {
        self.control_points = zip_points("control point", state.control_xs, state.control_ys, state.control_zs)?;
        self.fit_points = zip_points("fit point", state.fit_xs, state.fit_ys, state.fit_zs)?;
        Ok(())
    }

    pub(crate) fn add_value_pairs(&self, pairs: &mut Vec<CodePair>, version: DxfVersion) {
        if version.has_object_model() {
            pairs.push(CodePair::string(100, "AcDbSpline"));
        }
        push_normal(pairs, 210, &self.normal);
        pairs.push(CodePair::short(70, self.flags));
        pairs.push(CodePair::short(71, self.degree));
        pairs.push(CodePair::short(72, short_count(self.knots.len())));
        pairs.push(CodePair::short(73, short_count(self.control_points.len())));
        pairs.push(CodePair::short(74, short_count(self.fit_points.len())));
        pairs.push(CodePair::double(42, self.knot_tolerance));
        pairs.push(CodePair::double(43, self.control_point_tolerance));
        pairs.push(CodePair::double(44, self.fit_tolerance));
        if self.start_tangent != Vector3::ZERO {
            push_point(pairs, 12, &self.start_tangent);
        }
        if self.end_tangent != Vector3::ZERO {
            push_point(pairs, 13, &self.end_tangent);
        }
        for knot in &self.knots {
            pairs.push(CodePair::double(40, *knot));
        }
        for weight in &self.weights {
            pairs.push(CodePair::double(41, *weight));
        }
        for point in &self.control_points {
            push_point(pairs, 10, point);
        }
        for point in &self.fit_points {
            push_point(pairs, 11, point);
        }
    }
}

impl Default for Spline {
    fn default() -> Self {
        Self::new()
    }
}
