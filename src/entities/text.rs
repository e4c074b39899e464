//! Single-line text entity

use crate::io::dxf::CodePair;
use crate::record::{push_normal, push_point, set_point_component};
use crate::types::{DxfVersion, Vector3};

#[derive(Debug, Clone, PartialEq)]
pub struct Text {
    pub value: String,
    pub location: Vector3,
    /// Used when the text is not left/baseline justified
    pub second_alignment_point: Vector3,
    pub height: f64,
    pub rotation: f64,
    pub relative_x_scale: f64,
    pub oblique_angle: f64,
    pub style: String,
    pub generation_flags: i16,
    pub horizontal_justification: i16,
    pub vertical_justification: i16,
    pub thickness: f64,
    pub normal: Vector3,
}

impl Text {
    pub fn new() -> Self {
        Text {
            value: String::new(),
            location: Vector3::ZERO,
            second_alignment_point: Vector3::ZERO,
            height: 1.0,
            rotation: 0.0,
            relative_x_scale: 1.0,
            oblique_angle: 0.0,
            style: "STANDARD".to_string(),
            generation_flags: 0,
            horizontal_justification: 0,
            vertical_justification: 0,
            thickness: 0.0,
            normal: Vector3::UNIT_Z,
        }
    }

    pub fn with_value(value: impl Into<String>, location: Vector3, height: f64) -> Self {
        Text {
            value: value.into(),
            location,
            height,
            ..Self::new()
        }
    }

    pub(crate) fn try_set_pair(&mut self, pair: &CodePair) -> bool {
        match pair.code {
            10 | 20 | 30 => return set_point_component(&mut self.location, 10, pair),
            11 | 21 | 31 => return set_point_component(&mut self.second_alignment_point, 11, pair),
            210 | 220 | 230 => return set_point_component(&mut self.normal, 210, pair),
            1 => self.value = pair.string_value(),
            7 => self.style = pair.string_value(),
            39 => self.thickness = pair.double_value(),
            40 => self.height = pair.double_value(),
            41 => self.relative_x_scale = pair.double_value(),
            50 => self.rotation = pair.double_value(),
            51 => self.oblique_angle = pair.double_value(),
            71 => self.generation_flags = pair.short_value(),
            72 => self.horizontal_justification = pair.short_value(),
            73 => self.vertical_justification = pair.short_value(),
            _ => return false,
        }
        true
    }

    pub(crate) fn add_value_pairs(&self, pairs: &mut Vec<CodePair>, version: DxfVersion) {
        if version.has_object_model() {
            pairs.push(CodePair::string(100, "AcDbText"));
        }
        add_text_body_pairs(self, pairs);
        if version.has_object_model() {
            pairs.push(CodePair::string(100, "AcDbText"));
        }
        if self.vertical_justification != 0 {
            pairs.push(CodePair::short(73, self.vertical_justification));
        }
    }
}

impl Default for Text {
    fn default() -> Self {
        Self::new()
    }
}

/// Pairs of the first `AcDbText` subclass, shared with attributes.
pub(super) fn add_text_body_pairs(text: &Text, pairs: &mut Vec<CodePair>) {
    if text.thickness != 0.0 {
        pairs.push(CodePair::double(39, text.thickness));
    }
    push_point(pairs, 10, &text.location);
    pairs.push(CodePair::double(40, text.height));
    pairs.push(CodePair::string(1, text.value.clone()));
    if text.rotation != 0.0 {
        pairs.push(CodePair::double(50, text.rotation));
    }
    if text.relative_x_scale != 1.0 {
        pairs.push(CodePair::double(41, text.relative_x_scale));
    }
    if text.oblique_angle != 0.0 {
        pairs.push(CodePair::double(51, text.oblique_angle));
    }
    if !text.style.eq_ignore_ascii_case("STANDARD") {
        pairs.push(CodePair::string(7, text.style.clone()));
    }
    if text.generation_flags != 0 {
        pairs.push(CodePair::short(71, text.generation_flags));
    }
    if text.horizontal_justification != 0 {
        pairs.push(CodePair::short(72, text.horizontal_justification));
    }
    if text.horizontal_justification != 0 || text.vertical_justification != 0 {
        push_point(pairs, 11, &text.second_alignment_point);
    }
    push_normal(pairs, 210, &text.normal);
}
