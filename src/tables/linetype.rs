//! Line type table entry

use crate::io::dxf::CodePair;
use crate::item::Pointer;
use crate::record::{push_handle, short_count};
use crate::types::{DxfVersion, Vector2};

/// One dash, dot, gap, shape or text of a line type pattern.
///
/// In the file each element starts with its `49` length; the codes up to
/// the next `49` belong to it.
#[derive(Debug, Clone, PartialEq)]
pub struct LineTypeElement {
    /// Positive for a dash, negative for a gap, 0 for a dot
    pub length: f64,
    /// Complex element flags (code 74)
    pub flags: i16,
    pub shape_number: i16,
    /// Text style or shape file (code 340)
    pub style: Pointer,
    pub scale: f64,
    pub rotation: f64,
    pub offset: Vector2,
    pub text: String,
}

impl LineTypeElement {
    pub fn new(length: f64) -> Self {
        LineTypeElement {
            length,
            flags: 0,
            shape_number: 0,
            style: Pointer::default(),
            scale: 1.0,
            rotation: 0.0,
            offset: Vector2::ZERO,
            text: String::new(),
        }
    }

    pub fn is_complex(&self) -> bool {
        self.flags & 6 != 0
    }

    fn try_set_pair(&mut self, pair: &CodePair) -> bool {
        match pair.code {
            74 => self.flags = pair.short_value(),
            75 => self.shape_number = pair.short_value(),
            340 => self.style = Pointer::new(pair.handle_value()),
            46 => self.scale = pair.double_value(),
            50 => self.rotation = pair.double_value(),
            44 => self.offset.x = pair.double_value(),
            45 => self.offset.y = pair.double_value(),
            9 => self.text = pair.string_value(),
            _ => return false,
        }
        true
    }

    fn add_value_pairs(&self, pairs: &mut Vec<CodePair>, version: DxfVersion) {
        pairs.push(CodePair::double(49, self.length));
        if !version.has_object_model() {
            return;
        }
        pairs.push(CodePair::short(74, self.flags));
        if self.is_complex() {
            pairs.push(CodePair::short(75, self.shape_number));
            push_handle(pairs, 340, self.style.handle);
            pairs.push(CodePair::double(46, self.scale));
            pairs.push(CodePair::double(50, self.rotation));
            pairs.push(CodePair::double(44, self.offset.x));
            pairs.push(CodePair::double(45, self.offset.y));
            if !self.text.is_empty() {
                pairs.push(CodePair::string(9, self.text.as_str()));
            }
        }
    }
}

/// A line type table entry
#[derive(Debug, Clone, PartialEq)]
pub struct LineType {
    pub description: String,
    pub elements: Vec<LineTypeElement>,
    /// Total pattern length as stored; see [`LineType::computed_length`]
    pub pattern_length: f64,
}

impl LineType {
    pub fn new() -> Self {
        LineType {
            description: String::new(),
            elements: Vec::new(),
            pattern_length: 0.0,
        }
    }

    pub fn continuous() -> Self {
        LineType {
            description: "Solid line".to_string(),
            ..Self::new()
        }
    }

    /// Sum of the absolute element lengths.
    pub fn computed_length(&self) -> f64 {
        self.elements.iter().map(|e| e.length.abs()).sum()
    }

    pub(crate) fn try_set_pair(&mut self, pair: &CodePair) -> bool {
        match pair.code {
            3 => self.description = pair.string_value(),
            // alignment is always 'A'; element count follows from the list
            72 | 73 => {}
            40 => self.pattern_length = pair.double_value(),
            49 => self.elements.push(LineTypeElement::new(pair.double_value())),
            _ => {
                return self
                    .elements
                    .last_mut()
                    .is_some_and(|element| element.try_set_pair(pair))
            }
        }
        true
    }

    pub(crate) fn add_value_pairs(&self, pairs: &mut Vec<CodePair>, version: DxfVersion) {
        pairs.push(CodePair::string(3, self.description.as_str()));
        pairs.push(CodePair::short(72, i16::from(b'A')));
        pairs.push(CodePair::short(73, short_count(self.elements.len())));
        pairs.push(CodePair::double(40, self.pattern_length));
        for element in &self.elements {
            element.add_value_pairs(pairs, version);
        }
    }
}

impl Default for LineType {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Handle;

    #[test]
    fn test_element_codes_follow_their_length() {
        let mut line_type = LineType::new();
        for pair in [
            CodePair::string(3, "Dash dot __ . __"),
            CodePair::short(73, 2),
            CodePair::double(40, 1.0),
            CodePair::double(49, 0.75),
            CodePair::short(74, 0),
            CodePair::double(49, -0.25),
            CodePair::short(74, 2),
            CodePair::string(340, "11"),
            CodePair::string(9, "GAS"),
        ] {
            assert!(line_type.try_set_pair(&pair), "unclaimed {}", pair);
        }
        assert_eq!(line_type.elements.len(), 2);
        assert_eq!(line_type.elements[1].style.handle, Handle::new(0x11));
        assert_eq!(line_type.elements[1].text, "GAS");
        assert_eq!(line_type.computed_length(), 1.0);
    }

    #[test]
    fn test_element_code_without_element_is_unclaimed() {
        let mut line_type = LineType::new();
        assert!(!line_type.try_set_pair(&CodePair::short(74, 0)));
    }
}
