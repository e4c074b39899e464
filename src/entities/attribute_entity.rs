//! Block attribute (ATTRIB) entity

use super::text::{add_text_body_pairs, Text};
use crate::io::dxf::CodePair;
use crate::record::{push_point, set_point_component};
use crate::types::{DxfVersion, Vector3};

/// Multiline text embedded in an attribute (AutoCAD 2018 and later).
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeMText {
    pub insertion_point: Vector3,
    pub height: f64,
    pub reference_width: f64,
    pub attachment_point: i16,
    pub drawing_direction: i16,
    pub text: String,
    pub style: String,
    pub x_axis_direction: Vector3,
    pub rotation: f64,
}

impl Default for AttributeMText {
    fn default() -> Self {
        AttributeMText {
            insertion_point: Vector3::ZERO,
            height: 1.0,
            reference_width: 0.0,
            attachment_point: 1,
            drawing_direction: 1,
            text: String::new(),
            style: "STANDARD".to_string(),
            x_axis_direction: Vector3::UNIT_X,
            rotation: 0.0,
        }
    }
}

impl AttributeMText {
    fn try_set_pair(&mut self, pair: &CodePair) -> bool {
        match pair.code {
            10 | 20 | 30 => return set_point_component(&mut self.insertion_point, 10, pair),
            11 | 21 | 31 => return set_point_component(&mut self.x_axis_direction, 11, pair),
            40 => self.height = pair.double_value(),
            41 => self.reference_width = pair.double_value(),
            71 => self.attachment_point = pair.short_value(),
            72 => self.drawing_direction = pair.short_value(),
            // text longer than 250 characters arrives in 3 chunks before the final 1
            1 | 3 => self.text.push_str(pair.as_str().unwrap_or_default()),
            7 => self.style = pair.string_value(),
            50 => self.rotation = pair.double_value(),
            _ => return false,
        }
        true
    }

    fn add_value_pairs(&self, pairs: &mut Vec<CodePair>) {
        pairs.push(CodePair::string(101, "Embedded Object"));
        push_point(pairs, 10, &self.insertion_point);
        pairs.push(CodePair::double(40, self.height));
        pairs.push(CodePair::double(41, self.reference_width));
        pairs.push(CodePair::short(71, self.attachment_point));
        pairs.push(CodePair::short(72, self.drawing_direction));
        let chars: Vec<char> = self.text.chars().collect();
        let mut chunks = chars.chunks(250).peekable();
        if chunks.peek().is_none() {
            pairs.push(CodePair::string(1, ""));
        }
        while let Some(chunk) = chunks.next() {
            let code = if chunks.peek().is_some() { 3 } else { 1 };
            pairs.push(CodePair::string(code, chunk.iter().collect::<String>()));
        }
        pairs.push(CodePair::string(7, self.style.clone()));
        push_point(pairs, 11, &self.x_axis_direction);
        if self.rotation != 0.0 {
            pairs.push(CodePair::double(50, self.rotation));
        }
    }
}

/// An attribute value attached to an INSERT.
///
/// Text fields come first in the record; after an `AcDbMText` (or
/// `Embedded Object`) marker the same codes describe the embedded
/// multiline text instead.
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub text: Text,
    pub tag: String,
    pub flags: i16,
    pub field_length: i16,
    pub is_locked_position: bool,
    pub m_text: Option<AttributeMText>,
}

impl Attribute {
    pub fn new() -> Self {
        Attribute {
            text: Text::new(),
            tag: String::new(),
            flags: 0,
            field_length: 0,
            is_locked_position: false,
            m_text: None,
        }
    }

    pub fn with_tag(tag: impl Into<String>, value: impl Into<String>) -> Self {
        let mut attribute = Self::new();
        attribute.tag = tag.into();
        attribute.text.value = value.into();
        attribute
    }

    pub(crate) fn try_set_pair(&mut self, pair: &CodePair, subclass: Option<&str>) -> bool {
        match subclass {
            Some("AcDbMText") | Some("Embedded Object") => {
                return self
                    .m_text
                    .get_or_insert_with(AttributeMText::default)
                    .try_set_pair(pair);
            }
            Some("AcDbAttribute") => match pair.code {
                2 => self.tag = pair.string_value(),
                70 => self.flags = pair.short_value(),
                73 => self.field_length = pair.short_value(),
                74 => self.text.vertical_justification = pair.short_value(),
                280 => self.is_locked_position = pair.short_value() != 0,
                _ => return self.text.try_set_pair(pair),
            },
            _ => match pair.code {
                2 => self.tag = pair.string_value(),
                70 => self.flags = pair.short_value(),
                // without markers (R12) 74 is the vertical justification
                74 => self.text.vertical_justification = pair.short_value(),
                73 => self.field_length = pair.short_value(),
                _ => return self.text.try_set_pair(pair),
            },
        }
        true
    }

    pub(crate) fn add_value_pairs(&self, pairs: &mut Vec<CodePair>, version: DxfVersion) {
        if version.has_object_model() {
            pairs.push(CodePair::string(100, "AcDbText"));
        }
        add_text_body_pairs(&self.text, pairs);
        if version.has_object_model() {
            pairs.push(CodePair::string(100, "AcDbAttribute"));
        }
        pairs.push(CodePair::string(2, self.tag.clone()));
        pairs.push(CodePair::short(70, self.flags));
        if self.field_length != 0 {
            pairs.push(CodePair::short(73, self.field_length));
        }
        if self.text.vertical_justification != 0 {
            pairs.push(CodePair::short(74, self.text.vertical_justification));
        }
        if version >= DxfVersion::AC1024 && self.is_locked_position {
            pairs.push(CodePair::short(280, 1));
        }
        if version >= DxfVersion::AC1032 {
            if let Some(m_text) = &self.m_text {
                m_text.add_value_pairs(pairs);
            }
        }
    }
}

impl Default for Attribute {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fields_route_by_marker() {
        let mut attribute = Attribute::new();
        assert!(attribute.try_set_pair(&CodePair::double(10, 1.0), Some("AcDbText")));
        assert!(attribute.try_set_pair(&CodePair::string(1, "value"), Some("AcDbText")));
        assert!(attribute.try_set_pair(&CodePair::string(2, "TAG"), Some("AcDbAttribute")));
        assert!(attribute.try_set_pair(&CodePair::double(10, 5.0), Some("AcDbMText")));
        assert!(attribute.try_set_pair(&CodePair::double(40, 2.5), Some("AcDbMText")));
        assert!(attribute.try_set_pair(&CodePair::string(1, "multi"), Some("AcDbMText")));

        assert_eq!(attribute.text.location.x, 1.0);
        assert_eq!(attribute.text.value, "value");
        assert_eq!(attribute.tag, "TAG");
        let m_text = attribute.m_text.as_ref().unwrap();
        assert_eq!(m_text.insertion_point.x, 5.0);
        assert_eq!(m_text.height, 2.5);
        assert_eq!(m_text.text, "multi");
    }

    #[test]
    fn test_embedded_text_written_for_2018_only() {
        let mut attribute = Attribute::with_tag("TAG", "v");
        attribute.m_text = Some(AttributeMText::default());
        let mut pairs = Vec::new();
        attribute.add_value_pairs(&mut pairs, DxfVersion::AC1027);
        assert!(!pairs.iter().any(|p| p.code == 101));
        pairs.clear();
        attribute.add_value_pairs(&mut pairs, DxfVersion::AC1032);
        assert!(pairs.contains(&CodePair::string(101, "Embedded Object")));
    }
}
