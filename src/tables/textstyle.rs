//! Text style table entry

use bitflags::bitflags;

use crate::io::dxf::CodePair;
use crate::types::DxfVersion;

bitflags! {
    /// Text generation flags (code 71)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct TextGenerationFlags: i16 {
        /// Mirrored in X
        const BACKWARD = 2;
        /// Mirrored in Y
        const UPSIDE_DOWN = 4;
    }
}

/// A text style table entry
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    /// Fixed text height (0 = variable)
    pub height: f64,
    pub width_factor: f64,
    /// Oblique angle in degrees
    pub oblique_angle: f64,
    pub generation_flags: TextGenerationFlags,
    pub last_height: f64,
    /// Primary font file name
    pub font_file: String,
    /// Big font file name (for Asian languages)
    pub big_font_file: String,
}

impl TextStyle {
    pub fn new() -> Self {
        TextStyle {
            height: 0.0,
            width_factor: 1.0,
            oblique_angle: 0.0,
            generation_flags: TextGenerationFlags::empty(),
            last_height: 0.2,
            font_file: "txt".to_string(),
            big_font_file: String::new(),
        }
    }

    pub(crate) fn try_set_pair(&mut self, pair: &CodePair) -> bool {
        match pair.code {
            40 => self.height = pair.double_value(),
            41 => self.width_factor = pair.double_value(),
            50 => self.oblique_angle = pair.double_value(),
            71 => self.generation_flags = TextGenerationFlags::from_bits_retain(pair.short_value()),
            42 => self.last_height = pair.double_value(),
            3 => self.font_file = pair.string_value(),
            4 => self.big_font_file = pair.string_value(),
            _ => return false,
        }
        true
    }

    pub(crate) fn add_value_pairs(&self, pairs: &mut Vec<CodePair>, _version: DxfVersion) {
        pairs.push(CodePair::double(40, self.height));
        pairs.push(CodePair::double(41, self.width_factor));
        pairs.push(CodePair::double(50, self.oblique_angle));
        pairs.push(CodePair::short(71, self.generation_flags.bits()));
        pairs.push(CodePair::double(42, self.last_height));
        pairs.push(CodePair::string(3, self.font_file.as_str()));
        pairs.push(CodePair::string(4, self.big_font_file.as_str()));
    }
}

impl Default for TextStyle {
    fn default() -> Self {
        Self::new()
    }
}
