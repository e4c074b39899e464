//! Dimension style table entry
//!
//! Only the commonly used DIMxxx variables are modeled; the rest stay in
//! the record's overflow pairs and are written back as read.

use crate::io::dxf::CodePair;
use crate::item::Pointer;
use crate::record::push_handle;
use crate::types::DxfVersion;

#[derive(Debug, Clone, PartialEq)]
pub struct DimStyle {
    /// DIMPOST (code 3)
    pub post: String,
    /// DIMAPOST (code 4)
    pub alternate_post: String,
    /// DIMBLK name, a Release 12 field (code 5)
    pub arrow_block: String,
    /// DIMSCALE (code 40)
    pub scale: f64,
    /// DIMASZ (code 41)
    pub arrow_size: f64,
    /// DIMEXO (code 42)
    pub extension_line_offset: f64,
    /// DIMDLI (code 43)
    pub dimension_line_increment: f64,
    /// DIMEXE (code 44)
    pub extension_line_extension: f64,
    /// DIMRND (code 45)
    pub rounding: f64,
    /// DIMDLE (code 46)
    pub dimension_line_extension: f64,
    /// DIMTXT (code 140)
    pub text_height: f64,
    /// DIMCEN (code 141)
    pub center_mark_size: f64,
    /// DIMTSZ (code 142)
    pub tick_size: f64,
    /// DIMLFAC (code 144)
    pub linear_scale_factor: f64,
    /// DIMGAP (code 147)
    pub text_gap: f64,
    /// DIMTOL (code 71)
    pub generate_tolerances: bool,
    /// DIMTIH (code 73)
    pub text_inside_horizontal: bool,
    /// DIMTOH (code 74)
    pub text_outside_horizontal: bool,
    /// DIMTAD (code 77)
    pub text_above_dimension_line: i16,
    /// DIMZIN (code 78)
    pub zero_suppression: i16,
    /// DIMALT (code 170)
    pub alternate_units: bool,
    /// DIMTOFL (code 172)
    pub force_line_inside: bool,
    /// DIMCLRD (code 176)
    pub dimension_line_color: i16,
    /// DIMCLRE (code 177)
    pub extension_line_color: i16,
    /// DIMCLRT (code 178)
    pub text_color: i16,
    /// DIMDEC (code 271)
    pub decimal_places: i16,
    /// DIMTXSTY (code 340)
    pub text_style: Pointer,
}

impl DimStyle {
    pub fn new() -> Self {
        DimStyle {
            post: String::new(),
            alternate_post: String::new(),
            arrow_block: String::new(),
            scale: 1.0,
            arrow_size: 0.18,
            extension_line_offset: 0.0625,
            dimension_line_increment: 0.38,
            extension_line_extension: 0.18,
            rounding: 0.0,
            dimension_line_extension: 0.0,
            text_height: 0.18,
            center_mark_size: 0.09,
            tick_size: 0.0,
            linear_scale_factor: 1.0,
            text_gap: 0.09,
            generate_tolerances: false,
            text_inside_horizontal: true,
            text_outside_horizontal: true,
            text_above_dimension_line: 0,
            zero_suppression: 0,
            alternate_units: false,
            force_line_inside: false,
            dimension_line_color: 0,
            extension_line_color: 0,
            text_color: 0,
            decimal_places: 4,
            text_style: Pointer::default(),
        }
    }

    pub(crate) fn try_set_pair(&mut self, pair: &CodePair) -> bool {
        match pair.code {
            3 => self.post = pair.string_value(),
            4 => self.alternate_post = pair.string_value(),
            5 => self.arrow_block = pair.string_value(),
            40 => self.scale = pair.double_value(),
            41 => self.arrow_size = pair.double_value(),
            42 => self.extension_line_offset = pair.double_value(),
            43 => self.dimension_line_increment = pair.double_value(),
            44 => self.extension_line_extension = pair.double_value(),
            45 => self.rounding = pair.double_value(),
            46 => self.dimension_line_extension = pair.double_value(),
            140 => self.text_height = pair.double_value(),
            141 => self.center_mark_size = pair.double_value(),
            142 => self.tick_size = pair.double_value(),
            144 => self.linear_scale_factor = pair.double_value(),
            147 => self.text_gap = pair.double_value(),
            71 => self.generate_tolerances = pair.bool_value(),
            73 => self.text_inside_horizontal = pair.bool_value(),
            74 => self.text_outside_horizontal = pair.bool_value(),
            77 => self.text_above_dimension_line = pair.short_value(),
            78 => self.zero_suppression = pair.short_value(),
            170 => self.alternate_units = pair.bool_value(),
            172 => self.force_line_inside = pair.bool_value(),
            176 => self.dimension_line_color = pair.short_value(),
            177 => self.extension_line_color = pair.short_value(),
            178 => self.text_color = pair.short_value(),
            271 => self.decimal_places = pair.short_value(),
            340 => self.text_style = Pointer::new(pair.handle_value()),
            _ => return false,
        }
        true
    }

    pub(crate) fn add_value_pairs(&self, pairs: &mut Vec<CodePair>, version: DxfVersion) {
        pairs.push(CodePair::string(3, self.post.as_str()));
        pairs.push(CodePair::string(4, self.alternate_post.as_str()));
        if !version.has_object_model() {
            pairs.push(CodePair::string(5, self.arrow_block.as_str()));
        }
        for (code, value) in [
            (40, self.scale),
            (41, self.arrow_size),
            (42, self.extension_line_offset),
            (43, self.dimension_line_increment),
            (44, self.extension_line_extension),
            (45, self.rounding),
            (46, self.dimension_line_extension),
            (140, self.text_height),
            (141, self.center_mark_size),
            (142, self.tick_size),
            (144, self.linear_scale_factor),
            (147, self.text_gap),
        ] {
            pairs.push(CodePair::double(code, value));
        }
        for (code, value) in [
            (71, self.generate_tolerances as i16),
            (73, self.text_inside_horizontal as i16),
            (74, self.text_outside_horizontal as i16),
            (77, self.text_above_dimension_line),
            (78, self.zero_suppression),
            (170, self.alternate_units as i16),
            (172, self.force_line_inside as i16),
            (176, self.dimension_line_color),
            (177, self.extension_line_color),
            (178, self.text_color),
        ] {
            pairs.push(CodePair::short(code, value));
        }
        if version.has_object_model() {
            pairs.push(CodePair::short(271, self.decimal_places));
            if self.text_style.handle.is_valid() {
                push_handle(pairs, 340, self.text_style.handle);
            }
        }
    }
}

impl Default for DimStyle {
    fn default() -> Self {
        Self::new()
    }
}
