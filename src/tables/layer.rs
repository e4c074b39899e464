//! Layer table entry

use bitflags::bitflags;

use crate::io::dxf::CodePair;
use crate::item::Pointer;
use crate::record::push_handle;
use crate::types::{Color, DxfVersion, LineWeight};

bitflags! {
    /// Layer state bits of the record's `70` flags
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct LayerFlags: i16 {
        const FROZEN = 1;
        const FROZEN_IN_NEW_VIEWPORTS = 2;
        const LOCKED = 4;
    }
}

/// A layer table entry
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    /// Layer color; a negative index means the layer is off
    pub color: Color,
    /// Line type name
    pub line_type: String,
    pub line_weight: LineWeight,
    /// Is this layer plotted?
    pub is_plottable: bool,
    /// Plot style name object (code 390)
    pub plot_style: Pointer,
    /// Material object (code 347)
    pub material: Pointer,
}

impl Layer {
    pub fn new() -> Self {
        Layer {
            color: Color::WHITE,
            line_type: "CONTINUOUS".to_string(),
            line_weight: LineWeight::Default,
            is_plottable: true,
            plot_style: Pointer::default(),
            material: Pointer::default(),
        }
    }

    pub fn with_color(color: Color) -> Self {
        Layer {
            color,
            ..Self::new()
        }
    }

    pub fn is_off(&self) -> bool {
        self.color.is_turned_off()
    }

    pub fn turn_off(&mut self) {
        self.color.turn_off();
    }

    pub fn turn_on(&mut self) {
        self.color.turn_on();
    }

    pub(crate) fn try_set_pair(&mut self, pair: &CodePair) -> bool {
        match pair.code {
            62 => self.color = Color::from_raw_value(pair.short_value()),
            6 => self.line_type = pair.string_value(),
            290 => self.is_plottable = pair.bool_value(),
            370 => self.line_weight = LineWeight::from_value(pair.short_value()),
            390 => self.plot_style = Pointer::new(pair.handle_value()),
            347 => self.material = Pointer::new(pair.handle_value()),
            _ => return false,
        }
        true
    }

    pub(crate) fn add_value_pairs(&self, pairs: &mut Vec<CodePair>, version: DxfVersion) {
        pairs.push(CodePair::short(62, self.color.raw_value()));
        pairs.push(CodePair::string(6, self.line_type.as_str()));
        if version >= DxfVersion::AC1015 {
            if !self.is_plottable {
                pairs.push(CodePair::boolean(290, false));
            }
            pairs.push(CodePair::short(370, self.line_weight.value()));
            if self.plot_style.handle.is_valid() {
                push_handle(pairs, 390, self.plot_style.handle);
            }
        }
        if version >= DxfVersion::AC1018 && self.material.handle.is_valid() {
            push_handle(pairs, 347, self.material.handle);
        }
    }
}

impl Default for Layer {
    fn default() -> Self {
        Self::new()
    }
}
