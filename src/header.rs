//! HEADER section variables
//!
//! A handful of variables the codec itself depends on are modeled as
//! fields. Every other variable is kept with its pairs, in file order, and
//! written back unchanged.

use chrono::NaiveDateTime;
use indexmap::IndexMap;

use crate::error::{DxfError, Result};
use crate::handles::{remap_handle_pair, HandleMap};
use crate::io::dxf::CodePair;
use crate::record::{push_handle, push_point};
use crate::types::{datetime_from_julian, julian_from_datetime, DxfVersion, Handle, Vector3};

/// Header variables that producers write either as a `290` bool or as a
/// `280` short.
const BOOL_OR_SHORT_VARIABLES: [&str; 3] = ["$HIDETEXT", "$INTERSECTIONDISPLAY", "$XCLIPFRAME"];

/// Variables of the HEADER section.
#[derive(Debug, Clone, PartialEq)]
pub struct Header {
    /// `$ACADVER`
    pub version: DxfVersion,
    /// `$ACADMAINTVER`
    pub maintenance_version: i16,
    /// `$DWGCODEPAGE`, e.g. `ANSI_1252`
    pub code_page: String,
    /// `$HANDSEED`: next free handle; set when handles are assigned
    pub handle_seed: Handle,
    /// `$HANDLING` (Release 12 only)
    pub handling: bool,
    /// `$INSBASE`
    pub insertion_base: Vector3,
    /// `$EXTMIN`
    pub extents_min: Vector3,
    /// `$EXTMAX`
    pub extents_max: Vector3,
    /// `$CLAYER`
    pub current_layer: String,
    /// `$TDCREATE`
    pub created: Option<NaiveDateTime>,
    /// `$TDUPDATE`
    pub updated: Option<NaiveDateTime>,
    /// `$HIDETEXT`
    pub hide_text: bool,
    /// `$INTERSECTIONDISPLAY`
    pub intersection_display: bool,
    /// `$XCLIPFRAME`
    pub xclip_frame: bool,
    /// Variables not modeled above, with their value pairs
    pub custom_variables: IndexMap<String, Vec<CodePair>>,
}

impl Header {
    pub fn new() -> Self {
        Header {
            version: DxfVersion::default(),
            maintenance_version: 0,
            code_page: "ANSI_1252".to_string(),
            handle_seed: Handle::NULL,
            handling: true,
            insertion_base: Vector3::ZERO,
            extents_min: Vector3::ZERO,
            extents_max: Vector3::ZERO,
            current_layer: "0".to_string(),
            created: None,
            updated: None,
            hide_text: true,
            intersection_display: false,
            xclip_frame: false,
            custom_variables: IndexMap::new(),
        }
    }

    /// Apply one variable read from the file.
    pub fn set_variable(&mut self, name: &str, pairs: &[CodePair]) -> Result<()> {
        let Some(first) = pairs.first() else {
            tracing::warn!(name, "header variable without a value");
            return Ok(());
        };
        match name {
            "$ACADVER" => {
                let text = first.string_value();
                self.version = DxfVersion::from_version_string(&text)
                    .ok_or(DxfError::UnsupportedVersion(text))?;
            }
            "$ACADMAINTVER" => self.maintenance_version = first.short_value(),
            "$DWGCODEPAGE" => self.code_page = first.string_value(),
            "$HANDSEED" => self.handle_seed = first.handle_value(),
            "$HANDLING" => self.handling = first.bool_value(),
            "$INSBASE" => self.insertion_base = point_from_pairs(pairs),
            "$EXTMIN" => self.extents_min = point_from_pairs(pairs),
            "$EXTMAX" => self.extents_max = point_from_pairs(pairs),
            "$CLAYER" => self.current_layer = first.string_value(),
            "$TDCREATE" => self.created = datetime_from_julian(first.double_value()),
            "$TDUPDATE" => self.updated = datetime_from_julian(first.double_value()),
            "$HIDETEXT" => self.hide_text = first.bool_value(),
            "$INTERSECTIONDISPLAY" => self.intersection_display = first.bool_value(),
            "$XCLIPFRAME" => self.xclip_frame = first.bool_value(),
            _ => {
                self.custom_variables.insert(name.to_string(), pairs.to_vec());
            }
        }
        Ok(())
    }

    /// Append the section body (everything between `2/HEADER` and `ENDSEC`).
    pub fn add_value_pairs(&self, pairs: &mut Vec<CodePair>, version: DxfVersion, output_handles: bool) {
        let mut variable = |name: &str, values: &[CodePair]| {
            pairs.push(CodePair::string(9, name));
            pairs.extend_from_slice(values);
        };

        variable("$ACADVER", &[CodePair::string(1, version.as_str())]);
        if version >= DxfVersion::AC1012 {
            variable("$ACADMAINTVER", &[CodePair::short(70, version.maintenance_version())]);
        }
        if version >= DxfVersion::AC1012 && version < DxfVersion::AC1021 {
            variable("$DWGCODEPAGE", &[CodePair::string(3, self.code_page.as_str())]);
        }
        variable("$INSBASE", &point_pairs(10, &self.insertion_base));
        variable("$EXTMIN", &point_pairs(10, &self.extents_min));
        variable("$EXTMAX", &point_pairs(10, &self.extents_max));
        variable("$CLAYER", &[CodePair::string(8, self.current_layer.as_str())]);
        if let Some(created) = self.created {
            variable("$TDCREATE", &[CodePair::double(40, julian_from_datetime(created))]);
        }
        if let Some(updated) = self.updated {
            variable("$TDUPDATE", &[CodePair::double(40, julian_from_datetime(updated))]);
        }
        if version < DxfVersion::AC1012 {
            variable("$HANDLING", &[CodePair::short(70, output_handles as i16)]);
        }
        if output_handles {
            let mut seed = Vec::new();
            push_handle(&mut seed, 5, self.handle_seed);
            variable("$HANDSEED", &seed);
        }
        for (name, value) in BOOL_OR_SHORT_VARIABLES.into_iter().zip([
            self.hide_text,
            self.intersection_display,
            self.xclip_frame,
        ]) {
            if version >= DxfVersion::AC1015 {
                variable(name, &[CodePair::boolean(290, value)]);
            } else if version >= DxfVersion::AC1014 {
                variable(name, &[CodePair::short(280, value as i16)]);
            }
        }
        if version < self.version && !self.custom_variables.is_empty() {
            tracing::debug!(
                count = self.custom_variables.len(),
                from = %self.version,
                to = %version,
                "dropping header variables read from a newer version"
            );
            return;
        }
        for (name, values) in &self.custom_variables {
            variable(name, values);
        }
    }

    /// Rewrite handle-valued pass-through variables after renumbering.
    pub(crate) fn remap_handles(&mut self, map: &HandleMap) {
        for values in self.custom_variables.values_mut() {
            values.iter_mut().for_each(|pair| remap_handle_pair(pair, map));
        }
    }
}

impl Default for Header {
    fn default() -> Self {
        Self::new()
    }
}

fn point_from_pairs(pairs: &[CodePair]) -> Vector3 {
    let mut point = Vector3::ZERO;
    for pair in pairs {
        match pair.code {
            10 => point.x = pair.double_value(),
            20 => point.y = pair.double_value(),
            30 => point.z = pair.double_value(),
            _ => {}
        }
    }
    point
}

fn point_pairs(code: i32, point: &Vector3) -> Vec<CodePair> {
    let mut pairs = Vec::with_capacity(3);
    push_point(&mut pairs, code, point);
    pairs
}
