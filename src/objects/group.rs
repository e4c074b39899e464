//! GROUP object - named collection of entities

use crate::io::dxf::CodePair;
use crate::item::Pointer;
use crate::record::push_handle;

/// A group of entities. Its name is the key under which the group is stored
/// in the `ACAD_GROUP` dictionary. Grouped entities are referenced, not owned.
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    pub description: String,
    pub is_unnamed: bool,
    pub is_selectable: bool,
    /// Member entities (code 340)
    pub entities: Vec<Pointer>,
}

impl Group {
    pub fn new() -> Self {
        Group {
            description: String::new(),
            is_unnamed: false,
            is_selectable: true,
            entities: Vec::new(),
        }
    }

    pub fn with_description(description: impl Into<String>) -> Self {
        Group {
            description: description.into(),
            ..Self::new()
        }
    }

    pub(crate) fn try_set_pair(&mut self, pair: &CodePair) -> bool {
        match pair.code {
            300 => self.description = pair.string_value(),
            70 => self.is_unnamed = pair.bool_value(),
            71 => self.is_selectable = pair.bool_value(),
            340 => self.entities.push(Pointer::new(pair.handle_value())),
            _ => return false,
        }
        true
    }

    pub(crate) fn add_value_pairs(&self, pairs: &mut Vec<CodePair>) {
        pairs.push(CodePair::string(100, "AcDbGroup"));
        pairs.push(CodePair::string(300, self.description.as_str()));
        pairs.push(CodePair::short(70, self.is_unnamed as i16));
        pairs.push(CodePair::short(71, self.is_selectable as i16));
        for pointer in &self.entities {
            push_handle(pairs, 340, pointer.handle);
        }
    }
}

impl Default for Group {
    fn default() -> Self {
        Self::new()
    }
}
