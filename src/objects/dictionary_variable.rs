//! DICTIONARYVAR object

use crate::io::dxf::CodePair;

/// A named drawing variable stored in the `AcDbVariableDictionary`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DictionaryVariable {
    pub object_schema_number: i16,
    pub value: String,
}

impl DictionaryVariable {
    pub fn new() -> Self {
        DictionaryVariable {
            object_schema_number: 0,
            value: String::new(),
        }
    }

    pub fn with_value(value: impl Into<String>) -> Self {
        DictionaryVariable {
            value: value.into(),
            ..Self::new()
        }
    }

    pub(crate) fn try_set_pair(&mut self, pair: &CodePair) -> bool {
        match pair.code {
            280 => self.object_schema_number = pair.short_value(),
            1 => self.value = pair.string_value(),
            _ => return false,
        }
        true
    }

    pub(crate) fn add_value_pairs(&self, pairs: &mut Vec<CodePair>) {
        pairs.push(CodePair::string(100, "DictionaryVariables"));
        pairs.push(CodePair::short(280, self.object_schema_number));
        pairs.push(CodePair::string(1, self.value.as_str()));
    }
}

impl Default for DictionaryVariable {
    fn default() -> Self {
        Self::new()
    }
}
