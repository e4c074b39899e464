//! CLASSES section entries

use crate::io::dxf::CodePair;
use crate::types::DxfVersion;

/// An application-defined class declared in the CLASSES section.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DxfClass {
    /// Record name used in the file (code 1)
    pub dxf_name: String,
    /// C++ class name (code 2)
    pub cpp_class_name: String,
    /// Application name (code 3)
    pub application_name: String,
    /// Proxy capabilities flag (code 90)
    pub proxy_flags: i32,
    /// Instance count (code 91)
    pub instance_count: i32,
    /// Set if the class was not loaded when the file was saved (code 280)
    pub was_proxy: bool,
    /// Set if the class derives from AcDbEntity (code 281)
    pub is_entity: bool,
}

impl DxfClass {
    pub fn new(dxf_name: impl Into<String>, cpp_class_name: impl Into<String>) -> Self {
        DxfClass {
            dxf_name: dxf_name.into(),
            cpp_class_name: cpp_class_name.into(),
            application_name: "ObjectDBX Classes".to_string(),
            ..Default::default()
        }
    }

    pub(crate) fn try_set_pair(&mut self, pair: &CodePair) -> bool {
        match pair.code {
            1 => self.dxf_name = pair.string_value(),
            2 => self.cpp_class_name = pair.string_value(),
            3 => self.application_name = pair.string_value(),
            90 => self.proxy_flags = pair.integer_value(),
            91 => self.instance_count = pair.integer_value(),
            280 => self.was_proxy = pair.bool_value(),
            281 => self.is_entity = pair.bool_value(),
            _ => return false,
        }
        true
    }

    pub fn add_value_pairs(&self, pairs: &mut Vec<CodePair>, version: DxfVersion) {
        pairs.push(CodePair::string(0, "CLASS"));
        pairs.push(CodePair::string(1, self.dxf_name.as_str()));
        pairs.push(CodePair::string(2, self.cpp_class_name.as_str()));
        pairs.push(CodePair::string(3, self.application_name.as_str()));
        pairs.push(CodePair::integer(90, self.proxy_flags));
        if version >= DxfVersion::AC1018 {
            pairs.push(CodePair::integer(91, self.instance_count));
        }
        pairs.push(CodePair::short(280, self.was_proxy as i16));
        pairs.push(CodePair::short(281, self.is_entity as i16));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instance_count_only_from_r2004() {
        let class = DxfClass::new("ACDBPLACEHOLDER", "AcDbPlaceHolder");
        let mut pairs = Vec::new();
        class.add_value_pairs(&mut pairs, DxfVersion::AC1015);
        assert!(!pairs.iter().any(|p| p.code == 91));
        pairs.clear();
        class.add_value_pairs(&mut pairs, DxfVersion::AC1018);
        assert!(pairs.iter().any(|p| p.code == 91));
    }
}
