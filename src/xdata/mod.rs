//! Extended data (XDATA)
//!
//! Application data attached to any record after a `1001` application name,
//! using group codes 1000-1071. Values are grouped per application; `1002`
//! braces nest lists.

use indexmap::IndexMap;

use crate::handles::{remap_handle, remap_handle_pair, HandleMap};
use crate::io::dxf::CodePair;
use crate::types::{Handle, Vector3};

/// One typed XDATA item.
#[derive(Debug, Clone, PartialEq)]
pub enum XDataValue {
    /// 1000
    String(String),
    /// 1003
    LayerName(String),
    /// 1004, hex encoded in the file
    BinaryData(Vec<u8>),
    /// 1005
    Handle(Handle),
    /// 1010/1020/1030
    Point3D(Vector3),
    /// 1011/1021/1031
    Position3D(Vector3),
    /// 1012/1022/1032
    Displacement3D(Vector3),
    /// 1013/1023/1033
    Direction3D(Vector3),
    /// 1040
    Real(f64),
    /// 1041
    Distance(f64),
    /// 1042
    ScaleFactor(f64),
    /// 1070
    Integer16(i16),
    /// 1071
    Integer32(i32),
    /// Items between `1002 {` and `1002 }`
    List(Vec<XDataValue>),
    /// Any other code in the XDATA range, kept verbatim
    Other(CodePair),
}

impl XDataValue {
    fn remap_handles(&mut self, map: &HandleMap) {
        match self {
            XDataValue::Handle(handle) if handle.is_valid() => *handle = remap_handle(*handle, map),
            XDataValue::List(items) => items.iter_mut().for_each(|item| item.remap_handles(map)),
            XDataValue::Other(pair) => remap_handle_pair(pair, map),
            _ => {}
        }
    }

    pub(crate) fn add_value_pairs(&self, pairs: &mut Vec<CodePair>) {
        match self {
            XDataValue::String(s) => pairs.push(CodePair::string(1000, s.clone())),
            XDataValue::LayerName(s) => pairs.push(CodePair::string(1003, s.clone())),
            XDataValue::BinaryData(data) => {
                pairs.push(CodePair::string(1004, hex::encode_upper(data)))
            }
            XDataValue::Handle(h) => pairs.push(CodePair::handle(1005, *h)),
            XDataValue::Point3D(p) => push_point(pairs, 1010, p),
            XDataValue::Position3D(p) => push_point(pairs, 1011, p),
            XDataValue::Displacement3D(p) => push_point(pairs, 1012, p),
            XDataValue::Direction3D(p) => push_point(pairs, 1013, p),
            XDataValue::Real(v) => pairs.push(CodePair::double(1040, *v)),
            XDataValue::Distance(v) => pairs.push(CodePair::double(1041, *v)),
            XDataValue::ScaleFactor(v) => pairs.push(CodePair::double(1042, *v)),
            XDataValue::Integer16(v) => pairs.push(CodePair::short(1070, *v)),
            XDataValue::Integer32(v) => pairs.push(CodePair::integer(1071, *v)),
            XDataValue::List(items) => {
                pairs.push(CodePair::string(1002, "{"));
                for item in items {
                    item.add_value_pairs(pairs);
                }
                pairs.push(CodePair::string(1002, "}"));
            }
            XDataValue::Other(pair) => pairs.push(pair.clone()),
        }
    }
}

fn push_point(pairs: &mut Vec<CodePair>, code: i32, point: &Vector3) {
    pairs.push(CodePair::double(code, point.x));
    pairs.push(CodePair::double(code + 10, point.y));
    pairs.push(CodePair::double(code + 20, point.z));
}

/// XDATA of one record, keyed by application name in file order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtendedData {
    applications: IndexMap<String, Vec<XDataValue>>,
}

impl ExtendedData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append values for `application`, creating its entry if needed.
    pub fn extend(&mut self, application: impl Into<String>, values: impl IntoIterator<Item = XDataValue>) {
        self.applications
            .entry(application.into())
            .or_default()
            .extend(values);
    }

    /// Replace the values stored for `application`.
    pub fn insert(&mut self, application: impl Into<String>, values: Vec<XDataValue>) {
        self.applications.insert(application.into(), values);
    }

    pub fn get(&self, application: &str) -> Option<&[XDataValue]> {
        self.applications.get(application).map(Vec::as_slice)
    }

    pub fn get_mut(&mut self, application: &str) -> Option<&mut Vec<XDataValue>> {
        self.applications.get_mut(application)
    }

    pub fn remove(&mut self, application: &str) -> Option<Vec<XDataValue>> {
        self.applications.shift_remove(application)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[XDataValue])> {
        self.applications.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.applications.len()
    }

    pub fn is_empty(&self) -> bool {
        self.applications.is_empty()
    }

    pub fn clear(&mut self) {
        self.applications.clear();
    }

    pub(crate) fn remap_handles(&mut self, map: &HandleMap) {
        for values in self.applications.values_mut() {
            values.iter_mut().for_each(|value| value.remap_handles(map));
        }
    }

    /// Serialize every application block, `1001` name first.
    pub fn add_value_pairs(&self, pairs: &mut Vec<CodePair>) {
        for (application, values) in &self.applications {
            pairs.push(CodePair::string(1001, application.clone()));
            for value in values {
                value.add_value_pairs(pairs);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_values_grouped_by_application() {
        let mut xdata = ExtendedData::new();
        assert!(xdata.is_empty());
        xdata.extend("APP1", [XDataValue::Real(3.5)]);
        xdata.extend("APP2", [XDataValue::String("x".into())]);
        xdata.extend("APP1", [XDataValue::Integer16(2)]);

        assert_eq!(xdata.len(), 2);
        assert_eq!(
            xdata.get("APP1"),
            Some(&[XDataValue::Real(3.5), XDataValue::Integer16(2)][..])
        );
        assert!(xdata.get("APP3").is_none());
        let names: Vec<&str> = xdata.iter().map(|(name, _)| name).collect();
        assert_eq!(names, ["APP1", "APP2"]);
    }

    #[test]
    fn test_serialization_with_nested_list() {
        let mut xdata = ExtendedData::new();
        xdata.insert(
            "ACAD",
            vec![
                XDataValue::List(vec![XDataValue::Point3D(Vector3::new(1.0, 2.0, 3.0))]),
                XDataValue::BinaryData(vec![0xAB, 0x01]),
            ],
        );
        let mut pairs = Vec::new();
        xdata.add_value_pairs(&mut pairs);
        let codes: Vec<i32> = pairs.iter().map(|p| p.code).collect();
        assert_eq!(codes, [1001, 1002, 1010, 1020, 1030, 1002, 1004]);
        assert_eq!(pairs[6].as_str(), Some("AB01"));
    }
}
