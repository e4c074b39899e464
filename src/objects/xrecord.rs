//! XRECORD object - arbitrary application data

use crate::io::dxf::CodePair;
use crate::item::Pointer;
use crate::record::push_handle;
use crate::types::DxfVersion;

/// Codes whose value refers to another item (as opposed to a record's own
/// handle).
fn is_reference_code(code: i32) -> bool {
    matches!(code, 320..=369 | 390..=399 | 480 | 481)
}

/// One data item of an XRECORD.
#[derive(Debug, Clone, PartialEq)]
pub enum XRecordValue {
    Pair(CodePair),
    /// A reference code; kept as a pointer so it survives handle reassignment
    Pointer { code: i32, pointer: Pointer },
}

impl XRecordValue {
    pub fn code(&self) -> i32 {
        match self {
            XRecordValue::Pair(pair) => pair.code,
            XRecordValue::Pointer { code, .. } => *code,
        }
    }
}

/// An `XRECORD`: everything after its `AcDbXrecord` marker is data, in order.
#[derive(Debug, Clone, PartialEq)]
pub struct XRecord {
    /// Duplicate record cloning flag (code 280)
    pub cloning_flags: i16,
    pub data: Vec<XRecordValue>,
}

impl XRecord {
    pub fn new() -> Self {
        XRecord {
            cloning_flags: 1,
            data: Vec::new(),
        }
    }

    pub fn push(&mut self, pair: CodePair) {
        if is_reference_code(pair.code) {
            self.data.push(XRecordValue::Pointer {
                code: pair.code,
                pointer: Pointer::new(pair.handle_value()),
            });
        } else {
            self.data.push(XRecordValue::Pair(pair));
        }
    }

    pub(crate) fn pointers(&self) -> impl Iterator<Item = &Pointer> {
        self.data.iter().filter_map(|value| match value {
            XRecordValue::Pointer { pointer, .. } => Some(pointer),
            XRecordValue::Pair(_) => None,
        })
    }

    pub(crate) fn pointers_mut(&mut self) -> impl Iterator<Item = &mut Pointer> {
        self.data.iter_mut().filter_map(|value| match value {
            XRecordValue::Pointer { pointer, .. } => Some(pointer),
            XRecordValue::Pair(_) => None,
        })
    }

    /// `in_data` is set once the subclass marker has been read.
    pub(crate) fn try_set_pair(&mut self, pair: &CodePair, in_data: bool) -> bool {
        if !in_data || pair.code == 1001 {
            return false;
        }
        if pair.code == 280 && self.data.is_empty() {
            self.cloning_flags = pair.short_value();
        } else {
            self.push(pair.clone());
        }
        true
    }

    pub(crate) fn add_value_pairs(&self, pairs: &mut Vec<CodePair>, version: DxfVersion) {
        pairs.push(CodePair::string(100, "AcDbXrecord"));
        if version >= DxfVersion::AC1015 {
            pairs.push(CodePair::short(280, self.cloning_flags));
        }
        for value in &self.data {
            match value {
                XRecordValue::Pair(pair) => pairs.push(CodePair::new(pair.code, pair.value.clone())),
                XRecordValue::Pointer { code, pointer } => push_handle(pairs, *code, pointer.handle),
            }
        }
    }
}

impl Default for XRecord {
    fn default() -> Self {
        Self::new()
    }
}
