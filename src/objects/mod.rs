//! Non-graphical objects (OBJECTS section)
//!
//! Objects are dictionaries and the data they organize. Like entities, an
//! [`Object`] is shared data ([`ObjectCommon`]) plus a type-specific payload
//! ([`ObjectType`]); types this crate does not model are kept as
//! [`ProxyObject`]s with all of their pairs.

mod dictionary;
mod dictionary_variable;
mod group;
mod proxy_object;
mod spatial_filter;
mod xrecord;

pub use dictionary::Dictionary;
pub use dictionary_variable::DictionaryVariable;
pub use group::Group;
pub use proxy_object::ProxyObject;
pub use spatial_filter::SpatialFilter;
pub use xrecord::{XRecord, XRecordValue};

use crate::io::dxf::CodePair;
use crate::item::{Item, Pointer};
use crate::record::{push_handle, DxfRecord, RecordExtras};
use crate::types::{DxfVersion, Handle};

/// Data shared by all objects.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ObjectCommon {
    pub handle: Handle,
    pub owner_handle: Handle,
    pub extras: RecordExtras,
}

impl ObjectCommon {
    fn try_set_pair(&mut self, pair: &CodePair) -> bool {
        match pair.code {
            5 => self.handle = pair.handle_value(),
            330 => self.owner_handle = pair.handle_value(),
            _ => return false,
        }
        true
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ObjectType {
    Dictionary(Dictionary),
    XRecord(XRecord),
    Group(Group),
    DictionaryVariable(DictionaryVariable),
    SpatialFilter(SpatialFilter),
    Proxy(ProxyObject),
}

impl ObjectType {
    pub fn from_type_name(name: &str) -> Self {
        match name {
            "DICTIONARY" => ObjectType::Dictionary(Dictionary::new()),
            "XRECORD" => ObjectType::XRecord(XRecord::new()),
            "GROUP" => ObjectType::Group(Group::new()),
            "DICTIONARYVAR" => ObjectType::DictionaryVariable(DictionaryVariable::new()),
            "SPATIAL_FILTER" => ObjectType::SpatialFilter(SpatialFilter::new()),
            other => ObjectType::Proxy(ProxyObject::new(other)),
        }
    }

    pub fn type_name(&self) -> &str {
        match self {
            ObjectType::Dictionary(_) => "DICTIONARY",
            ObjectType::XRecord(_) => "XRECORD",
            ObjectType::Group(_) => "GROUP",
            ObjectType::DictionaryVariable(_) => "DICTIONARYVAR",
            ObjectType::SpatialFilter(_) => "SPATIAL_FILTER",
            ObjectType::Proxy(p) => &p.type_name,
        }
    }

    fn try_set_pair(&mut self, pair: &CodePair, state: &mut ObjectReadState) -> bool {
        match self {
            ObjectType::Dictionary(o) => o.try_set_pair(pair, &mut state.pending_key),
            ObjectType::XRecord(o) => o.try_set_pair(pair, state.subclass.is_some()),
            ObjectType::Group(o) => o.try_set_pair(pair),
            ObjectType::DictionaryVariable(o) => o.try_set_pair(pair),
            ObjectType::SpatialFilter(o) => o.try_set_pair(pair, &mut state.code_40_index),
            ObjectType::Proxy(_) => false,
        }
    }

    fn add_value_pairs(&self, pairs: &mut Vec<CodePair>, version: DxfVersion) {
        match self {
            ObjectType::Dictionary(o) => o.add_value_pairs(pairs, version),
            ObjectType::XRecord(o) => o.add_value_pairs(pairs, version),
            ObjectType::Group(o) => o.add_value_pairs(pairs),
            ObjectType::DictionaryVariable(o) => o.add_value_pairs(pairs),
            ObjectType::SpatialFilter(o) => o.add_value_pairs(pairs),
            ObjectType::Proxy(_) => {}
        }
    }
}

/// Parse state for one object read.
#[derive(Debug, Default)]
pub struct ObjectReadState {
    /// Most recent `100` marker
    subclass: Option<String>,
    /// Dictionary key waiting for its `350`/`360` value
    pending_key: Option<String>,
    /// Occurrences of code 40 seen so far
    code_40_index: usize,
}

/// A non-graphical object.
#[derive(Debug, Clone, PartialEq)]
pub struct Object {
    pub common: ObjectCommon,
    pub specific: ObjectType,
}

impl Object {
    pub fn new(specific: ObjectType) -> Self {
        Object {
            common: ObjectCommon::default(),
            specific,
        }
    }

    pub fn from_type_name(name: &str) -> Self {
        Object::new(ObjectType::from_type_name(name))
    }

    pub fn type_name(&self) -> &str {
        self.specific.type_name()
    }

    pub fn as_dictionary(&self) -> Option<&Dictionary> {
        match &self.specific {
            ObjectType::Dictionary(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_dictionary_mut(&mut self) -> Option<&mut Dictionary> {
        match &mut self.specific {
            ObjectType::Dictionary(d) => Some(d),
            _ => None,
        }
    }
}

impl DxfRecord for Object {
    type ReadState = ObjectReadState;

    fn try_set_pair(&mut self, pair: &CodePair, state: &mut ObjectReadState) -> bool {
        // XRECORD data is opaque: once its marker is seen every pair but
        // XDATA belongs to it.
        if matches!(self.specific, ObjectType::XRecord(_)) && state.subclass.is_some() {
            return self.specific.try_set_pair(pair, state);
        }
        if pair.code == 100 {
            let is_proxy = matches!(self.specific, ObjectType::Proxy(_));
            state.subclass = Some(pair.string_value());
            return !is_proxy;
        }
        if state.subclass.is_none() {
            self.common.try_set_pair(pair) || self.specific.try_set_pair(pair, state)
        } else {
            self.specific.try_set_pair(pair, state) || self.common.try_set_pair(pair)
        }
    }

    fn extras_mut(&mut self) -> &mut RecordExtras {
        &mut self.common.extras
    }

    fn add_value_pairs(&self, pairs: &mut Vec<CodePair>, version: DxfVersion, output_handles: bool) {
        pairs.push(CodePair::string(0, self.type_name()));
        if output_handles && self.common.handle.is_valid() {
            push_handle(pairs, 5, self.common.handle);
        }
        self.common.extras.add_extension_data_pairs(pairs);
        push_handle(pairs, 330, self.common.owner_handle);
        self.specific.add_value_pairs(pairs, version);
        if matches!(self.specific, ObjectType::Proxy(_)) {
            self.common.extras.add_excess_pairs(pairs);
        }
        self.common.extras.add_xdata_pairs(pairs);
    }
}

impl Item for Object {
    fn handle(&self) -> Handle {
        self.common.handle
    }

    fn set_handle(&mut self, handle: Handle) {
        self.common.handle = handle;
    }

    fn owner_handle(&self) -> Handle {
        self.common.owner_handle
    }

    fn set_owner_handle(&mut self, handle: Handle) {
        self.common.owner_handle = handle;
    }

    fn pointers(&self) -> Vec<&Pointer> {
        match &self.specific {
            ObjectType::Dictionary(d) => d.entries.values().collect(),
            ObjectType::XRecord(x) => x.pointers().collect(),
            ObjectType::Group(g) => g.entities.iter().collect(),
            _ => Vec::new(),
        }
    }

    fn pointers_mut(&mut self) -> Vec<&mut Pointer> {
        match &mut self.specific {
            ObjectType::Dictionary(d) => d.entries.values_mut().collect(),
            ObjectType::XRecord(x) => x.pointers_mut().collect(),
            ObjectType::Group(g) => g.entities.iter_mut().collect(),
            _ => Vec::new(),
        }
    }

    fn is_dictionary(&self) -> bool {
        matches!(self.specific, ObjectType::Dictionary(_))
    }
}

macro_rules! impl_into_object {
    ($($ty:ident => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Object {
                fn from(value: $ty) -> Self {
                    Object::new(ObjectType::$variant(value))
                }
            }
        )*
    };
}

impl_into_object! {
    Dictionary => Dictionary,
    XRecord => XRecord,
    Group => Group,
    DictionaryVariable => DictionaryVariable,
    SpatialFilter => SpatialFilter,
    ProxyObject => Proxy,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::dxf::reader::CodePairBuffer;
    use crate::record::populate_from_buffer;

    fn read_object(type_name: &str, pairs: Vec<CodePair>) -> Object {
        let mut object = Object::from_type_name(type_name);
        let mut buffer = CodePairBuffer::from_pairs(pairs).unwrap();
        populate_from_buffer(&mut object, &mut buffer).unwrap();
        object
    }

    #[test]
    fn test_dictionary_entries() {
        let object = read_object(
            "DICTIONARY",
            vec![
                CodePair::string(5, "C"),
                CodePair::string(330, "0"),
                CodePair::string(100, "AcDbDictionary"),
                CodePair::short(281, 1),
                CodePair::string(3, "ACAD_GROUP"),
                CodePair::string(350, "D"),
                CodePair::string(3, "ACAD_LAYOUT"),
                CodePair::string(350, "1A"),
            ],
        );
        assert_eq!(object.common.handle, Handle::new(0xC));
        let dictionary = object.as_dictionary().unwrap();
        assert_eq!(dictionary.entries.len(), 2);
        assert_eq!(dictionary.entries["ACAD_LAYOUT"].handle, Handle::new(0x1A));
        assert!(object.is_dictionary());
    }

    #[test]
    fn test_proxy_object_round_trip() {
        let object = read_object(
            "ACDBPLACEHOLDER",
            vec![
                CodePair::string(5, "20"),
                CodePair::string(330, "C"),
                CodePair::string(100, "AcDbPlaceHolder"),
                CodePair::short(70, 3),
            ],
        );
        let mut pairs = Vec::new();
        object.add_value_pairs(&mut pairs, DxfVersion::AC1015, true);
        assert_eq!(
            pairs,
            vec![
                CodePair::string(0, "ACDBPLACEHOLDER"),
                CodePair::string(5, "20"),
                CodePair::string(330, "C"),
                CodePair::string(100, "AcDbPlaceHolder"),
                CodePair::short(70, 3),
            ]
        );
    }

    #[test]
    fn test_xrecord_keeps_handles_as_data() {
        let object = read_object(
            "XRECORD",
            vec![
                CodePair::string(5, "30"),
                CodePair::string(330, "C"),
                CodePair::string(100, "AcDbXrecord"),
                CodePair::short(280, 1),
                CodePair::string(1, "first"),
                CodePair::string(5, "not a handle"),
                CodePair::string(340, "C"),
                CodePair::double(40, 2.5),
            ],
        );
        assert_eq!(object.common.handle, Handle::new(0x30));
        let ObjectType::XRecord(xrecord) = &object.specific else {
            panic!("expected XRECORD");
        };
        assert_eq!(xrecord.data.len(), 4);
        assert_eq!(object.pointers().len(), 1);
    }
}
