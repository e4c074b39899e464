//! Entities of a type this crate does not model

/// Placeholder for an unrecognized entity type.
///
/// Only the common entity fields are parsed; every other pair, including
/// subclass markers past `AcDbEntity`, stays in the record's excess pairs
/// and is written back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProxyEntity {
    pub type_name: String,
}

impl ProxyEntity {
    pub fn new(type_name: &str) -> Self {
        ProxyEntity {
            type_name: type_name.to_string(),
        }
    }
}
