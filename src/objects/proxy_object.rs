//! Objects of a type this crate does not model

/// Placeholder for an unrecognized object type. Every pair after the handle
/// and owner, subclass markers included, stays in the overflow list and is
/// written back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProxyObject {
    pub type_name: String,
}

impl ProxyObject {
    pub fn new(type_name: &str) -> Self {
        ProxyObject {
            type_name: type_name.to_string(),
        }
    }
}
