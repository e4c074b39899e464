//! SEQEND entity closing a vertex or attribute sequence

/// Marks the end of the sub-entities of a POLYLINE or INSERT. Carries no
/// data beyond the common entity fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Seqend;
