//! # acadrust-dxf
//!
//! Reading and writing DXF drawings (ASCII and binary) and DXB files.
//!
//! The crate has two halves. The code-pair codec in [`io::dxf`] turns a
//! byte stream into typed `(code, value)` pairs and back, handling group
//! code typing, control-character and `\U+XXXX` escaping, legacy code
//! pages and the two binary code widths. The drawing model on top of it
//! keeps every record in an arena owned by [`CadDocument`]; handles are
//! resolved into [`Pointer`]s after reading and renumbered before writing.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use acadrust_dxf::{CadDocument, Line, Vector3};
//!
//! let mut doc = CadDocument::load_file("sample.dxf")?;
//! for entity in doc.entities() {
//!     println!("{} on layer {}", entity.type_name(), entity.layer());
//! }
//!
//! doc.add_entity(Line::from_points(Vector3::ZERO, Vector3::new(10.0, 0.0, 0.0)));
//! doc.normalize();
//! doc.save_file("output.dxf")?;
//! # Ok::<(), acadrust_dxf::DxfError>(())
//! ```
//!
//! Non-fatal problems found while reading (unknown record types, dangling
//! pointers, duplicate handles) are collected in
//! [`CadDocument::notifications`]; detailed progress is logged through
//! `tracing`.

#![allow(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod blocks;
pub mod classes;
pub mod document;
pub mod entities;
pub mod error;
pub mod handles;
pub mod header;
pub mod io;
pub mod item;
pub mod notification;
pub mod objects;
pub mod record;
pub mod tables;
pub mod types;
pub mod xdata;

// Re-export commonly used types
pub use error::{DxfError, Result};
pub use types::{Color, DxfVersion, Handle, LineWeight, Vector2, Vector3};

pub use blocks::{Block, BlockEnd};
pub use classes::DxfClass;
pub use document::CadDocument;
pub use header::Header;
pub use item::{DrawingItem, Item, ItemArena, ItemId, Pointer};
pub use notification::{Notification, NotificationCollection, NotificationType};
pub use record::{DxfRecord, RecordExtras};

// Re-export entity types
pub use entities::{
    Arc, Attribute, Circle, Entity, EntityType, Face3D, Hatch, Insert, Line, LwPolyline, Point,
    Polyline, Solid, Spline, Text, Vertex,
};

// Re-export object types
pub use objects::{Dictionary, Group, Object, ObjectType, XRecord};

// Re-export table types
pub use tables::{
    AppId, BlockRecord, DimStyle, Layer, LineType, SymbolTable, TableRecord, TableType, TextStyle,
    Ucs, VPort, View,
};

// Re-export I/O types
pub use io::dxb::{DxbReader, DxbWriter};
pub use io::dxf::{
    CodePair, CodePairValue, DxfReader, DxfReaderConfiguration, DxfWriter, DxfWriterConfiguration,
    GroupCodeValueType,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_cad_document_creation() {
        let doc = CadDocument::new();
        assert_eq!(doc.header.version, DxfVersion::AC1032);
        assert_eq!(doc.arena().len(), TableType::ALL.len());
    }
}
