//! Reading and writing DXF (ASCII and binary) and DXB files

pub mod dxb;
pub mod dxf;

pub use dxb::{DxbReader, DxbWriter};
pub use dxf::{DxfReader, DxfWriter};
