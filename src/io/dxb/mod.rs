//! DXB, the compact binary drawing interchange format
//!
//! A DXB file is the sentinel followed by a flat list of items. Each item
//! is a type byte and a fixed set of fields; type 0 ends the file. Field
//! kinds:
//!
//! * `W`: 16-bit integer
//! * `N`: coordinate; a 16-bit integer multiplied by the scale factor in
//!   integer mode, a double in float mode
//! * `A`: angle; millionths of a degree as a 32-bit integer in integer
//!   mode, degrees as a double in float mode
//! * `F`: double
//!
//! All numbers are little-endian. Layer and color items change the state
//! applied to every entity that follows.

mod reader;
mod writer;

pub use reader::DxbReader;
pub use writer::DxbWriter;

/// Leading bytes of every DXB file
pub const DXB_SENTINEL: &[u8] = b"AutoCAD DXB 1.0\r\n\x1a\x00";

/// DXB item type codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum DxbItemType {
    /// `N` from x, y, z; to x, y, z
    Line = 1,
    /// `N` x, y
    Point = 2,
    /// `N` center x, y; radius
    Circle = 3,
    /// `N` center x, y; radius; `A` start, end
    Arc = 8,
    /// `N` four corners x, y
    Trace = 9,
    /// `N` four corners x, y
    Solid = 11,
    Seqend = 17,
    /// `W` closed flag
    Polyline = 19,
    /// `N` x, y
    Vertex = 20,
    /// `N` four corners x, y, z
    Face = 22,
    /// `F` factor
    ScaleFactor = 128,
    /// NUL-terminated name
    NewLayer = 129,
    /// `N` dx, dy from the end of the previous line
    LineExtension = 130,
    /// `N` third and fourth corner x, y
    TraceExtension = 131,
    /// `N` x, y
    BlockBase = 132,
    /// `F` bulge of the last vertex
    Bulge = 133,
    /// `N` start and end width
    Width = 134,
    /// `W` zero for integer mode
    NumberMode = 135,
    /// `W` color index
    NewColor = 136,
    /// `N` dx, dy, dz from the end of the previous line
    LineExtension3D = 137,
}

impl DxbItemType {
    pub fn from_code(code: u8) -> Option<Self> {
        use DxbItemType::*;
        Some(match code {
            1 => Line,
            2 => Point,
            3 => Circle,
            8 => Arc,
            9 => Trace,
            11 => Solid,
            17 => Seqend,
            19 => Polyline,
            20 => Vertex,
            22 => Face,
            128 => ScaleFactor,
            129 => NewLayer,
            130 => LineExtension,
            131 => TraceExtension,
            132 => BlockBase,
            133 => Bulge,
            134 => Width,
            135 => NumberMode,
            136 => NewColor,
            137 => LineExtension3D,
            _ => return None,
        })
    }

    pub fn code(self) -> u8 {
        self as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_codes_round_trip() {
        for code in 0..=u8::MAX {
            if let Some(item) = DxbItemType::from_code(code) {
                assert_eq!(item.code(), code);
            }
        }
        assert_eq!(DxbItemType::from_code(0), None);
        assert_eq!(DxbItemType::from_code(137), Some(DxbItemType::LineExtension3D));
    }
}
