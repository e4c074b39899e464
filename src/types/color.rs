//! Color representation for drawing items

use std::fmt;

/// An AutoCAD Color Index value as stored in DXF (group code 62).
///
/// The raw value is kept as-is so that sentinel values survive a round trip:
/// 0 is by-block, 256 is by-layer, 257 is by-entity, and a negative value
/// marks a layer as turned off while keeping the magnitude as its index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color(i16);

impl Color {
    pub const BY_BLOCK: Color = Color(0);
    pub const BY_LAYER: Color = Color(256);
    pub const BY_ENTITY: Color = Color(257);

    pub const RED: Color = Color(1);
    pub const YELLOW: Color = Color(2);
    pub const GREEN: Color = Color(3);
    pub const CYAN: Color = Color(4);
    pub const BLUE: Color = Color(5);
    pub const MAGENTA: Color = Color(6);
    pub const WHITE: Color = Color(7);

    /// Wrap a raw group code 62 value.
    pub const fn from_raw_value(value: i16) -> Self {
        Color(value)
    }

    /// Create an indexed color (1-255).
    pub const fn from_index(index: u8) -> Self {
        Color(index as i16)
    }

    pub const fn raw_value(&self) -> i16 {
        self.0
    }

    pub const fn is_by_layer(&self) -> bool {
        self.0 == 256
    }

    pub const fn is_by_block(&self) -> bool {
        self.0 == 0
    }

    pub const fn is_by_entity(&self) -> bool {
        self.0 == 257
    }

    /// A negative value means the owning layer is turned off.
    pub const fn is_turned_off(&self) -> bool {
        self.0 < 0
    }

    /// The palette index, if this is an indexed color (on or off).
    pub fn index(&self) -> Option<u8> {
        match self.0.unsigned_abs() {
            i @ 1..=255 => Some(i as u8),
            _ => None,
        }
    }

    pub fn turn_off(&mut self) {
        self.0 = -self.0.abs();
    }

    pub fn turn_on(&mut self) {
        self.0 = self.0.abs();
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::BY_LAYER
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            0 => write!(f, "ByBlock"),
            256 => write!(f, "ByLayer"),
            257 => write!(f, "ByEntity"),
            v if v < 0 => write!(f, "Index({}, off)", -v),
            v => write!(f, "Index({})", v),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinels() {
        assert!(Color::default().is_by_layer());
        assert!(Color::from_raw_value(0).is_by_block());
        assert!(Color::from_raw_value(257).is_by_entity());
        assert_eq!(Color::BY_LAYER.index(), None);
    }

    #[test]
    fn test_turned_off_keeps_index() {
        let mut color = Color::from_index(5);
        color.turn_off();
        assert!(color.is_turned_off());
        assert_eq!(color.raw_value(), -5);
        assert_eq!(color.index(), Some(5));
        color.turn_on();
        assert_eq!(color, Color::BLUE);
    }

    #[test]
    fn test_display() {
        assert_eq!(Color::from_raw_value(-7).to_string(), "Index(7, off)");
        assert_eq!(Color::BY_BLOCK.to_string(), "ByBlock");
    }
}
