//! Core value types shared by the codec and the drawing model

mod color;
mod handle;
mod julian;
mod line_weight;
mod vector;
mod version;

pub use color::Color;
pub use handle::Handle;
pub use julian::{datetime_from_julian, julian_from_datetime};
pub use line_weight::LineWeight;
pub use vector::{Vector2, Vector3};
pub use version::DxfVersion;
