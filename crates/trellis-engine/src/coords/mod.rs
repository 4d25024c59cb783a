//! Geometry types used for drop classification.
//!
//! Coordinates are logical pixels as reported by the host's hit-test layer.
//! Which way +Y points depends on the host; see
//! [`YAxis`](crate::drop::YAxis).

mod rect;
mod vec2;

pub use rect::Rect;
pub use vec2::Vec2;
