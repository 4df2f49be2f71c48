//! Core types shared by the folio crates.

mod color;
mod geometry;
mod settings;
mod shape;

pub use color::{Rgba, hsl_to_rgb, hsla};
pub use geometry::{Point, Size};
pub use settings::BackdropSettings;
pub use shape::{PALETTE, Shape};
