//! Animated particle backdrop for the folio portfolio.
//!
//! [`Backdrop`] owns a drawing [`Surface`], a fixed pool of floating
//! particles and a set of short-lived confetti. It never drives itself:
//! a [`Host`] delivers frames, timers and input events, and the backdrop
//! asks the host for the next frame at the end of every tick.
//!
//! [`PixelBuffer`] is a software surface and [`BackdropWidget`] paints it
//! into a ratatui buffer with half-block cells.

mod confetti;
mod frame;
mod glyphs;
mod host;
mod particle;
mod pixels;
mod state;
mod surface;
mod widget;

pub use confetti::{Confetti, ConfettiField};
pub use host::{EventKind, FrameHandle, Host, HostEvent, ListenerId, TimerId};
pub use particle::{Particle, TRAIL_LEN, TrailPoint};
pub use pixels::{GlyphOverlay, PixelBuffer};
pub use state::{Backdrop, Lifecycle};
pub use surface::{ColorStop, RadialGradient, Surface, SurfaceError};
pub use widget::BackdropWidget;
