//! Drawing surface abstraction.

use folio_core::{Point, Rgba};
use thiserror::Error;

/// Errors raised by drawing operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SurfaceError {
    #[error("non-finite geometry passed to {op}")]
    NonFinite { op: &'static str },
    #[error("polygon needs at least 3 points, got {0}")]
    DegeneratePolygon(usize),
    #[error("gradient stops must be sorted offsets in 0..=1")]
    InvalidGradient,
}

/// A color at a position along a gradient, `offset` in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorStop {
    pub offset: f32,
    pub color: Rgba,
}

impl ColorStop {
    pub const fn new(offset: f32, color: Rgba) -> Self {
        Self { offset, color }
    }
}

/// Two-circle radial gradient, as in the HTML canvas model.
#[derive(Debug, Clone, PartialEq)]
pub struct RadialGradient {
    pub start: Point,
    pub start_radius: f32,
    pub end: Point,
    pub end_radius: f32,
    pub stops: Vec<ColorStop>,
}

impl RadialGradient {
    pub fn validate(&self) -> Result<(), SurfaceError> {
        if !(self.start.is_finite()
            && self.end.is_finite()
            && self.start_radius.is_finite()
            && self.end_radius.is_finite())
        {
            return Err(SurfaceError::NonFinite {
                op: "fill_radial_gradient",
            });
        }
        let sorted = self.stops.windows(2).all(|w| w[0].offset <= w[1].offset);
        let in_range = self
            .stops
            .iter()
            .all(|s| (0.0..=1.0).contains(&s.offset));
        if self.stops.is_empty() || !sorted || !in_range {
            return Err(SurfaceError::InvalidGradient);
        }
        Ok(())
    }

    /// Parameter of the outermost gradient circle passing through `p`,
    /// or `None` if no circle with a non-negative radius does.
    pub fn param_at(&self, p: Point) -> Option<f32> {
        let (dx, dy) = (self.end.x - self.start.x, self.end.y - self.start.y);
        let dr = self.end_radius - self.start_radius;
        let (qx, qy) = (p.x - self.start.x, p.y - self.start.y);

        // |q - t*d| = r0 + t*dr, squared and collected into a*t^2 + b*t + c = 0
        let a = dx * dx + dy * dy - dr * dr;
        let b = -2.0 * (qx * dx + qy * dy + self.start_radius * dr);
        let c = qx * qx + qy * qy - self.start_radius * self.start_radius;

        let valid = |t: f32| self.start_radius + t * dr >= 0.0;

        if a.abs() < f32::EPSILON {
            if b.abs() < f32::EPSILON {
                return None;
            }
            let t = -c / b;
            return valid(t).then_some(t);
        }

        let disc = b * b - 4.0 * a * c;
        if disc < 0.0 {
            return None;
        }
        let sq = disc.sqrt();
        let t1 = (-b + sq) / (2.0 * a);
        let t2 = (-b - sq) / (2.0 * a);
        let (hi, lo) = if t1 >= t2 { (t1, t2) } else { (t2, t1) };
        if valid(hi) {
            Some(hi)
        } else if valid(lo) {
            Some(lo)
        } else {
            None
        }
    }

    /// Color at gradient parameter `t`, padded outside `0..=1`.
    pub fn color_at(&self, t: f32) -> Rgba {
        let t = t.clamp(0.0, 1.0);
        let Some(first) = self.stops.first() else {
            return Rgba::TRANSPARENT;
        };
        if t <= first.offset {
            return first.color;
        }
        for pair in self.stops.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if t <= b.offset {
                let span = b.offset - a.offset;
                if span <= 0.0 {
                    return b.color;
                }
                return a.color.lerp(b.color, (t - a.offset) / span);
            }
        }
        self.stops.last().map_or(Rgba::TRANSPARENT, |s| s.color)
    }
}

/// Something the backdrop can paint on.
///
/// Coordinates are logical pixels; implementations apply the scale set by
/// [`Surface::set_scale`]. Colors carry their own alpha and are blended
/// source-over.
pub trait Surface {
    /// Reallocate the backing store. Contents are cleared.
    fn resize(&mut self, width: u32, height: u32);

    /// Backing-store pixels per logical pixel.
    fn set_scale(&mut self, scale: f32);

    /// Backing-store size in device pixels.
    fn size(&self) -> (u32, u32);

    /// Called once before each frame's drawing.
    fn begin_frame(&mut self) {}

    /// Blend a flat color over the whole surface.
    fn fill(&mut self, color: Rgba) -> Result<(), SurfaceError>;

    fn fill_radial_gradient(&mut self, gradient: &RadialGradient) -> Result<(), SurfaceError>;

    fn fill_circle(&mut self, center: Point, radius: f32, color: Rgba)
    -> Result<(), SurfaceError>;

    fn fill_polygon(&mut self, points: &[Point], color: Rgba) -> Result<(), SurfaceError>;

    fn stroke_line(
        &mut self,
        from: Point,
        to: Point,
        width: f32,
        color: Rgba,
    ) -> Result<(), SurfaceError>;

    fn stroke_circle(
        &mut self,
        center: Point,
        radius: f32,
        width: f32,
        color: Rgba,
    ) -> Result<(), SurfaceError>;

    /// Soft halo around a shape of the given radius, fading out over `blur`.
    fn glow(
        &mut self,
        center: Point,
        radius: f32,
        blur: f32,
        color: Rgba,
    ) -> Result<(), SurfaceError>;

    /// Draw text anchored at its left baseline.
    fn fill_text(
        &mut self,
        at: Point,
        text: &str,
        scale: f32,
        color: Rgba,
    ) -> Result<(), SurfaceError>;
}
