//! Per-frame drawing passes that depend only on time and layout.

use folio_core::{Point, Rgba, Size, hsla};

use crate::glyphs::{FLOATING_GLYPHS, INTERACTIVE_GLYPHS};
use crate::particle::Particle;
use crate::surface::{ColorStop, RadialGradient, Surface, SurfaceError};

const LINK_COLOR: Rgba = Rgba::rgb(59, 130, 246);
const CORNER_COLOR: Rgba = Rgba::from_hex(0x6366f1);
const GLYPH_NEAR_COLOR: Rgba = Rgba::from_hex(0x22d3ee);
const GLYPH_FAR_COLOR: Rgba = Rgba::from_hex(0x3b82f6);

/// Inset of the corner markers from each edge.
const CORNER_INSET: f32 = 50.0;

/// Baseline of the interactive glyph row.
const INTERACTIVE_ROW_Y: f32 = 100.0;

/// Hue-cycling radial wash with its focus drifting around the center.
pub fn background_gradient(size: Size, time_ms: f64) -> RadialGradient {
    let center = size.center();
    let drift = time_ms * 0.001;
    let hue1 = (time_ms * 0.05 % 360.0) as f32;
    let hue2 = ((time_ms * 0.03 + 60.0) % 360.0) as f32;

    RadialGradient {
        start: Point::new(
            center.x + (drift.sin() * 100.0) as f32,
            center.y + (drift.cos() * 100.0) as f32,
        ),
        start_radius: 0.0,
        end: center,
        end_radius: size.width.max(size.height),
        stops: vec![
            ColorStop::new(0.0, hsla(hue1, 0.7, 0.2, 0.03)),
            ColorStop::new(0.5, hsla(hue2, 0.6, 0.15, 0.02)),
            ColorStop::new(1.0, Rgba::BLACK.with_alpha(0.01)),
        ],
    }
}

pub fn paint_background<S: Surface + ?Sized>(
    surface: &mut S,
    size: Size,
    time_ms: f64,
    overlay_alpha: f32,
) -> Result<(), SurfaceError> {
    surface.fill_radial_gradient(&background_gradient(size, time_ms))?;
    surface.fill(Rgba::BLACK.with_alpha(overlay_alpha))
}

/// Link every pair of particles closer than `max_distance`.
///
/// Pairwise scan, O(n^2) in the particle count. Fine for a few dozen
/// particles; a spatial grid would be needed well beyond that.
pub fn draw_links<S: Surface + ?Sized>(
    surface: &mut S,
    particles: &[Particle],
    max_distance: f32,
) -> Result<(), SurfaceError> {
    let max_sq = max_distance * max_distance;
    for (i, a) in particles.iter().enumerate() {
        for b in &particles[i + 1..] {
            let dist_sq = a.pos.distance_squared(b.pos);
            if dist_sq < max_sq {
                let alpha = (max_distance - dist_sq.sqrt()) / max_distance * 0.2;
                surface.stroke_line(a.pos, b.pos, 1.0, LINK_COLOR.with_alpha(alpha))?;
            }
        }
    }
    Ok(())
}

/// Position of floating glyph `index` at `time_ms`.
pub fn floating_glyph_position(size: Size, index: usize, time_ms: f64) -> Point {
    let i = index as f64;
    let slot = size.width / FLOATING_GLYPHS.len() as f32;
    Point::new(
        slot * index as f32 + ((time_ms * 0.002 + i).sin() * 50.0) as f32,
        50.0 + ((time_ms * 0.003 + i).cos() * 20.0) as f32,
    )
}

pub fn draw_floating_glyphs<S: Surface + ?Sized>(
    surface: &mut S,
    size: Size,
    time_ms: f64,
) -> Result<(), SurfaceError> {
    let color = Rgba::rgb(255, 255, 255).with_alpha(0.4);
    for (i, glyph) in FLOATING_GLYPHS.iter().enumerate() {
        surface.fill_text(floating_glyph_position(size, i, time_ms), glyph, 1.0, color)?;
    }
    Ok(())
}

/// Scale and color of interactive glyph `index` for a pointer at `pointer`.
pub fn interactive_glyph_style(size: Size, index: usize, pointer: Point) -> (Point, f32, Rgba) {
    let anchor = Point::new(
        size.width / INTERACTIVE_GLYPHS.len() as f32 * index as f32,
        INTERACTIVE_ROW_Y,
    );
    let distance = pointer.distance(anchor);
    let scale = (1.0 - distance / 200.0).max(0.5);
    let color = if distance < 100.0 {
        GLYPH_NEAR_COLOR
    } else {
        GLYPH_FAR_COLOR
    };
    (anchor, scale, color.with_alpha(0.6))
}

pub fn draw_interactive_glyphs<S: Surface + ?Sized>(
    surface: &mut S,
    size: Size,
    pointer: Point,
) -> Result<(), SurfaceError> {
    for (i, glyph) in INTERACTIVE_GLYPHS.iter().enumerate() {
        let (anchor, scale, color) = interactive_glyph_style(size, i, pointer);
        surface.fill_text(anchor, glyph, scale, color)?;
    }
    Ok(())
}

/// Pulse level in `0..=1` for corner `index`.
pub fn corner_pulse(index: usize, time_ms: f64) -> f32 {
    ((time_ms * 0.003 + index as f64).sin() * 0.5 + 0.5) as f32
}

pub fn draw_corner_markers<S: Surface + ?Sized>(
    surface: &mut S,
    size: Size,
    time_ms: f64,
) -> Result<(), SurfaceError> {
    let corners = [
        Point::new(CORNER_INSET, CORNER_INSET),
        Point::new(size.width - CORNER_INSET, CORNER_INSET),
        Point::new(CORNER_INSET, size.height - CORNER_INSET),
        Point::new(size.width - CORNER_INSET, size.height - CORNER_INSET),
    ];

    for (i, corner) in corners.into_iter().enumerate() {
        let pulse = corner_pulse(i, time_ms);
        surface.fill_circle(corner, 8.0 + pulse * 4.0, CORNER_COLOR.with_alpha(pulse * 0.4))?;
        surface.stroke_circle(corner, 15.0 + pulse * 10.0, 2.0, CORNER_COLOR.with_alpha(0.2))?;
    }
    Ok(())
}
