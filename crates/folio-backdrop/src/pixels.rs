//! Software RGBA surface.

use folio_core::{Point, Rgba};

use crate::surface::{RadialGradient, Surface, SurfaceError};

/// Text recorded by [`PixelBuffer::fill_text`], in device pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphOverlay {
    pub at: Point,
    pub text: String,
    pub scale: f32,
    pub color: Rgba,
}

/// A straight-alpha pixel: rgb in `0.0..=1.0` plus alpha.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct Pixel {
    r: f32,
    g: f32,
    b: f32,
    a: f32,
}

impl Pixel {
    /// Source-over blend of `src` at `coverage`.
    fn blend(&mut self, src: Rgba, coverage: f32) {
        let sa = src.a * coverage;
        if sa <= 0.0 {
            return;
        }
        let out_a = sa + self.a * (1.0 - sa);
        if out_a <= 0.0 {
            *self = Pixel::default();
            return;
        }
        let mix = |s: u8, d: f32| (s as f32 / 255.0 * sa + d * self.a * (1.0 - sa)) / out_a;
        let (r, g, b) = (mix(src.r, self.r), mix(src.g, self.g), mix(src.b, self.b));
        *self = Pixel { r, g, b, a: out_a };
    }

    fn to_rgba(self) -> Rgba {
        let q = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        Rgba::new(q(self.r), q(self.g), q(self.b), self.a.clamp(0.0, 1.0))
    }
}

/// Pixel-grid surface with source-over blending.
///
/// Drawing happens in logical coordinates multiplied by the scale. Shapes
/// are anti-aliased by coverage; text is not rasterised but kept as
/// [`GlyphOverlay`]s for whoever presents the buffer.
#[derive(Debug, Clone)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    scale: f32,
    pixels: Vec<Pixel>,
    glyphs: Vec<GlyphOverlay>,
}

impl Default for PixelBuffer {
    fn default() -> Self {
        Self::new(0, 0)
    }
}

impl PixelBuffer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            scale: 1.0,
            pixels: vec![Pixel::default(); (width as usize) * (height as usize)],
            glyphs: Vec::new(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Color at a device pixel, or `None` outside the buffer.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.pixels[self.index(x, y)].to_rgba())
    }

    /// Text drawn since the last frame began.
    pub fn glyphs(&self) -> &[GlyphOverlay] {
        &self.glyphs
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    fn to_device(&self, p: Point) -> Point {
        Point::new(p.x * self.scale, p.y * self.scale)
    }

    /// Visit each device pixel whose center lies in the box, passing the
    /// pixel center, and blend `color` at the returned coverage.
    fn shade<F>(&mut self, min: Point, max: Point, color: Rgba, mut coverage: F)
    where
        F: FnMut(Point) -> f32,
    {
        if self.width == 0 || self.height == 0 || color.a <= 0.0 {
            return;
        }
        let x0 = min.x.floor().max(0.0) as u32;
        let y0 = min.y.floor().max(0.0) as u32;
        let x1 = (max.x.ceil().max(0.0) as u32).min(self.width);
        let y1 = (max.y.ceil().max(0.0) as u32).min(self.height);
        for y in y0..y1 {
            for x in x0..x1 {
                let c = coverage(Point::new(x as f32 + 0.5, y as f32 + 0.5));
                if c > 0.0 {
                    let idx = self.index(x, y);
                    self.pixels[idx].blend(color, c.min(1.0));
                }
            }
        }
    }
}

fn finite(op: &'static str, values: &[f32]) -> Result<(), SurfaceError> {
    if values.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(SurfaceError::NonFinite { op })
    }
}

/// Distance from `p` to the segment `a`-`b`.
fn segment_distance(p: Point, a: Point, b: Point) -> f32 {
    let (dx, dy) = (b.x - a.x, b.y - a.y);
    let len_sq = dx * dx + dy * dy;
    if len_sq <= f32::EPSILON {
        return p.distance(a);
    }
    let t = (((p.x - a.x) * dx + (p.y - a.y) * dy) / len_sq).clamp(0.0, 1.0);
    p.distance(Point::new(a.x + t * dx, a.y + t * dy))
}

/// Even-odd point-in-polygon test.
fn polygon_contains(points: &[Point], p: Point) -> bool {
    let mut inside = false;
    let mut j = points.len() - 1;
    for i in 0..points.len() {
        let (a, b) = (points[i], points[j]);
        if (a.y > p.y) != (b.y > p.y) && p.x < (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x {
            inside = !inside;
        }
        j = i;
    }
    inside
}

const SUBSAMPLES: [(f32, f32); 4] = [(-0.25, -0.25), (0.25, -0.25), (-0.25, 0.25), (0.25, 0.25)];

impl Surface for PixelBuffer {
    fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.pixels = vec![Pixel::default(); (width as usize) * (height as usize)];
        self.glyphs.clear();
    }

    fn set_scale(&mut self, scale: f32) {
        if scale.is_finite() && scale > 0.0 {
            self.scale = scale;
        }
    }

    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn begin_frame(&mut self) {
        self.glyphs.clear();
    }

    fn fill(&mut self, color: Rgba) -> Result<(), SurfaceError> {
        finite("fill", &[color.a])?;
        if color.a <= 0.0 {
            return Ok(());
        }
        for px in &mut self.pixels {
            px.blend(color, 1.0);
        }
        Ok(())
    }

    fn fill_radial_gradient(&mut self, gradient: &RadialGradient) -> Result<(), SurfaceError> {
        gradient.validate()?;
        let inv = 1.0 / self.scale;
        for y in 0..self.height {
            for x in 0..self.width {
                let logical = Point::new((x as f32 + 0.5) * inv, (y as f32 + 0.5) * inv);
                if let Some(t) = gradient.param_at(logical) {
                    let idx = self.index(x, y);
                    self.pixels[idx].blend(gradient.color_at(t), 1.0);
                }
            }
        }
        Ok(())
    }

    fn fill_circle(
        &mut self,
        center: Point,
        radius: f32,
        color: Rgba,
    ) -> Result<(), SurfaceError> {
        finite("fill_circle", &[center.x, center.y, radius])?;
        let c = self.to_device(center);
        let r = radius.max(0.0) * self.scale;
        let pad = r + 1.0;
        self.shade(
            Point::new(c.x - pad, c.y - pad),
            Point::new(c.x + pad, c.y + pad),
            color,
            |p| (r - p.distance(c) + 0.5).clamp(0.0, 1.0),
        );
        Ok(())
    }

    fn fill_polygon(&mut self, points: &[Point], color: Rgba) -> Result<(), SurfaceError> {
        if points.len() < 3 {
            return Err(SurfaceError::DegeneratePolygon(points.len()));
        }
        if !points.iter().all(|p| p.is_finite()) {
            return Err(SurfaceError::NonFinite { op: "fill_polygon" });
        }
        let device: Vec<Point> = points.iter().map(|&p| self.to_device(p)).collect();
        let (mut min, mut max) = (device[0], device[0]);
        for p in &device {
            min = Point::new(min.x.min(p.x), min.y.min(p.y));
            max = Point::new(max.x.max(p.x), max.y.max(p.y));
        }
        self.shade(min, max, color, |p| {
            let hits = SUBSAMPLES
                .iter()
                .filter(|(ox, oy)| polygon_contains(&device, Point::new(p.x + ox, p.y + oy)))
                .count();
            hits as f32 / SUBSAMPLES.len() as f32
        });
        Ok(())
    }

    fn stroke_line(
        &mut self,
        from: Point,
        to: Point,
        width: f32,
        color: Rgba,
    ) -> Result<(), SurfaceError> {
        finite("stroke_line", &[from.x, from.y, to.x, to.y, width])?;
        let (a, b) = (self.to_device(from), self.to_device(to));
        let half = (width * self.scale / 2.0).max(0.5);
        let pad = half + 1.0;
        self.shade(
            Point::new(a.x.min(b.x) - pad, a.y.min(b.y) - pad),
            Point::new(a.x.max(b.x) + pad, a.y.max(b.y) + pad),
            color,
            |p| (half - segment_distance(p, a, b) + 0.5).clamp(0.0, 1.0),
        );
        Ok(())
    }

    fn stroke_circle(
        &mut self,
        center: Point,
        radius: f32,
        width: f32,
        color: Rgba,
    ) -> Result<(), SurfaceError> {
        finite("stroke_circle", &[center.x, center.y, radius, width])?;
        let c = self.to_device(center);
        let r = radius.max(0.0) * self.scale;
        let half = (width * self.scale / 2.0).max(0.5);
        let pad = r + half + 1.0;
        self.shade(
            Point::new(c.x - pad, c.y - pad),
            Point::new(c.x + pad, c.y + pad),
            color,
            |p| (half - (p.distance(c) - r).abs() + 0.5).clamp(0.0, 1.0),
        );
        Ok(())
    }

    fn glow(
        &mut self,
        center: Point,
        radius: f32,
        blur: f32,
        color: Rgba,
    ) -> Result<(), SurfaceError> {
        finite("glow", &[center.x, center.y, radius, blur])?;
        let c = self.to_device(center);
        let r = radius.max(0.0) * self.scale;
        let spread = (blur.max(0.0) * self.scale).max(1.0);
        let pad = r + spread + 1.0;
        let halo = color.fade(0.5);
        self.shade(
            Point::new(c.x - pad, c.y - pad),
            Point::new(c.x + pad, c.y + pad),
            halo,
            |p| {
                let d = p.distance(c);
                if d <= r {
                    0.0
                } else {
                    let falloff = 1.0 - (d - r) / spread;
                    falloff.max(0.0).powi(2)
                }
            },
        );
        Ok(())
    }

    fn fill_text(
        &mut self,
        at: Point,
        text: &str,
        scale: f32,
        color: Rgba,
    ) -> Result<(), SurfaceError> {
        finite("fill_text", &[at.x, at.y, scale])?;
        self.glyphs.push(GlyphOverlay {
            at: self.to_device(at),
            text: text.to_string(),
            scale,
            color,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgba = Rgba::rgb(255, 0, 0);

    #[test]
    fn test_fill_blends_source_over() {
        let mut buf = PixelBuffer::new(2, 2);
        buf.fill(RED).unwrap();
        buf.fill(Rgba::rgb(0, 0, 255).with_alpha(0.5)).unwrap();
        assert_eq!(buf.pixel(0, 0), Some(Rgba::new(128, 0, 128, 1.0)));
    }

    #[test]
    fn test_fill_on_transparent_keeps_source_color() {
        let mut buf = PixelBuffer::new(1, 1);
        buf.fill(RED.with_alpha(0.25)).unwrap();
        let px = buf.pixel(0, 0).unwrap();
        assert_eq!((px.r, px.g, px.b), (255, 0, 0));
        assert!((px.a - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_circle_covers_center_not_corner() {
        let mut buf = PixelBuffer::new(20, 20);
        buf.fill_circle(Point::new(10.0, 10.0), 4.0, RED).unwrap();
        assert_eq!(buf.pixel(10, 10).map(|p| p.a), Some(1.0));
        assert_eq!(buf.pixel(0, 0).map(|p| p.a), Some(0.0));
    }

    #[test]
    fn test_scale_maps_logical_to_device() {
        let mut buf = PixelBuffer::new(10, 10);
        buf.set_scale(0.25);
        buf.fill_circle(Point::new(20.0, 20.0), 8.0, RED).unwrap();
        assert_eq!(buf.pixel(5, 5).map(|p| p.a), Some(1.0));
        assert_eq!(buf.pixel(9, 9).map(|p| p.a), Some(0.0));
    }

    #[test]
    fn test_polygon_fill() {
        let mut buf = PixelBuffer::new(10, 10);
        let square = [
            Point::new(2.0, 2.0),
            Point::new(8.0, 2.0),
            Point::new(8.0, 8.0),
            Point::new(2.0, 8.0),
        ];
        buf.fill_polygon(&square, RED).unwrap();
        assert_eq!(buf.pixel(5, 5).map(|p| p.a), Some(1.0));
        assert_eq!(buf.pixel(0, 5).map(|p| p.a), Some(0.0));
    }

    #[test]
    fn test_degenerate_polygon_is_an_error() {
        let mut buf = PixelBuffer::new(4, 4);
        let line = [Point::new(0.0, 0.0), Point::new(3.0, 3.0)];
        assert_eq!(
            buf.fill_polygon(&line, RED),
            Err(SurfaceError::DegeneratePolygon(2))
        );
    }

    #[test]
    fn test_line_touches_both_ends() {
        let mut buf = PixelBuffer::new(10, 3);
        buf.stroke_line(Point::new(0.5, 1.5), Point::new(9.5, 1.5), 1.0, RED)
            .unwrap();
        assert!(buf.pixel(0, 1).unwrap().a > 0.9);
        assert!(buf.pixel(9, 1).unwrap().a > 0.9);
        assert_eq!(buf.pixel(5, 0).map(|p| p.a), Some(0.0));
    }

    #[test]
    fn test_ring_leaves_center_empty() {
        let mut buf = PixelBuffer::new(30, 30);
        buf.stroke_circle(Point::new(15.0, 15.0), 10.0, 2.0, RED)
            .unwrap();
        assert_eq!(buf.pixel(15, 15).map(|p| p.a), Some(0.0));
        assert!(buf.pixel(25, 15).unwrap().a > 0.5);
    }

    #[test]
    fn test_non_finite_geometry_is_rejected() {
        let mut buf = PixelBuffer::new(4, 4);
        let err = buf
            .fill_circle(Point::new(f32::NAN, 1.0), 1.0, RED)
            .unwrap_err();
        assert_eq!(err, SurfaceError::NonFinite { op: "fill_circle" });
    }

    #[test]
    fn test_text_is_recorded_and_cleared_per_frame() {
        let mut buf = PixelBuffer::new(10, 10);
        buf.set_scale(0.5);
        buf.fill_text(Point::new(8.0, 4.0), "λ", 1.0, RED).unwrap();
        assert_eq!(buf.glyphs().len(), 1);
        assert_eq!(buf.glyphs()[0].at, Point::new(4.0, 2.0));
        buf.begin_frame();
        assert!(buf.glyphs().is_empty());
    }

    #[test]
    fn test_drawing_outside_is_clipped() {
        let mut buf = PixelBuffer::new(4, 4);
        buf.fill_circle(Point::new(-50.0, -50.0), 3.0, RED).unwrap();
        buf.fill_circle(Point::new(500.0, 2.0), 3.0, RED).unwrap();
        for y in 0..4 {
            for x in 0..4 {
                assert_eq!(buf.pixel(x, y).map(|p| p.a), Some(0.0));
            }
        }
    }

    #[test]
    fn test_resize_reallocates() {
        let mut buf = PixelBuffer::new(2, 2);
        buf.fill(RED).unwrap();
        buf.resize(3, 5);
        assert_eq!(buf.size(), (3, 5));
        assert_eq!(buf.pixel(2, 4).map(|p| p.a), Some(0.0));
        assert_eq!(buf.pixel(3, 0), None);
    }
}
