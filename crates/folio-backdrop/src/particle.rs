//! Floating particles.

use std::collections::VecDeque;
use std::f32::consts::TAU;

use folio_core::{PALETTE, Point, Rgba, Shape, Size};
use rand::Rng;

use crate::surface::{Surface, SurfaceError};

/// Maximum number of trail samples kept per particle.
pub const TRAIL_LEN: usize = 5;

/// Fraction of speed kept after bouncing off an edge.
const BOUNCE_DAMPING: f32 = 0.8;

/// A remembered position used to draw the fading trail.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrailPoint {
    pub pos: Point,
    pub opacity: f32,
}

/// A floating decorative shape.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub pos: Point,
    pub size: f32,
    pub speed_x: f32,
    pub speed_y: f32,
    pub rotation: f32,
    pub rotation_speed: f32,
    pub opacity: f32,
    pub pulse_speed: f32,
    pub color: Rgba,
    pub shape: Shape,
    trail: VecDeque<TrailPoint>,
}

impl Particle {
    /// A particle at a random place inside `bounds`.
    pub fn random<R: Rng + ?Sized>(rng: &mut R, bounds: Size) -> Self {
        Self {
            pos: Point::new(
                rng.random::<f32>() * bounds.width,
                rng.random::<f32>() * bounds.height,
            ),
            size: rng.random::<f32>() * 8.0 + 3.0,
            speed_x: (rng.random::<f32>() - 0.5) * 2.0,
            speed_y: (rng.random::<f32>() - 0.5) * 2.0,
            rotation: rng.random::<f32>() * TAU,
            rotation_speed: (rng.random::<f32>() - 0.5) * 0.05,
            opacity: rng.random::<f32>() * 0.6 + 0.2,
            pulse_speed: rng.random::<f32>() * 0.02 + 0.01,
            color: PALETTE[rng.random_range(0..PALETTE.len())],
            shape: Shape::ALL[rng.random_range(0..Shape::ALL.len())],
            trail: VecDeque::with_capacity(TRAIL_LEN + 1),
        }
    }

    /// A fresh population of `count` particles.
    pub fn populate<R: Rng + ?Sized>(rng: &mut R, count: usize, bounds: Size) -> Vec<Self> {
        (0..count).map(|_| Self::random(rng, bounds)).collect()
    }

    pub fn trail(&self) -> impl ExactSizeIterator<Item = &TrailPoint> {
        self.trail.iter()
    }

    /// Nudge velocity toward `target` if it is within `radius`.
    pub fn attract(&mut self, target: Point, radius: f32, strength: f32) {
        let dx = target.x - self.pos.x;
        let dy = target.y - self.pos.y;
        if dx * dx + dy * dy < radius * radius {
            self.speed_x += dx * strength;
            self.speed_y += dy * strength;
        }
    }

    /// Advance one frame at time `time_ms`, bouncing inside `bounds`.
    pub fn update(&mut self, time_ms: f64, bounds: Size) {
        self.trail.push_back(TrailPoint {
            pos: self.pos,
            opacity: self.opacity,
        });
        while self.trail.len() > TRAIL_LEN {
            self.trail.pop_front();
        }

        self.pos.x += self.speed_x;
        self.pos.y += self.speed_y;
        self.rotation = (self.rotation + self.rotation_speed) % TAU;

        self.opacity = 0.3 + ((time_ms * self.pulse_speed as f64).sin() as f32) * 0.3;

        if self.pos.x < 0.0 || self.pos.x > bounds.width {
            self.speed_x *= -BOUNCE_DAMPING;
            self.pos.x = self.pos.x.clamp(0.0, bounds.width.max(0.0));
        }
        if self.pos.y < 0.0 || self.pos.y > bounds.height {
            self.speed_y *= -BOUNCE_DAMPING;
            self.pos.y = self.pos.y.clamp(0.0, bounds.height.max(0.0));
        }
    }

    /// Draw the trail, then the glowing shape.
    pub fn draw<S: Surface + ?Sized>(&self, surface: &mut S) -> Result<(), SurfaceError> {
        let len = self.trail.len() as f32;
        for (i, point) in self.trail.iter().enumerate() {
            let alpha = (i as f32 / len) * self.opacity * 0.3;
            surface.fill_circle(point.pos, self.size * 0.3, self.color.with_alpha(alpha))?;
        }

        let color = self.color.with_alpha(self.opacity);
        surface.glow(self.pos, self.size, self.size * 2.0, color)?;

        match self.shape {
            Shape::Circle => surface.fill_circle(self.pos, self.size, color),
            shape => {
                let (sin, cos) = self.rotation.sin_cos();
                let points: Vec<Point> = shape
                    .vertices(self.size)
                    .into_iter()
                    .map(|(x, y)| {
                        Point::new(self.pos.x + x * cos - y * sin, self.pos.y + x * sin + y * cos)
                    })
                    .collect();
                surface.fill_polygon(&points, color)
            }
        }
    }
}
