//! Click-triggered confetti bursts.

use folio_core::{Point, Rgba, hsl_to_rgb};
use rand::Rng;

use crate::surface::{Surface, SurfaceError};

/// Downward acceleration per frame.
const GRAVITY: f32 = 0.05;

/// A short-lived falling speck.
#[derive(Debug, Clone, PartialEq)]
pub struct Confetti {
    pub pos: Point,
    pub vx: f32,
    pub vy: f32,
    pub color: Rgba,
    /// Frames left before removal.
    pub life: u32,
    pub size: f32,
}

/// The live confetti set, capped at a fixed size.
#[derive(Debug, Clone)]
pub struct ConfettiField {
    items: Vec<Confetti>,
    capacity: usize,
    initial_life: u32,
}

impl ConfettiField {
    pub fn new(capacity: usize, initial_life: u32) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
            capacity,
            initial_life: initial_life.max(1),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Confetti> {
        self.items.iter()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Spawn up to `count` confetti at `at`. Returns how many were added.
    ///
    /// Nothing is added once the cap is reached, and a burst is cut short
    /// rather than overflow it.
    pub fn burst<R: Rng + ?Sized>(&mut self, rng: &mut R, at: Point, count: usize) -> usize {
        let room = self.capacity.saturating_sub(self.items.len());
        let count = count.min(room);
        for _ in 0..count {
            self.items.push(Confetti {
                pos: at,
                vx: (rng.random::<f32>() - 0.5) * 4.0,
                vy: (rng.random::<f32>() - 0.5) * 4.0,
                color: hsl_to_rgb(rng.random::<f32>() * 360.0, 1.0, 0.5),
                life: self.initial_life,
                size: rng.random::<f32>() * 3.0 + 2.0,
            });
        }
        count
    }

    /// Move every speck one frame and drop the expired ones.
    pub fn update(&mut self) {
        let mut i = self.items.len();
        while i > 0 {
            i -= 1;
            let c = &mut self.items[i];
            c.pos.x += c.vx;
            c.pos.y += c.vy;
            c.vy += GRAVITY;
            c.life = c.life.saturating_sub(1);
            if c.life == 0 {
                self.items.swap_remove(i);
            }
        }
    }

    /// Draw every speck, fading with remaining life.
    pub fn draw<S: Surface + ?Sized>(&self, surface: &mut S) -> Result<(), SurfaceError> {
        for c in &self.items {
            let alpha = c.life as f32 / self.initial_life as f32;
            surface.fill_circle(c.pos, c.size, c.color.with_alpha(alpha))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_burst_respects_cap() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut field = ConfettiField::new(50, 100);
        for _ in 0..20 {
            field.burst(&mut rng, Point::new(10.0, 10.0), 8);
            assert!(field.len() <= 50);
        }
        assert_eq!(field.len(), 50);
        assert_eq!(field.burst(&mut rng, Point::new(0.0, 0.0), 8), 0);
    }

    #[test]
    fn test_burst_is_truncated_near_cap() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut field = ConfettiField::new(10, 100);
        assert_eq!(field.burst(&mut rng, Point::default(), 8), 8);
        assert_eq!(field.burst(&mut rng, Point::default(), 8), 2);
    }

    #[test]
    fn test_expires_after_exactly_initial_life_ticks() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut field = ConfettiField::new(50, 100);
        field.burst(&mut rng, Point::new(100.0, 100.0), 8);
        for _ in 0..99 {
            field.update();
        }
        assert_eq!(field.len(), 8);
        assert!(field.iter().all(|c| c.life == 1));
        field.update();
        assert!(field.is_empty());
    }

    #[test]
    fn test_gravity_accumulates() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut field = ConfettiField::new(1, 100);
        field.burst(&mut rng, Point::default(), 1);
        let vy0 = field.iter().next().map(|c| c.vy).unwrap();
        for _ in 0..10 {
            field.update();
        }
        let vy = field.iter().next().map(|c| c.vy).unwrap();
        assert!((vy - (vy0 + 0.5)).abs() < 1e-4);
    }

    #[test]
    fn test_spawned_ranges() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut field = ConfettiField::new(500, 100);
        field.burst(&mut rng, Point::new(5.0, 6.0), 500);
        for c in field.iter() {
            assert_eq!(c.pos, Point::new(5.0, 6.0));
            assert!((-2.0..2.0).contains(&c.vx));
            assert!((-2.0..2.0).contains(&c.vy));
            assert!((2.0..5.0).contains(&c.size));
            assert_eq!(c.life, 100);
        }
    }
}
