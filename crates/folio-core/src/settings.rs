//! Tunables for the animated backdrop.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Backdrop tunables, loaded from the `[backdrop]` config section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackdropSettings {
    /// Number of floating particles; fixed between resizes.
    pub particle_count: usize,
    /// Upper bound on live confetti.
    pub max_confetti: usize,
    /// Confetti spawned per click.
    pub burst_size: usize,
    /// Frames a confetti particle lives for.
    pub confetti_life: u32,
    /// Particles closer than this (logical px) are linked by a line.
    pub link_distance: f32,
    /// Pointer attraction radius in logical px.
    pub attraction_radius: f32,
    /// Velocity nudge per pixel of pointer offset.
    pub attraction_strength: f32,
    /// Resize events closer together than this are coalesced.
    pub resize_debounce_ms: u64,
    /// Device pixel ratio cap for the backing surface.
    pub max_pixel_ratio: f32,
    /// Opacity of the flat black wash laid over each frame.
    pub overlay_alpha: f32,
    /// Target frame rate.
    pub fps: u32,
}

impl Default for BackdropSettings {
    fn default() -> Self {
        Self {
            particle_count: 20,
            max_confetti: 50,
            burst_size: 8,
            confetti_life: 100,
            link_distance: 150.0,
            attraction_radius: 100.0,
            attraction_strength: 0.0001,
            resize_debounce_ms: 100,
            max_pixel_ratio: 2.0,
            overlay_alpha: 0.02,
            fps: 30,
        }
    }
}

impl BackdropSettings {
    pub fn resize_debounce(&self) -> Duration {
        Duration::from_millis(self.resize_debounce_ms)
    }

    /// Time between frames at the configured rate.
    pub fn frame_interval(&self) -> Duration {
        Duration::from_micros(1_000_000 / u64::from(self.fps.max(1)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_interval() {
        let settings = BackdropSettings {
            fps: 50,
            ..Default::default()
        };
        assert_eq!(settings.frame_interval(), Duration::from_millis(20));
    }

    #[test]
    fn test_zero_fps_does_not_divide_by_zero() {
        let settings = BackdropSettings {
            fps: 0,
            ..Default::default()
        };
        assert_eq!(settings.frame_interval(), Duration::from_secs(1));
    }
}
