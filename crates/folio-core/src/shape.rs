//! Particle shapes and the backdrop palette.

use crate::color::Rgba;

/// Particle colors: blue, cyan, indigo, violet, teal.
pub const PALETTE: [Rgba; 5] = [
    Rgba::from_hex(0x3b82f6),
    Rgba::from_hex(0x22d3ee),
    Rgba::from_hex(0x6366f1),
    Rgba::from_hex(0x8b5cf6),
    Rgba::from_hex(0x06b6d4),
];

/// Outline drawn for a particle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Circle,
    Square,
    Triangle,
    Diamond,
}

impl Shape {
    pub const ALL: [Shape; 4] = [Shape::Circle, Shape::Square, Shape::Triangle, Shape::Diamond];

    /// Polygon vertices around the origin for `size`, before rotation.
    ///
    /// Circles have no vertices; callers draw them as arcs.
    pub fn vertices(self, size: f32) -> Vec<(f32, f32)> {
        match self {
            Shape::Circle => Vec::new(),
            Shape::Square => {
                let h = size / 2.0;
                vec![(-h, -h), (h, -h), (h, h), (-h, h)]
            }
            Shape::Triangle => vec![
                (0.0, -size),
                (-size * 0.8, size * 0.6),
                (size * 0.8, size * 0.6),
            ],
            Shape::Diamond => vec![(0.0, -size), (size, 0.0), (0.0, size), (-size, 0.0)],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_counts() {
        assert!(Shape::Circle.vertices(4.0).is_empty());
        assert_eq!(Shape::Square.vertices(4.0).len(), 4);
        assert_eq!(Shape::Triangle.vertices(4.0).len(), 3);
        assert_eq!(Shape::Diamond.vertices(4.0).len(), 4);
    }

    #[test]
    fn test_square_is_half_extent() {
        let v = Shape::Square.vertices(10.0);
        assert_eq!(v[0], (-5.0, -5.0));
        assert_eq!(v[2], (5.0, 5.0));
    }
}
