//! Glyph constants for the backdrop.

/// Glyphs drifting along the top of the surface.
pub const FLOATING_GLYPHS: &[&str] = &["⚛", "🚀", "💻", "🔧", "⚡", "🎨", "🌟", "💎"];

/// Glyphs that grow and change color near the pointer.
pub const INTERACTIVE_GLYPHS: &[&str] = &["{ }", "</>", "λ", "∞", "◉", "◈"];
