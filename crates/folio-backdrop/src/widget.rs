//! Ratatui widget presenting a [`PixelBuffer`].

use folio_core::Rgba;
use ratatui::{
    buffer::Buffer,
    layout::{Position, Rect},
    style::{Color, Modifier, Style},
    widgets::Widget,
};

use crate::pixels::PixelBuffer;

/// Upper half block: foreground paints the top pixel, background the bottom.
const HALF_BLOCK: char = '▀';

/// Glyphs drawn at or above this scale are rendered bold.
const BOLD_SCALE: f32 = 0.75;

/// Paints a pixel buffer with two vertical pixels per cell, composited
/// over an opaque base color, then writes its glyph overlays on top.
#[derive(Debug, Clone, Copy)]
pub struct BackdropWidget<'a> {
    pixels: &'a PixelBuffer,
    base: Rgba,
}

impl<'a> BackdropWidget<'a> {
    pub fn new(pixels: &'a PixelBuffer, base: Rgba) -> Self {
        Self { pixels, base }
    }
}

/// Flatten a translucent pixel onto an opaque base.
fn over(px: Rgba, base: Rgba) -> Rgba {
    base.with_alpha(1.0).lerp(px.with_alpha(1.0), px.a)
}

impl Widget for BackdropWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let area = area.intersection(buf.area);
        let sample = |x: u32, y: u32| {
            self.pixels
                .pixel(x, y)
                .map_or(self.base, |px| over(px, self.base))
        };

        for row in 0..area.height {
            for col in 0..area.width {
                let (px, py) = (u32::from(col), u32::from(row) * 2);
                let top = sample(px, py);
                let bottom = sample(px, py + 1);
                if let Some(cell) = buf.cell_mut(Position::new(area.x + col, area.y + row)) {
                    cell.set_char(HALF_BLOCK)
                        .set_fg(Color::from(top))
                        .set_bg(Color::from(bottom));
                }
            }
        }

        for glyph in self.pixels.glyphs() {
            if glyph.at.x < 0.0 || glyph.at.y < 0.0 {
                continue;
            }
            let col = glyph.at.x as u16;
            let row = (glyph.at.y / 2.0) as u16;
            if col >= area.width || row >= area.height {
                continue;
            }
            let behind = sample(u32::from(col), u32::from(row) * 2);
            let fg = behind.lerp(glyph.color.with_alpha(1.0), glyph.color.a);
            let mut style = Style::new().fg(Color::from(fg)).bg(Color::from(behind));
            if glyph.scale >= BOLD_SCALE {
                style = style.add_modifier(Modifier::BOLD);
            }
            let remaining = usize::from(area.width - col);
            buf.set_stringn(area.x + col, area.y + row, &glyph.text, remaining, style);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::Surface;
    use folio_core::Point;

    const BASE: Rgba = Rgba::rgb(10, 20, 30);

    #[test]
    fn test_transparent_buffer_shows_base() {
        let pixels = PixelBuffer::new(4, 4);
        let mut buf = Buffer::empty(Rect::new(0, 0, 4, 2));
        BackdropWidget::new(&pixels, BASE).render(buf.area, &mut buf);

        let cell = &buf[(1, 1)];
        assert_eq!(cell.symbol(), "▀");
        assert_eq!(cell.fg, Color::Rgb(10, 20, 30));
        assert_eq!(cell.bg, Color::Rgb(10, 20, 30));
    }

    #[test]
    fn test_top_and_bottom_pixels_map_to_fg_and_bg() {
        let mut pixels = PixelBuffer::new(2, 2);
        pixels
            .fill_polygon(
                &[
                    Point::new(0.0, 0.0),
                    Point::new(2.0, 0.0),
                    Point::new(2.0, 1.0),
                    Point::new(0.0, 1.0),
                ],
                Rgba::rgb(255, 0, 0),
            )
            .unwrap();
        let mut buf = Buffer::empty(Rect::new(0, 0, 2, 1));
        BackdropWidget::new(&pixels, BASE).render(buf.area, &mut buf);

        assert_eq!(buf[(0, 0)].fg, Color::Rgb(255, 0, 0));
        assert_eq!(buf[(0, 0)].bg, Color::Rgb(10, 20, 30));
    }

    #[test]
    fn test_glyphs_are_written_and_clipped() {
        let mut pixels = PixelBuffer::new(6, 4);
        pixels
            .fill_text(Point::new(1.0, 2.0), "λ", 1.0, Rgba::rgb(255, 255, 255))
            .unwrap();
        pixels
            .fill_text(Point::new(-3.0, 0.0), "x", 1.0, Rgba::rgb(255, 255, 255))
            .unwrap();
        pixels
            .fill_text(Point::new(2.0, 40.0), "y", 1.0, Rgba::rgb(255, 255, 255))
            .unwrap();
        let mut buf = Buffer::empty(Rect::new(0, 0, 6, 2));
        BackdropWidget::new(&pixels, BASE).render(buf.area, &mut buf);

        assert_eq!(buf[(1, 1)].symbol(), "λ");
        assert_eq!(buf[(1, 1)].fg, Color::Rgb(255, 255, 255));
        assert!(buf[(1, 1)].modifier.contains(Modifier::BOLD));
        assert_eq!(buf[(0, 0)].symbol(), "▀");
    }
}
