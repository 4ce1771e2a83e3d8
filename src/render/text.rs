//! Glyph rasterization and text drawing
//!
//! Glyphs come from a `fontdue` font when one is configured, otherwise from
//! a built-in block face with the same metrics model. Both go through the
//! same cache and painter, so layout and caching behave identically.

use std::collections::HashMap;
use std::path::Path;

use fontdue::{Font, FontSettings};

use super::frame::Frame;

/// A rasterized glyph: coverage bitmap plus placement metrics
#[derive(Debug, Clone, Default)]
pub struct Glyph {
    pub xmin: i32,
    pub ymin: i32,
    pub width: usize,
    pub height: usize,
    pub advance: f32,
    pub coverage: Vec<u8>,
}

pub type GlyphCacheKey = (char, u32);

pub type GlyphCache = HashMap<GlyphCacheKey, Glyph>;

/// Source of glyph outlines
pub enum Typeface {
    Font(Box<Font>),
    /// Solid boxes sized from the font size; used when no font is available
    Fallback,
}

impl std::fmt::Debug for Typeface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Typeface::Font(_) => f.write_str("Typeface::Font"),
            Typeface::Fallback => f.write_str("Typeface::Fallback"),
        }
    }
}

impl Typeface {
    /// Parse a TTF/OTF font from memory.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, String> {
        Font::from_bytes(bytes, FontSettings::default())
            .map(|font| Typeface::Font(Box::new(font)))
            .map_err(|e| e.to_string())
    }

    /// Load the configured font, falling back to block glyphs when the
    /// path is missing or unreadable.
    pub fn load(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            tracing::debug!("no font configured, using block glyphs");
            return Typeface::Fallback;
        };
        match std::fs::read(path)
            .map_err(|e| e.to_string())
            .and_then(|bytes| Self::from_bytes(&bytes))
        {
            Ok(typeface) => {
                tracing::debug!("loaded font {}", path.display());
                typeface
            }
            Err(e) => {
                tracing::warn!("Failed to load font {}: {}, using block glyphs", path.display(), e);
                Typeface::Fallback
            }
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Typeface::Fallback)
    }

    /// Distance from the top of a line to its baseline.
    pub fn ascent(&self, size: f32) -> f32 {
        match self {
            Typeface::Font(font) => font
                .horizontal_line_metrics(size)
                .map(|m| m.ascent)
                .unwrap_or(size * 0.8),
            Typeface::Fallback => (size * 0.8).round(),
        }
    }

    /// Total line height in pixels.
    pub fn line_height(&self, size: f32) -> f32 {
        match self {
            Typeface::Font(font) => font
                .horizontal_line_metrics(size)
                .map(|m| m.new_line_size)
                .unwrap_or(size * 1.2),
            Typeface::Fallback => (size * 1.2).round(),
        }
    }

    /// Horizontal advance of one character, without rasterizing it.
    pub fn advance(&self, ch: char, size: f32) -> f32 {
        match self {
            Typeface::Font(font) => font.metrics(ch, size).advance_width,
            Typeface::Fallback => block_advance(size),
        }
    }

    /// Width of a whole string.
    pub fn measure(&self, text: &str, size: f32) -> f32 {
        text.chars().map(|ch| self.advance(ch, size)).sum()
    }

    pub fn rasterize(&self, ch: char, size: f32) -> Glyph {
        match self {
            Typeface::Font(font) => {
                let (metrics, coverage) = font.rasterize(ch, size);
                Glyph {
                    xmin: metrics.xmin,
                    ymin: metrics.ymin,
                    width: metrics.width,
                    height: metrics.height,
                    advance: metrics.advance_width,
                    coverage,
                }
            }
            Typeface::Fallback => block_glyph(ch, size),
        }
    }
}

fn block_advance(size: f32) -> f32 {
    (size * 0.6).round().max(2.0)
}

fn block_glyph(ch: char, size: f32) -> Glyph {
    let advance = block_advance(size);
    if ch.is_whitespace() || ch.is_control() {
        return Glyph {
            advance,
            ..Default::default()
        };
    }
    let width = (advance as usize).saturating_sub(2).max(1);
    let height = (size * 0.7).round().max(1.0) as usize;
    Glyph {
        xmin: 1,
        ymin: 0,
        width,
        height,
        advance,
        coverage: vec![0xFF; width * height],
    }
}

/// Text rendering context wrapping a typeface and glyph cache.
pub struct TextPainter<'a> {
    typeface: &'a Typeface,
    glyph_cache: &'a mut GlyphCache,
    font_size: f32,
    ascent: f32,
}

impl<'a> TextPainter<'a> {
    pub fn new(typeface: &'a Typeface, glyph_cache: &'a mut GlyphCache, font_size: f32) -> Self {
        Self {
            typeface,
            glyph_cache,
            font_size,
            ascent: typeface.ascent(font_size),
        }
    }

    #[inline]
    pub fn ascent(&self) -> f32 {
        self.ascent
    }

    #[inline]
    pub fn glyph_cache_size(&self) -> usize {
        self.glyph_cache.len()
    }

    fn glyph(&mut self, ch: char) -> &Glyph {
        let typeface = self.typeface;
        let size = self.font_size;
        self.glyph_cache
            .entry((ch, size.to_bits()))
            .or_insert_with(|| typeface.rasterize(ch, size))
    }

    /// Measure text width in pixels
    pub fn measure_width(&mut self, text: &str) -> f32 {
        text.chars().map(|ch| self.glyph(ch).advance).sum()
    }

    /// Draw text with its line box's top-left corner at `(x, y)`.
    ///
    /// Glyph placement is computed relative to the origin and then offset
    /// by it, so the same text drawn at two origins differs only by that
    /// translation.
    pub fn draw(&mut self, frame: &mut Frame, x: i64, y: i64, text: &str, color: u32) {
        let ascent = self.ascent;
        let mut pen = 0.0f32;

        for ch in text.chars() {
            let glyph = self.glyph(ch);
            let left = x + (pen.floor() as i64) + glyph.xmin as i64;
            let top = y + (ascent - glyph.height as f32 - glyph.ymin as f32).floor() as i64;

            for gy in 0..glyph.height {
                for gx in 0..glyph.width {
                    let alpha = glyph.coverage[gy * glyph.width + gx];
                    if alpha > 0 {
                        frame.composite_pixel(left + gx as i64, top + gy as i64, color, alpha as f32 / 255.0);
                    }
                }
            }

            pen += glyph.advance;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::frame::Surface;

    #[test]
    fn test_fallback_measure_is_per_char() {
        let typeface = Typeface::Fallback;
        let mut cache = GlyphCache::new();
        let mut painter = TextPainter::new(&typeface, &mut cache, 12.0);
        let one = painter.measure_width("a");
        assert_eq!(painter.measure_width("abc"), one * 3.0);
        assert_eq!(painter.glyph_cache_size(), 3);
        assert_eq!(typeface.measure("abc", 12.0), one * 3.0);
    }

    #[test]
    fn test_draw_is_translation_invariant() {
        let typeface = Typeface::Fallback;
        let mut cache = GlyphCache::new();

        let mut a = Surface::transparent(40, 20);
        let mut b = Surface::transparent(40, 20);
        {
            let mut painter = TextPainter::new(&typeface, &mut cache, 12.0);
            painter.draw(&mut a.frame(), 2, 1, "ab", 0xFFFFFFFF);
            painter.draw(&mut b.frame(), 7, 4, "ab", 0xFFFFFFFF);
        }
        for y in 0..12 {
            for x in 0..30 {
                assert_eq!(a.pixel(x, y), b.pixel(x + 5, y + 3));
            }
        }
    }

    #[test]
    fn test_missing_font_falls_back() {
        let typeface = Typeface::load(Some(Path::new("/nonexistent/font.ttf")));
        assert!(typeface.is_fallback());
        assert!(Typeface::from_bytes(b"not a font").is_err());
    }
}
