//! Font descriptions and text measurement/rasterization
//!
//! The windowing toolkit owns real text shaping. `Typesetter` is the seam it
//! plugs into; `BlockTypesetter` is a deterministic stand-in used by the
//! headless toolkit, drawing every glyph as a 3x5 block pattern derived from
//! its code point.

use serde::{Deserialize, Serialize};

use crate::geometry::Size;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontStyle {
    #[default]
    Normal,
    Bold,
    Italic,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Font {
    pub family: String,
    /// Size in pixels
    pub size: u32,
    #[serde(default)]
    pub style: FontStyle,
}

/// Largest pixel size typesetters honor; bigger fonts are clamped to it.
pub const MAX_FONT_SIZE: u32 = 1024;

impl Font {
    pub fn new(family: impl Into<String>, size: u32) -> Self {
        Self {
            family: family.into(),
            size,
            style: FontStyle::Normal,
        }
    }

    pub fn with_style(mut self, style: FontStyle) -> Self {
        self.style = style;
        self
    }

    /// Size in pixels, clamped to `1..=MAX_FONT_SIZE`.
    pub fn pixel_size(&self) -> u32 {
        self.size.clamp(1, MAX_FONT_SIZE)
    }
}

impl Default for Font {
    fn default() -> Self {
        Self::new("Sans", 12)
    }
}

/// Coverage mask of a rasterized, unrotated line of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlyphMask {
    width: u32,
    height: u32,
    coverage: Vec<bool>,
}

impl GlyphMask {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            coverage: vec![false; (width as usize).saturating_mul(height as usize)],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn is_set(&self, x: u32, y: u32) -> bool {
        x < self.width && y < self.height && self.coverage[self.offset(x, y)]
    }

    pub fn set(&mut self, x: u32, y: u32) {
        if x < self.width && y < self.height {
            let offset = self.offset(x, y);
            self.coverage[offset] = true;
        }
    }

    fn offset(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Iterate over covered pixels as `(x, y)`.
    pub fn covered(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        let width = self.width.max(1) as usize;
        self.coverage
            .iter()
            .enumerate()
            .filter(|(_, set)| **set)
            .map(move |(i, _)| ((i % width) as u32, (i / width) as u32))
    }
}

/// Text measurement and rasterization, provided by the toolkit.
pub trait Typesetter: Send + Sync {
    /// Unrotated extent of `text` rendered in `font`.
    fn extent(&self, text: &str, font: &Font) -> Size;

    /// Rasterize `text` unrotated; the mask has exactly the size of `extent`.
    fn rasterize(&self, text: &str, font: &Font) -> GlyphMask;
}

const GLYPH_COLUMNS: u32 = 3;
const GLYPH_ROWS: u32 = 5;

#[derive(Debug, Clone, Copy, Default)]
pub struct BlockTypesetter;

impl BlockTypesetter {
    pub fn new() -> Self {
        Self
    }

    fn advance(font: &Font) -> u32 {
        let base = (font.pixel_size() * 3 / 5).max(GLYPH_COLUMNS + 1);
        match font.style {
            FontStyle::Bold => base + 1,
            _ => base,
        }
    }

    fn line_height(font: &Font) -> u32 {
        let size = font.pixel_size();
        (size + size / 3).max(GLYPH_ROWS + 2)
    }

    fn pattern(c: char) -> u16 {
        if c.is_whitespace() {
            0
        } else {
            (c as u32 % 0x7FFF) as u16 + 1
        }
    }
}

impl Typesetter for BlockTypesetter {
    fn extent(&self, text: &str, font: &Font) -> Size {
        let chars = u32::try_from(text.chars().count()).unwrap_or(u32::MAX);
        Size::new(
            chars.saturating_mul(Self::advance(font)),
            Self::line_height(font),
        )
    }

    fn rasterize(&self, text: &str, font: &Font) -> GlyphMask {
        let extent = self.extent(text, font);
        let mut mask = GlyphMask::new(extent.width, extent.height);

        let advance = Self::advance(font);
        let glyph_width = advance - 1;
        let glyph_height = extent.height - 2;

        for (i, c) in text.chars().enumerate() {
            let pattern = Self::pattern(c);
            if pattern == 0 {
                continue;
            }
            let origin = (i as u32).saturating_mul(advance);
            if origin >= extent.width {
                break;
            }
            for py in 0..glyph_height {
                for px in 0..glyph_width {
                    let col = px * GLYPH_COLUMNS / glyph_width;
                    let row = py * GLYPH_ROWS / glyph_height;
                    if pattern & (1 << (row * GLYPH_COLUMNS + col)) != 0 {
                        mask.set(origin + px, 1 + py);
                    }
                }
            }
        }

        mask
    }
}
