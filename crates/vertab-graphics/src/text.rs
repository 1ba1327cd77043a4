//! Font-backed typesetting via cosmic-text
//!
//! Shapes titles with the fonts installed on the system (or supplied as raw
//! font data) and rasterizes glyphs through a swash cache into a
//! [`GlyphMask`].

use cosmic_text::{
    Attrs, Buffer, Family, FontSystem, Metrics, Shaping, Style, SwashCache, SwashContent, Weight,
    Wrap,
};
use parking_lot::Mutex;

use crate::font::{Font, FontStyle, GlyphMask, Typesetter};
use crate::geometry::Size;

/// Line height as a multiple of the font size.
const LINE_SPACING: f32 = 1.25;

/// Minimum glyph coverage for a pixel to count as ink.
const COVERAGE_THRESHOLD: u8 = 128;

pub struct CosmicTypesetter {
    fonts: Mutex<FontSystem>,
    swash: Mutex<SwashCache>,
}

impl CosmicTypesetter {
    /// Typesetter over the system's installed fonts.
    pub fn new() -> Self {
        Self::from_font_system(FontSystem::new())
    }

    /// Typesetter that also knows the given font files (TTF/OTF bytes).
    pub fn with_font_data<I>(data: I) -> Self
    where
        I: IntoIterator<Item = Vec<u8>>,
    {
        let mut fonts = FontSystem::new();
        for font in data {
            fonts.db_mut().load_font_data(font);
        }
        Self::from_font_system(fonts)
    }

    pub fn from_font_system(fonts: FontSystem) -> Self {
        let faces = fonts.db().faces().count();
        tracing::debug!(faces, "Created cosmic-text typesetter");
        Self {
            fonts: Mutex::new(fonts),
            swash: Mutex::new(SwashCache::new()),
        }
    }

    /// Whether any font face is loaded. Without one nothing gets inked.
    pub fn has_fonts(&self) -> bool {
        self.fonts.lock().db().faces().next().is_some()
    }

    fn shape(fonts: &mut FontSystem, text: &str, font: &Font) -> Buffer {
        let size = font.pixel_size() as f32;
        let mut buffer = Buffer::new(fonts, Metrics::new(size, (size * LINE_SPACING).ceil()));
        buffer.set_wrap(fonts, Wrap::None);
        buffer.set_size(fonts, None, None);
        buffer.set_text(fonts, text, attrs(font), Shaping::Advanced);
        buffer.shape_until_scroll(fonts, false);
        buffer
    }

    fn measure(buffer: &Buffer) -> Size {
        let (mut width, mut height) = (0.0f32, 0.0f32);
        for run in buffer.layout_runs() {
            width = width.max(run.line_w);
            height += run.line_height;
        }
        Size::new(width.ceil() as u32, height.ceil() as u32)
    }
}

fn attrs(font: &Font) -> Attrs<'_> {
    let family = match font.family.to_ascii_lowercase().as_str() {
        "sans" | "sans-serif" => Family::SansSerif,
        "serif" => Family::Serif,
        "mono" | "monospace" => Family::Monospace,
        _ => Family::Name(&font.family),
    };
    let attrs = Attrs::new().family(family);
    match font.style {
        FontStyle::Normal => attrs,
        FontStyle::Bold => attrs.weight(Weight::BOLD),
        FontStyle::Italic => attrs.style(Style::Italic),
    }
}

impl Default for CosmicTypesetter {
    fn default() -> Self {
        Self::new()
    }
}

impl Typesetter for CosmicTypesetter {
    fn extent(&self, text: &str, font: &Font) -> Size {
        let mut fonts = self.fonts.lock();
        let buffer = Self::shape(&mut fonts, text, font);
        Self::measure(&buffer)
    }

    fn rasterize(&self, text: &str, font: &Font) -> GlyphMask {
        let mut fonts = self.fonts.lock();
        let buffer = Self::shape(&mut fonts, text, font);
        let extent = Self::measure(&buffer);
        let mut mask = GlyphMask::new(extent.width, extent.height);

        let mut swash = self.swash.lock();
        for run in buffer.layout_runs() {
            for glyph in run.glyphs.iter() {
                let physical = glyph.physical((0.0, run.line_y), 1.0);
                let Some(image) = swash.get_image(&mut fonts, physical.cache_key) else {
                    continue;
                };

                let coverage = |i: usize| match image.content {
                    SwashContent::Mask => image.data.get(i).copied(),
                    SwashContent::Color => image.data.get(i * 4 + 3).copied(),
                    SwashContent::SubpixelMask => image.data.get(i * 4).copied(),
                };
                let left = physical.x + image.placement.left;
                let top = physical.y - image.placement.top;
                let width = image.placement.width;

                for py in 0..image.placement.height {
                    for px in 0..width {
                        let i = py as usize * width as usize + px as usize;
                        if coverage(i).unwrap_or(0) < COVERAGE_THRESHOLD {
                            continue;
                        }
                        let (x, y) = (left + px as i32, top + py as i32);
                        if x >= 0 && y >= 0 {
                            mask.set(x as u32, y as u32);
                        }
                    }
                }
            }
        }

        mask
    }
}

impl std::fmt::Debug for CosmicTypesetter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CosmicTypesetter")
            .field("has_fonts", &self.has_fonts())
            .finish_non_exhaustive()
    }
}
