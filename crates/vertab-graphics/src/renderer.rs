//! Rotated tab label rendering
//!
//! Produces the bitmap shown in a vertical tab strip: the title turned a
//! quarter so it reads bottom to top, over a flat or gradient background,
//! framed by a one pixel border in the system shadow color.

use std::sync::Arc;

use crate::bitmap::{Bitmap, Canvas};
use crate::color::Color;
use crate::font::{Font, Typesetter};
use crate::geometry::{Rect, Size};
use crate::gradient::GradientConfig;
use crate::palette::{SystemColor, SystemPalette};

#[derive(Clone)]
pub struct RotatedLabelRenderer {
    typesetter: Arc<dyn Typesetter>,
    palette: SystemPalette,
}

impl RotatedLabelRenderer {
    pub fn new(typesetter: Arc<dyn Typesetter>, palette: SystemPalette) -> Self {
        Self {
            typesetter,
            palette,
        }
    }

    pub fn palette(&self) -> &SystemPalette {
        &self.palette
    }

    /// Size of the bitmap `render` will produce for `title`.
    ///
    /// The unrotated extent with axes swapped, never smaller than one pixel
    /// per side so that an empty title still yields a paintable strip.
    pub fn bitmap_size(&self, title: &str, font: &Font) -> Size {
        let extent = self.typesetter.extent(title, font);
        Size::new(extent.width.max(1), extent.height.max(1)).transposed()
    }

    /// Render a label bitmap.
    ///
    /// Inactive labels are filled with `background`. Active labels paint one
    /// two-color band per gradient stop along the configured axis, or fall
    /// back to `background` when no gradient is configured.
    pub fn render(
        &self,
        title: &str,
        font: &Font,
        active: bool,
        gradient: Option<&GradientConfig>,
        foreground: Color,
        background: Color,
    ) -> Bitmap {
        let size = self.bitmap_size(title, font);
        let mut bitmap = Bitmap::new(size, background);
        let mut gc = Canvas::new(&mut bitmap, self.typesetter.as_ref());
        gc.set_foreground(foreground);
        gc.set_background(background);

        let (fg, bg) = (gc.foreground(), gc.background());
        match gradient {
            Some(gradient) if active => paint_gradient(&mut gc, gradient, size),
            _ => gc.fill_rectangle(Rect::from_size(size)),
        }
        gc.set_foreground(self.palette.color(SystemColor::WidgetNormalShadow));
        gc.draw_rectangle(Rect::new(
            0,
            0,
            size.width as i32 - 1,
            size.height as i32 - 1,
        ));
        gc.set_foreground(fg);
        gc.set_background(bg);

        gc.draw_text_rotated_up(title, font, 0, 0);

        tracing::trace!(
            title = %title,
            active,
            width = size.width,
            height = size.height,
            "Rendered rotated label"
        );

        bitmap
    }
}

fn paint_gradient(gc: &mut Canvas<'_>, gradient: &GradientConfig, size: Size) {
    let vertical = gradient.is_vertical();
    let extent = if vertical { size.height } else { size.width };

    for band in gradient.bands(extent) {
        gc.set_foreground(band.from);
        gc.set_background(band.to);
        let rect = if vertical {
            Rect::new(0, band.start as i32, size.width as i32, band.len() as i32)
        } else {
            Rect::new(band.start as i32, 0, band.len() as i32, size.height as i32)
        };
        gc.fill_gradient_rectangle(rect, vertical);
    }
}

impl std::fmt::Debug for RotatedLabelRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RotatedLabelRenderer")
            .field("palette", &self.palette)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::{BlockTypesetter, GlyphMask};

    /// Fixed-extent typesetter that draws nothing, so every pixel is
    /// background, gradient or border.
    struct FixedExtent(Size);

    impl Typesetter for FixedExtent {
        fn extent(&self, _text: &str, _font: &Font) -> Size {
            self.0
        }

        fn rasterize(&self, _text: &str, _font: &Font) -> GlyphMask {
            GlyphMask::new(self.0.width, self.0.height)
        }
    }

    const FG: Color = Color::BLACK;
    const BG: Color = Color::rgb(240, 240, 240);
    const SHADOW: Color = Color::rgb(160, 160, 160);

    fn palette() -> SystemPalette {
        SystemPalette {
            widget_foreground: FG,
            widget_background: BG,
            normal_shadow: SHADOW,
        }
    }

    fn blank_renderer(extent: Size) -> RotatedLabelRenderer {
        RotatedLabelRenderer::new(Arc::new(FixedExtent(extent)), palette())
    }

    fn sample_gradient(vertical: bool) -> GradientConfig {
        GradientConfig::new(
            vec![
                Color::rgb(230, 240, 255),
                Color::rgb(170, 199, 246),
                Color::rgb(135, 178, 247),
            ],
            &[60, 85],
            vertical,
        )
        .unwrap()
    }

    #[test]
    fn test_axes_are_swapped() {
        // Unrotated 100 wide by 20 tall becomes 20 wide by 100 tall.
        let renderer = blank_renderer(Size::new(100, 20));
        let bitmap = renderer.render("x", &Font::default(), false, None, FG, BG);
        assert_eq!(bitmap.size(), Size::new(20, 100));
    }

    #[test]
    fn test_inactive_is_flat_with_border() {
        let renderer = blank_renderer(Size::new(100, 20));
        let gradient = sample_gradient(true);
        let bitmap = renderer.render("x", &Font::default(), false, Some(&gradient), FG, BG);

        assert_eq!(bitmap.pixel(10, 50), Some(BG));
        for (x, y) in [(0, 0), (19, 0), (0, 99), (19, 99), (10, 0), (0, 50)] {
            assert_eq!(bitmap.pixel(x, y), Some(SHADOW), "({}, {})", x, y);
        }
    }

    #[test]
    fn test_active_without_gradient_is_flat() {
        let renderer = blank_renderer(Size::new(100, 20));
        let bitmap = renderer.render("x", &Font::default(), true, None, FG, BG);
        assert_eq!(bitmap.pixel(10, 50), Some(BG));
        assert_eq!(bitmap.pixel(0, 0), Some(SHADOW));
    }

    #[test]
    fn test_vertical_gradient_band_rows() {
        let renderer = blank_renderer(Size::new(100, 20));
        let gradient = sample_gradient(true);
        let colors = gradient.colors().to_vec();
        let bitmap = renderer.render("x", &Font::default(), true, Some(&gradient), FG, BG);

        // Stop 0 spans rows [0, 60), stop 1 spans [60, 85).
        assert_eq!(bitmap.pixel(10, 1), Some(colors[0].lerp(colors[1], 1.0 / 59.0)));
        assert_eq!(bitmap.pixel(10, 59), Some(colors[1]));
        assert_eq!(bitmap.pixel(10, 60), Some(colors[1]));
        assert_eq!(bitmap.pixel(10, 84), Some(colors[2]));

        // Past the last boundary the background shows through.
        for y in 85..99 {
            assert_eq!(bitmap.pixel(10, y), Some(BG), "row {}", y);
        }
    }

    #[test]
    fn test_horizontal_gradient_band_columns() {
        // Rotated bitmap is 100 wide by 20 tall.
        let renderer = blank_renderer(Size::new(20, 100));
        let gradient = sample_gradient(false);
        let colors = gradient.colors().to_vec();
        let bitmap = renderer.render("x", &Font::default(), true, Some(&gradient), FG, BG);
        assert_eq!(bitmap.size(), Size::new(100, 20));

        assert_eq!(bitmap.pixel(59, 10), Some(colors[1]));
        assert_eq!(bitmap.pixel(60, 10), Some(colors[1]));
        assert_eq!(bitmap.pixel(84, 10), Some(colors[2]));
        for x in 85..99 {
            assert_eq!(bitmap.pixel(x, 10), Some(BG), "column {}", x);
        }
        // Gradient runs along x, so a column is uniform apart from the border.
        assert_eq!(bitmap.pixel(30, 1), bitmap.pixel(30, 18));
    }

    #[test]
    fn test_title_is_drawn_in_foreground() {
        let renderer = RotatedLabelRenderer::new(Arc::new(BlockTypesetter::new()), palette());
        let bitmap = renderer.render("Item 0", &Font::default(), false, None, FG, BG);
        let inked = bitmap
            .as_image()
            .pixels()
            .filter(|px| Color::from(**px) == FG)
            .count();
        assert!(inked > 0);
    }

    #[test]
    fn test_empty_title_still_renders() {
        let renderer = RotatedLabelRenderer::new(Arc::new(BlockTypesetter::new()), palette());
        let bitmap = renderer.render("", &Font::default(), false, None, FG, BG);
        assert_eq!(bitmap.width(), BlockTypesetter::new().extent("", &Font::default()).height);
        assert_eq!(bitmap.height(), 1);
    }

    #[test]
    fn test_render_is_deterministic() {
        let renderer = RotatedLabelRenderer::new(Arc::new(BlockTypesetter::new()), palette());
        let gradient = sample_gradient(true);
        let a = renderer.render("Item 2", &Font::default(), true, Some(&gradient), FG, BG);
        let b = renderer.render("Item 2", &Font::default(), true, Some(&gradient), FG, BG);
        assert_eq!(a, b);
    }
}
