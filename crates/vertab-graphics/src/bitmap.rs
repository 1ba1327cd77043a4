//! RGBA bitmaps and the software drawing context that paints them

use std::path::Path;

use image::RgbaImage;

use crate::color::Color;
use crate::font::{Font, Typesetter};
use crate::geometry::{Rect, Size};
use crate::Result;

/// An owned RGBA pixel buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct Bitmap {
    image: RgbaImage,
}

impl Bitmap {
    /// Allocate a bitmap cleared to `fill`.
    pub fn new(size: Size, fill: Color) -> Self {
        Self {
            image: RgbaImage::from_pixel(size.width, size.height, fill.into()),
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn size(&self) -> Size {
        Size::new(self.width(), self.height())
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_size(self.size())
    }

    /// Color at `(x, y)`, `None` outside the bitmap.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        (x < self.width() && y < self.height()).then(|| Color::from(*self.image.get_pixel(x, y)))
    }

    /// Write a pixel, ignoring coordinates outside the bitmap.
    pub fn put_pixel(&mut self, x: i32, y: i32, color: Color) {
        if x < 0 || y < 0 || x as u32 >= self.width() || y as u32 >= self.height() {
            return;
        }
        self.image.put_pixel(x as u32, y as u32, color.into());
    }

    /// Fill `rect` clipped to the bitmap.
    pub fn fill_rect(&mut self, rect: Rect, color: Color) {
        if let Some(clip) = self.bounds().intersection(&rect) {
            for y in clip.y..clip.bottom() {
                for x in clip.x..clip.right() {
                    self.put_pixel(x, y, color);
                }
            }
        }
    }

    pub fn as_image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    /// Write the bitmap as a PNG file.
    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.image
            .save_with_format(path.as_ref(), image::ImageFormat::Png)?;
        Ok(())
    }
}

impl From<RgbaImage> for Bitmap {
    fn from(image: RgbaImage) -> Self {
        Self { image }
    }
}

/// A drawing context over a [`Bitmap`].
///
/// Mirrors the usual toolkit GC contract: `fill_*` operations paint with the
/// background color, outlines and text use the foreground color, and gradients
/// run from foreground to background.
pub struct Canvas<'a> {
    target: &'a mut Bitmap,
    typesetter: &'a dyn Typesetter,
    foreground: Color,
    background: Color,
}

impl<'a> Canvas<'a> {
    pub fn new(target: &'a mut Bitmap, typesetter: &'a dyn Typesetter) -> Self {
        Self {
            target,
            typesetter,
            foreground: Color::BLACK,
            background: Color::WHITE,
        }
    }

    pub fn foreground(&self) -> Color {
        self.foreground
    }

    pub fn set_foreground(&mut self, color: Color) {
        self.foreground = color;
    }

    pub fn background(&self) -> Color {
        self.background
    }

    pub fn set_background(&mut self, color: Color) {
        self.background = color;
    }

    pub fn fill_rectangle(&mut self, rect: Rect) {
        self.target.fill_rect(rect, self.background);
    }

    /// Two-color linear gradient from foreground to background, top to bottom
    /// when `vertical`, left to right otherwise.
    pub fn fill_gradient_rectangle(&mut self, rect: Rect, vertical: bool) {
        let Some(clip) = self.target.bounds().intersection(&rect) else {
            return;
        };
        let span = if vertical { rect.height } else { rect.width };
        let step = |offset: i32| {
            if span > 1 {
                offset as f32 / (span - 1) as f32
            } else {
                0.0
            }
        };

        for y in clip.y..clip.bottom() {
            for x in clip.x..clip.right() {
                let offset = if vertical { y - rect.y } else { x - rect.x };
                let color = self.foreground.lerp(self.background, step(offset));
                self.target.put_pixel(x, y, color);
            }
        }
    }

    /// Outline covering `width + 1` by `height + 1` pixels.
    pub fn draw_rectangle(&mut self, rect: Rect) {
        if rect.width < 0 || rect.height < 0 {
            return;
        }
        let (left, top) = (rect.x, rect.y);
        let (right, bottom) = (rect.x + rect.width, rect.y + rect.height);
        for x in left..=right {
            self.target.put_pixel(x, top, self.foreground);
            self.target.put_pixel(x, bottom, self.foreground);
        }
        for y in top..=bottom {
            self.target.put_pixel(left, y, self.foreground);
            self.target.put_pixel(right, y, self.foreground);
        }
    }

    /// Blit `image` with its top-left corner at `(x, y)`.
    pub fn draw_image(&mut self, image: &Bitmap, x: i32, y: i32) {
        for (sx, sy, px) in image.as_image().enumerate_pixels() {
            self.target
                .put_pixel(x + sx as i32, y + sy as i32, Color::from(*px));
        }
    }

    pub fn text_extent(&self, text: &str, font: &Font) -> Size {
        self.typesetter.extent(text, font)
    }

    /// Draw `text` turned a quarter counter-clockwise so it reads bottom to
    /// top. The rotated text occupies `extent.height` by `extent.width`
    /// pixels starting at `(x, y)`.
    pub fn draw_text_rotated_up(&mut self, text: &str, font: &Font, x: i32, y: i32) {
        let mask = self.typesetter.rasterize(text, font);
        let last = mask.width() as i32 - 1;
        for (u, v) in mask.covered() {
            self.target
                .put_pixel(x + v as i32, y + last - u as i32, self.foreground);
        }
    }
}
