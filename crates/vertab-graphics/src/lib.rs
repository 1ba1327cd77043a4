//! Vertab Graphics
//!
//! Software drawing primitives for the vertical tab folder:
//! colors, an RGBA bitmap with a small drawing context, multi-stop
//! gradients and the rotated label renderer. Text goes through the
//! [`Typesetter`] seam: [`CosmicTypesetter`] shapes real fonts, while
//! [`BlockTypesetter`] is a deterministic stand-in for tests.

mod bitmap;
mod color;
mod error;
mod font;
mod geometry;
mod gradient;
mod palette;
mod renderer;
mod text;

pub use bitmap::{Bitmap, Canvas};
pub use color::Color;
pub use error::GraphicsError;
pub use font::{BlockTypesetter, Font, FontStyle, GlyphMask, Typesetter, MAX_FONT_SIZE};
pub use geometry::{Point, Rect, Size};
pub use gradient::{GradientBand, GradientConfig};
pub use palette::{SystemColor, SystemPalette};
pub use renderer::RotatedLabelRenderer;
pub use text::CosmicTypesetter;

pub type Result<T> = std::result::Result<T, GraphicsError>;
