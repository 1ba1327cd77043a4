//! Graphics error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GraphicsError {
    #[error("Gradient needs one more color than percents (got {colors} colors, {percents} percents)")]
    GradientMismatch { colors: usize, percents: usize },

    #[error("Gradient percent out of range: {0} (expected 1..=100)")]
    PercentOutOfRange(u8),

    #[error("Gradient stop out of range: {0} (expected a fraction in (0, 1])")]
    StopOutOfRange(f64),

    #[error("Gradient percents must be strictly increasing")]
    PercentsNotIncreasing,

    #[error("Gradient has no colors")]
    EmptyGradient,

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}
