//! Multi-stop selection gradients
//!
//! A gradient is an ordered list of colors and cumulative stop fractions.
//! Stop `i` runs from the boundary of stop `i - 1` (or `0`) to its own
//! boundary, blending `colors[i]` into `colors[i + 1]`. Only `stops.len()`
//! bands are produced; whatever lies past the last boundary is left to the
//! caller's background.

use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::error::GraphicsError;
use crate::Result;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawGradient")]
pub struct GradientConfig {
    colors: Vec<Color>,
    stops: Vec<f64>,
    vertical: bool,
}

/// Unchecked wire form; deserialization validates through `from_fractions`.
#[derive(Deserialize)]
struct RawGradient {
    colors: Vec<Color>,
    stops: Vec<f64>,
    #[serde(default = "default_vertical")]
    vertical: bool,
}

fn default_vertical() -> bool {
    true
}

impl TryFrom<RawGradient> for GradientConfig {
    type Error = GraphicsError;

    fn try_from(raw: RawGradient) -> Result<Self> {
        Self::from_fractions(raw.colors, raw.stops, raw.vertical)
    }
}

/// One painted span of a gradient along its axis, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GradientBand {
    pub start: u32,
    pub end: u32,
    pub from: Color,
    pub to: Color,
}

impl GradientBand {
    pub fn len(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl GradientConfig {
    /// Build from whole percents (`1..=100`), normalized to fractions.
    pub fn new(colors: Vec<Color>, percents: &[u8], vertical: bool) -> Result<Self> {
        if let Some(&bad) = percents.iter().find(|p| **p == 0 || **p > 100) {
            return Err(GraphicsError::PercentOutOfRange(bad));
        }
        let stops = percents.iter().map(|p| f64::from(*p) / 100.0).collect();
        Self::from_fractions(colors, stops, vertical)
    }

    /// Build from cumulative fractions in `(0, 1]`.
    pub fn from_fractions(colors: Vec<Color>, stops: Vec<f64>, vertical: bool) -> Result<Self> {
        if colors.is_empty() {
            return Err(GraphicsError::EmptyGradient);
        }
        if colors.len() != stops.len() + 1 {
            return Err(GraphicsError::GradientMismatch {
                colors: colors.len(),
                percents: stops.len(),
            });
        }
        if let Some(&bad) = stops.iter().find(|s| !(**s > 0.0 && **s <= 1.0)) {
            return Err(GraphicsError::StopOutOfRange(bad));
        }
        if stops.windows(2).any(|w| w[0] >= w[1]) {
            return Err(GraphicsError::PercentsNotIncreasing);
        }

        Ok(Self {
            colors,
            stops,
            vertical,
        })
    }

    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    /// Cumulative stop fractions.
    pub fn stops(&self) -> &[f64] {
        &self.stops
    }

    pub fn is_vertical(&self) -> bool {
        self.vertical
    }

    /// Bands laid out sequentially over `extent` pixels, without gaps or
    /// overlap between consecutive stops.
    pub fn bands(&self, extent: u32) -> impl Iterator<Item = GradientBand> + '_ {
        let boundary = move |fraction: f64| (f64::from(extent) * fraction).round() as u32;

        self.stops.iter().enumerate().map(move |(idx, stop)| {
            let start = if idx > 0 {
                boundary(self.stops[idx - 1])
            } else {
                0
            };
            GradientBand {
                start,
                end: boundary(*stop),
                from: self.colors[idx],
                to: self.colors[idx + 1],
            }
        })
    }
}
