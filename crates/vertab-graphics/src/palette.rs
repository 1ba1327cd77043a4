//! System color registry

use serde::{Deserialize, Serialize};

use crate::color::Color;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SystemColor {
    WidgetForeground,
    WidgetBackground,
    /// Border color around label strips
    WidgetNormalShadow,
}

/// The toolkit's system colors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemPalette {
    pub widget_foreground: Color,
    pub widget_background: Color,
    pub normal_shadow: Color,
}

impl SystemPalette {
    pub fn color(&self, which: SystemColor) -> Color {
        match which {
            SystemColor::WidgetForeground => self.widget_foreground,
            SystemColor::WidgetBackground => self.widget_background,
            SystemColor::WidgetNormalShadow => self.normal_shadow,
        }
    }
}

impl Default for SystemPalette {
    fn default() -> Self {
        Self {
            widget_foreground: Color::BLACK,
            widget_background: Color::rgb(240, 240, 240),
            normal_shadow: Color::rgb(160, 160, 160),
        }
    }
}
