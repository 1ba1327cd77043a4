//! Folder configuration

use std::path::Path;

use serde::{Deserialize, Serialize};
use vertab_graphics::{Color, Font, GradientConfig, SystemPalette, MAX_FONT_SIZE};

use crate::error::CoreError;
use crate::Result;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionBackground {
    pub colors: Vec<Color>,
    /// Cumulative percents, one fewer than `colors`
    pub percents: Vec<u8>,
    #[serde(default = "default_vertical")]
    pub vertical: bool,
}

fn default_vertical() -> bool {
    true
}

impl SelectionBackground {
    pub fn to_gradient(&self) -> Result<GradientConfig> {
        Ok(GradientConfig::new(
            self.colors.clone(),
            &self.percents,
            self.vertical,
        )?)
    }
}

impl Default for SelectionBackground {
    fn default() -> Self {
        Self {
            colors: vec![
                Color::rgb(230, 240, 255),
                Color::rgb(170, 199, 246),
                Color::rgb(135, 178, 247),
            ],
            percents: vec![60, 85],
            vertical: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Font shared by every tab label
    pub font: Font,
    /// System colors handed to the toolkit
    pub palette: SystemPalette,
    /// Gradient behind the selected tab; `None` paints it flat
    pub selection: Option<SelectionBackground>,
    /// Number of sample tabs the showcase creates
    pub tab_count: usize,
    /// Default tracing filter when `RUST_LOG` is unset
    pub log_filter: String,
}

impl Config {
    /// Load from a JSON file. A missing file yields the defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&contents)?;
        config.validate()?;

        tracing::info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.font.size == 0 {
            return Err(CoreError::Config("font size must be positive".to_string()));
        }
        if self.font.size > MAX_FONT_SIZE {
            return Err(CoreError::Config(format!(
                "font size {} exceeds {}",
                self.font.size, MAX_FONT_SIZE
            )));
        }
        if let Some(selection) = &self.selection {
            selection.to_gradient()?;
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            font: Font::default(),
            palette: SystemPalette::default(),
            selection: Some(SelectionBackground::default()),
            tab_count: 4,
            log_filter: "info".to_string(),
        }
    }
}
