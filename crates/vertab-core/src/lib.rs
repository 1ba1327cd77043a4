//! Vertab Core
//!
//! Glue around the tab folder: configuration, logging, the display event
//! loop and the sample folder used by the `vertab` binary.

mod config;
pub mod display;
mod error;
mod showcase;

pub use config::{Config, SelectionBackground};
pub use display::{Display, HeadlessDisplay};
pub use error::CoreError;
pub use showcase::Showcase;

// Re-export the widget and graphics layers
pub use vertab_graphics::{
    Bitmap, BlockTypesetter, Color, CosmicTypesetter, Font, FontStyle, GradientConfig,
    GraphicsError, RotatedLabelRenderer, SystemPalette, Typesetter, MAX_FONT_SIZE,
};
pub use vertab_tabs::{
    headless, toolkit, ItemRef, SelectionEvent, SelectionListener, TabError, TabFolder, TabItem,
};

pub type Result<T> = std::result::Result<T, CoreError>;

/// Initialize logging from `RUST_LOG`, defaulting to `info`.
pub fn init_logging() {
    init_logging_with("info");
}

/// Initialize logging from `RUST_LOG`, falling back to `default_filter`.
pub fn init_logging_with(default_filter: &str) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    fmt().with_env_filter(filter).with_target(true).init();
}
