//! Vertab - Showcase application
//!
//! Builds the sample folder on the headless toolkit, replays a script of
//! tab clicks through the display loop and optionally writes every tab
//! label out as a PNG.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use vertab_core::display::{self, Display};
use vertab_core::headless::{HeadlessPane, HeadlessToolkit};
use vertab_core::{
    BlockTypesetter, Config, CosmicTypesetter, HeadlessDisplay, Showcase, Typesetter,
};

#[derive(Parser, Debug, Default)]
#[command(
    name = "vertab",
    about = "Vertical tab folder showcase",
    version
)]
pub struct Args {
    /// JSON configuration file; defaults apply when it does not exist
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Directory to write the tab label bitmaps to
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Tab indices to click, in order
    #[arg(short, long, value_delimiter = ',')]
    pub select: Vec<usize>,

    /// Write the effective configuration to this path and exit
    #[arg(long)]
    pub write_config: Option<PathBuf>,

    /// How tab titles are shaped and rasterized
    #[arg(short, long, value_enum, default_value_t)]
    pub typesetter: TypesetterKind,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TypesetterKind {
    /// System fonts shaped with cosmic-text
    #[default]
    Cosmic,
    /// Fixed-advance block glyphs, no fonts needed
    Block,
}

impl TypesetterKind {
    pub fn build(self) -> Arc<dyn Typesetter> {
        match self {
            Self::Cosmic => Arc::new(CosmicTypesetter::new()),
            Self::Block => Arc::new(BlockTypesetter::new()),
        }
    }
}

/// Outcome of one showcase session.
#[derive(Debug)]
pub struct Report {
    pub titles: Vec<String>,
    pub selected: Option<usize>,
    pub events: usize,
    pub written: Vec<PathBuf>,
}

pub fn run(args: Args) -> Result<()> {
    let config = match &args.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => Config::default(),
    };

    let filter = if args.verbose {
        "debug"
    } else {
        config.log_filter.as_str()
    };
    vertab_core::init_logging_with(filter);

    if let Some(path) = &args.write_config {
        config
            .save(path)
            .with_context(|| format!("Failed to write config to {}", path.display()))?;
        tracing::info!(path = %path.display(), "Wrote configuration");
        return Ok(());
    }

    tracing::debug!(typesetter = ?args.typesetter, "Loading typesetter");
    let typesetter = args.typesetter.build();
    let report = session(&config, typesetter, &args.select, args.out.as_deref())?;
    tracing::info!(
        tabs = report.titles.len(),
        selected = ?report.selected,
        events = report.events,
        written = report.written.len(),
        "Vertab session finished"
    );
    Ok(())
}

/// Build the folder, replay `clicks` and export labels into `out`.
pub fn session(
    config: &Config,
    typesetter: Arc<dyn Typesetter>,
    clicks: &[usize],
    out: Option<&Path>,
) -> Result<Report> {
    let toolkit = HeadlessToolkit::new()
        .with_font(config.font.clone())
        .with_palette(config.palette.clone())
        .with_typesetter(typesetter);
    let showcase = Showcase::build(&toolkit, config, |_, title| {
        HeadlessPane::new(format!("Text for {}", title))
    })?;

    let labels = toolkit.labels();
    let display = HeadlessDisplay::new();
    for &index in clicks {
        let Some(label) = labels.get(index) else {
            bail!("No tab at index {} ({} tabs)", index, labels.len());
        };
        let label = Arc::clone(label);
        display.post(move || label.click());
    }
    display.close();

    let events = display::run(&display);
    debug_assert!(display.is_disposed());

    let folder = &showcase.folder;
    for item in folder.items() {
        tracing::debug!(title = %item.title()?, active = item.is_active(), "Tab");
    }

    let mut written = Vec::new();
    if let Some(dir) = out {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
        for (index, item) in folder.items().iter().enumerate() {
            let path = dir.join(format!("tab-{}.png", index));
            item.label_bitmap()?
                .save_png(&path)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            written.push(path);
        }
    }

    let titles = folder
        .items()
        .iter()
        .map(|item| item.title())
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(Report {
        titles,
        selected: folder.selection_index(),
        events,
        written,
    })
}
