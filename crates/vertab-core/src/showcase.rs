//! Sample folder
//!
//! A folder with `tab_count` tabs titled "Item 0", "Item 1", ... each
//! owning one content pane, styled from a [`Config`].

use std::sync::Arc;

use vertab_tabs::toolkit::{Control, Toolkit};
use vertab_tabs::{TabFolder, TabItem};

use crate::config::Config;
use crate::Result;

pub struct Showcase {
    pub folder: TabFolder,
    pub items: Vec<TabItem>,
}

impl Showcase {
    /// Build the folder. `make_pane` receives each tab's index and title
    /// and returns the pane shown while that tab is selected.
    pub fn build<F>(toolkit: &dyn Toolkit, config: &Config, mut make_pane: F) -> Result<Self>
    where
        F: FnMut(usize, &str) -> Arc<dyn Control>,
    {
        config.validate()?;

        let folder = TabFolder::new(toolkit);
        folder.set_font(config.font.clone());
        if let Some(selection) = &config.selection {
            folder.set_selection_background(
                selection.colors.clone(),
                &selection.percents,
                selection.vertical,
            )?;
        }

        let mut items = Vec::with_capacity(config.tab_count);
        for index in 0..config.tab_count {
            let title = format!("Item {}", index);
            let item = TabItem::new(&folder);
            item.set_title(title.as_str())?;
            item.set_control(make_pane(index, &title))?;
            items.push(item);
        }

        tracing::info!(tabs = items.len(), "Built showcase folder");
        Ok(Self { folder, items })
    }
}

impl std::fmt::Debug for Showcase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Showcase")
            .field("folder", &self.folder)
            .field("items", &self.items.len())
            .finish()
    }
}
