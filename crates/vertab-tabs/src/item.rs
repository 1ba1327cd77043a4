//! Tab items
//!
//! A `TabItem` is a lightweight handle: an id plus a weak reference back to
//! the folder that owns the tab's state. Handles never keep a folder alive.

use std::sync::{Arc, Weak};

use uuid::Uuid;
use vertab_graphics::{Bitmap, Font, GradientConfig};

use crate::error::TabError;
use crate::folder::{FolderShared, TabFolder};
use crate::label::TabLabel;
use crate::toolkit::Control;
use crate::update::{SurfaceUpdate, Updates};
use crate::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ItemId(Uuid);

impl ItemId {
    pub(crate) fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone)]
pub struct TabItem {
    id: ItemId,
    folder: Weak<FolderShared>,
}

impl TabItem {
    /// Create a tab at the end of `folder`.
    pub fn new(folder: &TabFolder) -> Self {
        folder.add_item()
    }

    pub(crate) fn handle(id: ItemId, folder: Weak<FolderShared>) -> Self {
        Self { id, folder }
    }

    pub fn id(&self) -> ItemId {
        self.id
    }

    /// The owning folder, if it is still alive.
    pub fn folder(&self) -> Option<TabFolder> {
        self.folder.upgrade().map(TabFolder::from_shared)
    }

    pub(crate) fn belongs_to(&self, shared: &Arc<FolderShared>) -> bool {
        std::ptr::eq(self.folder.as_ptr(), Arc::as_ptr(shared))
    }

    fn owner(&self) -> Result<TabFolder> {
        self.folder().ok_or(TabError::FolderDisposed)
    }

    pub fn title(&self) -> Result<String> {
        self.owner()?
            .with_entry(self, |entry, _| entry.title.clone())
    }

    pub fn set_title(&self, title: impl Into<String>) -> Result<()> {
        let title = title.into();
        self.owner()?.with_entry(self, |entry, _| {
            entry.label.set_title(title.clone());
            entry.title = title;
        })
    }

    pub fn control(&self) -> Result<Option<Arc<dyn Control>>> {
        self.owner()?
            .with_entry(self, |entry, _| entry.control.clone())
    }

    /// Attach the content pane shown while this tab is selected.
    pub fn set_control(&self, control: Arc<dyn Control>) -> Result<()> {
        self.owner()?
            .with_entry(self, |entry, updates| entry.set_control(control, updates))
    }

    /// Ask the folder to select this tab. Returns `false` when a selection
    /// listener vetoed the change.
    pub fn activate(&self) -> Result<bool> {
        self.owner()?.set_selection(self)
    }

    /// Whether this tab is the folder's selection. Disposed tabs are inactive.
    pub fn is_active(&self) -> bool {
        self.owner()
            .and_then(|folder| folder.with_entry(self, |entry, _| entry.is_active()))
            .unwrap_or(false)
    }

    /// The folder's selection gradient; tabs hold none of their own.
    pub fn selection_color_options(&self) -> Option<Arc<GradientConfig>> {
        self.folder().and_then(|folder| folder.selection_background())
    }

    pub fn font(&self) -> Result<Arc<Font>> {
        self.owner()?
            .with_entry(self, |entry, _| Arc::clone(entry.label.font()))
    }

    pub fn set_font(&self, font: Arc<Font>) -> Result<()> {
        self.owner()?
            .with_entry(self, |entry, _| entry.label.set_font(font))
    }

    /// The label bitmap as currently shown in the tab strip.
    pub fn label_bitmap(&self) -> Result<Arc<Bitmap>> {
        self.owner()?.with_label(self, |label| label.bitmap())
    }

    /// Remove the tab from its folder. The content pane is hidden and
    /// excluded from layout but otherwise left to its owner.
    pub fn dispose(&self) -> Result<()> {
        self.owner()?.remove_item(self)
    }

    pub fn is_disposed(&self) -> bool {
        self.folder()
            .map_or(true, |folder| folder.index_of(self).is_none())
    }
}

impl PartialEq for TabItem {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TabItem {}

impl std::hash::Hash for TabItem {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl std::fmt::Debug for TabItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TabItem").field("id", &self.id).finish()
    }
}

/// Folder-side state of one tab.
pub(crate) struct ItemEntry {
    pub(crate) id: ItemId,
    pub(crate) title: String,
    pub(crate) control: Option<Arc<dyn Control>>,
    pub(crate) label: TabLabel,
}

impl ItemEntry {
    pub(crate) fn new(id: ItemId, label: TabLabel) -> Self {
        Self {
            id,
            title: String::new(),
            control: None,
            label,
        }
    }

    pub(crate) fn is_active(&self) -> bool {
        self.label.is_active()
    }

    /// The pane fills both axes and grabs horizontal space; inactive tabs'
    /// panes are excluded from layout, not just hidden.
    pub(crate) fn set_control(&mut self, control: Arc<dyn Control>, updates: &mut Updates) {
        updates.push(SurfaceUpdate::Attach {
            control: Arc::clone(&control),
            active: self.is_active(),
        });
        self.control = Some(control);
    }

    /// Only the folder calls this, while arbitrating the selection.
    pub(crate) fn set_active(&mut self, active: bool, updates: &mut Updates) {
        self.label.set_active(active);
        if let Some(control) = &self.control {
            updates.push(SurfaceUpdate::Show {
                control: Arc::clone(control),
                visible: active,
            });
        }
    }

    pub(crate) fn dispose(&mut self, updates: &mut Updates) {
        if let Some(control) = self.control.take() {
            updates.push(SurfaceUpdate::Show {
                control,
                visible: false,
            });
        }
        updates.push(self.label.dispose());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::{HeadlessPane, HeadlessToolkit};
    use crate::toolkit::Alignment;

    #[test]
    fn test_control_of_inactive_tab_is_excluded() {
        let toolkit = HeadlessToolkit::new();
        let folder = TabFolder::new(&toolkit);
        let first = TabItem::new(&folder);
        let second = TabItem::new(&folder);

        let shown = HeadlessPane::new("first");
        let hidden = HeadlessPane::new("second");
        first.set_control(shown.clone()).unwrap();
        second.set_control(hidden.clone()).unwrap();

        assert!(shown.is_visible());
        assert!(shown.is_laid_out());
        let data = shown.layout_data().unwrap();
        assert_eq!(data.horizontal, Alignment::Fill);
        assert_eq!(data.vertical, Alignment::Fill);
        assert!(data.grab_horizontal);

        assert!(!hidden.is_visible());
        assert!(!hidden.is_laid_out());
    }

    #[test]
    fn test_title_round_trip() {
        let toolkit = HeadlessToolkit::new();
        let folder = TabFolder::new(&toolkit);
        let item = TabItem::new(&folder);
        item.set_title("Item 0").unwrap();
        assert_eq!(item.title().unwrap(), "Item 0");
        let label_title = folder
            .with_label(&item, |label| label.title().to_string())
            .unwrap();
        assert_eq!(label_title, "Item 0");
    }

    #[test]
    fn test_gradient_comes_from_folder() {
        let toolkit = HeadlessToolkit::new();
        let folder = TabFolder::new(&toolkit);
        let item = TabItem::new(&folder);
        assert!(item.selection_color_options().is_none());

        folder
            .set_selection_background(
                vec![vertab_graphics::Color::WHITE, vertab_graphics::Color::BLACK],
                &[50],
                false,
            )
            .unwrap();
        let options = item.selection_color_options().unwrap();
        assert!(!options.is_vertical());
        assert_eq!(options.stops(), &[0.5]);
    }

    #[test]
    fn test_handle_outliving_folder() {
        let toolkit = HeadlessToolkit::new();
        let folder = TabFolder::new(&toolkit);
        let item = TabItem::new(&folder);
        drop(folder);

        assert!(item.folder().is_none());
        assert!(!item.is_active());
        assert!(item.is_disposed());
        assert!(matches!(item.title(), Err(TabError::FolderDisposed)));
        assert!(matches!(item.activate(), Err(TabError::FolderDisposed)));
    }
}
