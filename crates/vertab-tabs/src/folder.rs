//! Vertical tab folder
//!
//! Owns the ordered tabs, the tab strip and content areas, the shared font
//! and selection gradient, and the selection subscribers. Selection is
//! exclusive: once the first tab is added exactly one tab is active.
//!
//! Locks are never held while subscribers run or while the toolkit handles
//! a surface or pane update, so both may call back into the folder.

use std::sync::Arc;

use parking_lot::RwLock;
use vertab_graphics::{Color, Font, GradientConfig, Point, RotatedLabelRenderer};

use crate::error::TabError;
use crate::event::{FnListener, ListenerId, SelectionEvent, SelectionListener};
use crate::item::{ItemEntry, ItemId, TabItem};
use crate::label::TabLabel;
use crate::toolkit::{Composite, GridData, GridLayout, Layout, RowLayout, Toolkit};
use crate::update::Updates;
use crate::Result;

pub(crate) struct FolderShared {
    state: RwLock<FolderState>,
    selection_background: RwLock<Option<Arc<GradientConfig>>>,
    listeners: RwLock<Vec<(ListenerId, Arc<dyn SelectionListener>)>>,
    root: Arc<dyn Composite>,
    tab_area: Arc<dyn Composite>,
    content_area: Arc<dyn Composite>,
    renderer: RotatedLabelRenderer,
}

struct FolderState {
    items: Vec<ItemEntry>,
    font: Arc<Font>,
}

impl FolderState {
    fn position(&self, id: ItemId) -> Option<usize> {
        self.items.iter().position(|entry| entry.id == id)
    }

    fn active_position(&self) -> Option<usize> {
        self.items.iter().position(|entry| entry.is_active())
    }
}

/// Candidate for [`TabFolder::set_selection`]: a tab or its ordinal.
#[derive(Debug, Clone)]
pub enum ItemRef {
    Item(TabItem),
    Index(usize),
}

impl From<TabItem> for ItemRef {
    fn from(item: TabItem) -> Self {
        ItemRef::Item(item)
    }
}

impl From<&TabItem> for ItemRef {
    fn from(item: &TabItem) -> Self {
        ItemRef::Item(item.clone())
    }
}

impl From<usize> for ItemRef {
    fn from(index: usize) -> Self {
        ItemRef::Index(index)
    }
}

/// Shared handle to a tab folder. Clones refer to the same folder.
#[derive(Clone)]
pub struct TabFolder {
    shared: Arc<FolderShared>,
}

impl TabFolder {
    /// Build the folder's widgets: a two column grid holding the vertical
    /// tab strip and the content area.
    pub fn new(toolkit: &dyn Toolkit) -> Self {
        let root = toolkit.create_composite(
            None,
            Layout::Grid(GridLayout {
                columns: 2,
                equal_width: false,
                horizontal_spacing: -1,
            }),
        );

        let tab_area = toolkit.create_composite(
            Some(&root),
            Layout::Row(RowLayout {
                vertical: true,
                spacing: -1,
                wrap: false,
                margin: 0,
            }),
        );
        tab_area.set_layout_data(GridData::fill_vertical());

        let content_area = toolkit.create_composite(
            Some(&root),
            Layout::Grid(GridLayout {
                columns: 1,
                equal_width: false,
                horizontal_spacing: 0,
            }),
        );
        content_area.set_layout_data(GridData::fill_both());

        let renderer = RotatedLabelRenderer::new(toolkit.typesetter(), toolkit.palette());

        tracing::info!("Created tab folder");

        Self {
            shared: Arc::new(FolderShared {
                state: RwLock::new(FolderState {
                    items: Vec::new(),
                    font: Arc::new(toolkit.system_font()),
                }),
                selection_background: RwLock::new(None),
                listeners: RwLock::new(Vec::new()),
                root,
                tab_area,
                content_area,
                renderer,
            }),
        }
    }

    pub(crate) fn from_shared(shared: Arc<FolderShared>) -> Self {
        Self { shared }
    }

    pub fn composite(&self) -> &Arc<dyn Composite> {
        &self.shared.root
    }

    pub fn tab_area(&self) -> &Arc<dyn Composite> {
        &self.shared.tab_area
    }

    /// Parent for the tabs' content panes.
    pub fn content_area(&self) -> &Arc<dyn Composite> {
        &self.shared.content_area
    }

    /// Set the multi-stop gradient painted behind the selected tab's label.
    ///
    /// `percents` are whole cumulative percents; `colors` must hold one more
    /// entry than `percents`. On error the previous gradient stays in place.
    pub fn set_selection_background(
        &self,
        colors: Vec<Color>,
        percents: &[u8],
        vertical: bool,
    ) -> Result<()> {
        let gradient = GradientConfig::new(colors, percents, vertical)?;
        *self.shared.selection_background.write() = Some(Arc::new(gradient));

        self.update(|state, _| {
            if let Some(index) = state.active_position() {
                state.items[index].label.invalidate();
            }
        });
        Ok(())
    }

    /// Current selection gradient.
    pub fn selection_background(&self) -> Option<Arc<GradientConfig>> {
        self.shared.selection_background.read().clone()
    }

    /// Append a new tab. The first tab added becomes the selection; later
    /// tabs stay inactive until selected.
    pub fn add_item(&self) -> TabItem {
        let item = TabItem::handle(ItemId::new(), Arc::downgrade(&self.shared));
        let surface = self.shared.tab_area.create_label();
        let label = TabLabel::new(
            item.clone(),
            surface,
            self.shared.renderer.clone(),
            self.font(),
            self.shared.tab_area.foreground(),
            self.shared.tab_area.background(),
        );

        let index = self.update(|state, updates| {
            let mut entry = ItemEntry::new(item.id(), label);
            if !Arc::ptr_eq(entry.label.font(), &state.font) {
                entry.label.set_font(Arc::clone(&state.font));
            }
            if state.items.is_empty() {
                entry.set_active(true, updates);
            }
            state.items.push(entry);
            state.items.len() - 1
        });

        tracing::debug!(item_id = %item.id(), index, "Added tab");
        self.layout();
        item
    }

    pub fn get_item(&self, index: usize) -> Result<TabItem> {
        let state = self.shared.state.read();
        state
            .items
            .get(index)
            .map(|entry| self.handle(entry.id))
            .ok_or(TabError::IndexOutOfRange {
                index,
                len: state.items.len(),
            })
    }

    /// Hit testing is not supported.
    pub fn item_at(&self, _point: Point) -> Result<TabItem> {
        Err(TabError::NotImplemented("getting a tab by point"))
    }

    pub fn item_count(&self) -> usize {
        self.shared.state.read().items.len()
    }

    /// All tabs in display order.
    pub fn items(&self) -> Vec<TabItem> {
        self.shared
            .state
            .read()
            .items
            .iter()
            .map(|entry| self.handle(entry.id))
            .collect()
    }

    /// The active tab, `None` only while the folder is empty.
    pub fn selection(&self) -> Option<TabItem> {
        let state = self.shared.state.read();
        state
            .active_position()
            .map(|index| self.handle(state.items[index].id))
    }

    /// Select `target`, a tab of this folder or its ordinal.
    ///
    /// Subscribers are notified first, in registration order; if any of them
    /// clears `proceed` nothing changes and `Ok(false)` is returned. Otherwise
    /// the previous selection is deactivated, the target activated and the
    /// folder laid out again.
    pub fn set_selection(&self, target: impl Into<ItemRef>) -> Result<bool> {
        let candidate = self.resolve(target.into())?;

        let mut event = SelectionEvent::new(candidate.clone());
        let listeners: Vec<_> = self
            .shared
            .listeners
            .read()
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();
        for listener in &listeners {
            listener.widget_selected(&mut event);
        }

        if !event.proceed {
            tracing::debug!(item_id = %candidate.id(), "Tab selection vetoed");
            return Ok(false);
        }

        self.update(|state, updates| -> Result<()> {
            let target = state
                .position(candidate.id())
                .ok_or(TabError::ItemDisposed)?;
            if let Some(current) = state.active_position() {
                state.items[current].set_active(false, updates);
            }
            state.items[target].set_active(true, updates);
            Ok(())
        })?;

        tracing::debug!(item_id = %candidate.id(), "Tab selected");
        self.layout();
        Ok(true)
    }

    pub fn selection_index(&self) -> Option<usize> {
        self.shared.state.read().active_position()
    }

    pub fn index_of(&self, item: &TabItem) -> Option<usize> {
        if !item.belongs_to(&self.shared) {
            return None;
        }
        self.shared.state.read().position(item.id())
    }

    /// Same as [`TabFolder::set_selection`].
    pub fn show_item(&self, item: &TabItem) -> Result<bool> {
        self.set_selection(item)
    }

    /// Register a selection subscriber. `None` is a programming error.
    pub fn add_selection_listener(
        &self,
        listener: Option<Arc<dyn SelectionListener>>,
    ) -> Result<ListenerId> {
        let listener = listener.ok_or_else(|| {
            TabError::InvalidArgument("expected a selection listener or a callback".to_string())
        })?;
        Ok(self.push_listener(listener))
    }

    /// Register a closure as a selection subscriber.
    pub fn on_selection<F>(&self, callback: F) -> ListenerId
    where
        F: Fn(&mut SelectionEvent) + Send + Sync + 'static,
    {
        self.push_listener(Arc::new(FnListener(callback)))
    }

    /// Unsubscribe; returns whether the listener was registered.
    pub fn remove_selection_listener(&self, id: ListenerId) -> bool {
        let mut listeners = self.shared.listeners.write();
        let before = listeners.len();
        listeners.retain(|(registered, _)| *registered != id);
        listeners.len() != before
    }

    pub fn font(&self) -> Arc<Font> {
        Arc::clone(&self.shared.state.read().font)
    }

    /// Replace the shared font and hand it to every tab's label.
    pub fn set_font(&self, font: Font) {
        let font = Arc::new(font);
        self.update(|state, _| {
            state.font = Arc::clone(&font);
            for entry in state.items.iter_mut() {
                entry.label.set_font(Arc::clone(&font));
            }
        });
    }

    /// Run a layout pass over the folder.
    pub fn layout(&self) {
        self.shared.root.layout();
    }

    pub(crate) fn remove_item(&self, item: &TabItem) -> Result<()> {
        self.check_owned(item)?;

        let index = self.update(|state, updates| -> Result<usize> {
            let index = state.position(item.id()).ok_or(TabError::ItemDisposed)?;
            let mut entry = state.items.remove(index);
            let was_active = entry.is_active();
            entry.dispose(updates);

            // Keep exactly one tab selected.
            if was_active && !state.items.is_empty() {
                let next = index.min(state.items.len() - 1);
                state.items[next].set_active(true, updates);
            }
            Ok(index)
        })?;

        tracing::debug!(item_id = %item.id(), index, "Disposed tab");
        self.layout();
        Ok(())
    }

    pub(crate) fn with_entry<T>(
        &self,
        item: &TabItem,
        f: impl FnOnce(&mut ItemEntry, &mut Updates) -> T,
    ) -> Result<T> {
        self.check_owned(item)?;
        self.update(|state, updates| -> Result<T> {
            let index = state.position(item.id()).ok_or(TabError::ItemDisposed)?;
            Ok(f(&mut state.items[index], updates))
        })
    }

    pub(crate) fn with_label<T>(
        &self,
        item: &TabItem,
        f: impl FnOnce(&mut TabLabel) -> T,
    ) -> Result<T> {
        self.with_entry(item, |entry, _| f(&mut entry.label))
    }

    /// Mutate the folder state, then hand the queued surface and pane
    /// updates (including every requested label redraw) to the toolkit
    /// after the lock is released.
    fn update<T>(&self, f: impl FnOnce(&mut FolderState, &mut Updates) -> T) -> T {
        let mut updates = Updates::default();
        let result = {
            let mut state = self.shared.state.write();
            let result = f(&mut *state, &mut updates);
            for entry in state.items.iter_mut() {
                if let Some(redraw) = entry.label.take_redraw() {
                    updates.push(redraw);
                }
            }
            result
        };
        updates.apply();
        result
    }

    fn resolve(&self, target: ItemRef) -> Result<TabItem> {
        match target {
            ItemRef::Index(index) => self.get_item(index),
            ItemRef::Item(item) => {
                self.check_owned(&item)?;
                if self.shared.state.read().position(item.id()).is_none() {
                    return Err(TabError::ItemDisposed);
                }
                Ok(item)
            }
        }
    }

    fn check_owned(&self, item: &TabItem) -> Result<()> {
        if item.belongs_to(&self.shared) {
            Ok(())
        } else {
            Err(TabError::ForeignItem)
        }
    }

    fn handle(&self, id: ItemId) -> TabItem {
        TabItem::handle(id, Arc::downgrade(&self.shared))
    }

    fn push_listener(&self, listener: Arc<dyn SelectionListener>) -> ListenerId {
        let id = ListenerId::next();
        self.shared.listeners.write().push((id, listener));
        id
    }
}

impl std::fmt::Debug for TabFolder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TabFolder")
            .field("items", &self.item_count())
            .field("selection_index", &self.selection_index())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::{HeadlessPane, HeadlessToolkit};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn folder_with(count: usize) -> (HeadlessToolkit, TabFolder) {
        let toolkit = HeadlessToolkit::new();
        let folder = TabFolder::new(&toolkit);
        for i in 0..count {
            folder.add_item().set_title(format!("Item {}", i)).unwrap();
        }
        (toolkit, folder)
    }

    fn active_count(folder: &TabFolder) -> usize {
        folder.items().iter().filter(|item| item.is_active()).count()
    }

    #[test]
    fn test_empty_folder() {
        let (_toolkit, folder) = folder_with(0);
        assert_eq!(folder.item_count(), 0);
        assert!(folder.selection().is_none());
        assert_eq!(folder.selection_index(), None);
    }

    #[test]
    fn test_first_item_is_selected() {
        let (_toolkit, folder) = folder_with(1);
        let first = folder.get_item(0).unwrap();
        assert!(first.is_active());
        assert_eq!(folder.selection(), Some(first.clone()));

        let second = folder.add_item();
        assert!(!second.is_active());
        assert_eq!(folder.selection(), Some(first));
    }

    #[test]
    fn test_set_selection_by_index() {
        let (_toolkit, folder) = folder_with(4);
        assert!(folder.set_selection(2usize).unwrap());
        assert_eq!(folder.selection(), Some(folder.get_item(2).unwrap()));
        assert_eq!(folder.selection_index(), Some(2));
        assert_eq!(active_count(&folder), 1);
    }

    #[test]
    fn test_exclusive_activation_over_sequence() {
        let (_toolkit, folder) = folder_with(3);
        for target in [2usize, 0, 0, 1, 2, 1] {
            folder.set_selection(target).unwrap();
            assert_eq!(active_count(&folder), 1);
            assert_eq!(folder.selection_index(), Some(target));
            folder.add_item();
            assert_eq!(active_count(&folder), 1);
        }
    }

    #[test]
    fn test_get_item_out_of_range() {
        let (_toolkit, folder) = folder_with(2);
        assert!(matches!(
            folder.get_item(2),
            Err(TabError::IndexOutOfRange { index: 2, len: 2 })
        ));
        assert!(matches!(
            folder.set_selection(9usize),
            Err(TabError::IndexOutOfRange { index: 9, len: 2 })
        ));
    }

    #[test]
    fn test_item_at_is_not_implemented() {
        let (_toolkit, folder) = folder_with(2);
        assert!(matches!(
            folder.item_at(Point::new(3, 3)),
            Err(TabError::NotImplemented(_))
        ));
    }

    #[test]
    fn test_index_of() {
        let (_toolkit, folder) = folder_with(3);
        let (_other_toolkit, other) = folder_with(1);
        let item = folder.get_item(1).unwrap();
        assert_eq!(folder.index_of(&item), Some(1));
        assert_eq!(other.index_of(&item), None);
    }

    #[test]
    fn test_foreign_item_rejected() {
        let (_toolkit, folder) = folder_with(2);
        let (_other_toolkit, other) = folder_with(2);
        let foreign = other.get_item(1).unwrap();
        assert!(matches!(
            folder.set_selection(&foreign),
            Err(TabError::ForeignItem)
        ));
        assert_eq!(folder.selection_index(), Some(0));
    }

    #[test]
    fn test_veto_keeps_selection_and_skips_layout() {
        let (toolkit, folder) = folder_with(3);
        folder.on_selection(|event| event.cancel());

        let before = folder.selection();
        let layouts = toolkit.layout_count();
        assert!(!folder.set_selection(2usize).unwrap());
        assert_eq!(folder.selection(), before);
        assert_eq!(toolkit.layout_count(), layouts);
    }

    #[test]
    fn test_applied_selection_lays_out() {
        let (toolkit, folder) = folder_with(3);
        let layouts = toolkit.layout_count();
        assert!(folder.set_selection(1usize).unwrap());
        assert_eq!(toolkit.layout_count(), layouts + 1);
    }

    #[test]
    fn test_listeners_run_in_registration_order() {
        let (_toolkit, folder) = folder_with(2);
        let order = Arc::new(parking_lot::Mutex::new(Vec::new()));

        for name in ["first", "second", "third"] {
            let order = Arc::clone(&order);
            folder.on_selection(move |event| {
                order.lock().push(name);
                if name == "second" {
                    event.cancel();
                }
            });
        }

        assert!(!folder.set_selection(1usize).unwrap());
        // A veto does not stop later subscribers from seeing the event.
        assert_eq!(*order.lock(), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_listener_sees_candidate_and_may_query_folder() {
        let (_toolkit, folder) = folder_with(3);
        let seen = Arc::new(parking_lot::Mutex::new(None));

        let watcher = folder.clone();
        let record = Arc::clone(&seen);
        folder.on_selection(move |event| {
            *record.lock() = Some((watcher.index_of(&event.item), watcher.selection_index()));
        });

        folder.set_selection(2usize).unwrap();
        assert_eq!(*seen.lock(), Some((Some(2), Some(0))));
    }

    struct CountingListener(AtomicUsize);

    impl SelectionListener for CountingListener {
        fn widget_selected(&self, _event: &mut SelectionEvent) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_listener_objects_and_removal() {
        let (_toolkit, folder) = folder_with(2);
        let listener = Arc::new(CountingListener(AtomicUsize::new(0)));
        let id = folder
            .add_selection_listener(Some(listener.clone()))
            .unwrap();

        folder.set_selection(1usize).unwrap();
        assert!(folder.remove_selection_listener(id));
        assert!(!folder.remove_selection_listener(id));
        folder.set_selection(0usize).unwrap();

        assert_eq!(listener.0.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_missing_listener_is_an_argument_error() {
        let (_toolkit, folder) = folder_with(1);
        assert!(matches!(
            folder.add_selection_listener(None),
            Err(TabError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_show_item_selects() {
        let (_toolkit, folder) = folder_with(3);
        let last = folder.get_item(2).unwrap();
        assert!(folder.show_item(&last).unwrap());
        assert!(last.is_active());
    }

    #[test]
    fn test_reselecting_active_item_keeps_it_active() {
        let (_toolkit, folder) = folder_with(2);
        folder.set_selection(0usize).unwrap();
        assert_eq!(folder.selection_index(), Some(0));
        assert_eq!(active_count(&folder), 1);
    }

    #[test]
    fn test_set_font_propagates() {
        let (_toolkit, folder) = folder_with(3);
        folder.set_font(Font::new("Serif", 20));
        assert_eq!(folder.font().family, "Serif");
        for item in folder.items() {
            assert_eq!(item.font().unwrap().size, 20);
        }
        // New tabs pick up the folder font too.
        assert_eq!(folder.add_item().font().unwrap().family, "Serif");
    }

    #[test]
    fn test_invalid_gradient_keeps_previous() {
        let (_toolkit, folder) = folder_with(1);
        folder
            .set_selection_background(vec![Color::WHITE, Color::BLACK], &[100], true)
            .unwrap();
        let err = folder
            .set_selection_background(vec![Color::WHITE, Color::BLACK], &[60, 85], true)
            .unwrap_err();
        assert!(matches!(err, TabError::Graphics(_)));
        assert_eq!(folder.selection_background().unwrap().stops(), &[1.0]);
    }

    #[test]
    fn test_gradient_change_refreshes_selected_label() {
        let (_toolkit, folder) = folder_with(2);
        let selected = folder.get_item(0).unwrap();
        let before = selected.label_bitmap().unwrap();

        folder
            .set_selection_background(
                vec![Color::rgb(255, 0, 0), Color::rgb(0, 0, 255)],
                &[100],
                true,
            )
            .unwrap();
        let after = selected.label_bitmap().unwrap();
        assert_ne!(*before, *after);
    }

    #[test]
    fn test_dispose_selected_moves_selection() {
        let (toolkit, folder) = folder_with(3);
        folder.set_selection(1usize).unwrap();
        let middle = folder.get_item(1).unwrap();

        middle.dispose().unwrap();
        assert!(middle.is_disposed());
        assert_eq!(folder.item_count(), 2);
        assert_eq!(folder.selection_index(), Some(1));
        assert_eq!(folder.selection().unwrap().title().unwrap(), "Item 2");
        assert!(toolkit.labels()[1].is_disposed());

        assert!(matches!(middle.dispose(), Err(TabError::ItemDisposed)));
        assert!(matches!(
            folder.set_selection(&middle),
            Err(TabError::ItemDisposed)
        ));
    }

    #[test]
    fn test_dispose_last_remaining() {
        let (_toolkit, folder) = folder_with(1);
        folder.get_item(0).unwrap().dispose().unwrap();
        assert_eq!(folder.item_count(), 0);
        assert!(folder.selection().is_none());
    }

    #[test]
    fn test_toolkit_callbacks_may_reenter_folder() {
        let (toolkit, folder) = folder_with(2);
        let item = folder.get_item(1).unwrap();
        let label = toolkit.labels().remove(1);

        // A toolkit that paints synchronously reads the bitmap back.
        let painted = Arc::new(parking_lot::Mutex::new(Vec::new()));
        let reader = item.clone();
        let record = Arc::clone(&painted);
        label.on_redraw(move || {
            record.lock().push(reader.label_bitmap().unwrap().size());
        });

        let shown = Arc::new(parking_lot::Mutex::new(Vec::new()));
        let watcher = folder.clone();
        let record = Arc::clone(&shown);
        let pane = HeadlessPane::new("pane");
        pane.on_visibility(move || record.lock().push(watcher.selection_index()));

        item.set_control(pane.clone()).unwrap();
        folder.set_selection(1usize).unwrap();
        item.set_title("Renamed").unwrap();

        assert_eq!(*shown.lock(), vec![Some(0), Some(1)]);
        let painted = painted.lock();
        assert_eq!(painted.len(), 2);
        assert_eq!(painted[1], item.label_bitmap().unwrap().size());
    }

    #[test]
    fn test_oversized_font_is_clamped() {
        let (_toolkit, folder) = folder_with(0);
        let item = folder.add_item();
        item.set_title("I").unwrap();

        folder.set_font(Font::new("Sans", 2_000_000_000));
        let huge = item.label_bitmap().unwrap();
        folder.set_font(Font::new("Sans", vertab_graphics::MAX_FONT_SIZE));
        let max = item.label_bitmap().unwrap();
        assert_eq!(huge.size(), max.size());
    }
}
