//! Vertical tab label
//!
//! Owns the rotated-title bitmap shown in the tab strip. Every setter that
//! changes the appearance marks the cache dirty and requests a redraw, so
//! the bitmap handed to the surface never reflects a stale title, font or
//! active flag. The folder delivers requested redraws to the surface once
//! its state lock is released.

use std::sync::Arc;

use vertab_graphics::{Bitmap, Color, Font, RotatedLabelRenderer};

use crate::item::TabItem;
use crate::toolkit::{LabelSurface, MouseEvent, MouseListener};
use crate::update::SurfaceUpdate;

pub struct TabLabel {
    item: TabItem,
    surface: Arc<dyn LabelSurface>,
    renderer: RotatedLabelRenderer,
    foreground: Color,
    background: Color,
    title: String,
    active: bool,
    font: Arc<Font>,
    dirty: bool,
    redraw_requested: bool,
    cached: Option<Arc<Bitmap>>,
}

impl TabLabel {
    pub(crate) fn new(
        item: TabItem,
        surface: Arc<dyn LabelSurface>,
        renderer: RotatedLabelRenderer,
        font: Arc<Font>,
        foreground: Color,
        background: Color,
    ) -> Self {
        surface.set_mouse_listener(Arc::new(LabelMouseListener::new(item.clone())));

        Self {
            item,
            surface,
            renderer,
            foreground,
            background,
            title: String::new(),
            active: false,
            font,
            dirty: true,
            redraw_requested: true,
            cached: None,
        }
    }

    pub fn item(&self) -> &TabItem {
        &self.item
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn font(&self) -> &Arc<Font> {
        &self.font
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
        self.invalidate();
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
        self.invalidate();
    }

    pub fn set_font(&mut self, font: Arc<Font>) {
        self.font = font;
        self.invalidate();
    }

    /// Current bitmap, regenerated first if anything changed since the last
    /// read.
    pub fn bitmap(&mut self) -> Arc<Bitmap> {
        match &self.cached {
            Some(bitmap) if !self.dirty => Arc::clone(bitmap),
            _ => {
                let gradient = self.item.selection_color_options();
                let bitmap = Arc::new(self.renderer.render(
                    &self.title,
                    &self.font,
                    self.active,
                    gradient.as_deref(),
                    self.foreground,
                    self.background,
                ));
                tracing::trace!(
                    item_id = %self.item.id(),
                    title = %self.title,
                    active = self.active,
                    "Regenerated label bitmap"
                );
                self.cached = Some(Arc::clone(&bitmap));
                self.dirty = false;
                bitmap
            }
        }
    }

    /// The current bitmap packaged for the surface, to be shown and
    /// repainted once no folder lock is held.
    pub(crate) fn redraw(&mut self) -> SurfaceUpdate {
        self.redraw_requested = false;
        SurfaceUpdate::Repaint {
            surface: Arc::clone(&self.surface),
            image: self.bitmap(),
        }
    }

    pub(crate) fn take_redraw(&mut self) -> Option<SurfaceUpdate> {
        self.redraw_requested.then(|| self.redraw())
    }

    pub(crate) fn invalidate(&mut self) {
        self.dirty = true;
        self.redraw_requested = true;
    }

    pub(crate) fn dispose(&mut self) -> SurfaceUpdate {
        self.cached = None;
        self.redraw_requested = false;
        SurfaceUpdate::Dispose(Arc::clone(&self.surface))
    }
}

impl std::fmt::Debug for TabLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TabLabel")
            .field("item", &self.item.id())
            .field("title", &self.title)
            .field("active", &self.active)
            .field("dirty", &self.dirty)
            .finish_non_exhaustive()
    }
}

/// Pointer handler installed on each label surface.
///
/// Releasing the button over a label asks its tab to become selected.
/// Presses and double clicks are deliberately inert.
pub struct LabelMouseListener {
    item: TabItem,
}

impl LabelMouseListener {
    pub fn new(item: TabItem) -> Self {
        Self { item }
    }
}

impl MouseListener for LabelMouseListener {
    fn mouse_down(&self, _event: &MouseEvent) {}

    fn mouse_up(&self, _event: &MouseEvent) {
        if let Err(e) = self.item.activate() {
            tracing::warn!(item_id = %self.item.id(), "Failed to activate tab: {}", e);
        }
    }

    fn mouse_double_click(&self, _event: &MouseEvent) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::HeadlessToolkit;
    use crate::toolkit::Toolkit;
    use crate::TabFolder;

    /// Grab the label of the first tab in a fresh folder.
    fn with_label<T>(f: impl FnOnce(&mut TabLabel) -> T) -> T {
        let toolkit = HeadlessToolkit::new();
        let folder = TabFolder::new(&toolkit);
        folder
            .set_selection_background(
                vec![Color::rgb(230, 240, 255), Color::rgb(135, 178, 247)],
                &[100],
                true,
            )
            .unwrap();
        let item = folder.add_item();
        item.set_title("Item 0").unwrap();
        folder.with_label(&item, f).unwrap()
    }

    #[test]
    fn test_repeated_reads_share_the_cache() {
        with_label(|label| {
            let a = label.bitmap();
            let b = label.bitmap();
            assert!(Arc::ptr_eq(&a, &b));
            assert!(!label.is_dirty());
        });
    }

    #[test]
    fn test_title_change_regenerates() {
        with_label(|label| {
            let before = label.bitmap();
            label.set_title("Item 1");
            let after = label.bitmap();
            assert!(!Arc::ptr_eq(&before, &after));
            assert_ne!(*before, *after);
        });
    }

    #[test]
    fn test_active_change_regenerates() {
        with_label(|label| {
            assert!(label.is_active());
            let before = label.bitmap();
            label.set_active(false);
            assert_ne!(*before, *label.bitmap());
        });
    }

    #[test]
    fn test_font_change_regenerates() {
        with_label(|label| {
            let before = label.bitmap();
            label.set_font(Arc::new(Font::new("Sans", 24)));
            let after = label.bitmap();
            assert_ne!(before.size(), after.size());
        });
    }

    #[test]
    fn test_setters_push_fresh_image_to_surface() {
        let toolkit = HeadlessToolkit::new();
        let folder = TabFolder::new(&toolkit);
        let item = folder.add_item();
        let surface = toolkit.labels().remove(0);
        let repaints = surface.repaints();

        item.set_title("Renamed").unwrap();

        let shown = surface.image().unwrap();
        let cached = folder.with_label(&item, |label| label.bitmap()).unwrap();
        assert!(Arc::ptr_eq(&shown, &cached));
        assert!(surface.repaints() > repaints);
    }

    #[test]
    fn test_renderer_uses_parent_colors() {
        let toolkit = HeadlessToolkit::new();
        let strip_background = toolkit.palette().widget_background;
        let folder = TabFolder::new(&toolkit);
        let item = folder.add_item();
        folder.set_selection(&folder.add_item()).unwrap();
        item.set_title("a").unwrap();

        let bitmap = folder.with_label(&item, |label| label.bitmap()).unwrap();
        // Inside the border, away from the glyph rows.
        assert_eq!(bitmap.pixel(0, 0), Some(toolkit.palette().normal_shadow));
        assert_eq!(bitmap.pixel(bitmap.width() - 1, 1), Some(toolkit.palette().normal_shadow));
        assert_eq!(bitmap.pixel(1, 1), Some(strip_background));
    }
}
