//! In-memory toolkit backend
//!
//! Widgets record what the folder does to them (images, visibility, layout
//! data, layout passes) and pointer input can be injected with
//! [`HeadlessLabel::click`]. No window system is involved.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use vertab_graphics::{
    Bitmap, BlockTypesetter, Canvas, Color, Font, Point, SystemPalette, Typesetter,
};

use crate::toolkit::{
    Composite, Control, GridData, LabelSurface, Layout, MouseEvent, MouseListener, Toolkit,
};

#[derive(Clone)]
pub struct HeadlessToolkit {
    font: Font,
    palette: SystemPalette,
    typesetter: Arc<dyn Typesetter>,
    composites: Arc<Mutex<Vec<Arc<HeadlessComposite>>>>,
}

impl HeadlessToolkit {
    pub fn new() -> Self {
        Self {
            font: Font::default(),
            palette: SystemPalette::default(),
            typesetter: Arc::new(BlockTypesetter::new()),
            composites: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_font(mut self, font: Font) -> Self {
        self.font = font;
        self
    }

    pub fn with_palette(mut self, palette: SystemPalette) -> Self {
        self.palette = palette;
        self
    }

    pub fn with_typesetter(mut self, typesetter: Arc<dyn Typesetter>) -> Self {
        self.typesetter = typesetter;
        self
    }

    /// Every composite created so far, in creation order.
    pub fn composites(&self) -> Vec<Arc<HeadlessComposite>> {
        self.composites.lock().clone()
    }

    /// Every label created so far, in creation order.
    pub fn labels(&self) -> Vec<Arc<HeadlessLabel>> {
        self.composites
            .lock()
            .iter()
            .flat_map(|c| c.labels())
            .collect()
    }

    /// Total layout passes across all composites.
    pub fn layout_count(&self) -> usize {
        self.composites
            .lock()
            .iter()
            .map(|c| c.layout_passes())
            .sum()
    }
}

impl Default for HeadlessToolkit {
    fn default() -> Self {
        Self::new()
    }
}

impl Toolkit for HeadlessToolkit {
    fn create_composite(
        &self,
        _parent: Option<&Arc<dyn Composite>>,
        layout: Layout,
    ) -> Arc<dyn Composite> {
        let composite = Arc::new(HeadlessComposite {
            layout,
            layout_data: Mutex::new(None),
            layout_passes: AtomicUsize::new(0),
            labels: Mutex::new(Vec::new()),
            palette: self.palette.clone(),
            typesetter: Arc::clone(&self.typesetter),
        });
        self.composites.lock().push(Arc::clone(&composite));
        composite
    }

    fn system_font(&self) -> Font {
        self.font.clone()
    }

    fn palette(&self) -> SystemPalette {
        self.palette.clone()
    }

    fn typesetter(&self) -> Arc<dyn Typesetter> {
        Arc::clone(&self.typesetter)
    }
}

pub struct HeadlessComposite {
    layout: Layout,
    layout_data: Mutex<Option<GridData>>,
    layout_passes: AtomicUsize,
    labels: Mutex<Vec<Arc<HeadlessLabel>>>,
    palette: SystemPalette,
    typesetter: Arc<dyn Typesetter>,
}

impl HeadlessComposite {
    pub fn layout_kind(&self) -> Layout {
        self.layout
    }

    pub fn layout_data(&self) -> Option<GridData> {
        *self.layout_data.lock()
    }

    pub fn layout_passes(&self) -> usize {
        self.layout_passes.load(Ordering::SeqCst)
    }

    pub fn labels(&self) -> Vec<Arc<HeadlessLabel>> {
        self.labels.lock().clone()
    }
}

impl Composite for HeadlessComposite {
    fn create_label(&self) -> Arc<dyn LabelSurface> {
        let label = Arc::new(HeadlessLabel {
            image: Mutex::new(None),
            listener: Mutex::new(None),
            repaints: AtomicUsize::new(0),
            disposed: AtomicBool::new(false),
            on_redraw: Mutex::new(None),
            background: self.palette.widget_background,
            typesetter: Arc::clone(&self.typesetter),
        });
        self.labels.lock().push(Arc::clone(&label));
        label
    }

    fn set_layout_data(&self, data: GridData) {
        *self.layout_data.lock() = Some(data);
    }

    fn layout(&self) {
        self.layout_passes.fetch_add(1, Ordering::SeqCst);
    }

    fn foreground(&self) -> Color {
        self.palette.widget_foreground
    }

    fn background(&self) -> Color {
        self.palette.widget_background
    }
}

type Hook = Arc<dyn Fn() + Send + Sync>;

pub struct HeadlessLabel {
    image: Mutex<Option<Arc<Bitmap>>>,
    listener: Mutex<Option<Arc<dyn MouseListener>>>,
    repaints: AtomicUsize,
    disposed: AtomicBool,
    on_redraw: Mutex<Option<Hook>>,
    background: Color,
    typesetter: Arc<dyn Typesetter>,
}

impl HeadlessLabel {
    pub fn image(&self) -> Option<Arc<Bitmap>> {
        self.image.lock().clone()
    }

    pub fn repaints(&self) -> usize {
        self.repaints.load(Ordering::SeqCst)
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::SeqCst)
    }

    /// Run `hook` synchronously on every redraw, the way a toolkit paints
    /// in response to a repaint request.
    pub fn on_redraw<F>(&self, hook: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        *self.on_redraw.lock() = Some(Arc::new(hook));
    }

    /// Press and release the primary button over the label.
    pub fn click(&self) {
        let event = MouseEvent::primary(Point::new(1, 1));
        if let Some(listener) = self.current_listener() {
            listener.mouse_down(&event);
            listener.mouse_up(&event);
        }
    }

    pub fn double_click(&self) {
        let event = MouseEvent::primary(Point::new(1, 1));
        if let Some(listener) = self.current_listener() {
            listener.mouse_down(&event);
            listener.mouse_double_click(&event);
        }
    }

    /// Paint hook: blit the current image at the origin of a fresh surface.
    pub fn paint(&self) -> Option<Bitmap> {
        let image = self.image()?;
        let mut surface = Bitmap::new(image.size(), self.background);
        Canvas::new(&mut surface, self.typesetter.as_ref()).draw_image(&image, 0, 0);
        Some(surface)
    }

    // Listeners are invoked without holding the lock so they may call back
    // into the label.
    fn current_listener(&self) -> Option<Arc<dyn MouseListener>> {
        if self.is_disposed() {
            return None;
        }
        self.listener.lock().clone()
    }
}

impl LabelSurface for HeadlessLabel {
    fn set_image(&self, image: Arc<Bitmap>) {
        *self.image.lock() = Some(image);
    }

    fn set_mouse_listener(&self, listener: Arc<dyn MouseListener>) {
        *self.listener.lock() = Some(listener);
    }

    fn redraw(&self) {
        self.repaints.fetch_add(1, Ordering::SeqCst);
        let hook = self.on_redraw.lock().clone();
        if let Some(hook) = hook {
            hook();
        }
    }

    fn dispose(&self) {
        self.disposed.store(true, Ordering::SeqCst);
        self.listener.lock().take();
        self.image.lock().take();
        self.on_redraw.lock().take();
    }
}

/// A content pane holding a line of text.
pub struct HeadlessPane {
    text: String,
    visible: AtomicBool,
    layout_data: Mutex<Option<GridData>>,
    on_visibility: Mutex<Option<Hook>>,
}

impl HeadlessPane {
    pub fn new(text: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            text: text.into(),
            visible: AtomicBool::new(true),
            layout_data: Mutex::new(None),
            on_visibility: Mutex::new(None),
        })
    }

    /// Run `hook` synchronously whenever the pane is shown or hidden.
    pub fn on_visibility<F>(&self, hook: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        *self.on_visibility.lock() = Some(Arc::new(hook));
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Whether the pane takes part in layout.
    pub fn is_laid_out(&self) -> bool {
        self.layout_data().is_some_and(|data| !data.exclude)
    }
}

impl Control for HeadlessPane {
    fn set_visible(&self, visible: bool) {
        self.visible.store(visible, Ordering::SeqCst);
        let hook = self.on_visibility.lock().clone();
        if let Some(hook) = hook {
            hook();
        }
    }

    fn is_visible(&self) -> bool {
        self.visible.load(Ordering::SeqCst)
    }

    fn set_layout_data(&self, data: GridData) {
        *self.layout_data.lock() = Some(data);
    }

    fn layout_data(&self) -> Option<GridData> {
        *self.layout_data.lock()
    }
}
