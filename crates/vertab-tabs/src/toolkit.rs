//! Windowing toolkit seam
//!
//! The tab folder never talks to a native toolkit directly. Containers,
//! label widgets, content panes and pointer dispatch are reached through
//! these traits. All handles are shared (`Arc`) and interior-mutable, the
//! way native widget handles behave.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use vertab_graphics::{Bitmap, Color, Font, Point, SystemPalette, Typesetter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    #[default]
    Beginning,
    Center,
    End,
    Fill,
}

/// Per-child data for a grid layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GridData {
    pub horizontal: Alignment,
    pub vertical: Alignment,
    pub grab_horizontal: bool,
    pub grab_vertical: bool,
    /// Excluded children take no space in the layout at all.
    pub exclude: bool,
}

impl GridData {
    pub fn fill_both() -> Self {
        Self {
            horizontal: Alignment::Fill,
            vertical: Alignment::Fill,
            grab_horizontal: true,
            grab_vertical: true,
            exclude: false,
        }
    }

    pub fn fill_vertical() -> Self {
        Self {
            vertical: Alignment::Fill,
            grab_vertical: true,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridLayout {
    pub columns: u32,
    pub equal_width: bool,
    pub horizontal_spacing: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowLayout {
    pub vertical: bool,
    pub spacing: i32,
    pub wrap: bool,
    pub margin: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Layout {
    Grid(GridLayout),
    Row(RowLayout),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouseEvent {
    pub button: u32,
    pub position: Point,
}

impl MouseEvent {
    pub fn primary(position: Point) -> Self {
        Self {
            button: 1,
            position,
        }
    }
}

/// Receives pointer notifications for a single widget.
pub trait MouseListener: Send + Sync {
    fn mouse_down(&self, event: &MouseEvent);
    fn mouse_up(&self, event: &MouseEvent);
    fn mouse_double_click(&self, event: &MouseEvent);
}

/// A widget that shows a bitmap: the drawable behind a tab label.
pub trait LabelSurface: Send + Sync {
    fn set_image(&self, image: Arc<Bitmap>);
    /// Route pointer events to `listener`, replacing any previous one.
    fn set_mouse_listener(&self, listener: Arc<dyn MouseListener>);
    /// Request a repaint; the toolkit answers by painting the current image.
    fn redraw(&self);
    fn dispose(&self);
}

/// A container with its own layout.
pub trait Composite: Send + Sync {
    fn create_label(&self) -> Arc<dyn LabelSurface>;
    fn set_layout_data(&self, data: GridData);
    /// Run a layout pass over the children.
    fn layout(&self);
    fn foreground(&self) -> Color;
    fn background(&self) -> Color;
}

/// A content pane shown while its tab is selected. Owned by the toolkit.
pub trait Control: Send + Sync {
    fn set_visible(&self, visible: bool);
    fn is_visible(&self) -> bool;
    fn set_layout_data(&self, data: GridData);
    fn layout_data(&self) -> Option<GridData>;
}

/// Entry point into a windowing toolkit.
pub trait Toolkit: Send + Sync {
    fn create_composite(
        &self,
        parent: Option<&Arc<dyn Composite>>,
        layout: Layout,
    ) -> Arc<dyn Composite>;
    fn system_font(&self) -> Font;
    fn palette(&self) -> SystemPalette;
    fn typesetter(&self) -> Arc<dyn Typesetter>;
}
