//! Toolkit calls queued while the folder state is locked
//!
//! Label surfaces and content panes belong to the toolkit, which may call
//! back into the folder while handling them, e.g. a synchronous repaint that
//! reads the label bitmap. Folder mutations queue those calls here and apply
//! them only after the state lock has been released.

use std::sync::Arc;

use vertab_graphics::Bitmap;

use crate::toolkit::{Alignment, Control, GridData, LabelSurface};

pub(crate) enum SurfaceUpdate {
    /// Show `image` on `surface` and repaint it.
    Repaint {
        surface: Arc<dyn LabelSurface>,
        image: Arc<Bitmap>,
    },
    /// Give a newly attached pane its layout data.
    Attach {
        control: Arc<dyn Control>,
        active: bool,
    },
    /// Show or hide a pane, taking it in or out of layout.
    Show {
        control: Arc<dyn Control>,
        visible: bool,
    },
    Dispose(Arc<dyn LabelSurface>),
}

#[derive(Default)]
pub(crate) struct Updates(Vec<SurfaceUpdate>);

impl Updates {
    pub(crate) fn push(&mut self, update: SurfaceUpdate) {
        self.0.push(update);
    }

    /// Apply in queue order. Must be called with no folder lock held.
    pub(crate) fn apply(self) {
        for update in self.0 {
            match update {
                SurfaceUpdate::Repaint { surface, image } => {
                    surface.set_image(image);
                    surface.redraw();
                }
                SurfaceUpdate::Attach { control, active } => {
                    control.set_layout_data(GridData {
                        horizontal: Alignment::Fill,
                        vertical: Alignment::Fill,
                        grab_horizontal: true,
                        grab_vertical: false,
                        exclude: !active,
                    });
                    control.set_visible(active);
                }
                SurfaceUpdate::Show { control, visible } => {
                    let mut data = control.layout_data().unwrap_or_default();
                    data.exclude = !visible;
                    control.set_layout_data(data);
                    control.set_visible(visible);
                }
                SurfaceUpdate::Dispose(surface) => surface.dispose(),
            }
        }
    }
}
