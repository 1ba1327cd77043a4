//! Selection events and subscribers

use std::sync::atomic::{AtomicU64, Ordering};

use crate::item::TabItem;

/// Raised before a tab becomes selected.
///
/// Subscribers see the candidate in `item` and may clear `proceed` to veto
/// the change. The event lives for a single dispatch.
#[derive(Debug, Clone)]
pub struct SelectionEvent {
    pub item: TabItem,
    pub proceed: bool,
}

impl SelectionEvent {
    pub fn new(item: TabItem) -> Self {
        Self {
            item,
            proceed: true,
        }
    }

    /// Veto the selection change.
    pub fn cancel(&mut self) {
        self.proceed = false;
    }
}

/// Receives selection events in registration order.
pub trait SelectionListener: Send + Sync {
    fn widget_selected(&self, event: &mut SelectionEvent);
}

/// Adapts a closure into a [`SelectionListener`].
pub struct FnListener<F>(pub F);

impl<F> SelectionListener for FnListener<F>
where
    F: Fn(&mut SelectionEvent) + Send + Sync,
{
    fn widget_selected(&self, event: &mut SelectionEvent) {
        (self.0)(event)
    }
}

/// Handle returned on registration, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

impl ListenerId {
    pub(crate) fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}
