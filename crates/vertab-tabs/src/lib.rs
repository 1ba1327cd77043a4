//! Vertab Tab Folder
//!
//! A tab container whose labels are drawn as vertical strips along the left
//! edge. Exactly one tab is selected once the folder holds any tabs;
//! selection changes go through cancelable [`SelectionEvent`]s, and each
//! label keeps a lazily regenerated bitmap of its rotated title.

mod error;
mod event;
mod folder;
pub mod headless;
mod item;
mod label;
pub mod toolkit;
mod update;

pub use error::TabError;
pub use event::{FnListener, ListenerId, SelectionEvent, SelectionListener};
pub use folder::{ItemRef, TabFolder};
pub use item::{ItemId, TabItem};
pub use label::{LabelMouseListener, TabLabel};

pub type Result<T> = std::result::Result<T, TabError>;
