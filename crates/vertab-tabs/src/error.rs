//! Tab folder error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TabError {
    #[error("Tab index out of range: {index} (folder has {len} tabs)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Not implemented: {0}")]
    NotImplemented(&'static str),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Tab belongs to a different folder")]
    ForeignItem,

    #[error("Tab has been disposed")]
    ItemDisposed,

    #[error("Tab folder has been dropped")]
    FolderDisposed,

    #[error("Graphics error: {0}")]
    Graphics(#[from] vertab_graphics::GraphicsError),
}
