//! Viewer error type.

use slicevol_core::SlicevolError;
use slicevol_render::RenderError;
use thiserror::Error;

/// Anything that stops the viewer.
#[derive(Error, Debug)]
pub enum ViewerError {
    /// The scan could not be loaded.
    #[error(transparent)]
    Data(#[from] SlicevolError),

    /// GPU setup or drawing failed.
    #[error(transparent)]
    Render(#[from] RenderError),

    /// The event loop could not be created or failed while running.
    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    /// The window could not be created.
    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),
}

/// A specialized Result type for the viewer.
pub type Result<T> = std::result::Result<T, ViewerError>;
