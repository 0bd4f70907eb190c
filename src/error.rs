//! Error type shared by the cluster.

use thiserror::Error;

/// Errors that can occur while configuring or starting the cluster.
#[derive(Error, Debug)]
pub enum ClusterError {
    /// A sweep type name that no gauge understands.
    #[error("Unsupported sweep type: {0}")]
    UnsupportedSweep(String),

    /// Gauge radius must be finite and positive.
    #[error("Invalid gauge radius: {0}")]
    InvalidRadius(f32),

    /// Gauge center offset must be finite.
    #[error("Invalid gauge offset: ({0}, {1})")]
    InvalidOffset(f32, f32),

    /// A command-line flag was given a value it could not use.
    #[error("Invalid value for {flag}: {value}")]
    InvalidArgument { flag: String, value: String },

    /// Failed to create or run the event loop.
    #[error("Event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    /// Failed to create the window.
    #[error("Window creation failed: {0}")]
    Window(#[from] winit::error::OsError),

    /// Failed to create the framebuffer surface.
    #[error("Surface error: {0}")]
    Surface(#[from] pixels::Error),
}
