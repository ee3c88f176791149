use thiserror::Error;

use crate::model::WindowId;

/// The pixel sampler could not produce a color. Recovered by falling back to
/// the theme color.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SamplingError {
    #[error("pixel sampling service unavailable: {0}")]
    Unavailable(String),
    #[error("pixel sampling failed: {0}")]
    Failed(String),
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ShellError {
    /// The window was destroyed before we got to it. Expected while windows
    /// are being torn down.
    #[error("window {0:?} is no longer managed")]
    WindowGone(WindowId),
}
