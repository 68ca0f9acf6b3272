//! Backend command interface
//!
//! The native side owns hotkey registration, window visibility and
//! persistence. Windows only see it through these request/response
//! commands.

mod local;

use std::future::Future;

use crate::hotkey::{ChordError, HotkeyCombination};
use crate::window::WindowError;

pub use local::LocalBackend;

/// Asynchronous commands exposed to every window
pub trait Backend: Send + Sync + 'static {
    /// Read the saved hotkey
    fn get_hotkey(&self) -> impl Future<Output = Result<HotkeyCombination, BackendError>> + Send;

    /// Replace the saved hotkey
    fn update_hotkey(
        &self,
        new_hotkey: HotkeyCombination,
    ) -> impl Future<Output = Result<(), BackendError>> + Send;

    fn close_splashscreen(&self) -> impl Future<Output = Result<(), BackendError>> + Send;

    fn unhide_window(&self) -> impl Future<Output = Result<(), BackendError>> + Send;

    /// Close request for the window labeled `label`
    ///
    /// The main window is hidden rather than destroyed.
    fn close_window(&self, label: &str) -> impl Future<Output = Result<(), BackendError>> + Send;

    /// Version of the running build; always available
    fn app_version(&self) -> impl Future<Output = String> + Send;
}

/// Errors returned by backend commands
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error(transparent)]
    Window(#[from] WindowError),

    #[error("invalid hotkey: {0}")]
    InvalidHotkey(#[from] ChordError),

    #[error("failed to encode hotkey: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Error reported by a remote backend
    #[error("{message}")]
    Rejected { code: String, message: String },

    #[error("unexpected response: {0}")]
    Protocol(String),
}

impl BackendError {
    /// Stable code used when the error crosses the IPC boundary
    pub fn code(&self) -> &str {
        match self {
            BackendError::Window(_) => "window_not_found",
            BackendError::InvalidHotkey(_) => "invalid_hotkey",
            BackendError::Encode(_) => "encode_failed",
            BackendError::Io(_) => "io_error",
            BackendError::Rejected { code, .. } => code,
            BackendError::Protocol(_) => "protocol_error",
        }
    }
}
