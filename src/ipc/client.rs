//! Backend reached over the shell's IPC socket
//!
//! Lets a window living in another process use the same command
//! surface as in-process windows. Each command opens a short-lived
//! connection.

use std::path::{Path, PathBuf};

use tokio::net::UnixStream;
use tracing::debug;

use crate::backend::{Backend, BackendError};
use crate::hotkey::HotkeyCombination;
use crate::window::OpenOutcome;

use super::frame::{read_message, write_message};
use super::protocol::{Request, Response};

pub struct IpcBackend {
    socket_path: PathBuf,
}

impl IpcBackend {
    pub fn new(socket_path: &Path) -> Self {
        Self {
            socket_path: socket_path.to_owned(),
        }
    }

    async fn call(&self, request: Request) -> Result<Response, BackendError> {
        let mut stream = UnixStream::connect(&self.socket_path).await?;
        write_message(&mut stream, &request).await?;

        let response = read_message::<Response, _>(&mut stream)
            .await?
            .ok_or_else(|| BackendError::Protocol("connection closed before reply".into()))?;
        debug!(?response, "ipc response");

        match response {
            Response::Error { code, message } => Err(BackendError::Rejected { code, message }),
            other => Ok(other),
        }
    }

    async fn call_unit(&self, request: Request) -> Result<(), BackendError> {
        match self.call(request).await? {
            Response::Ok => Ok(()),
            other => Err(unexpected(&other)),
        }
    }

    pub async fn ping(&self) -> Result<(), BackendError> {
        match self.call(Request::Ping).await? {
            Response::Pong => Ok(()),
            other => Err(unexpected(&other)),
        }
    }

    /// Ask the shell to open (or focus) the hotkey settings window
    pub async fn open_hotkey_settings(&self) -> Result<OpenOutcome, BackendError> {
        match self.call(Request::OpenHotkeySettings).await? {
            Response::WindowOpened { outcome, .. } => Ok(outcome),
            other => Err(unexpected(&other)),
        }
    }

    /// Flip the main window's visibility; returns whether it is now shown
    pub async fn toggle_visibility(&self) -> Result<bool, BackendError> {
        match self.call(Request::ToggleVisibility).await? {
            Response::Visibility { visible } => Ok(visible),
            other => Err(unexpected(&other)),
        }
    }

    pub async fn quit(&self) -> Result<(), BackendError> {
        self.call_unit(Request::Quit).await
    }
}

fn unexpected(response: &Response) -> BackendError {
    BackendError::Protocol(format!("{response:?}"))
}

impl Backend for IpcBackend {
    async fn get_hotkey(&self) -> Result<HotkeyCombination, BackendError> {
        match self.call(Request::GetHotkey).await? {
            Response::Hotkey { keys } => Ok(keys),
            other => Err(unexpected(&other)),
        }
    }

    async fn update_hotkey(&self, new_hotkey: HotkeyCombination) -> Result<(), BackendError> {
        self.call_unit(Request::UpdateHotkey { new_hotkey }).await
    }

    async fn close_splashscreen(&self) -> Result<(), BackendError> {
        self.call_unit(Request::CloseSplashscreen).await
    }

    async fn unhide_window(&self) -> Result<(), BackendError> {
        self.call_unit(Request::UnhideWindow).await
    }

    async fn close_window(&self, label: &str) -> Result<(), BackendError> {
        self.call_unit(Request::CloseWindow {
            label: label.to_string(),
        })
        .await
    }

    /// Falls back to this build's version if the shell is unreachable
    async fn app_version(&self) -> String {
        match self.call(Request::GetVersion).await {
            Ok(Response::Version { version }) => version,
            _ => env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
