//! IPC message protocol definitions
//!
//! All messages are JSON-encoded, prefixed with a 4-byte little-endian length.

use serde::{Deserialize, Serialize};

use crate::backend::BackendError;
use crate::hotkey::HotkeyCombination;
use crate::window::OpenOutcome;

/// Commands sent by a window to the shell
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Request {
    /// Ping to check connectivity
    Ping,

    GetHotkey,

    UpdateHotkey { new_hotkey: HotkeyCombination },

    CloseSplashscreen,

    UnhideWindow,

    /// Close request from a window; the main window only hides
    CloseWindow { label: String },

    /// Show the main window if hidden, hide it if shown
    ToggleVisibility,

    GetVersion,

    /// Open the capture window, or focus it if already open
    OpenHotkeySettings,

    /// Stop the shell
    Quit,
}

/// Replies from the shell
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Response {
    Pong,

    Hotkey { keys: HotkeyCombination },

    Version { version: String },

    WindowOpened { label: String, outcome: OpenOutcome },

    Visibility { visible: bool },

    /// Command completed without a value
    Ok,

    Error { code: String, message: String },
}

impl From<&BackendError> for Response {
    fn from(err: &BackendError) -> Self {
        Response::Error {
            code: err.code().to_string(),
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hotkey::ChordError;

    #[test]
    fn test_request_serialization() {
        let req = Request::UpdateHotkey {
            new_hotkey: HotkeyCombination::from_tokens(["Ctrl", "K"]),
        };
        let json = serde_json::to_string(&req).unwrap();
        assert_eq!(json, r#"{"type":"update_hotkey","new_hotkey":["Ctrl","K"]}"#);

        let parsed: Request = serde_json::from_str(r#"{"type":"close_splashscreen"}"#).unwrap();
        assert_eq!(parsed, Request::CloseSplashscreen);

        let parsed: Request =
            serde_json::from_str(r#"{"type":"close_window","label":"hotkey-settings"}"#).unwrap();
        assert_eq!(
            parsed,
            Request::CloseWindow {
                label: "hotkey-settings".into()
            }
        );
    }

    #[test]
    fn test_response_serialization() {
        let resp = Response::WindowOpened {
            label: "hotkey-settings".into(),
            outcome: OpenOutcome::Focused,
        };
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("window_opened"));
        assert!(json.contains(r#""outcome":"focused""#));
    }

    #[test]
    fn test_error_response_from_backend_error() {
        let err = BackendError::from(ChordError::MissingModifier);
        let resp = Response::from(&err);
        assert_eq!(
            resp,
            Response::Error {
                code: "invalid_hotkey".into(),
                message: "invalid hotkey: at least one modifier key required".into(),
            }
        );
    }
}
