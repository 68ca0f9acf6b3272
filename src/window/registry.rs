//! Process-wide window registry keyed by logical label
//!
//! The registry is the only place that knows which windows exist. It is
//! queried before any window is created, so at most one window per
//! label is ever live.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tokio::time::Instant;
use tracing::{debug, info};

pub const MAIN_WINDOW: &str = "main";
pub const SPLASH_WINDOW: &str = "splashscreen";
pub const HOTKEY_SETTINGS_WINDOW: &str = "hotkey-settings";

/// How a window is created
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowSpec {
    pub label: String,
    /// Route within the application the window points at
    pub route: String,
    pub width: u32,
    pub height: u32,
    pub centered: bool,
    pub resizable: bool,
    pub visible: bool,
    /// A close request hides the window instead of destroying it
    pub hide_on_close: bool,
}

impl WindowSpec {
    pub fn splash() -> Self {
        Self {
            label: SPLASH_WINDOW.to_string(),
            route: "/splashscreen".to_string(),
            width: 400,
            height: 200,
            centered: true,
            resizable: false,
            visible: true,
            hide_on_close: false,
        }
    }

    /// Main window starts hidden; the backend reveals it when needed
    pub fn main() -> Self {
        Self {
            label: MAIN_WINDOW.to_string(),
            route: "/".to_string(),
            width: 400,
            height: 200,
            centered: true,
            resizable: false,
            visible: false,
            hide_on_close: true,
        }
    }

    pub fn hotkey_settings() -> Self {
        Self {
            label: HOTKEY_SETTINGS_WINDOW.to_string(),
            route: "/hotkey-settings".to_string(),
            width: 300,
            height: 150,
            centered: true,
            resizable: false,
            visible: true,
            hide_on_close: false,
        }
    }
}

/// Lifetime handle of one window
///
/// Flips to closed once the window is destroyed. Async callbacks check
/// it before touching window state so a late completion after close is
/// a no-op; long-lived listeners await [`Liveness::closed`].
#[derive(Debug, Clone)]
pub struct Liveness {
    alive: Arc<watch::Sender<bool>>,
    created_at: Instant,
}

impl Liveness {
    pub fn new() -> Self {
        let (alive, _) = watch::channel(true);
        Self {
            alive: Arc::new(alive),
            created_at: Instant::now(),
        }
    }

    pub fn is_alive(&self) -> bool {
        *self.alive.borrow()
    }

    pub fn kill(&self) {
        self.alive.send_replace(false);
    }

    /// When the window was created
    pub fn created_at(&self) -> Instant {
        self.created_at
    }

    /// Resolves once the window is closed
    pub async fn closed(&self) {
        let mut alive = self.alive.subscribe();
        loop {
            if !*alive.borrow_and_update() {
                return;
            }
            // The sender is owned by `self`, so this only errors after close
            if alive.changed().await.is_err() {
                return;
            }
        }
    }
}

impl Default for Liveness {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of opening a window by label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpenOutcome {
    /// No window had the label; a new one was created
    Created,
    /// A window already existed and was brought to front
    Focused,
}

/// Result of a close request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseOutcome {
    Closed,
    /// The window hides on close and is still registered
    Hidden,
}

/// Errors from window operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WindowError {
    #[error("no window labeled '{0}' found")]
    NotFound(String),
}

struct WindowEntry {
    spec: WindowSpec,
    visible: bool,
    liveness: Liveness,
}

#[derive(Default)]
struct RegistryState {
    windows: HashMap<String, WindowEntry>,
    focused: Option<String>,
}

/// Registry of open windows, cheap to clone
#[derive(Clone, Default)]
pub struct WindowRegistry {
    inner: Arc<Mutex<RegistryState>>,
}

impl WindowRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, RegistryState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Open a window, or bring the existing one with the same label to front
    pub fn open(&self, spec: &WindowSpec) -> (OpenOutcome, Liveness) {
        let mut state = self.lock();

        if let Some(entry) = state.windows.get_mut(&spec.label) {
            entry.visible = true;
            let liveness = entry.liveness.clone();
            state.focused = Some(spec.label.clone());
            debug!(label = %spec.label, "window already open, focusing");
            return (OpenOutcome::Focused, liveness);
        }

        let liveness = Liveness::new();
        state.windows.insert(
            spec.label.clone(),
            WindowEntry {
                spec: spec.clone(),
                visible: spec.visible,
                liveness: liveness.clone(),
            },
        );
        if spec.visible {
            state.focused = Some(spec.label.clone());
        }

        info!(
            label = %spec.label,
            route = %spec.route,
            width = spec.width,
            height = spec.height,
            "window created"
        );
        (OpenOutcome::Created, liveness)
    }

    /// Show and focus an existing window
    pub fn show(&self, label: &str) -> Result<(), WindowError> {
        let mut state = self.lock();
        let entry = state
            .windows
            .get_mut(label)
            .ok_or_else(|| WindowError::NotFound(label.to_string()))?;
        entry.visible = true;
        state.focused = Some(label.to_string());
        Ok(())
    }

    pub fn hide(&self, label: &str) -> Result<(), WindowError> {
        let mut state = self.lock();
        let entry = state
            .windows
            .get_mut(label)
            .ok_or_else(|| WindowError::NotFound(label.to_string()))?;
        entry.visible = false;
        if state.focused.as_deref() == Some(label) {
            state.focused = None;
        }
        Ok(())
    }

    /// Flip a window between shown and hidden; returns the new visibility
    pub fn toggle(&self, label: &str) -> Result<bool, WindowError> {
        let mut state = self.lock();
        let entry = state
            .windows
            .get_mut(label)
            .ok_or_else(|| WindowError::NotFound(label.to_string()))?;
        entry.visible = !entry.visible;
        let visible = entry.visible;
        if visible {
            state.focused = Some(label.to_string());
        } else if state.focused.as_deref() == Some(label) {
            state.focused = None;
        }
        debug!(label, visible, "window visibility toggled");
        Ok(visible)
    }

    /// Handle a user close request
    ///
    /// Windows created with `hide_on_close` are hidden and keep running;
    /// any other window is closed.
    pub fn request_close(&self, label: &str) -> Result<CloseOutcome, WindowError> {
        let hide = self
            .spec(label)
            .ok_or_else(|| WindowError::NotFound(label.to_string()))?
            .hide_on_close;
        if hide {
            self.hide(label)?;
            info!(label, "close requested, window hidden");
            Ok(CloseOutcome::Hidden)
        } else {
            self.close(label)?;
            Ok(CloseOutcome::Closed)
        }
    }

    /// Close a window; its liveness flag flips to false
    pub fn close(&self, label: &str) -> Result<(), WindowError> {
        let mut state = self.lock();
        let entry = state
            .windows
            .remove(label)
            .ok_or_else(|| WindowError::NotFound(label.to_string()))?;
        entry.liveness.kill();
        if state.focused.as_deref() == Some(label) {
            state.focused = None;
        }
        info!(label, "window closed");
        Ok(())
    }

    pub fn contains(&self, label: &str) -> bool {
        self.lock().windows.contains_key(label)
    }

    pub fn is_visible(&self, label: &str) -> Option<bool> {
        self.lock().windows.get(label).map(|entry| entry.visible)
    }

    pub fn liveness(&self, label: &str) -> Option<Liveness> {
        self.lock().windows.get(label).map(|entry| entry.liveness.clone())
    }

    pub fn spec(&self, label: &str) -> Option<WindowSpec> {
        self.lock().windows.get(label).map(|entry| entry.spec.clone())
    }

    pub fn focused(&self) -> Option<String> {
        self.lock().focused.clone()
    }

    pub fn len(&self) -> usize {
        self.lock().windows.len()
    }
}
