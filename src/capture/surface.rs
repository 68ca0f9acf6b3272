//! Hotkey capture surface
//!
//! Runs inside the settings window. Each key-down builds a candidate
//! chord; candidates without a modifier are rejected inline. Saving
//! writes through the backend, broadcasts `hotkey-updated` and closes
//! the window.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::backend::{Backend, BackendError};
use crate::events::{EventBus, SyncEvent};
use crate::hotkey::{HotkeyCombination, KeyDown};
use crate::window::Liveness;

/// Shown before anything was captured or loaded
pub const PROMPT: &str = "Press a key combination";

/// Inline error for a candidate without modifiers
pub const MODIFIER_REQUIRED: &str = "at least one modifier key required";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureState {
    AwaitingInput,
    /// A pending chord is shown but not saved yet
    Captured,
    /// The last key-down had no modifier
    Rejected,
    Saved,
}

impl std::fmt::Display for CaptureState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CaptureState::AwaitingInput => write!(f, "AwaitingInput"),
            CaptureState::Captured => write!(f, "Captured"),
            CaptureState::Rejected => write!(f, "Rejected"),
            CaptureState::Saved => write!(f, "Saved"),
        }
    }
}

/// What a key-down did to the session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyOutcome {
    Captured(HotkeyCombination),
    Rejected,
    /// Session already finished
    Ignored,
}

#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error("No hotkey selected.")]
    NothingCaptured,

    #[error("The hotkey window was closed.")]
    WindowClosed,

    #[error("Failed to update hotkey: {0}")]
    Backend(#[from] BackendError),
}

pub struct CaptureSurface<B> {
    backend: Arc<B>,
    bus: EventBus,
    label: String,
    liveness: Liveness,
    state: CaptureState,
    /// Last saved chord, as read from the backend
    committed: HotkeyCombination,
    pending: Option<HotkeyCombination>,
    error: Option<String>,
    confirmation: Option<String>,
    input_focused: bool,
}

impl<B: Backend> CaptureSurface<B> {
    /// Mount the surface on the window labeled `label`
    ///
    /// Focuses the input region first so the very first key-down is
    /// captured, then loads the committed chord for display.
    pub async fn mount(
        backend: Arc<B>,
        bus: EventBus,
        label: &str,
        liveness: Liveness,
    ) -> Self {
        let mut surface = Self {
            backend,
            bus,
            label: label.to_string(),
            liveness,
            state: CaptureState::AwaitingInput,
            committed: HotkeyCombination::default(),
            pending: None,
            error: None,
            confirmation: None,
            input_focused: true,
        };

        match surface.backend.get_hotkey().await {
            Ok(hotkey) => surface.committed = hotkey,
            Err(e) => warn!(error = %e, "failed to fetch current hotkey"),
        }

        debug!(label, committed = %surface.committed, "capture surface mounted");
        surface
    }

    /// Process a raw key-down
    ///
    /// The event's default action is always suppressed so the chord
    /// being recorded cannot trigger OS shortcuts.
    pub fn handle_key_down(&mut self, event: &mut KeyDown) -> KeyOutcome {
        event.prevent_default();

        if self.state == CaptureState::Saved || !self.liveness.is_alive() {
            return KeyOutcome::Ignored;
        }

        let candidate = HotkeyCombination::from_key_down(event);
        if !candidate.has_modifier() {
            debug!(key = event.key(), "rejected chord without modifier");
            self.state = CaptureState::Rejected;
            self.error = Some(MODIFIER_REQUIRED.to_string());
            return KeyOutcome::Rejected;
        }

        debug!(chord = %candidate, "chord captured");
        self.state = CaptureState::Captured;
        self.error = None;
        self.pending = Some(candidate.clone());
        KeyOutcome::Captured(candidate)
    }

    pub fn can_save(&self) -> bool {
        self.pending.is_some() && self.state != CaptureState::Saved
    }

    /// Save the pending chord
    ///
    /// On success returns the confirmation shown to the user. On failure
    /// the error is shown inline and the surface stays open for a retry.
    pub async fn save(&mut self) -> Result<String, CaptureError> {
        if !self.liveness.is_alive() {
            debug!(label = %self.label, "save after window close ignored");
            return Err(CaptureError::WindowClosed);
        }

        let Some(chord) = self.pending.clone().filter(|_| self.can_save()) else {
            let err = CaptureError::NothingCaptured;
            self.error = Some(err.to_string());
            return Err(err);
        };

        if let Err(e) = self.backend.update_hotkey(chord.clone()).await {
            let err = CaptureError::from(e);
            warn!(error = %err, "hotkey save failed");
            self.error = Some(err.to_string());
            return Err(err);
        }

        let confirmation = format!("Hotkey updated to {chord}");
        info!(hotkey = %chord.accelerator(), "hotkey saved");

        self.committed = chord;
        self.pending = None;
        self.error = None;
        self.state = CaptureState::Saved;
        self.confirmation = Some(confirmation.clone());

        // Published only after the backend acknowledged the write
        self.bus.publish(SyncEvent::HotkeyUpdated);

        if let Err(e) = self.backend.close_window(&self.label).await {
            debug!(error = %e, "capture window already closed");
        }

        Ok(confirmation)
    }

    /// Text shown in the capture region
    pub fn display(&self) -> String {
        match &self.pending {
            Some(chord) => chord.to_string(),
            None if !self.committed.is_empty() => self.committed.to_string(),
            None => PROMPT.to_string(),
        }
    }

    pub fn state(&self) -> CaptureState {
        self.state
    }

    pub fn committed(&self) -> &HotkeyCombination {
        &self.committed
    }

    pub fn pending(&self) -> Option<&HotkeyCombination> {
        self.pending.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn confirmation(&self) -> Option<&str> {
        self.confirmation.as_deref()
    }

    pub fn has_input_focus(&self) -> bool {
        self.input_focused && self.liveness.is_alive()
    }
}
