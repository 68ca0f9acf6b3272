//! Hotkey capture surface for the settings window

mod surface;

pub use surface::{CaptureError, CaptureState, CaptureSurface, KeyOutcome, MODIFIER_REQUIRED, PROMPT};
