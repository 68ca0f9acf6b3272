//! Hotkey module: key-down events and chord construction
//!
//! Turns raw key-downs into ordered chords and checks whether a chord
//! can be registered as the launcher's global hotkey.

mod chord;
mod keys;

pub use chord::{ChordError, HotkeyCombination};
pub use keys::{normalize_key, KeyDown, Modifier, ModifierState};
