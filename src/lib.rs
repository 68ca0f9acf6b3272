//! zaplink-shell: startup orchestration and hotkey sync for ZapLink
//!
//! Provides:
//! - Startup state machine for the main window (update check, splash
//!   dismissal, conditional reveal)
//! - Per-window hotkey caches kept in sync by a `hotkey-updated` broadcast
//! - Hotkey capture surface for the settings window
//! - Backend command surface, in-process or over a Unix socket
//!
//! OS-level hotkey registration, rendering and theming live elsewhere.

pub mod backend;
pub mod capture;
pub mod config;
pub mod events;
pub mod hotkey;
pub mod ipc;
pub mod lifecycle;
pub mod notify;
pub mod startup;
pub mod store;
pub mod version;
pub mod window;

#[cfg(test)]
mod testing;
