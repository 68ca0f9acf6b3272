//! Startup orchestration for the main window
//!
//! Sequences the update check, splash dismissal and the conditional
//! reveal of the main window:
//! - Initializing: window created, version check in flight
//! - VersionChecked: version check finished before the splash timer
//! - SplashClosing: splash timer fired
//! - Revealed / Hidden: terminal, depending on update availability

mod orchestrator;

pub use orchestrator::{StartupOrchestrator, StartupSettings, StartupState};
