//! Window lifecycle: labels, specs and the process-wide registry

mod registry;

pub use registry::{
    CloseOutcome, Liveness, OpenOutcome, WindowError, WindowRegistry, WindowSpec,
    HOTKEY_SETTINGS_WINDOW, MAIN_WINDOW, SPLASH_WINDOW,
};

/// Open the hotkey settings window, focusing it if it already exists
pub fn open_hotkey_settings(registry: &WindowRegistry) -> (OpenOutcome, Liveness) {
    registry.open(&WindowSpec::hotkey_settings())
}
