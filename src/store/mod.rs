//! Main-window hotkey store

mod proxy;

pub use proxy::{HotkeyDisplay, HotkeyStoreProxy};
