//! In-process backend: persists the hotkey and drives the window registry

use std::path::{Path, PathBuf};

use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::hotkey::HotkeyCombination;
use crate::window::{CloseOutcome, WindowRegistry, MAIN_WINDOW, SPLASH_WINDOW};

use super::{Backend, BackendError};

pub struct LocalBackend {
    hotkey: RwLock<HotkeyCombination>,
    /// Where the saved chord is persisted; `None` keeps it in memory
    store_path: Option<PathBuf>,
    windows: WindowRegistry,
}

impl LocalBackend {
    /// In-memory backend starting from the default binding
    pub fn new(windows: WindowRegistry) -> Self {
        Self {
            hotkey: RwLock::new(HotkeyCombination::default_binding()),
            store_path: None,
            windows,
        }
    }

    /// Backend persisting the chord as JSON at `path`
    ///
    /// A missing or unreadable file falls back to the default binding.
    pub async fn with_store(path: &Path, windows: WindowRegistry) -> Self {
        let hotkey = match load_hotkey(path).await {
            Ok(Some(hotkey)) => {
                info!(hotkey = %hotkey, ?path, "saved hotkey loaded");
                hotkey
            }
            Ok(None) => HotkeyCombination::default_binding(),
            Err(e) => {
                warn!(error = %e, ?path, "failed to load saved hotkey, using default");
                HotkeyCombination::default_binding()
            }
        };

        Self {
            hotkey: RwLock::new(hotkey),
            store_path: Some(path.to_owned()),
            windows,
        }
    }

    pub fn windows(&self) -> &WindowRegistry {
        &self.windows
    }

    /// Show the main window if hidden, hide it if shown
    ///
    /// Returns whether the main window is now visible.
    pub fn toggle_visibility(&self) -> Result<bool, BackendError> {
        let visible = self.windows.toggle(MAIN_WINDOW)?;
        info!(visible, "main window visibility toggled");
        Ok(visible)
    }
}

async fn load_hotkey(path: &Path) -> Result<Option<HotkeyCombination>, BackendError> {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    let hotkey: HotkeyCombination = serde_json::from_slice(&bytes)?;
    hotkey.validate()?;
    Ok(Some(hotkey))
}

impl Backend for LocalBackend {
    async fn get_hotkey(&self) -> Result<HotkeyCombination, BackendError> {
        Ok(self.hotkey.read().await.clone())
    }

    async fn update_hotkey(&self, new_hotkey: HotkeyCombination) -> Result<(), BackendError> {
        new_hotkey.validate()?;

        // Hold the write lock across persistence so concurrent saves apply in order
        let mut hotkey = self.hotkey.write().await;
        if let Some(path) = &self.store_path {
            let bytes = serde_json::to_vec_pretty(&new_hotkey)?;
            tokio::fs::write(path, bytes).await?;
        }

        info!(
            from = %hotkey.accelerator(),
            to = %new_hotkey.accelerator(),
            "hotkey updated"
        );
        *hotkey = new_hotkey;
        Ok(())
    }

    async fn close_splashscreen(&self) -> Result<(), BackendError> {
        self.windows.close(SPLASH_WINDOW)?;
        Ok(())
    }

    async fn unhide_window(&self) -> Result<(), BackendError> {
        self.windows.show(MAIN_WINDOW)?;
        Ok(())
    }

    async fn close_window(&self, label: &str) -> Result<(), BackendError> {
        if self.windows.request_close(label)? == CloseOutcome::Hidden {
            debug!(label, "window kept running in the background");
        }
        Ok(())
    }

    async fn app_version(&self) -> String {
        env!("CARGO_PKG_VERSION").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::window::{WindowSpec, HOTKEY_SETTINGS_WINDOW};
    use tokio_test::{assert_err, assert_ok};

    #[tokio::test]
    async fn test_defaults_to_alt_v() {
        let backend = LocalBackend::new(WindowRegistry::new());
        let hotkey = backend.get_hotkey().await.unwrap();
        assert_eq!(hotkey.accelerator(), "Alt+V");
    }

    #[tokio::test]
    async fn test_update_then_get_roundtrip() {
        let backend = LocalBackend::new(WindowRegistry::new());
        let chord = HotkeyCombination::from_tokens(["Ctrl", "Shift", "L"]);

        assert_ok!(backend.update_hotkey(chord.clone()).await);
        assert_eq!(backend.get_hotkey().await.unwrap(), chord);
    }

    #[tokio::test]
    async fn test_rejects_incomplete_chords() {
        let backend = LocalBackend::new(WindowRegistry::new());

        let err = assert_err!(
            backend
                .update_hotkey(HotkeyCombination::from_tokens(["Ctrl"]))
                .await
        );
        assert_eq!(err.code(), "invalid_hotkey");
        assert_eq!(
            backend.get_hotkey().await.unwrap(),
            HotkeyCombination::default_binding()
        );
    }

    #[tokio::test]
    async fn test_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hotkey.json");
        let chord = HotkeyCombination::from_tokens(["Alt", "Super", "P"]);

        let backend = LocalBackend::with_store(&path, WindowRegistry::new()).await;
        backend.update_hotkey(chord.clone()).await.unwrap();

        let reopened = LocalBackend::with_store(&path, WindowRegistry::new()).await;
        assert_eq!(reopened.get_hotkey().await.unwrap(), chord);
    }

    #[tokio::test]
    async fn test_corrupt_store_falls_back_to_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hotkey.json");
        std::fs::write(&path, b"not json").unwrap();

        let backend = LocalBackend::with_store(&path, WindowRegistry::new()).await;
        assert_eq!(
            backend.get_hotkey().await.unwrap(),
            HotkeyCombination::default_binding()
        );
    }

    #[tokio::test]
    async fn test_window_commands() {
        let windows = WindowRegistry::new();
        windows.open(&WindowSpec::splash());
        windows.open(&WindowSpec::main());
        let backend = LocalBackend::new(windows.clone());

        assert_ok!(backend.close_splashscreen().await);
        assert!(!windows.contains(SPLASH_WINDOW));
        // Splash is already gone
        assert_err!(backend.close_splashscreen().await);

        assert_ok!(backend.unhide_window().await);
        assert_eq!(windows.is_visible(MAIN_WINDOW), Some(true));
    }

    #[tokio::test]
    async fn test_close_window_hides_main_and_closes_others() {
        let windows = WindowRegistry::new();
        windows.open(&WindowSpec::main());
        windows.open(&WindowSpec::hotkey_settings());
        let backend = LocalBackend::new(windows.clone());

        assert!(assert_ok!(backend.toggle_visibility()));
        assert_ok!(backend.close_window(MAIN_WINDOW).await);
        assert_eq!(windows.is_visible(MAIN_WINDOW), Some(false));

        assert_ok!(backend.close_window(HOTKEY_SETTINGS_WINDOW).await);
        assert!(!windows.contains(HOTKEY_SETTINGS_WINDOW));
        let err = assert_err!(backend.close_window(HOTKEY_SETTINGS_WINDOW).await);
        assert_eq!(err.code(), "window_not_found");

        // Hidden by the close request, shown again by the toggle
        assert!(assert_ok!(backend.toggle_visibility()));
        assert_eq!(windows.is_visible(MAIN_WINDOW), Some(true));
    }
}
