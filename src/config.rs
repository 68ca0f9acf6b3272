//! Configuration loading and management

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

const DEFAULT_RELEASE_FEED: &str = "https://api.github.com/repos/infinitel8p/zaplink/releases/latest";
const DEFAULT_SPLASH_DELAY_MS: u64 = 1000;

/// Shell configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Unix domain socket serving backend commands
    pub socket_path: PathBuf,

    /// Directory for runtime data
    pub data_dir: PathBuf,

    /// Saved hotkey (JSON array of tokens)
    pub hotkey_path: PathBuf,

    /// Release-listing endpoint for the update check
    pub release_feed_url: String,

    /// Delay from main-window creation until the splash closes
    pub splash_delay: Duration,

    /// Icon attached to the update notification
    pub notice_icon: Option<String>,
}

impl Config {
    /// Load configuration from environment and defaults
    pub fn load() -> Result<Self> {
        let home = std::env::var("HOME").context("HOME is not set")?;
        Self::from_env(PathBuf::from(home), |key| std::env::var(key).ok())
    }

    fn from_env(home: PathBuf, var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let data_dir = home.join(".local").join("share").join("zaplink");

        let splash_delay = match var("ZAPLINK_SPLASH_DELAY_MS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .with_context(|| format!("invalid ZAPLINK_SPLASH_DELAY_MS: {raw}"))?,
            None => DEFAULT_SPLASH_DELAY_MS,
        };

        Ok(Self {
            socket_path: data_dir.join("shell.sock"),
            hotkey_path: data_dir.join("hotkey.json"),
            data_dir,
            release_feed_url: var("ZAPLINK_RELEASE_FEED")
                .unwrap_or_else(|| DEFAULT_RELEASE_FEED.to_string()),
            splash_delay: Duration::from_millis(splash_delay),
            notice_icon: var("ZAPLINK_NOTICE_ICON").filter(|icon| !icon.is_empty()),
        })
    }

    /// Ensure data directory exists
    pub fn ensure_dirs(&self) -> Result<()> {
        std::fs::create_dir_all(&self.data_dir)
            .with_context(|| format!("failed to create {}", self.data_dir.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_env(PathBuf::from("/home/user"), |key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(
            config.socket_path,
            PathBuf::from("/home/user/.local/share/zaplink/shell.sock")
        );
        assert!(config.hotkey_path.ends_with("zaplink/hotkey.json"));
        assert_eq!(config.release_feed_url, DEFAULT_RELEASE_FEED);
        assert_eq!(config.splash_delay, Duration::from_millis(1000));
        assert_eq!(config.notice_icon, None);
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("ZAPLINK_SPLASH_DELAY_MS", "250"),
            ("ZAPLINK_RELEASE_FEED", "http://localhost:8080/latest"),
            ("ZAPLINK_NOTICE_ICON", "icons/128x128.png"),
        ])
        .unwrap();
        assert_eq!(config.splash_delay, Duration::from_millis(250));
        assert_eq!(config.release_feed_url, "http://localhost:8080/latest");
        assert_eq!(config.notice_icon.as_deref(), Some("icons/128x128.png"));
    }

    #[test]
    fn test_invalid_delay() {
        assert!(load(&[("ZAPLINK_SPLASH_DELAY_MS", "soon")]).is_err());
    }

    #[test]
    fn test_ensure_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::from_env(dir.path().to_path_buf(), |_| None).unwrap();
        config.ensure_dirs().unwrap();
        assert!(config.data_dir.is_dir());
    }
}
