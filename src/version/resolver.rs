//! Version resolution for the update check

use tracing::{debug, warn};

use crate::backend::Backend;

use super::feed::{FeedError, ReleaseFeed};

/// Running build version next to the latest published tag
///
/// `latest` stays empty until the feed answers successfully.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VersionPair {
    pub current: String,
    pub latest: String,
}

impl VersionPair {
    pub fn new(current: impl Into<String>, latest: impl Into<String>) -> Self {
        Self {
            current: current.into(),
            latest: latest.into(),
        }
    }

    /// Plain text inequality of the two tags; not semver aware
    pub fn is_update_available(&self) -> bool {
        !self.latest.is_empty() && self.current != self.latest
    }
}

/// Resolve both versions; a failing feed leaves `latest` empty
pub async fn resolve_versions<B, F>(backend: &B, feed: &F) -> VersionPair
where
    B: Backend,
    F: ReleaseFeed,
{
    let current = backend.app_version().await;
    let latest = match feed.latest_tag().await {
        Ok(tag) => tag,
        Err(FeedError::Status(status)) => {
            debug!(status, "release feed unavailable, skipping update check");
            String::new()
        }
        Err(e) => {
            warn!(error = %e, "release feed failed, skipping update check");
            String::new()
        }
    };

    VersionPair { current, latest }
}
