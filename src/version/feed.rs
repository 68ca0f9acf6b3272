//! Remote release feed

use std::future::Future;

use serde::Deserialize;
use tracing::debug;

/// Latest published release, as reported by some feed
pub trait ReleaseFeed: Send + Sync + 'static {
    fn latest_tag(&self) -> impl Future<Output = Result<String, FeedError>> + Send;
}

#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    #[error("release feed request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("release feed returned status {0}")]
    Status(u16),

    #[error("release feed response has no tag")]
    MissingTag,
}

/// Only the tag is consumed from the listing
#[derive(Debug, Deserialize)]
struct ReleaseListing {
    tag_name: Option<String>,
}

/// Unauthenticated read of a GitHub `releases/latest` endpoint
pub struct GithubReleaseFeed {
    client: reqwest::Client,
    url: String,
}

impl GithubReleaseFeed {
    pub fn new(url: impl Into<String>) -> Result<Self, FeedError> {
        // GitHub rejects requests without a user agent
        let client = reqwest::Client::builder()
            .user_agent(concat!("zaplink-shell/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

impl ReleaseFeed for GithubReleaseFeed {
    async fn latest_tag(&self) -> Result<String, FeedError> {
        let response = self
            .client
            .get(&self.url)
            .header(reqwest::header::ACCEPT, "application/vnd.github+json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::Status(status.as_u16()));
        }

        let listing: ReleaseListing = response.json().await?;
        debug!(tag = ?listing.tag_name, "release listing received");
        parse_tag(listing)
    }
}

fn parse_tag(listing: ReleaseListing) -> Result<String, FeedError> {
    listing
        .tag_name
        .map(|tag| tag.trim().to_string())
        .filter(|tag| !tag.is_empty())
        .ok_or(FeedError::MissingTag)
}
