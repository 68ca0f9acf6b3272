//! Update check: running version versus latest published release

mod feed;
mod resolver;

pub use feed::{FeedError, GithubReleaseFeed, ReleaseFeed};
pub use resolver::{resolve_versions, VersionPair};
