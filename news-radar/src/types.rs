use crate::utils::identity::item_identity;
use crate::utils::url::normalize_url;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub use interfaces::defs::{Digest, DigestDelivery, SeenRecord, SourceKind, SourceSpec};
pub use interfaces::state::SeenStore;

/// Feed entries considered per feed fetch.
pub const FEED_ENTRY_LIMIT: usize = 30;

/// Links kept per listing page fetch, after in-page dedup.
pub const LISTING_LINK_LIMIT: usize = 40;

/// Items included in one digest.
pub const DIGEST_ITEM_LIMIT: usize = 12;

/// A collected news item, uniform across feed and listing sources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Item {
    pub source: String,
    pub title: String,
    /// Canonical URL: no utm* parameters, no fragment.
    pub url: String,
    /// Original timestamp as text, empty when the source gave none.
    pub published_at: String,
    pub kind: SourceKind,
    pub identity: String,
    pub score: u32,
}

impl Item {
    /// Build an item, canonicalizing the URL and deriving its identity.
    pub fn new(
        source: impl Into<String>,
        title: &str,
        url: &str,
        published_at: impl Into<String>,
        kind: SourceKind,
    ) -> Self {
        let title = title.trim().to_string();
        let url = normalize_url(url.trim());
        let identity = item_identity(&title, &url);

        Self {
            source: source.into(),
            title,
            url,
            published_at: published_at.into(),
            kind,
            identity,
            score: 0,
        }
    }

    pub fn has_timestamp(&self) -> bool {
        !self.published_at.trim().is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    pub user_agent: String,
    pub timeout_seconds: u64,
    /// Send a HEAD request before fetching a feed. Failures are only logged.
    pub probe_feeds: bool,
    pub follow_redirects: bool,
    pub max_redirects: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: "News-Radar/1.0".to_string(),
            timeout_seconds: 20,
            probe_feeds: true,
            follow_redirects: true,
            max_redirects: 5,
        }
    }
}

#[derive(Debug)]
pub struct ParsedFeed {
    pub title: Option<String>,
    pub entries: Vec<ParsedEntry>,
}

#[derive(Debug)]
pub struct ParsedEntry {
    pub title: Option<String>,
    pub url: Option<String>,
    pub published_at: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum RadarError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status} from {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("Feed parse error: {0}")]
    Parse(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Configuration format error: {0}")]
    ConfigFormat(#[from] serde_yaml::Error),

    #[error("Corrupt state file {path}: {source}")]
    StateCorruption {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to persist state to {path}: {reason}")]
    StatePersist { path: PathBuf, reason: String },

    #[error("Delivery via {channel} failed: {source}")]
    Delivery {
        channel: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("General error: {0}")]
    General(String),
}

pub type Result<T> = std::result::Result<T, RadarError>;
