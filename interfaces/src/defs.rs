use anyhow::Result;
use async_trait::async_trait;
use serde::Deserialize;
use serde::Serialize;

/// A configured source: a syndication feed or a listing page.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceSpec {
    pub name: String,
    pub url: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SourceKind {
    Feed,
    Portal,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Feed => "FEED",
            SourceKind::Portal => "PORTAL",
        }
    }
}

/// Marker for an item that was part of a delivered digest.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SeenRecord {
    /// Unix seconds at emission time.
    pub timestamp: f64,
    pub url: String,
}

/// A rendered digest, ready to hand to a delivery collaborator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Digest {
    pub subject: String,
    pub html_body: String,
    pub item_count: usize,
}

impl Digest {
    pub fn is_empty(&self) -> bool {
        self.item_count == 0
    }
}

// Object style note:
// Delivery is the one collaborator whose failure must stop the run.
// Implementations should attempt delivery once and report any failure,
// leaving retry decisions to the caller.

#[async_trait]
pub trait DigestDelivery: Send + Sync {
    fn channel_name(&self) -> String;
    async fn deliver(&self, digest: &Digest) -> Result<()>;
}
