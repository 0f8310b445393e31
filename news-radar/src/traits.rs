use crate::types::{Item, Result, SourceKind};
use async_trait::async_trait;

/// Trait for pulling items from a source (RSS feeds, listing pages, ...)
#[async_trait]
pub trait PullFeed: Send + Sync {
    /// Human-readable label, also the `source` of every item produced
    fn source_name(&self) -> String;

    /// Where the source is fetched from
    fn source_url(&self) -> String;

    fn kind(&self) -> SourceKind;

    /// Fetch the current items. An error means zero items from this source.
    async fn pull(&self) -> Result<Vec<Item>>;

    /// Check if the source is reachable
    async fn health_check(&self) -> Result<bool>;
}
