use crate::traits::PullFeed;
use crate::types::{Item, Result, SourceKind};
use crate::{FeedParser, Fetcher};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info};

/// Generic RSS/Atom feed source
pub struct RssFeedSource {
    pub name: String,
    pub url: String,
    fetcher: Arc<Fetcher>,
    parser: FeedParser,
    probe_first: bool,
}

impl RssFeedSource {
    pub fn new(name: impl Into<String>, url: impl Into<String>, fetcher: Arc<Fetcher>) -> Self {
        let probe_first = fetcher.config().probe_feeds;
        Self {
            name: name.into(),
            url: url.into(),
            fetcher,
            parser: FeedParser::new(),
            probe_first,
        }
    }

    pub fn with_probe(mut self, probe_first: bool) -> Self {
        self.probe_first = probe_first;
        self
    }

    pub fn with_parser(mut self, parser: FeedParser) -> Self {
        self.parser = parser;
        self
    }
}

#[async_trait]
impl PullFeed for RssFeedSource {
    fn source_name(&self) -> String {
        self.name.clone()
    }

    fn source_url(&self) -> String {
        self.url.clone()
    }

    fn kind(&self) -> SourceKind {
        SourceKind::Feed
    }

    async fn pull(&self) -> Result<Vec<Item>> {
        info!("Pulling RSS feed: {} ({})", self.name, self.url);

        if self.probe_first && !self.fetcher.probe(&self.url).await {
            debug!("Probe failed for {}, fetching anyway", self.url);
        }

        let content = self.fetcher.fetch_bytes(&self.url).await?;
        let parsed_feed = self.parser.parse_feed(&content)?;

        if let Some(title) = &parsed_feed.title {
            debug!("Feed {} reports title '{}'", self.url, title);
        }

        let items = self.parser.convert_to_items(parsed_feed, &self.name);

        info!("Pulled {} items from RSS feed {}", items.len(), self.name);
        Ok(items)
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(self.fetcher.probe(&self.url).await)
    }
}
