use crate::traits::PullFeed;
use crate::types::{Item, RadarError, Result, SourceKind, LISTING_LINK_LIMIT};
use crate::utils::text::collapse_whitespace;
use crate::utils::url::{host_within, is_http_url};
use crate::Fetcher;
use async_trait::async_trait;
use scraper::{Html, Selector};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info};
use url::Url;

/// Origin relative links on the portal are resolved against.
pub const BASE_ORIGIN: &str = "https://www.gov.br";

/// Path fragment that marks a news article on the portal.
pub const NEWS_PATH_MARKER: &str = "/noticias/";

pub const SOURCE_LABEL: &str = "Gov.br - Reforma Tributária";

/// Domain whose listing pages this scraper understands.
pub const PORTAL_DOMAIN: &str = "gov.br";

/// Scrapes the news listing page of the federal government portal.
pub struct GovBrListingSource {
    url: String,
    fetcher: Arc<Fetcher>,
}

impl GovBrListingSource {
    pub fn new(url: impl Into<String>, fetcher: Arc<Fetcher>) -> Self {
        Self {
            url: url.into(),
            fetcher,
        }
    }

    /// Whether a configured listing URL belongs to the portal.
    pub fn handles(listing_url: &str) -> bool {
        host_within(listing_url, PORTAL_DOMAIN)
    }

    /// Extract news links from a listing page.
    ///
    /// Keeps `<a href>` elements with visible text whose resolved path contains
    /// the news marker, dedups by canonical URL (first wins) and caps the result.
    pub fn extract_items(html: &str) -> Result<Vec<Item>> {
        let base = Url::parse(BASE_ORIGIN)?;
        let selector = Selector::parse("a[href]")
            .map_err(|e| RadarError::Parse(format!("Invalid link selector: {}", e)))?;

        let document = Html::parse_document(html);
        let mut seen_urls = HashSet::new();
        let mut items = Vec::new();

        for anchor in document.select(&selector) {
            let Some(href) = anchor.value().attr("href") else {
                continue;
            };

            let Ok(resolved) = base.join(href.trim()) else {
                debug!("Skipping unresolvable href: {}", href);
                continue;
            };

            if !is_http_url(&resolved) || !resolved.path().contains(NEWS_PATH_MARKER) {
                continue;
            }

            let title = collapse_whitespace(&anchor.text().collect::<Vec<_>>().join(" "));
            if title.is_empty() {
                continue;
            }

            let item = Item::new(SOURCE_LABEL, &title, resolved.as_str(), "", SourceKind::Portal);
            if !seen_urls.insert(item.url.clone()) {
                continue;
            }

            items.push(item);
            if items.len() >= LISTING_LINK_LIMIT {
                break;
            }
        }

        Ok(items)
    }
}

#[async_trait]
impl PullFeed for GovBrListingSource {
    fn source_name(&self) -> String {
        SOURCE_LABEL.to_string()
    }

    fn source_url(&self) -> String {
        self.url.clone()
    }

    fn kind(&self) -> SourceKind {
        SourceKind::Portal
    }

    async fn pull(&self) -> Result<Vec<Item>> {
        info!("Pulling listing page: {}", self.url);

        let html = self.fetcher.fetch_text(&self.url).await?;
        let items = Self::extract_items(&html)?;

        info!("Pulled {} items from listing {}", items.len(), self.url);
        Ok(items)
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(self.fetcher.probe(&self.url).await)
    }
}
