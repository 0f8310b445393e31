pub mod gov_listing;
pub mod rss_feed;

pub use gov_listing::GovBrListingSource;
pub use rss_feed::RssFeedSource;

use crate::config::RadarConfig;
use crate::traits::PullFeed;
use crate::Fetcher;
use std::sync::Arc;
use tracing::warn;

/// Build every source named in the configuration: feeds first, then listings
/// the portal scraper understands. Other listings are skipped.
pub fn build_sources(config: &RadarConfig, fetcher: Arc<Fetcher>) -> Vec<Box<dyn PullFeed>> {
    let mut sources: Vec<Box<dyn PullFeed>> = Vec::new();

    for feed in &config.feeds {
        sources.push(Box::new(RssFeedSource::new(
            feed.name.clone(),
            feed.url.clone(),
            fetcher.clone(),
        )));
    }

    for listing in &config.listings {
        if GovBrListingSource::handles(&listing.url) {
            sources.push(Box::new(GovBrListingSource::new(
                listing.url.clone(),
                fetcher.clone(),
            )));
        } else {
            warn!(
                "No listing scraper for '{}' ({}), skipping",
                listing.name, listing.url
            );
        }
    }

    sources
}
