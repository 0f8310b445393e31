use crate::types::{
    Item, ParsedEntry, ParsedFeed, RadarError, Result, SourceKind, FEED_ENTRY_LIMIT,
};
use feed_rs::parser;
use tracing::debug;

/// Turns RSS/Atom documents into items.
pub struct FeedParser {
    max_entries: usize,
}

impl FeedParser {
    pub fn new() -> Self {
        Self {
            max_entries: FEED_ENTRY_LIMIT,
        }
    }

    pub fn with_max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = max_entries;
        self
    }

    /// Parse a feed document, keeping at most the first `max_entries` entries.
    pub fn parse_feed(&self, content: &[u8]) -> Result<ParsedFeed> {
        debug!("Parsing feed content ({} bytes)", content.len());

        let feed = parser::parse(content)
            .map_err(|e| RadarError::Parse(format!("Failed to parse feed: {}", e)))?;

        let title = feed.title.map(|t| t.content);

        let entries = feed
            .entries
            .into_iter()
            .take(self.max_entries)
            .map(|entry| {
                // Prefer the publication date, fall back to the last update
                let published_at = entry
                    .published
                    .or(entry.updated)
                    .map(|dt| dt.to_rfc3339());

                ParsedEntry {
                    title: entry.title.map(|t| t.content),
                    url: entry.links.first().map(|l| l.href.trim().to_string()),
                    published_at,
                }
            })
            .collect();

        Ok(ParsedFeed { title, entries })
    }

    /// Convert parsed entries to items. Entries without a title or link are dropped.
    pub fn convert_to_items(&self, parsed_feed: ParsedFeed, source_name: &str) -> Vec<Item> {
        let total = parsed_feed.entries.len();

        let items: Vec<Item> = parsed_feed
            .entries
            .into_iter()
            .filter_map(|entry| {
                let title = entry.title.filter(|t| !t.trim().is_empty())?;
                let url = entry.url.filter(|u| !u.is_empty())?;
                Some(Item::new(
                    source_name,
                    &title,
                    &url,
                    entry.published_at.unwrap_or_default(),
                    SourceKind::Feed,
                ))
            })
            .collect();

        if items.len() < total {
            debug!(
                "Dropped {} entries without title or link from {}",
                total - items.len(),
                source_name
            );
        }

        items
    }

    pub fn parse_items(&self, content: &[u8], source_name: &str) -> Result<Vec<Item>> {
        let parsed = self.parse_feed(content)?;
        Ok(self.convert_to_items(parsed, source_name))
    }
}

impl Default for FeedParser {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RSS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>Agencia Brasil</title>
    <link>https://agenciabrasil.example/</link>
    <description>Noticias</description>
    <item>
      <title>Reforma tributária avança</title>
      <link>https://agenciabrasil.example/a?utm_source=rss&amp;id=1#top</link>
      <pubDate>Mon, 06 Oct 2025 10:00:00 GMT</pubDate>
    </item>
    <item>
      <title>Sem link</title>
      <pubDate>Mon, 06 Oct 2025 11:00:00 GMT</pubDate>
    </item>
    <item>
      <link>https://agenciabrasil.example/sem-titulo</link>
    </item>
    <item>
      <title>Sem data</title>
      <link>https://agenciabrasil.example/b</link>
    </item>
  </channel>
</rss>"#;

    const ATOM: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>Senado</title>
  <id>urn:senado</id>
  <updated>2025-10-06T12:00:00Z</updated>
  <entry>
    <title>Imposto seletivo</title>
    <id>urn:1</id>
    <link href="https://senado.example/noticia/1"/>
    <updated>2025-10-05T09:30:00Z</updated>
  </entry>
</feed>"#;

    #[test]
    fn drops_entries_missing_title_or_link() {
        let items = FeedParser::new().parse_items(RSS.as_bytes(), "Agencia Brasil").unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].title, "Reforma tributária avança");
        assert_eq!(items[0].url, "https://agenciabrasil.example/a?id=1");
        assert_eq!(items[0].kind, SourceKind::Feed);
        assert!(items[0].has_timestamp());
        assert_eq!(items[1].title, "Sem data");
        assert!(!items[1].has_timestamp());
    }

    #[test]
    fn falls_back_to_updated_timestamp() {
        let items = FeedParser::new().parse_items(ATOM.as_bytes(), "Senado").unwrap();
        assert_eq!(items.len(), 1);
        assert!(items[0].published_at.starts_with("2025-10-05T09:30:00"));
    }

    #[test]
    fn caps_entries_before_filtering() {
        let parsed = FeedParser::new().with_max_entries(2).parse_feed(RSS.as_bytes()).unwrap();
        assert_eq!(parsed.title.as_deref(), Some("Agencia Brasil"));
        assert_eq!(parsed.entries.len(), 2);
        let items = FeedParser::new().with_max_entries(2).convert_to_items(parsed, "x");
        assert_eq!(items.len(), 1);
    }

    #[test]
    fn rejects_non_feed_content() {
        let err = FeedParser::new().parse_items(b"<html><body>nope</body></html>", "x");
        assert!(matches!(err, Err(RadarError::Parse(_))));
    }
}
