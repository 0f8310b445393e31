use crate::types::{Digest, Item};
use chrono::NaiveDate;
use html_escape::{encode_double_quoted_attribute, encode_text};
use tracing::{debug, info};

/// Shown instead of an empty list when nothing new was found.
pub const NO_NEWS_NOTICE: &str = "Nenhuma notícia nova encontrada desde o último envio.";

/// Renders the digest message: subject line plus HTML body.
pub struct DigestRenderer {
    subject: String,
}

impl DigestRenderer {
    pub fn new(subject: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
        }
    }

    pub fn subject_for(&self, date: NaiveDate) -> String {
        format!("{} - {}", self.subject, date.format("%d/%m/%Y"))
    }

    pub fn render(&self, items: &[Item], date: NaiveDate) -> Digest {
        info!("Rendering digest with {} items", items.len());

        let subject = self.subject_for(date);
        let mut body = String::new();
        body.push_str("<html><body>\n");
        body.push_str(&format!("<h2>{}</h2>\n", encode_text(&subject)));

        if items.is_empty() {
            body.push_str(&format!("<p>{}</p>\n", encode_text(NO_NEWS_NOTICE)));
        } else {
            body.push_str("<ol>\n");
            for item in items {
                body.push_str(&Self::render_item(item));
            }
            body.push_str("</ol>\n");
        }

        body.push_str("</body></html>\n");
        debug!("Digest body is {} bytes", body.len());

        Digest {
            subject,
            html_body: body,
            item_count: items.len(),
        }
    }

    fn render_item(item: &Item) -> String {
        let mut meta = vec![encode_text(&item.source).to_string()];
        if item.has_timestamp() {
            meta.push(encode_text(&item.published_at).to_string());
        }
        meta.push(format!("relevância {}", item.score));

        format!(
            "<li><a href=\"{}\">{}</a><br><small>{}</small></li>\n",
            encode_double_quoted_attribute(&item.url),
            encode_text(&item.title),
            meta.join(" | ")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SourceKind;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 10, 6).unwrap()
    }

    #[test]
    fn empty_selection_renders_notice() {
        let digest = DigestRenderer::new("Radar").render(&[], date());
        assert_eq!(digest.subject, "Radar - 06/10/2025");
        assert!(digest.is_empty());
        assert!(digest.html_body.contains(NO_NEWS_NOTICE));
        assert!(!digest.html_body.contains("<ol>"));
        assert!(!digest.html_body.contains("<li>"));
    }

    #[test]
    fn items_are_listed_in_order_and_escaped() {
        let mut first = Item::new(
            "Agencia Brasil",
            "Reforma <aprovada> & sancionada",
            "https://x.example/a?id=1&b=\"2\"",
            "2025-10-06T10:00:00+00:00",
            SourceKind::Feed,
        );
        first.score = 4;
        let second = Item::new("Gov.br", "Segunda", "https://x.example/b", "", SourceKind::Portal);

        let digest = DigestRenderer::new("Radar").render(&[first, second], date());
        assert_eq!(digest.item_count, 2);
        assert!(!digest.html_body.contains(NO_NEWS_NOTICE));
        assert!(digest.html_body.contains("Reforma &lt;aprovada&gt; &amp; sancionada"));
        assert!(digest.html_body.contains("b=&quot;2&quot;"));
        assert!(digest.html_body.contains("relevância 4"));

        let first_pos = digest.html_body.find("Reforma").unwrap();
        let second_pos = digest.html_body.find("Segunda").unwrap();
        assert!(first_pos < second_pos);
    }
}
