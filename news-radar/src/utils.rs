/// URL utilities
pub mod url {
    use url::{form_urlencoded, Url};

    /// Canonicalize a URL: drop utm* query parameters and the fragment.
    ///
    /// Works on the raw string so scheme, host, path and the encoding of
    /// the remaining parameters are left exactly as given. Malformed input
    /// passes through the same way.
    pub fn normalize_url(raw: &str) -> String {
        let without_fragment = match raw.find('#') {
            Some(idx) => &raw[..idx],
            None => raw,
        };

        let (base, query) = match without_fragment.find('?') {
            Some(idx) => (&without_fragment[..idx], Some(&without_fragment[idx + 1..])),
            None => (without_fragment, None),
        };

        let kept: Vec<&str> = query
            .map(|q| {
                q.split('&')
                    .filter(|pair| !pair.is_empty() && !is_tracking_param(pair))
                    .collect()
            })
            .unwrap_or_default();

        if kept.is_empty() {
            base.to_string()
        } else {
            format!("{}?{}", base, kept.join("&"))
        }
    }

    /// True when the (decoded) parameter name starts with "utm", any case.
    pub fn is_tracking_param(pair: &str) -> bool {
        form_urlencoded::parse(pair.as_bytes())
            .next()
            .map(|(name, _)| name.to_lowercase().starts_with("utm"))
            .unwrap_or(false)
    }

    /// Check whether a URL's host is `domain` or one of its subdomains.
    pub fn host_within(url_str: &str, domain: &str) -> bool {
        let Ok(url) = Url::parse(url_str) else {
            return false;
        };
        match url.host_str() {
            Some(host) => {
                let host = host.to_ascii_lowercase();
                host == domain || host.ends_with(&format!(".{}", domain))
            }
            None => false,
        }
    }

    /// Validate that a URL is absolute http(s)
    pub fn is_http_url(url: &Url) -> bool {
        url.scheme() == "http" || url.scheme() == "https"
    }
}

/// Identity derivation for deduplication across runs
pub mod identity {
    use super::url::normalize_url;
    use sha2::{Digest, Sha256};

    /// Stable fingerprint of an item: sha256 over `lower(trim(title)) + "|" + normalize(url)`.
    pub fn item_identity(title: &str, url: &str) -> String {
        let key = format!("{}|{}", title.trim().to_lowercase(), normalize_url(url));
        hex::encode(Sha256::digest(key.as_bytes()))
    }
}

/// Text processing utilities
pub mod text {
    /// Collapse runs of whitespace into single spaces and trim the ends.
    pub fn collapse_whitespace(text: &str) -> String {
        text.split_whitespace().collect::<Vec<_>>().join(" ")
    }
}

/// Time utilities
pub mod time {
    use chrono::Utc;

    /// Current Unix time in seconds, with millisecond precision.
    pub fn now_unix_seconds() -> f64 {
        Utc::now().timestamp_millis() as f64 / 1000.0
    }
}
