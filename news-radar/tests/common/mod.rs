#![allow(dead_code)]

use async_trait::async_trait;
use axum::extract::State;
use axum::http::{header, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;
use news_radar::{Digest, DigestDelivery, FetchConfig, Fetcher};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

/// One canned response served by `TestServer`.
#[derive(Clone)]
pub struct Route {
    pub path: String,
    pub status: u16,
    /// Status returned to HEAD requests, when it differs from `status`.
    pub head_status: Option<u16>,
    pub content_type: String,
    pub body: Vec<u8>,
}

impl Route {
    pub fn ok(path: &str, content_type: &str, body: impl Into<Vec<u8>>) -> Self {
        Self {
            path: path.to_string(),
            status: 200,
            head_status: None,
            content_type: content_type.to_string(),
            body: body.into(),
        }
    }

    pub fn rss(path: &str, body: impl Into<Vec<u8>>) -> Self {
        Self::ok(path, "application/rss+xml", body)
    }

    pub fn html(path: &str, body: impl Into<Vec<u8>>) -> Self {
        Self::ok(path, "text/html; charset=utf-8", body)
    }

    pub fn status(path: &str, status: u16) -> Self {
        Self::ok(path, "text/plain", "error").with_status(status)
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    pub fn with_head_status(mut self, status: u16) -> Self {
        self.head_status = Some(status);
        self
    }
}

#[derive(Clone)]
struct ServerState {
    routes: Arc<HashMap<String, Route>>,
    requests: Arc<Mutex<Vec<String>>>,
}

/// Serves canned routes from an axum router on a loopback port.
pub struct TestServer {
    addr: SocketAddr,
    requests: Arc<Mutex<Vec<String>>>,
}

impl TestServer {
    pub async fn start(routes: Vec<Route>) -> Self {
        let state = ServerState {
            routes: Arc::new(routes.into_iter().map(|r| (r.path.clone(), r)).collect()),
            requests: Arc::new(Mutex::new(Vec::new())),
        };
        let requests = state.requests.clone();

        let app = Router::new().fallback(serve_route).with_state(state);
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr, requests }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Requests seen so far, as "METHOD /path".
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

async fn serve_route(State(state): State<ServerState>, method: Method, uri: Uri) -> Response {
    let path = uri
        .path_and_query()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| uri.path().to_string());
    state.requests.lock().unwrap().push(format!("{} {}", method, path));

    let Some(route) = state.routes.get(&path) else {
        return (StatusCode::NOT_FOUND, "not found").into_response();
    };

    let status = if method == Method::HEAD {
        route.head_status.unwrap_or(route.status)
    } else {
        route.status
    };

    (
        StatusCode::from_u16(status).unwrap(),
        [(header::CONTENT_TYPE, route.content_type.clone())],
        route.body.clone(),
    )
        .into_response()
}

/// URL on a loopback port nothing listens on.
pub fn closed_port_url(path: &str) -> String {
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();
    format!("http://127.0.0.1:{}{}", port, path)
}

pub fn test_fetcher() -> Arc<Fetcher> {
    let config = FetchConfig {
        user_agent: "News-Radar-Test/1.0".to_string(),
        timeout_seconds: 5,
        ..FetchConfig::default()
    };
    Arc::new(Fetcher::new(config).unwrap())
}

/// A feed entry for `rss_document`.
pub struct Entry<'a> {
    pub title: &'a str,
    pub link: Option<&'a str>,
    pub pub_date: Option<&'a str>,
}

impl<'a> Entry<'a> {
    pub fn new(title: &'a str, link: &'a str) -> Self {
        Self {
            title,
            link: Some(link),
            pub_date: Some("Mon, 06 Jan 2025 10:00:00 GMT"),
        }
    }

    pub fn undated(mut self) -> Self {
        self.pub_date = None;
        self
    }

    pub fn without_link(mut self) -> Self {
        self.link = None;
        self
    }
}

pub fn rss_document(entries: &[Entry<'_>]) -> String {
    let mut items = String::new();
    for entry in entries {
        items.push_str("<item>");
        items.push_str(&format!("<title>{}</title>", entry.title));
        if let Some(link) = entry.link {
            items.push_str(&format!("<link>{}</link>", link.replace('&', "&amp;")));
        }
        if let Some(date) = entry.pub_date {
            items.push_str(&format!("<pubDate>{}</pubDate>", date));
        }
        items.push_str("<description>Resumo</description>");
        items.push_str("</item>");
    }

    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
<channel>
<title>Feed de teste</title>
<link>https://example.com/</link>
<description>Feed de teste</description>
{}
</channel>
</rss>"#,
        items
    )
}

/// Delivery double that records every digest and can be told to fail.
#[derive(Default)]
pub struct RecordingDelivery {
    fail: bool,
    delivered: Mutex<Vec<Digest>>,
}

impl RecordingDelivery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            delivered: Mutex::new(Vec::new()),
        }
    }

    pub fn delivered(&self) -> Vec<Digest> {
        self.delivered.lock().unwrap().clone()
    }
}

#[async_trait]
impl DigestDelivery for RecordingDelivery {
    fn channel_name(&self) -> String {
        "recording".to_string()
    }

    async fn deliver(&self, digest: &Digest) -> anyhow::Result<()> {
        if self.fail {
            anyhow::bail!("SMTP relay refused the message");
        }
        self.delivered.lock().unwrap().push(digest.clone());
        Ok(())
    }
}
