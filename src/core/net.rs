// src/core/net.rs
// Page fetching. The pipeline only sees the `Fetch` trait; the real client is
// a blocking reqwest client, and saved pages can be replayed offline.

use std::collections::HashMap;
use std::thread;
use std::time::Duration;

use url::Url;

use crate::config::consts::{REQUEST_PAUSE_MS, TIMEOUT_SECS, USER_AGENT};
use crate::error::{Error, Result};

pub trait Fetch {
    /// Return the body of `url`, or fail. No retries.
    fn get(&self, url: &Url) -> Result<String>;
}

pub fn parse_url(raw: &str) -> Result<Url> {
    Url::parse(raw).map_err(|source| Error::Url { url: s!(raw), source })
}

/* ---------------- HTTP ---------------- */

pub struct HttpFetcher {
    client: reqwest::blocking::Client,
    pause: Duration,
}

impl HttpFetcher {
    pub fn new() -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(TIMEOUT_SECS))
            .build()
            .map_err(|source| Error::Fetch { url: s!("<client>"), source })?;
        Ok(Self { client, pause: Duration::from_millis(REQUEST_PAUSE_MS) })
    }
}

impl Fetch for HttpFetcher {
    fn get(&self, url: &Url) -> Result<String> {
        logd!("GET {url}");
        let fetch_err = |source| Error::Fetch { url: url.to_string(), source };

        let resp = self.client.get(url.clone()).send().map_err(fetch_err)?;
        let status = resp.status();
        if !status.is_success() {
            return Err(Error::HttpStatus { url: url.to_string(), status: status.as_u16() });
        }
        let body = resp.text().map_err(fetch_err)?;

        thread::sleep(self.pause); // be polite
        Ok(body)
    }
}

/* ---------------- Offline replay ---------------- */

/// Serves pages from memory, keyed by full URL. Unknown URLs are a 404.
#[derive(Default, Clone)]
pub struct OfflinePages {
    pages: HashMap<String, String>,
}

impl OfflinePages {
    pub fn new() -> Self { Self::default() }

    pub fn insert(&mut self, url: impl Into<String>, body: impl Into<String>) -> &mut Self {
        self.pages.insert(url.into(), body.into());
        self
    }
}

impl Fetch for OfflinePages {
    fn get(&self, url: &Url) -> Result<String> {
        self.pages
            .get(url.as_str())
            .cloned()
            .ok_or_else(|| Error::HttpStatus { url: url.to_string(), status: 404 })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offline_pages_serve_known_urls_only() {
        let mut pages = OfflinePages::new();
        pages.insert("https://example.org/a", "<p>a</p>");

        let hit = pages.get(&parse_url("https://example.org/a").unwrap()).unwrap();
        assert_eq!(hit, "<p>a</p>");

        let miss = pages.get(&parse_url("https://example.org/b").unwrap());
        assert!(matches!(miss, Err(Error::HttpStatus { status: 404, .. })));
    }

    #[test]
    fn bad_url_is_reported_with_input() {
        let err = parse_url("not a url").unwrap_err();
        assert!(err.to_string().contains("not a url"));
    }
}
