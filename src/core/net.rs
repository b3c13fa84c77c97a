// src/core/net.rs
//! Page fetching.
//!
//! The pipelines only ever see [`Fetch`]: give it a URL, get the page body or
//! nothing. Timeouts, connection errors, 404s and other non-success statuses
//! all collapse to `None` (and a line in the debug log). No retries.

use std::collections::HashMap;

use reqwest::StatusCode;
use reqwest::blocking::Client;
use url::Url;

use crate::config::options::NetOptions;
use crate::error::Result;

pub trait Fetch: Sync {
    fn fetch(&self, url: &str) -> Option<String>;
}

/// Blocking HTTP client with a per-request timeout.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(net: &NetOptions) -> Result<Self> {
        let client = Client::builder()
            .timeout(net.timeout)
            .user_agent(net.user_agent.as_str())
            .build()?;
        Ok(Self { client })
    }
}

impl Fetch for HttpFetcher {
    fn fetch(&self, url: &str) -> Option<String> {
        let t = std::time::Instant::now();
        let resp = match self.client.get(url).send() {
            Ok(r) => r,
            Err(e) => {
                loge!("GET {url}: {e}");
                return None;
            }
        };

        let status = resp.status();
        if status == StatusCode::NOT_FOUND {
            logd!("GET {url}: 404");
            return None;
        }
        if !status.is_success() {
            loge!("GET {url}: HTTP {status}");
            return None;
        }

        match resp.text() {
            Ok(body) => {
                logd!("GET {url}: {} bytes in {:?}", body.len(), t.elapsed());
                Some(body)
            }
            Err(e) => {
                loge!("GET {url}: reading body: {e}");
                None
            }
        }
    }
}

/// Canned pages keyed by URL. Anything not in the map is "not found".
#[derive(Default, Clone, Debug)]
pub struct FixtureFetcher {
    pages: HashMap<String, String>,
}

impl FixtureFetcher {
    pub fn new() -> Self { Self::default() }

    pub fn with_page(mut self, url: &str, body: &str) -> Self {
        self.pages.insert(url.to_string(), body.to_string());
        self
    }

    pub fn insert(&mut self, url: &str, body: &str) {
        self.pages.insert(url.to_string(), body.to_string());
    }
}

impl Fetch for FixtureFetcher {
    fn fetch(&self, url: &str) -> Option<String> {
        self.pages.get(url).cloned()
    }
}

/// Resolve a link found on `base` to an absolute URL.
pub fn resolve(base: &Url, href: &str) -> Option<String> {
    match base.join(href) {
        Ok(u) => Some(u.to_string()),
        Err(e) => {
            loge!("Unresolvable link {href:?} on {base}: {e}");
            None
        }
    }
}
