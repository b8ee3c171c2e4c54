// src/source/mod.rs

//! Page retrieval capability.
//!
//! The crawler and parser only ever see raw page HTML through the
//! [`PageSource`] trait, so tests run against in-memory fakes and a
//! browser-driven renderer can replace [`HttpPageSource`] without
//! touching the extraction logic. One source instance is owned per crawl
//! run and dropped when the run ends.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::error::Result;
use crate::models::{CrawlerConfig, GallType};
use crate::utils::url::{article_url, listing_url};

/// Capability to retrieve gallery pages as rendered HTML.
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Fetch the view page of a single article.
    async fn fetch_article(&self, gall_no: u64) -> Result<String>;

    /// Fetch the view page of an article after allowing its deferred
    /// comment section to finish loading.
    ///
    /// Implementations wait at most `wait` once and then re-read the
    /// page; there is no retry beyond that single wait.
    async fn fetch_comment_page(&self, gall_no: u64, wait: Duration) -> Result<String>;

    /// Fetch a listing index page (1-based, newest articles first).
    async fn fetch_listing(&self, page: u32) -> Result<String>;
}

/// HTTP-backed page source.
///
/// DCInside serves article bodies and listing rows in the initial HTML,
/// so a plain HTTP client is sufficient here. `is_headless` only applies
/// to sources that drive a real browser and is ignored by this one.
pub struct HttpPageSource {
    client: Client,
    gall_type: GallType,
    gallery_id: String,
}

impl HttpPageSource {
    /// Build an HTTP page source from the run configuration.
    pub fn from_config(config: &CrawlerConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            gall_type: config.gall_type,
            gallery_id: config.gallery_id.clone(),
        })
    }

    async fn fetch(&self, url: url::Url) -> Result<String> {
        let response = self.client.get(url.as_str()).send().await?;
        let text = response.error_for_status()?.text().await?;
        Ok(text)
    }
}

#[async_trait]
impl PageSource for HttpPageSource {
    async fn fetch_article(&self, gall_no: u64) -> Result<String> {
        self.fetch(article_url(self.gall_type, &self.gallery_id, gall_no)?)
            .await
    }

    async fn fetch_comment_page(&self, gall_no: u64, wait: Duration) -> Result<String> {
        let url = article_url(self.gall_type, &self.gallery_id, gall_no)?;

        // First request triggers the comment load, the second read picks
        // up whatever has arrived after the bounded wait.
        self.fetch(url.clone()).await?;
        if !wait.is_zero() {
            tokio::time::sleep(wait).await;
        }
        self.fetch(url).await
    }

    async fn fetch_listing(&self, page: u32) -> Result<String> {
        self.fetch(listing_url(self.gall_type, &self.gallery_id, page)?)
            .await
    }
}
