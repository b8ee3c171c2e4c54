// src/models/config.rs

//! Crawler configuration structures.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Gallery tier, selects the URL scheme for article and listing pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GallType {
    Main,
    Minor,
    Mini,
}

/// Crawl target, produced by [`CrawlerConfig::validate`].
///
/// Exactly one of the two forms is configured per run. A gall_no range
/// iterates from `start` towards `end`, which may be descending. A date
/// range is first resolved into a gall_no interval and then iterated
/// chronologically ascending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrawlRange {
    GallNo { start: u64, end: u64 },
    Date { start: NaiveDate, end: NaiveDate },
}

/// Run-level crawler configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlerConfig {
    /// Target gallery identifier (required)
    pub gallery_id: String,

    /// Gallery tier: main, minor or mini (required)
    pub gall_type: GallType,

    /// Inclusive start date, in `date_format`
    #[serde(default)]
    pub start_date: Option<String>,

    /// Inclusive end date, in `date_format`
    #[serde(default)]
    pub end_date: Option<String>,

    /// Inclusive start article number
    #[serde(default)]
    pub start_gall_no: Option<u64>,

    /// Inclusive end article number (may be below `start_gall_no`)
    #[serde(default)]
    pub end_gall_no: Option<u64>,

    /// chrono format string for `start_date`/`end_date` and record dates
    #[serde(default = "defaults::date_format")]
    pub date_format: String,

    /// Whether to also extract comments for each article
    #[serde(default = "defaults::crawl_comments")]
    pub is_crawl_comments: bool,

    /// Whether a browser-driven page source runs without a visible UI.
    /// The plain HTTP source ignores this.
    #[serde(default = "defaults::headless")]
    pub is_headless: bool,

    /// Buffered record count that triggers a batch flush
    #[serde(default = "defaults::maximum_batch_size")]
    pub maximum_batch_size: usize,

    /// Destination JSONL file (required)
    pub jsonl_path: PathBuf,

    /// Seconds to block between article fetches
    #[serde(default = "defaults::sleep_between_requests")]
    pub sleep_between_requests: f64,

    /// Seconds to wait for deferred comment content before re-reading
    #[serde(default = "defaults::refresh_time_for_comment")]
    pub refresh_time_for_comment: f64,

    /// User-Agent header for page fetches
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Per-request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Listing pages to probe at most during date-range resolution
    #[serde(default = "defaults::max_listing_pages")]
    pub max_listing_pages: u32,
}

impl CrawlerConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Validate the configuration and derive the crawl range.
    ///
    /// Exactly one complete range pair must be supplied: either both
    /// date bounds or both gall_no bounds. Date bounds must parse with
    /// `date_format` and satisfy `start <= end`; gall_no bounds may run
    /// in either direction.
    pub fn validate(&self) -> Result<CrawlRange> {
        if self.gallery_id.trim().is_empty() {
            return Err(AppError::config("gallery_id is empty"));
        }
        if self.maximum_batch_size == 0 {
            return Err(AppError::config("maximum_batch_size must be > 0"));
        }
        if self.start_gall_no.is_some() != self.end_gall_no.is_some() {
            return Err(AppError::config(
                "start_gall_no and end_gall_no must be provided together",
            ));
        }
        if self.start_date.is_some() != self.end_date.is_some() {
            return Err(AppError::config(
                "start_date and end_date must be provided together",
            ));
        }

        let gall_no_range = self.start_gall_no.zip(self.end_gall_no);
        let date_range = self.start_date.as_deref().zip(self.end_date.as_deref());

        match (gall_no_range, date_range) {
            (Some(_), Some(_)) => Err(AppError::config(
                "both a gall_no range and a date range were provided; supply only one",
            )),
            (None, None) => Err(AppError::config(
                "no crawl range provided; supply either start_gall_no/end_gall_no \
                 or start_date/end_date",
            )),
            (Some((start, end)), None) => Ok(CrawlRange::GallNo { start, end }),
            (None, Some((start, end))) => {
                let start = self.parse_date(start)?;
                let end = self.parse_date(end)?;
                if start > end {
                    return Err(AppError::config(
                        "start_date must be on or before end_date",
                    ));
                }
                Ok(CrawlRange::Date { start, end })
            }
        }
    }

    /// Parse a date string with the configured format.
    pub fn parse_date(&self, text: &str) -> Result<NaiveDate> {
        NaiveDate::parse_from_str(text, &self.date_format).map_err(|e| {
            AppError::config(format!(
                "invalid date '{}' for format '{}': {}",
                text, self.date_format, e
            ))
        })
    }

    /// Throttling delay between article fetches.
    pub fn request_delay(&self) -> Duration {
        Duration::from_secs_f64(self.sleep_between_requests.max(0.0))
    }

    /// Bounded wait for deferred comment content.
    pub fn comment_wait(&self) -> Duration {
        Duration::from_secs_f64(self.refresh_time_for_comment.max(0.0))
    }
}

mod defaults {
    pub fn date_format() -> String {
        "%Y.%m.%d".into()
    }
    pub fn crawl_comments() -> bool {
        true
    }
    pub fn headless() -> bool {
        true
    }
    pub fn maximum_batch_size() -> usize {
        100
    }
    pub fn sleep_between_requests() -> f64 {
        0.5
    }
    pub fn refresh_time_for_comment() -> f64 {
        0.5
    }
    pub fn user_agent() -> String {
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
         (KHTML, like Gecko) Chrome/73.0.3683.86 Safari/537.36"
            .into()
    }
    pub fn timeout() -> u64 {
        10
    }
    pub fn max_listing_pages() -> u32 {
        200
    }
}
