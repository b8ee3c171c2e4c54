// src/error.rs

//! Unified error handling for the crawler application.

use std::fmt;

use thiserror::Error;

/// Result type alias for crawler operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// CSS selector parsing failed
    #[error("Invalid selector '{selector}': {message}")]
    Selector { selector: String, message: String },

    /// Configuration error (fatal, raised before the run starts)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Date-range resolution failed (fatal, crawling cannot proceed)
    #[error("Range resolution error for gallery '{gallery}': {message}")]
    RangeResolution { gallery: String, message: String },

    /// A single article could not be parsed (recoverable, skip-and-log)
    #[error("Parse error for article {gall_no}: {message}")]
    Parse { gall_no: u64, message: String },
}

impl AppError {
    /// Create a selector parsing error.
    pub fn selector(selector: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Selector {
            selector: selector.into(),
            message: message.to_string(),
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a range resolution error.
    pub fn range_resolution(gallery: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::RangeResolution {
            gallery: gallery.into(),
            message: message.to_string(),
        }
    }

    /// Create a per-article parse error.
    pub fn parse(gall_no: u64, message: impl fmt::Display) -> Self {
        Self::Parse {
            gall_no,
            message: message.to_string(),
        }
    }

    /// Whether this error only affects a single article.
    ///
    /// Recoverable errors cause the crawler to skip the offending post
    /// number and continue; everything else aborts the run.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Parse { .. } | Self::Http(_))
    }
}
