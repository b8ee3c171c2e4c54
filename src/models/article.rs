// src/models/article.rs

//! Article data structures.

use serde::{Deserialize, Serialize};

/// One scraped gallery article.
///
/// Field names and order match the JSONL output contract exactly; one
/// record is serialized per line. Records are immutable once written.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ArticleRecord {
    /// Per-gallery article number; primary dedup key
    pub gall_no: u64,

    /// Written date, formatted with the configured date format
    pub date: String,

    /// Article title
    pub title: String,

    /// Article body with normalized whitespace
    pub content: String,

    /// View counter (0 if absent on the page)
    #[serde(default)]
    pub view_count: u64,

    /// Recommend counter (0 if absent on the page)
    #[serde(default)]
    pub recommend_count: u64,

    /// Non-recommend counter (0 if absent on the page)
    #[serde(default)]
    pub nonrecommend_count: u64,

    /// Root comments in on-page display order; empty when comment
    /// crawling is disabled or the article has none
    #[serde(default)]
    pub comments: Vec<CommentRecord>,
}

/// A root comment with its nested replies.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CommentRecord {
    /// Root comment text
    pub text: String,

    /// Reply texts in on-page nesting order
    #[serde(default)]
    pub replies: Vec<String>,
}
