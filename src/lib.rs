// src/lib.rs

//! dcgall - DCInside gallery article crawler.
//!
//! Given a gallery id and either a date range or a post-number range,
//! fetches article pages, extracts structured records (title, body,
//! counters, comments) and appends them to a JSONL archive. Strictly
//! sequential: one article is fetched, parsed and buffered at a time.

pub mod crawler;
pub mod error;
pub mod models;
pub mod parser;
pub mod source;
pub mod storage;
pub mod utils;
