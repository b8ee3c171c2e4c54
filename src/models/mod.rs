// src/models/mod.rs

//! Domain models for the crawler application.

mod article;
mod config;

pub use article::{ArticleRecord, CommentRecord};
pub use config::{CrawlRange, CrawlerConfig, GallType};
