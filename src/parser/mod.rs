// src/parser/mod.rs

//! Article page parsing.
//!
//! - `ArticleSelectors`: CSS selector table for article and listing pages
//! - `ArticleParser`: turns one rendered article page into an `ArticleRecord`

mod article;
mod selectors;

pub use article::ArticleParser;
pub use selectors::ArticleSelectors;
