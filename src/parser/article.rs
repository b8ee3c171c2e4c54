// src/parser/article.rs

//! Article page parser.
//!
//! Transforms one rendered article page (and, if enabled, its comment
//! section) into exactly one [`ArticleRecord`]. A page that does not
//! match the expected structure (deleted article, wrong gallery tier)
//! yields a per-article parse error; counters that are absent or
//! non-numeric fall back to 0 instead of failing the whole parse.

use std::time::Duration;

use chrono::NaiveDate;
use scraper::{ElementRef, Html, Node, Selector};

use crate::error::{AppError, Result};
use crate::models::{ArticleRecord, CommentRecord, CrawlerConfig};
use crate::parser::ArticleSelectors;
use crate::source::PageSource;

/// Mobile-app suffix appended to posts and comments written from the app.
const APP_SUFFIX: &str = "- dc official App";

/// Parser for gallery article pages.
pub struct ArticleParser {
    selectors: ArticleSelectors,
    date_format: String,
    is_crawl_comments: bool,
    comment_wait: Duration,
}

impl ArticleParser {
    /// Create a parser from the run configuration.
    pub fn new(config: &CrawlerConfig) -> Result<Self> {
        Ok(Self {
            selectors: ArticleSelectors::new()?,
            date_format: config.date_format.clone(),
            is_crawl_comments: config.is_crawl_comments,
            comment_wait: config.comment_wait(),
        })
    }

    /// Fetch and parse one article.
    ///
    /// When comment crawling is enabled the comment section is fetched
    /// with a single bounded wait for deferred content; otherwise the
    /// record always carries an empty comment list.
    pub async fn process<S: PageSource + ?Sized>(
        &self,
        source: &S,
        gall_no: u64,
    ) -> Result<ArticleRecord> {
        let html = source.fetch_article(gall_no).await?;
        let mut record = self.parse_article(gall_no, &html)?;

        if self.is_crawl_comments {
            let comment_html = source.fetch_comment_page(gall_no, self.comment_wait).await?;
            record.comments = self.parse_comments(&comment_html)?;
        }

        Ok(record)
    }

    /// Parse the article fields of a view page, without comments.
    pub fn parse_article(&self, gall_no: u64, html: &str) -> Result<ArticleRecord> {
        let document = Html::parse_document(html);

        // The date element disappears when an article is deleted, so its
        // absence means "skip this number", not a crawler bug.
        let date_text = select_text(&document, &self.selectors.date).ok_or_else(|| {
            AppError::parse(gall_no, "date element not found; article missing or deleted")
        })?;
        let date = self.reformat_date(gall_no, &date_text)?;

        let title = select_text(&document, &self.selectors.title)
            .ok_or_else(|| AppError::parse(gall_no, "title element not found"))?;

        let content = document
            .select(&self.selectors.content)
            .next()
            .map(block_text)
            .unwrap_or_default();

        let view_count = select_text(&document, &self.selectors.view_count)
            .as_deref()
            .and_then(last_numeric_token)
            .unwrap_or(0);
        let recommend_count = counter(&document, &self.selectors.recommend_up(gall_no)?);
        let nonrecommend_count = counter(&document, &self.selectors.recommend_down(gall_no)?);

        Ok(ArticleRecord {
            gall_no,
            date,
            title,
            content,
            view_count,
            recommend_count,
            nonrecommend_count,
            comments: Vec::new(),
        })
    }

    /// Parse all root comments with their replies, in page order.
    pub fn parse_comments(&self, html: &str) -> Result<Vec<CommentRecord>> {
        let document = Html::parse_document(html);
        let mut comments = Vec::new();

        for item in document.select(&self.selectors.comment_item) {
            let comment_id = item
                .value()
                .attr("id")
                .and_then(|id| id.rsplit('_').next())
                .unwrap_or_default();

            let text = item
                .select(&self.selectors.comment_text)
                .next()
                .map(element_text)
                .unwrap_or_default();
            let text = clean_text(&text);
            if text.is_empty() {
                // dccon or image-only comment
                continue;
            }

            let mut replies = Vec::new();
            for reply in document.select(&self.selectors.reply_texts(comment_id)?) {
                let reply_text = clean_text(&element_text(reply));
                if reply_text.is_empty() {
                    continue;
                }
                replies.push(reply_text);
            }

            comments.push(CommentRecord { text, replies });
        }

        Ok(comments)
    }

    /// Parse the leading date token and re-render it in the configured
    /// format. Page headers carry "YYYY.MM.DD HH:MM:SS".
    fn reformat_date(&self, gall_no: u64, text: &str) -> Result<String> {
        let token = text.split_whitespace().next().unwrap_or_default();
        let date = NaiveDate::parse_from_str(token, &self.date_format)
            .map_err(|e| AppError::parse(gall_no, format!("unparseable date '{token}': {e}")))?;
        Ok(date.format(&self.date_format).to_string())
    }
}

/// Trimmed text content of the first match, if any.
fn select_text(document: &Html, selector: &Selector) -> Option<String> {
    document.select(selector).next().map(element_text)
}

/// Concatenated text of an element, trimmed.
fn element_text(el: ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}

/// Strip the mobile-app suffix and surrounding whitespace.
fn clean_text(text: &str) -> String {
    text.replace(APP_SUFFIX, "").trim().to_string()
}

/// Numeric counter element, defaulting to 0 on absence or junk.
fn counter(document: &Html, selector: &Selector) -> u64 {
    document
        .select(selector)
        .next()
        .and_then(|el| last_numeric_token(&element_text(el)))
        .unwrap_or(0)
}

/// Last whitespace-separated token as a number ("조회 1,234" -> 1234).
fn last_numeric_token(text: &str) -> Option<u64> {
    text.split_whitespace()
        .last()
        .and_then(|token| token.replace(',', "").parse().ok())
}

/// Body text with block-level children joined by newlines.
fn block_text(el: ElementRef<'_>) -> String {
    let mut lines = Vec::new();
    for child in el.children() {
        match child.value() {
            Node::Text(text) => {
                let text = text.trim();
                if !text.is_empty() {
                    lines.push(text.to_string());
                }
            }
            Node::Element(_) => {
                if let Some(child_el) = ElementRef::wrap(child) {
                    let text = element_text(child_el);
                    if !text.is_empty() {
                        lines.push(text);
                    }
                }
            }
            _ => {}
        }
    }
    clean_text(&lines.join("\n"))
}
