// src/parser/selectors.rs

//! CSS selector table for gallery pages.
//!
//! All fixed selectors are parsed once at parser construction. Selectors
//! that embed an article or comment id are built per use.

use scraper::Selector;

use crate::error::{AppError, Result};

/// Parsed selectors for article view and listing pages.
pub struct ArticleSelectors {
    /// Written date in the view header
    pub date: Selector,
    /// Title in the view header
    pub title: Selector,
    /// Article body container
    pub content: Selector,
    /// View counter in the view header ("조회 N")
    pub view_count: Selector,
    /// Root-level comment items, in display order
    pub comment_item: Selector,
    /// Comment/reply text inside an item
    pub comment_text: Selector,
    /// Regular listing rows (pinned notices carry data-type=icon_notice)
    pub listing_row: Selector,
    /// Date cell of a listing row
    pub listing_date: Selector,
}

impl ArticleSelectors {
    pub fn new() -> Result<Self> {
        Ok(Self {
            date: parse("div.view_content_wrap span.gall_date")?,
            title: parse("div.view_content_wrap span.title_subject")?,
            content: parse("div.writing_view_box div.write_div")?,
            view_count: parse("div.view_content_wrap span.gall_count")?,
            comment_item: parse("ul.cmt_list > li[id^='comment_li_']")?,
            comment_text: parse("p.usertxt.ub-word")?,
            listing_row: parse("tr.us-post[data-no]")?,
            listing_date: parse("td.gall_date")?,
        })
    }

    /// Selector for the recommend counter of one article.
    pub fn recommend_up(&self, gall_no: u64) -> Result<Selector> {
        parse(&format!("#recommend_view_up_{gall_no}"))
    }

    /// Selector for the non-recommend counter of one article.
    pub fn recommend_down(&self, gall_no: u64) -> Result<Selector> {
        parse(&format!("#recommend_view_down_{gall_no}"))
    }

    /// Selector for the reply texts nested under one root comment.
    pub fn reply_texts(&self, comment_id: &str) -> Result<Selector> {
        parse(&format!(
            "ul#reply_list_{comment_id} li[id^='reply_li_'] p.usertxt.ub-word"
        ))
    }
}

fn parse(s: &str) -> Result<Selector> {
    Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_selectors_parse() {
        assert!(ArticleSelectors::new().is_ok());
    }

    #[test]
    fn test_dynamic_selectors_parse() {
        let selectors = ArticleSelectors::new().unwrap();
        assert!(selectors.recommend_up(123).is_ok());
        assert!(selectors.recommend_down(123).is_ok());
        assert!(selectors.reply_texts("456").is_ok());
    }
}
