// src/crawler/range.rs

//! Date-range to article-number resolution.
//!
//! Gallery listing pages are ordered newest-first and article numbers
//! grow monotonically with time, so a date boundary can be located by
//! walking listing pages until the rows cross it. The lookup is behind
//! the [`GallNoResolver`] trait so crawl logic can be tested against a
//! fake listing source.

use async_trait::async_trait;
use chrono::NaiveDate;
use scraper::Html;

use crate::error::{AppError, Result};
use crate::models::CrawlerConfig;
use crate::parser::ArticleSelectors;
use crate::source::PageSource;

/// Date formats seen in listing date cells (`title` attribute first,
/// visible text second).
const LISTING_DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y.%m.%d", "%y.%m.%d"];

/// Lookup from a calendar date to a bounding article number.
#[async_trait]
pub trait GallNoResolver {
    /// Number of the earliest article written on or after `date`.
    async fn first_on_or_after(&self, date: NaiveDate) -> Result<u64>;

    /// Number of the latest article written on or before `date`.
    async fn last_on_or_before(&self, date: NaiveDate) -> Result<u64>;
}

/// Resolve a closed date interval into a closed article-number interval.
pub async fn resolve_interval<R: GallNoResolver + ?Sized>(
    resolver: &R,
    gallery_id: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<(u64, u64)> {
    let lo = resolver.first_on_or_after(start).await?;
    let hi = resolver.last_on_or_before(end).await?;
    if lo > hi {
        return Err(AppError::range_resolution(
            gallery_id,
            format!("no articles between {start} and {end}"),
        ));
    }
    Ok((lo, hi))
}

/// Resolver that probes the gallery's listing index pages.
pub struct ListingResolver<'a, S: PageSource + ?Sized> {
    source: &'a S,
    selectors: ArticleSelectors,
    gallery_id: String,
    max_pages: u32,
}

impl<'a, S: PageSource + ?Sized> ListingResolver<'a, S> {
    pub fn new(source: &'a S, config: &CrawlerConfig) -> Result<Self> {
        Ok(Self {
            source,
            selectors: ArticleSelectors::new()?,
            gallery_id: config.gallery_id.clone(),
            max_pages: config.max_listing_pages.max(1),
        })
    }

    /// Parse the regular rows of one listing page into (gall_no, date)
    /// pairs, newest first. Pinned notices and rows without a parseable
    /// number or date are skipped.
    fn parse_rows(&self, html: &str) -> Vec<(u64, NaiveDate)> {
        let document = Html::parse_document(html);
        let mut rows = Vec::new();

        for row in document.select(&self.selectors.listing_row) {
            if row.value().attr("data-type") == Some("icon_notice") {
                continue;
            }
            let Some(gall_no) = row.value().attr("data-no").and_then(|no| no.parse().ok())
            else {
                continue;
            };

            let date_cell = row.select(&self.selectors.listing_date).next();
            let date_text = date_cell
                .and_then(|cell| cell.value().attr("title").map(str::to_string))
                .or_else(|| date_cell.map(|cell| cell.text().collect::<String>()));
            let Some(date) = date_text.as_deref().and_then(parse_listing_date) else {
                continue;
            };

            rows.push((gall_no, date));
        }
        rows
    }

    fn bounded_search_failed(&self, what: &str) -> AppError {
        AppError::range_resolution(
            &self.gallery_id,
            format!("{what} not found within {} listing pages", self.max_pages),
        )
    }
}

#[async_trait]
impl<S: PageSource + ?Sized> GallNoResolver for ListingResolver<'_, S> {
    async fn first_on_or_after(&self, date: NaiveDate) -> Result<u64> {
        // Walking newest to oldest, the answer is the last row still on
        // or after the boundary before rows cross below it.
        let mut candidate: Option<u64> = None;

        for page in 1..=self.max_pages {
            let html = self.source.fetch_listing(page).await?;
            let rows = self.parse_rows(&html);
            if rows.is_empty() {
                // End of the gallery: every article is on or after the
                // boundary, the oldest one seen wins.
                return candidate.ok_or_else(|| {
                    AppError::range_resolution(
                        &self.gallery_id,
                        format!("no articles on or after {date}"),
                    )
                });
            }

            for (gall_no, row_date) in rows {
                if row_date >= date {
                    candidate = Some(gall_no);
                } else {
                    return candidate.ok_or_else(|| {
                        AppError::range_resolution(
                            &self.gallery_id,
                            format!("no articles on or after {date}"),
                        )
                    });
                }
            }
        }

        Err(self.bounded_search_failed(&format!("start boundary {date}")))
    }

    async fn last_on_or_before(&self, date: NaiveDate) -> Result<u64> {
        for page in 1..=self.max_pages {
            let html = self.source.fetch_listing(page).await?;
            let rows = self.parse_rows(&html);
            if rows.is_empty() {
                return Err(AppError::range_resolution(
                    &self.gallery_id,
                    format!("no articles on or before {date}"),
                ));
            }

            for (gall_no, row_date) in rows {
                if row_date <= date {
                    return Ok(gall_no);
                }
            }
        }

        Err(self.bounded_search_failed(&format!("end boundary {date}")))
    }
}

/// Parse the leading date token of a listing cell.
fn parse_listing_date(text: &str) -> Option<NaiveDate> {
    let token = text.split_whitespace().next()?;
    LISTING_DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(token, format).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    struct FakeListingSource {
        pages: Vec<String>,
    }

    #[async_trait]
    impl PageSource for FakeListingSource {
        async fn fetch_article(&self, gall_no: u64) -> Result<String> {
            Err(AppError::parse(gall_no, "not a listing"))
        }

        async fn fetch_comment_page(&self, gall_no: u64, _wait: Duration) -> Result<String> {
            Err(AppError::parse(gall_no, "not a listing"))
        }

        async fn fetch_listing(&self, page: u32) -> Result<String> {
            Ok(self
                .pages
                .get(page as usize - 1)
                .cloned()
                .unwrap_or_else(|| "<html><body></body></html>".to_string()))
        }
    }

    fn listing_html(rows: &[(u64, &str)]) -> String {
        let mut body = String::from("<html><body><table><tbody>");
        // Pinned notice row, must be skipped by the resolver
        body.push_str(
            r#"<tr class="us-post" data-no="999999" data-type="icon_notice">
               <td class="gall_date" title="2030-01-01 00:00:00">30.01.01</td></tr>"#,
        );
        for (gall_no, date) in rows {
            body.push_str(&format!(
                r#"<tr class="us-post" data-no="{gall_no}" data-type="icon_txt">
                   <td class="gall_date" title="{date} 12:00:00">{date}</td></tr>"#
            ));
        }
        body.push_str("</tbody></table></body></html>");
        body
    }

    fn resolver_config(max_pages: u32) -> CrawlerConfig {
        let mut config: CrawlerConfig = toml::from_str(
            r#"
            gallery_id = "programming"
            gall_type = "main"
            jsonl_path = "out/articles.jsonl"
            start_date = "2024.03.01"
            end_date = "2024.03.10"
            "#,
        )
        .unwrap();
        config.max_listing_pages = max_pages;
        config
    }

    fn fake_pages() -> FakeListingSource {
        FakeListingSource {
            pages: vec![
                listing_html(&[(110, "2024-03-10"), (105, "2024-03-05")]),
                listing_html(&[(103, "2024-03-03"), (101, "2024-03-01")]),
            ],
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[tokio::test]
    async fn test_last_on_or_before_finds_first_crossing_row() {
        let source = fake_pages();
        let resolver = ListingResolver::new(&source, &resolver_config(10)).unwrap();
        assert_eq!(resolver.last_on_or_before(date(2024, 3, 6)).await.unwrap(), 105);
        assert_eq!(resolver.last_on_or_before(date(2024, 3, 10)).await.unwrap(), 110);
    }

    #[tokio::test]
    async fn test_first_on_or_after_spans_pages() {
        let source = fake_pages();
        let resolver = ListingResolver::new(&source, &resolver_config(10)).unwrap();
        assert_eq!(resolver.first_on_or_after(date(2024, 3, 2)).await.unwrap(), 103);
        // Oldest article when the whole gallery is in range
        assert_eq!(resolver.first_on_or_after(date(2024, 3, 1)).await.unwrap(), 101);
    }

    #[tokio::test]
    async fn test_boundary_after_newest_article_fails() {
        let source = fake_pages();
        let resolver = ListingResolver::new(&source, &resolver_config(10)).unwrap();
        assert!(resolver.first_on_or_after(date(2024, 3, 20)).await.is_err());
    }

    #[tokio::test]
    async fn test_boundary_before_oldest_article_fails() {
        let source = fake_pages();
        let resolver = ListingResolver::new(&source, &resolver_config(10)).unwrap();
        assert!(resolver.last_on_or_before(date(2024, 2, 1)).await.is_err());
    }

    #[tokio::test]
    async fn test_page_bound_produces_range_resolution_error() {
        let source = fake_pages();
        let resolver = ListingResolver::new(&source, &resolver_config(1)).unwrap();
        let err = resolver.last_on_or_before(date(2024, 3, 1)).await.unwrap_err();
        assert!(matches!(err, AppError::RangeResolution { .. }));
    }

    #[tokio::test]
    async fn test_resolve_interval_rejects_empty_range() {
        let source = fake_pages();
        let resolver = ListingResolver::new(&source, &resolver_config(10)).unwrap();
        // lo (103) > hi (101): nothing between the boundaries
        let err = resolve_interval(&resolver, "programming", date(2024, 3, 2), date(2024, 3, 2))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::RangeResolution { .. }));
    }

    #[tokio::test]
    async fn test_notice_rows_are_skipped() {
        let source = FakeListingSource {
            pages: vec![listing_html(&[(50, "2024-03-05")])],
        };
        let resolver = ListingResolver::new(&source, &resolver_config(10)).unwrap();
        // The pinned notice row (999999, 2030) must not win
        assert_eq!(resolver.last_on_or_before(date(2024, 3, 5)).await.unwrap(), 50);
    }

    #[test]
    fn test_parse_listing_date_formats() {
        assert_eq!(
            parse_listing_date("2024-03-05 12:00:00"),
            Some(date(2024, 3, 5))
        );
        assert_eq!(parse_listing_date("2024.03.05"), Some(date(2024, 3, 5)));
        assert_eq!(parse_listing_date("12:34"), None);
    }
}
