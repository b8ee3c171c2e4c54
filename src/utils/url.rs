// src/utils/url.rs

//! Gallery URL construction.
//!
//! Main, minor and mini galleries live under different board paths but
//! share the same query parameters.

use url::Url;

use crate::error::{AppError, Result};
use crate::models::GallType;

const BASE: &str = "https://gall.dcinside.com";

fn board_path(gall_type: GallType) -> &'static str {
    match gall_type {
        GallType::Main => "board",
        GallType::Minor => "mgallery/board",
        GallType::Mini => "mini/board",
    }
}

/// URL of a single article view page.
pub fn article_url(gall_type: GallType, gallery_id: &str, gall_no: u64) -> Result<Url> {
    let mut url = Url::parse(&format!("{}/{}/view/", BASE, board_path(gall_type)))
        .map_err(|e| AppError::config(format!("invalid article URL: {e}")))?;
    url.query_pairs_mut()
        .append_pair("id", gallery_id)
        .append_pair("no", &gall_no.to_string());
    Ok(url)
}

/// URL of a listing index page (1-based page number, newest first).
pub fn listing_url(gall_type: GallType, gallery_id: &str, page: u32) -> Result<Url> {
    let mut url = Url::parse(&format!("{}/{}/lists/", BASE, board_path(gall_type)))
        .map_err(|e| AppError::config(format!("invalid listing URL: {e}")))?;
    url.query_pairs_mut()
        .append_pair("id", gallery_id)
        .append_pair("page", &page.to_string());
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_article_url_per_gall_type() {
        assert_eq!(
            article_url(GallType::Main, "programming", 42).unwrap().as_str(),
            "https://gall.dcinside.com/board/view/?id=programming&no=42"
        );
        assert_eq!(
            article_url(GallType::Minor, "rust", 7).unwrap().as_str(),
            "https://gall.dcinside.com/mgallery/board/view/?id=rust&no=7"
        );
        assert_eq!(
            article_url(GallType::Mini, "tiny", 1).unwrap().as_str(),
            "https://gall.dcinside.com/mini/board/view/?id=tiny&no=1"
        );
    }

    #[test]
    fn test_listing_url() {
        assert_eq!(
            listing_url(GallType::Main, "programming", 3).unwrap().as_str(),
            "https://gall.dcinside.com/board/lists/?id=programming&page=3"
        );
    }

    #[test]
    fn test_gallery_id_is_escaped() {
        let url = article_url(GallType::Main, "a b&c", 1).unwrap();
        assert_eq!(url.as_str(), "https://gall.dcinside.com/board/view/?id=a+b%26c&no=1");
    }
}
