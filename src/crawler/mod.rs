// src/crawler/mod.rs

//! Batch crawl loop.
//!
//! Owns the iteration strategy, drives the article parser over each
//! candidate number, deduplicates against the JSONL archive and flushes
//! buffered records in batches. Strictly sequential: one article in
//! flight at a time, with a blocking throttle between fetches.

pub mod range;

use crate::error::{AppError, Result};
use crate::models::{ArticleRecord, CrawlRange, CrawlerConfig};
use crate::parser::ArticleParser;
use crate::source::{HttpPageSource, PageSource};
use crate::storage;

pub use range::{GallNoResolver, ListingResolver, resolve_interval};

/// Outcome of a completed crawl run.
#[derive(Debug, Default)]
pub struct CrawlSummary {
    /// Records parsed and written (or pending flush at threshold time)
    pub collected: usize,
    /// Numbers skipped because the archive already had them
    pub duplicates_skipped: usize,
    /// Numbers dropped because their page failed to fetch or parse
    pub parse_failures: usize,
    /// Batch flushes performed, including the final partial one
    pub batches_flushed: usize,
    /// Last successfully collected article number
    pub last_gall_no: Option<u64>,
}

/// Batch crawler for one gallery.
///
/// The page source is owned for the whole run and released when the
/// crawler is dropped, whether the run finished or aborted.
pub struct GalleryCrawler<S: PageSource> {
    config: CrawlerConfig,
    range: CrawlRange,
    parser: ArticleParser,
    source: S,
}

impl GalleryCrawler<HttpPageSource> {
    /// Create a crawler backed by the HTTP page source.
    pub fn new(config: CrawlerConfig) -> Result<Self> {
        let source = HttpPageSource::from_config(&config)?;
        Self::with_source(config, source)
    }
}

impl<S: PageSource> GalleryCrawler<S> {
    /// Create a crawler with a custom page source.
    ///
    /// Validates the configuration up front; an invalid range or missing
    /// required field fails here, before anything is fetched.
    pub fn with_source(config: CrawlerConfig, source: S) -> Result<Self> {
        let range = config.validate()?;
        let parser = ArticleParser::new(&config)?;
        Ok(Self {
            config,
            range,
            parser,
            source,
        })
    }

    /// Run the crawl to completion.
    pub async fn run(&self) -> Result<CrawlSummary> {
        self.verify_gallery().await?;

        let mut collected = storage::load_collected(&self.config.jsonl_path).await?;
        if !collected.is_empty() {
            log::info!(
                "Loaded {} already-archived article numbers from {}",
                collected.len(),
                self.config.jsonl_path.display()
            );
        }

        let (start, end) = match self.range {
            CrawlRange::GallNo { start, end } => {
                log::info!(
                    "Crawling gallery '{}' by article number: {} -> {}",
                    self.config.gallery_id,
                    start,
                    end
                );
                (start, end)
            }
            CrawlRange::Date { start, end } => {
                log::info!(
                    "Crawling gallery '{}' by date: {} -> {}",
                    self.config.gallery_id,
                    start,
                    end
                );
                let resolver = ListingResolver::new(&self.source, &self.config)?;
                let (lo, hi) = resolve_interval(&resolver, &self.config.gallery_id, start, end)
                    .await?;
                log::info!("Date range resolved to article numbers {lo} -> {hi}");
                (lo, hi)
            }
        };

        let mut summary = CrawlSummary::default();
        let mut buffer: Vec<ArticleRecord> = Vec::new();
        let descending = start > end;
        let mut current = start;

        loop {
            let fetched = self.visit(current, &mut collected, &mut buffer, &mut summary).await?;

            if buffer.len() >= self.config.maximum_batch_size {
                self.flush(&mut buffer, &mut summary).await?;
            }

            if current == end {
                break;
            }
            current = if descending { current - 1 } else { current + 1 };

            if fetched {
                tokio::time::sleep(self.config.request_delay()).await;
            }
        }

        self.flush(&mut buffer, &mut summary).await?;

        log::info!(
            "Crawl complete: {} collected, {} duplicates skipped, {} parse failures, {} batches",
            summary.collected,
            summary.duplicates_skipped,
            summary.parse_failures,
            summary.batches_flushed
        );

        Ok(summary)
    }

    /// Confirm the gallery exists before starting the run.
    async fn verify_gallery(&self) -> Result<()> {
        self.source.fetch_listing(1).await.map_err(|e| {
            AppError::config(format!(
                "gallery '{}' ({:?}) is not reachable: {e}",
                self.config.gallery_id, self.config.gall_type
            ))
        })?;
        Ok(())
    }

    /// Process one candidate number. Returns whether a fetch was issued
    /// (duplicates are skipped without touching the network).
    async fn visit(
        &self,
        gall_no: u64,
        collected: &mut std::collections::HashSet<u64>,
        buffer: &mut Vec<ArticleRecord>,
        summary: &mut CrawlSummary,
    ) -> Result<bool> {
        if collected.contains(&gall_no) {
            log::debug!("Article {gall_no} already archived, skipping");
            summary.duplicates_skipped += 1;
            return Ok(false);
        }

        match self.parser.process(&self.source, gall_no).await {
            Ok(record) => {
                collected.insert(gall_no);
                buffer.push(record);
                summary.collected += 1;
                summary.last_gall_no = Some(gall_no);
                log::info!("Collected article {gall_no}");
            }
            // Failed numbers stay out of the dedup set so a future run
            // retries them.
            Err(e) if e.is_recoverable() => {
                summary.parse_failures += 1;
                log::warn!("Skipping article {gall_no}: {e}");
            }
            Err(e) => return Err(e),
        }

        Ok(true)
    }

    async fn flush(&self, buffer: &mut Vec<ArticleRecord>, summary: &mut CrawlSummary) -> Result<()> {
        if buffer.is_empty() {
            return Ok(());
        }

        storage::append_batch(&self.config.jsonl_path, buffer).await?;
        log::info!(
            "Flushed {} articles to {}",
            buffer.len(),
            self.config.jsonl_path.display()
        );
        buffer.clear();
        summary.batches_flushed += 1;
        Ok(())
    }
}
