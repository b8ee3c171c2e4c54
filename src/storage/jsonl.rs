// src/storage/jsonl.rs

//! Append-only JSONL archive.
//!
//! One JSON object per line, UTF-8. The file doubles as the resume seed:
//! on startup the crawler reads every `gall_no` already present and never
//! re-fetches those numbers. A run only ever appends; prior lines are
//! never rewritten, so an aborted run leaves flushed batches intact.

use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::models::ArticleRecord;

/// Minimal projection of an archived line, for seeding the dedup set.
#[derive(Deserialize)]
struct ArchivedId {
    gall_no: u64,
}

/// Load the set of already-archived article numbers.
///
/// A missing file yields an empty set (fresh run). Lines that fail to
/// parse are skipped rather than aborting the run, matching the
/// tolerance of the append path: the archive may contain lines from
/// older schema versions.
pub async fn load_collected(path: impl AsRef<Path>) -> Result<HashSet<u64>> {
    let content = match tokio::fs::read_to_string(path.as_ref()).await {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(HashSet::new()),
        Err(e) => return Err(AppError::Io(e)),
    };

    let mut collected = HashSet::new();
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match serde_json::from_str::<ArchivedId>(line) {
            Ok(archived) => {
                collected.insert(archived.gall_no);
            }
            Err(e) => {
                log::warn!("Skipping unparseable archive line: {}", e);
            }
        }
    }
    Ok(collected)
}

/// Append a batch of records to the archive, one JSON line each.
///
/// Parent directories are created on demand. The file handle is opened
/// per flush and closed before returning, never held across batches.
pub async fn append_batch(path: impl AsRef<Path>, batch: &[ArticleRecord]) -> Result<()> {
    if batch.is_empty() {
        return Ok(());
    }

    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }

    let mut lines = String::new();
    for record in batch {
        lines.push_str(&serde_json::to_string(record)?);
        lines.push('\n');
    }

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await?;
    file.write_all(lines.as_bytes()).await?;
    file.flush().await?;

    Ok(())
}
