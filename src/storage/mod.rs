// src/storage/mod.rs

//! Persistence for crawled articles.

pub mod jsonl;

pub use jsonl::{append_batch, load_collected};
