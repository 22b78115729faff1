//! Crawler module for page fetching and crawl orchestration
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching behind an injectable transport
//! - The disk-backed page cache with polite rate limiting
//! - The three-stage ranking/movie/actor walk

mod cache;
mod coordinator;
mod delay;
mod fetcher;
#[cfg(test)]
pub(crate) mod test_support;

pub use cache::{cache_key, CacheStats, PageCache};
pub use coordinator::{run_crawl, CrawlSummary, Crawler};
pub use delay::{Delay, FixedDelay, NoDelay};
pub use fetcher::{build_http_client, FetchedPage, HttpTransport, Transport};
