//! Disk-backed page cache
//!
//! Every page the crawler needs goes through [`PageCache::fetch`]. A page is
//! fetched from the network at most once: the body is stored under a key
//! derived from the locator and served from disk on every later request,
//! within and across runs. Entries never expire.

use crate::crawler::delay::Delay;
use crate::crawler::fetcher::Transport;
use crate::{FetchError, FetchResult};
use sha2::{Digest, Sha256};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Counters for one cache instance
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

/// Page cache over a directory, a transport and a delay strategy
pub struct PageCache<T, D> {
    dir: PathBuf,
    transport: T,
    delay: D,
    stats: CacheStats,
    last_fetch: Option<Instant>,
}

impl<T: Transport, D: Delay> PageCache<T, D> {
    /// Creates a cache rooted at `dir`, creating the directory if needed
    pub fn new(dir: impl Into<PathBuf>, transport: T, delay: D) -> FetchResult<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).map_err(|source| FetchError::Cache {
            path: dir.clone(),
            source,
        })?;

        Ok(Self {
            dir,
            transport,
            delay,
            stats: CacheStats::default(),
            last_fetch: None,
        })
    }

    /// Returns the content stored for `url`, fetching it on a cache miss
    ///
    /// On a miss the body is persisted only after the request succeeded, and
    /// the delay strategy runs before control returns with the time since the
    /// previous network fetch was issued (or since this one, for the first).
    /// Hits are not delayed.
    pub async fn fetch(&mut self, url: &str) -> FetchResult<String> {
        let path = self.entry_path(url);

        match tokio::fs::read_to_string(&path).await {
            Ok(body) => {
                tracing::debug!("Cached: {}", url);
                self.stats.hits += 1;
                return Ok(body);
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(source) => return Err(FetchError::Cache { path, source }),
        }

        tracing::debug!("Fetching: {}", url);
        let started = Instant::now();
        let since = self.last_fetch.replace(started).unwrap_or(started);
        let page = self.transport.get(url).await?;

        tracing::debug!(
            "Fetched {} (status {}, {} bytes)",
            url,
            page.status_code,
            page.body.len()
        );
        if page.final_url != url {
            tracing::debug!("{} resolved to {}", url, page.final_url);
        }

        self.store_entry(&path, &page.body).await?;
        self.stats.misses += 1;

        self.delay.pause(since.elapsed()).await;

        Ok(page.body)
    }

    /// Path of the cache entry for `url`
    pub fn entry_path(&self, url: &str) -> PathBuf {
        self.dir.join(cache_key(url))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    /// Writes through a temporary file so a torn write is never read back
    async fn store_entry(&self, path: &Path, body: &str) -> FetchResult<()> {
        let partial = path.with_extension("part");

        tokio::fs::write(&partial, body)
            .await
            .map_err(|source| FetchError::Cache {
                path: partial.clone(),
                source,
            })?;

        tokio::fs::rename(&partial, path)
            .await
            .map_err(|source| FetchError::Cache {
                path: path.to_path_buf(),
                source,
            })
    }
}

/// Derives the cache file name for a locator
///
/// Hex SHA-256 of the exact locator string: fixed length, filesystem-safe
/// and stable across runs.
pub fn cache_key(url: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(url.as_bytes());
    format!("{}.html", hex::encode(hasher.finalize()))
}
