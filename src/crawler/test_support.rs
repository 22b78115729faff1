//! Fakes for exercising the crawler without network access

use crate::crawler::delay::Delay;
use crate::crawler::fetcher::{FetchedPage, Transport};
use crate::{FetchError, FetchResult};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Serves pages from a map and records every request; unknown URLs are 404
#[derive(Debug, Clone, Default)]
pub struct FakeTransport {
    pages: Arc<HashMap<String, String>>,
    requests: Arc<Mutex<Vec<String>>>,
}

impl FakeTransport {
    pub fn with_pages(pages: &[(&str, &str)]) -> Self {
        Self {
            pages: Arc::new(
                pages
                    .iter()
                    .map(|(url, body)| (url.to_string(), body.to_string()))
                    .collect(),
            ),
            requests: Arc::default(),
        }
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self, url: &str) -> usize {
        self.requests().iter().filter(|r| *r == url).count()
    }
}

impl Transport for FakeTransport {
    async fn get(&self, url: &str) -> FetchResult<FetchedPage> {
        self.requests.lock().unwrap().push(url.to_string());
        match self.pages.get(url) {
            Some(body) => Ok(FetchedPage {
                final_url: url.to_string(),
                status_code: 200,
                body: body.clone(),
            }),
            None => Err(FetchError::Status {
                url: url.to_string(),
                status: 404,
            }),
        }
    }
}

/// Counts pauses instead of sleeping, keeping the durations it was given
#[derive(Debug, Clone, Default)]
pub struct CountingDelay {
    calls: Arc<AtomicUsize>,
    elapsed: Arc<Mutex<Vec<Duration>>>,
}

impl CountingDelay {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn elapsed(&self) -> Vec<Duration> {
        self.elapsed.lock().unwrap().clone()
    }
}

impl Delay for CountingDelay {
    async fn pause(&self, elapsed: Duration) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.elapsed.lock().unwrap().push(elapsed);
    }
}
