//! Crawler coordinator - main crawl orchestration logic
//!
//! The crawl is a fixed three-stage walk, depth first and strictly
//! sequential:
//! - Ranking stage: fetch the ranking page, find-or-create every listed movie
//! - Movie stage: fetch the movie page, find-or-create and link every cast member
//! - Actor stage: only for actors created by this run, fetch their page and
//!   record the birth date
//!
//! The first error of any kind aborts the run. Rows and cache entries written
//! before it stay valid, so the next run resumes where this one stopped.

use crate::config::{validate, Config};
use crate::crawler::cache::PageCache;
use crate::crawler::delay::{Delay, FixedDelay};
use crate::crawler::fetcher::{HttpTransport, Transport};
use crate::extract::{parse_actor, parse_movie, parse_ranking};
use crate::storage::{ActorId, MovieId, Store};
use crate::{CrawlError, FetchError};
use std::path::Path;
use std::time::Instant;
use url::Url;

/// Counts for one completed run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CrawlSummary {
    /// Ranking rows processed
    pub movies: u64,
    /// Actors created by this run
    pub actors_created: u64,
    /// Appearance rows inserted by this run
    pub appearances_added: u64,
    /// Birth dates recorded by this run
    pub birth_dates: u64,
}

/// Main crawler structure
pub struct Crawler<S, T = HttpTransport, D = FixedDelay> {
    cache: PageCache<T, D>,
    store: S,
    ranking_url: Url,
}

impl<S: Store, T: Transport, D: Delay> Crawler<S, T, D> {
    /// Creates a crawler starting from `ranking_url`
    pub fn new(cache: PageCache<T, D>, store: S, ranking_url: Url) -> Self {
        Self {
            cache,
            store,
            ranking_url,
        }
    }

    /// Runs the crawl to completion or to the first error
    pub async fn run(&mut self) -> Result<CrawlSummary, CrawlError> {
        tracing::info!("Starting crawl from {}", self.ranking_url);
        let start_time = Instant::now();
        let mut summary = CrawlSummary::default();

        let html = self.cache.fetch(self.ranking_url.as_str()).await?;
        let ranking = parse_ranking(&html, &self.ranking_url)?;

        for row in ranking.rows() {
            let row = row?;
            let movie = self.store.find_or_create_movie(
                &row.movie_url,
                &row.title,
                row.year,
                row.rating,
            )?;
            summary.movies += 1;

            tracing::info!(
                "Movie {}: {} ({}) {}",
                summary.movies,
                row.title,
                row.year,
                row.movie_url
            );

            self.movie_stage(movie, &row.movie_url, &mut summary).await?;
        }

        let cache = self.cache.stats();
        tracing::info!(
            "Crawl completed in {:?}: {} movies, {} new actors, {} new appearances, {} birth dates ({} fetched, {} cached)",
            start_time.elapsed(),
            summary.movies,
            summary.actors_created,
            summary.appearances_added,
            summary.birth_dates,
            cache.misses,
            cache.hits
        );

        Ok(summary)
    }

    /// Fetches a movie page and records its cast
    async fn movie_stage(
        &mut self,
        movie: MovieId,
        movie_url: &str,
        summary: &mut CrawlSummary,
    ) -> Result<(), CrawlError> {
        let base_url = Url::parse(movie_url)?;
        let html = self.cache.fetch(movie_url).await?;
        let cast = parse_movie(&html, &base_url)?;

        for entry in cast {
            let (actor, created) = self.store.find_or_create_actor(&entry.actor_url, &entry.name)?;

            if self.store.link(movie, actor)? {
                summary.appearances_added += 1;
            } else {
                tracing::debug!("Appearance {} / {} already recorded", movie, actor);
            }

            if created {
                summary.actors_created += 1;
                tracing::debug!("New actor {}: {}", actor, entry.name);
                self.actor_stage(actor, &entry.actor_url, summary).await?;
            }
        }

        Ok(())
    }

    /// Fetches an actor page and records the birth date, if any
    async fn actor_stage(
        &mut self,
        actor: ActorId,
        actor_url: &str,
        summary: &mut CrawlSummary,
    ) -> Result<(), CrawlError> {
        let html = self.cache.fetch(actor_url).await?;
        let details = parse_actor(&html)?;

        if let Some(birth_date) = details.birth_date {
            self.store.set_actor_birth_date(actor, birth_date)?;
            summary.birth_dates += 1;
        }

        Ok(())
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn cache(&self) -> &PageCache<T, D> {
        &self.cache
    }

    /// Consumes the crawler, returning its store
    pub fn into_store(self) -> S {
        self.store
    }
}

/// Runs a complete crawl with the production transport and delay
///
/// # Arguments
///
/// * `config` - The crawler configuration
/// * `store` - The store receiving movies, actors and appearances
///
/// # Returns
///
/// * `Ok(CrawlSummary)` - Crawl completed successfully
/// * `Err(CrawlError)` - Invalid configuration, or the crawl stopped at the
///   first fatal error
pub async fn run_crawl<S: Store>(config: &Config, store: S) -> Result<CrawlSummary, CrawlError> {
    validate(config)?;
    let ranking_url = Url::parse(&config.crawler.ranking_url)?;

    let transport = HttpTransport::from_config(config).map_err(|source| FetchError::Request {
        url: ranking_url.to_string(),
        source,
    })?;
    let delay = FixedDelay::new(config.crawler.request_delay());
    let cache = PageCache::new(Path::new(&config.output.cache_dir), transport, delay)?;

    let mut crawler = Crawler::new(cache, store, ranking_url);
    crawler.run().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawler::test_support::{CountingDelay, FakeTransport};
    use crate::storage::{MemoryStore, SqliteStore};
    use crate::ExtractionError;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    const RANKING_URL: &str = "https://www.csfd.cz/zebricky/nejlepsi-filmy/?show=complete";
    const MOVIE_A: &str = "https://www.csfd.cz/film/1-a/";
    const MOVIE_B: &str = "https://www.csfd.cz/film/2-b/";
    const ACTOR_P: &str = "https://www.csfd.cz/tvurce/10-p/";
    const ACTOR_Q: &str = "https://www.csfd.cz/tvurce/11-q/";

    fn ranking_page() -> String {
        r#"<html><body><div id="results"><table class="content ui-table-list striped">
        <tr><td class="film"><a href="/film/1-a/">A</a></td>
            <td><span class="film-year">(2001)</span></td><td class="average">87,5%</td></tr>
        <tr><td colspan="3"><div class="caroda-slot"></div></td></tr>
        <tr><td class="film"><a href="/film/2-b/">B</a></td>
            <td><span class="film-year">(1999)</span></td><td class="average">80,1%</td></tr>
        </table></div></body></html>"#
            .to_string()
    }

    fn movie_page(cast: &[&str]) -> String {
        let links: String = cast
            .iter()
            .map(|href| format!(r#"<a href="{}">{}</a> "#, href, href))
            .collect();
        format!(
            r#"<html><body><div class="creators"><div><h4>Hrají:</h4>{}</div></div></body></html>"#,
            links
        )
    }

    fn actor_page(birth: &str) -> String {
        format!(
            r#"<html><body><div class="info"><ul><li>{}</li></ul></div></body></html>"#,
            birth
        )
    }

    fn site() -> Vec<(String, String)> {
        vec![
            (RANKING_URL.to_string(), ranking_page()),
            (
                MOVIE_A.to_string(),
                movie_page(&["/tvurce/10-p/", "/tvurce/11-q/", "/tvurce/10-p/"]),
            ),
            (MOVIE_B.to_string(), movie_page(&["/tvurce/10-p/"])),
            (ACTOR_P.to_string(), actor_page("nar. 3.7.1975")),
            (ACTOR_Q.to_string(), actor_page("Herec")),
        ]
    }

    fn transport(pages: &[(String, String)]) -> FakeTransport {
        let borrowed: Vec<(&str, &str)> = pages
            .iter()
            .map(|(url, body)| (url.as_str(), body.as_str()))
            .collect();
        FakeTransport::with_pages(&borrowed)
    }

    fn crawler<S: Store>(
        dir: &TempDir,
        transport: &FakeTransport,
        delay: &CountingDelay,
        store: S,
    ) -> Crawler<S, FakeTransport, CountingDelay> {
        let cache = PageCache::new(dir.path(), transport.clone(), delay.clone()).unwrap();
        Crawler::new(cache, store, Url::parse(RANKING_URL).unwrap())
    }

    #[tokio::test]
    async fn test_full_crawl() {
        let dir = TempDir::new().unwrap();
        let transport = transport(&site());
        let delay = CountingDelay::default();
        let mut crawler = crawler(&dir, &transport, &delay, MemoryStore::new());

        let summary = crawler.run().await.unwrap();

        assert_eq!(
            summary,
            CrawlSummary {
                movies: 2,
                actors_created: 2,
                appearances_added: 3,
                birth_dates: 1,
            }
        );

        let store = crawler.store();
        assert_eq!(store.count_movies().unwrap(), 2);
        assert_eq!(store.count_actors().unwrap(), 2);
        assert_eq!(store.count_appearances().unwrap(), 3);

        let a = store.movie_by_url(MOVIE_A).unwrap().unwrap();
        assert_eq!(a.title, "A");
        assert_eq!(a.year, 2001);
        assert_eq!(a.rating, Some(87.5));

        let p = store.actor_by_url(ACTOR_P).unwrap().unwrap();
        assert_eq!(p.birth_date, NaiveDate::from_ymd_opt(1975, 7, 3));
        let q = store.actor_by_url(ACTOR_Q).unwrap().unwrap();
        assert_eq!(q.birth_date, None);

        // Five distinct pages, one network fetch and one pause each
        assert_eq!(transport.requests().len(), 5);
        assert_eq!(delay.calls(), 5);
    }

    #[tokio::test]
    async fn test_fetch_order_is_depth_first() {
        let dir = TempDir::new().unwrap();
        let transport = transport(&site());
        let delay = CountingDelay::default();
        let mut crawler = crawler(&dir, &transport, &delay, MemoryStore::new());

        crawler.run().await.unwrap();

        assert_eq!(
            transport.requests(),
            vec![RANKING_URL, MOVIE_A, ACTOR_P, ACTOR_Q, MOVIE_B]
        );
    }

    #[tokio::test]
    async fn test_actor_page_fetched_only_on_creation() {
        let dir = TempDir::new().unwrap();
        let transport = transport(&site());
        let delay = CountingDelay::default();
        let mut crawler = crawler(&dir, &transport, &delay, MemoryStore::new());

        crawler.run().await.unwrap();

        // P is credited twice in A and again in B
        assert_eq!(transport.request_count(ACTOR_P), 1);
    }

    #[tokio::test]
    async fn test_duplicate_credit_links_once() {
        let dir = TempDir::new().unwrap();
        let transport = transport(&site());
        let delay = CountingDelay::default();
        let mut crawler = crawler(&dir, &transport, &delay, MemoryStore::new());

        crawler.run().await.unwrap();

        let store = crawler.store();
        let a = store.movie_by_url(MOVIE_A).unwrap().unwrap();
        let p = store.actor_by_url(ACTOR_P).unwrap().unwrap();
        let q = store.actor_by_url(ACTOR_Q).unwrap().unwrap();
        assert_eq!(store.cast_of(a.id).unwrap(), vec![p.id, q.id]);
    }

    #[tokio::test]
    async fn test_second_run_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let db = dir.path().join("movies.sqlite");
        let cache_dir = TempDir::new().unwrap();
        let transport = transport(&site());
        let delay = CountingDelay::default();

        let first = crawler(&cache_dir, &transport, &delay, SqliteStore::open(&db).unwrap())
            .run()
            .await
            .unwrap();
        assert_eq!(first.actors_created, 2);

        let mut again = crawler(&cache_dir, &transport, &delay, SqliteStore::open(&db).unwrap());
        let second = again.run().await.unwrap();

        assert_eq!(
            second,
            CrawlSummary {
                movies: 2,
                ..CrawlSummary::default()
            }
        );
        assert_eq!(transport.requests().len(), 5);
        assert_eq!(delay.calls(), 5);

        let store = again.into_store();
        assert_eq!(store.count_movies().unwrap(), 2);
        assert_eq!(store.count_actors().unwrap(), 2);
        assert_eq!(store.count_appearances().unwrap(), 3);
        assert_eq!(store.count_actors_with_birth_date().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_fetch_failure_aborts_and_keeps_progress() {
        let dir = TempDir::new().unwrap();
        let mut pages = site();
        pages.retain(|(url, _)| url != MOVIE_B);
        let transport = transport(&pages);
        let delay = CountingDelay::default();
        let mut crawler = crawler(&dir, &transport, &delay, MemoryStore::new());

        let result = crawler.run().await;
        assert!(matches!(
            result,
            Err(CrawlError::FetchFailed(FetchError::Status { status: 404, .. }))
        ));

        // Movie A and its cast were fully processed before the failure
        let store = crawler.store();
        assert_eq!(store.count_movies().unwrap(), 2);
        assert_eq!(store.count_actors().unwrap(), 2);
        assert_eq!(store.count_appearances().unwrap(), 2);
        assert!(!crawler.cache().entry_path(MOVIE_B).exists());
    }

    #[tokio::test]
    async fn test_missing_cast_section_aborts() {
        let dir = TempDir::new().unwrap();
        let mut pages = site();
        for (url, body) in pages.iter_mut() {
            if url.as_str() == MOVIE_A {
                *body = "<html><body><h4>Režie:</h4></body></html>".to_string();
            }
        }
        let transport = transport(&pages);
        let delay = CountingDelay::default();
        let mut crawler = crawler(&dir, &transport, &delay, MemoryStore::new());

        let result = crawler.run().await;
        assert!(matches!(
            result,
            Err(CrawlError::Extraction(ExtractionError::MissingElement { .. }))
        ));
        assert!(!transport.requests().contains(&MOVIE_B.to_string()));
    }

    #[tokio::test]
    async fn test_existing_actor_is_not_refetched() {
        let dir = TempDir::new().unwrap();
        let transport = transport(&site());
        let delay = CountingDelay::default();

        let mut store = MemoryStore::new();
        store.find_or_create_actor(ACTOR_Q, "Q").unwrap();

        let mut crawler = crawler(&dir, &transport, &delay, store);
        let summary = crawler.run().await.unwrap();

        assert_eq!(summary.actors_created, 1);
        assert_eq!(transport.request_count(ACTOR_Q), 0);
        assert_eq!(transport.request_count(ACTOR_P), 1);
    }

    #[tokio::test]
    async fn test_run_crawl_rejects_invalid_config() {
        let dir = TempDir::new().unwrap();
        let mut config = Config::default();
        config.user_agent.value = "  ".to_string();
        config.output.cache_dir = dir.path().join("cache").display().to_string();

        let result = run_crawl(&config, MemoryStore::new()).await;
        assert!(matches!(
            result,
            Err(CrawlError::Config(crate::ConfigError::Validation(_)))
        ));
        assert!(!dir.path().join("cache").exists());
    }
}
