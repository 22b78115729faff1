//! In-memory storage implementation
//!
//! Same find-or-create contract as the SQLite store, held in maps. Nothing
//! survives the process.

use crate::storage::traits::{Store, StoreError, StoreResult};
use crate::storage::{ActorId, ActorRecord, MovieId, MovieRecord};
use chrono::NaiveDate;
use std::collections::{BTreeSet, HashMap};

/// Map-backed storage
#[derive(Debug, Default)]
pub struct MemoryStore {
    movies: Vec<MovieRecord>,
    actors: Vec<ActorRecord>,
    movie_index: HashMap<String, MovieId>,
    actor_index: HashMap<String, ActorId>,
    appearances: BTreeSet<(MovieId, ActorId)>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn actor_mut(&mut self, actor: ActorId) -> Option<&mut ActorRecord> {
        // IDs start at 1 and are never reused
        let index = usize::try_from(actor.0).ok()?.checked_sub(1)?;
        self.actors.get_mut(index)
    }

    fn has_movie(&self, movie: MovieId) -> bool {
        movie.0 >= 1 && (movie.0 as usize) <= self.movies.len()
    }
}

impl Store for MemoryStore {
    fn find_or_create_movie(
        &mut self,
        url: &str,
        title: &str,
        year: i32,
        rating: Option<f64>,
    ) -> StoreResult<MovieId> {
        if let Some(id) = self.movie_index.get(url) {
            return Ok(*id);
        }

        let id = MovieId(self.movies.len() as i64 + 1);
        self.movies.push(MovieRecord {
            id,
            canonical_url: url.to_string(),
            title: title.to_string(),
            year,
            rating,
        });
        self.movie_index.insert(url.to_string(), id);
        Ok(id)
    }

    fn find_or_create_actor(&mut self, url: &str, name: &str) -> StoreResult<(ActorId, bool)> {
        if let Some(id) = self.actor_index.get(url) {
            return Ok((*id, false));
        }

        let id = ActorId(self.actors.len() as i64 + 1);
        self.actors.push(ActorRecord {
            id,
            canonical_url: url.to_string(),
            name: name.to_string(),
            birth_date: None,
        });
        self.actor_index.insert(url.to_string(), id);
        Ok((id, true))
    }

    fn set_actor_birth_date(&mut self, actor: ActorId, date: NaiveDate) -> StoreResult<()> {
        let record = self
            .actor_mut(actor)
            .ok_or(StoreError::ActorNotFound(actor))?;
        record.birth_date = Some(date);
        Ok(())
    }

    fn link(&mut self, movie: MovieId, actor: ActorId) -> StoreResult<bool> {
        if !self.has_movie(movie) {
            return Err(StoreError::Corrupt(format!("link to unknown {}", movie)));
        }
        if self.actor_mut(actor).is_none() {
            return Err(StoreError::ActorNotFound(actor));
        }
        Ok(self.appearances.insert((movie, actor)))
    }

    fn cast_of(&self, movie: MovieId) -> StoreResult<Vec<ActorId>> {
        Ok(self
            .appearances
            .range((movie, ActorId(i64::MIN))..=(movie, ActorId(i64::MAX)))
            .map(|(_, actor)| *actor)
            .collect())
    }

    fn movie_by_url(&self, url: &str) -> StoreResult<Option<MovieRecord>> {
        Ok(self
            .movie_index
            .get(url)
            .and_then(|id| self.movies.get(id.0 as usize - 1))
            .cloned())
    }

    fn actor_by_url(&self, url: &str) -> StoreResult<Option<ActorRecord>> {
        Ok(self
            .actor_index
            .get(url)
            .and_then(|id| self.actors.get(id.0 as usize - 1))
            .cloned())
    }

    fn count_movies(&self) -> StoreResult<u64> {
        Ok(self.movies.len() as u64)
    }

    fn count_actors(&self) -> StoreResult<u64> {
        Ok(self.actors.len() as u64)
    }

    fn count_actors_with_birth_date(&self) -> StoreResult<u64> {
        Ok(self
            .actors
            .iter()
            .filter(|actor| actor.birth_date.is_some())
            .count() as u64)
    }

    fn count_appearances(&self) -> StoreResult<u64> {
        Ok(self.appearances.len() as u64)
    }
}
