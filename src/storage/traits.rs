//! Storage traits and error types
//!
//! This module defines the trait interface for storage backends and
//! associated error types.

use crate::storage::{ActorId, ActorRecord, MovieId, MovieRecord};
use chrono::NaiveDate;
use thiserror::Error;

/// Errors that can occur during storage operations
///
/// A uniqueness conflict is never reported here: find-or-create and `link`
/// resolve existing rows before writing.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Actor not found: {0}")]
    ActorNotFound(ActorId),

    #[error("Corrupt row: {0}")]
    Corrupt(String),
}

/// Result type for storage operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Trait for storage backend implementations
///
/// Entities are keyed by canonical URL. Writes are write-once: a lookup that
/// finds an existing row returns it untouched.
pub trait Store {
    // ===== Identity Resolution =====

    /// Returns the movie stored under `url`, inserting it first if absent
    ///
    /// An existing row keeps the title, year and rating it was created with,
    /// even when the arguments differ.
    fn find_or_create_movie(
        &mut self,
        url: &str,
        title: &str,
        year: i32,
        rating: Option<f64>,
    ) -> StoreResult<MovieId>;

    /// Returns the actor stored under `url`, inserting it first if absent
    ///
    /// # Returns
    ///
    /// The actor ID and `true` when this call created the row
    fn find_or_create_actor(&mut self, url: &str, name: &str) -> StoreResult<(ActorId, bool)>;

    /// Sets the birth date of an actor unconditionally
    fn set_actor_birth_date(&mut self, actor: ActorId, date: NaiveDate) -> StoreResult<()>;

    // ===== Appearance Relation =====

    /// Records that `actor` appears in `movie`
    ///
    /// Linking a pair that already exists is a silent no-op.
    ///
    /// # Returns
    ///
    /// `true` if a new appearance row was inserted
    fn link(&mut self, movie: MovieId, actor: ActorId) -> StoreResult<bool>;

    /// Gets the actors linked to a movie, ordered by actor ID
    fn cast_of(&self, movie: MovieId) -> StoreResult<Vec<ActorId>>;

    // ===== Lookups =====

    /// Gets a movie by canonical URL
    fn movie_by_url(&self, url: &str) -> StoreResult<Option<MovieRecord>>;

    /// Gets an actor by canonical URL
    fn actor_by_url(&self, url: &str) -> StoreResult<Option<ActorRecord>>;

    // ===== Statistics =====

    fn count_movies(&self) -> StoreResult<u64>;

    fn count_actors(&self) -> StoreResult<u64>;

    /// Counts actors whose birth date is known
    fn count_actors_with_birth_date(&self) -> StoreResult<u64>;

    fn count_appearances(&self) -> StoreResult<u64>;
}
