//! Storage module for persisting crawl results
//!
//! This module owns the Movie, Actor and Appearance rows, including:
//! - SQLite database initialization and schema management
//! - Find-or-create resolution by canonical URL
//! - The deduplicated movie/actor appearance relation
//! - An in-memory implementation of the same contract

mod memory;
mod schema;
mod sqlite;
mod traits;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use traits::{Store, StoreError, StoreResult};

use chrono::NaiveDate;
use std::fmt;

/// Reference to a stored movie
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MovieId(pub i64);

/// Reference to a stored actor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActorId(pub i64);

impl fmt::Display for MovieId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "movie#{}", self.0)
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "actor#{}", self.0)
    }
}

/// Represents a movie in the database
#[derive(Debug, Clone, PartialEq)]
pub struct MovieRecord {
    pub id: MovieId,
    pub canonical_url: String,
    pub title: String,
    pub year: i32,
    pub rating: Option<f64>,
}

/// Represents an actor in the database
#[derive(Debug, Clone, PartialEq)]
pub struct ActorRecord {
    pub id: ActorId,
    pub canonical_url: String,
    pub name: String,
    pub birth_date: Option<NaiveDate>,
}

/// Date format used for the `birth_date` column
pub(crate) const DATE_FORMAT: &str = "%Y-%m-%d";
