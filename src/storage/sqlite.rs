//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the Store trait.

use crate::storage::schema::initialize_schema;
use crate::storage::traits::{Store, StoreError, StoreResult};
use crate::storage::{ActorId, ActorRecord, MovieId, MovieRecord, DATE_FORMAT};
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

/// SQLite storage backend
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Opens or creates the database at `path` and ensures the schema exists
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteStore)` - Successfully opened/created database
    /// * `Err(StoreError)` - Failed to open database
    pub fn open(path: &Path) -> StoreResult<Self> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database
    pub fn open_in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }

    fn count(&self, sql: &str) -> StoreResult<u64> {
        let count: i64 = self.conn.query_row(sql, [], |row| row.get(0))?;
        Ok(count as u64)
    }
}

impl Store for SqliteStore {
    // ===== Identity Resolution =====

    fn find_or_create_movie(
        &mut self,
        url: &str,
        title: &str,
        year: i32,
        rating: Option<f64>,
    ) -> StoreResult<MovieId> {
        let tx = self.conn.transaction()?;

        let existing: Option<i64> = tx
            .query_row(
                "SELECT id FROM movies WHERE canonical_url = ?1",
                params![url],
                |row| row.get(0),
            )
            .optional()?;

        let id = match existing {
            Some(id) => id,
            None => {
                tx.execute(
                    "INSERT INTO movies (title, canonical_url, year, rating) VALUES (?1, ?2, ?3, ?4)",
                    params![title, url, year, rating],
                )?;
                tx.last_insert_rowid()
            }
        };

        tx.commit()?;
        Ok(MovieId(id))
    }

    fn find_or_create_actor(&mut self, url: &str, name: &str) -> StoreResult<(ActorId, bool)> {
        let tx = self.conn.transaction()?;

        let existing: Option<i64> = tx
            .query_row(
                "SELECT id FROM actors WHERE canonical_url = ?1",
                params![url],
                |row| row.get(0),
            )
            .optional()?;

        let result = match existing {
            Some(id) => (ActorId(id), false),
            None => {
                tx.execute(
                    "INSERT INTO actors (name, canonical_url) VALUES (?1, ?2)",
                    params![name, url],
                )?;
                (ActorId(tx.last_insert_rowid()), true)
            }
        };

        tx.commit()?;
        Ok(result)
    }

    fn set_actor_birth_date(&mut self, actor: ActorId, date: NaiveDate) -> StoreResult<()> {
        let updated = self.conn.execute(
            "UPDATE actors SET birth_date = ?1 WHERE id = ?2",
            params![date.format(DATE_FORMAT).to_string(), actor.0],
        )?;

        if updated == 0 {
            return Err(StoreError::ActorNotFound(actor));
        }
        Ok(())
    }

    // ===== Appearance Relation =====

    fn link(&mut self, movie: MovieId, actor: ActorId) -> StoreResult<bool> {
        let inserted = self.conn.execute(
            "INSERT OR IGNORE INTO appearances (movie_id, actor_id) VALUES (?1, ?2)",
            params![movie.0, actor.0],
        )?;
        Ok(inserted > 0)
    }

    fn cast_of(&self, movie: MovieId) -> StoreResult<Vec<ActorId>> {
        let mut stmt = self
            .conn
            .prepare("SELECT actor_id FROM appearances WHERE movie_id = ?1 ORDER BY actor_id")?;

        let actors = stmt
            .query_map(params![movie.0], |row| Ok(ActorId(row.get(0)?)))?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(actors)
    }

    // ===== Lookups =====

    fn movie_by_url(&self, url: &str) -> StoreResult<Option<MovieRecord>> {
        let movie = self
            .conn
            .query_row(
                "SELECT id, canonical_url, title, year, rating FROM movies WHERE canonical_url = ?1",
                params![url],
                |row| {
                    Ok(MovieRecord {
                        id: MovieId(row.get(0)?),
                        canonical_url: row.get(1)?,
                        title: row.get(2)?,
                        year: row.get(3)?,
                        rating: row.get(4)?,
                    })
                },
            )
            .optional()?;

        Ok(movie)
    }

    fn actor_by_url(&self, url: &str) -> StoreResult<Option<ActorRecord>> {
        let row = self
            .conn
            .query_row(
                "SELECT id, canonical_url, name, birth_date FROM actors WHERE canonical_url = ?1",
                params![url],
                |row| {
                    Ok((
                        row.get::<_, i64>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, Option<String>>(3)?,
                    ))
                },
            )
            .optional()?;

        let Some((id, canonical_url, name, birth_date)) = row else {
            return Ok(None);
        };

        let birth_date = birth_date
            .map(|raw| {
                NaiveDate::parse_from_str(&raw, DATE_FORMAT).map_err(|e| {
                    StoreError::Corrupt(format!("actor {} birth_date '{}': {}", id, raw, e))
                })
            })
            .transpose()?;

        Ok(Some(ActorRecord {
            id: ActorId(id),
            canonical_url,
            name,
            birth_date,
        }))
    }

    // ===== Statistics =====

    fn count_movies(&self) -> StoreResult<u64> {
        self.count("SELECT COUNT(*) FROM movies")
    }

    fn count_actors(&self) -> StoreResult<u64> {
        self.count("SELECT COUNT(*) FROM actors")
    }

    fn count_actors_with_birth_date(&self) -> StoreResult<u64> {
        self.count("SELECT COUNT(*) FROM actors WHERE birth_date IS NOT NULL")
    }

    fn count_appearances(&self) -> StoreResult<u64> {
        self.count("SELECT COUNT(*) FROM appearances")
    }
}
