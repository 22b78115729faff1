//! Database schema definitions
//!
//! This module contains all SQL schema definitions for the Reel-Crawler database.

/// SQL schema for the database
pub const SCHEMA_SQL: &str = r#"
-- One row per distinct movie page
CREATE TABLE IF NOT EXISTS movies (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    canonical_url TEXT NOT NULL UNIQUE,
    year INTEGER NOT NULL,
    rating REAL
);

-- One row per distinct actor page
CREATE TABLE IF NOT EXISTS actors (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    canonical_url TEXT NOT NULL UNIQUE,
    name TEXT NOT NULL,
    birth_date TEXT
);

-- Movie/actor relation
CREATE TABLE IF NOT EXISTS appearances (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    movie_id INTEGER NOT NULL REFERENCES movies(id),
    actor_id INTEGER NOT NULL REFERENCES actors(id),
    UNIQUE(movie_id, actor_id)
);

CREATE INDEX IF NOT EXISTS idx_appearances_actor ON appearances(actor_id);
"#;

/// Initializes the database schema
///
/// # Arguments
///
/// * `conn` - The database connection
///
/// # Returns
///
/// * `Ok(())` - Schema initialized successfully
/// * `Err(rusqlite::Error)` - Failed to initialize schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}
