//! Statistics generation from the crawl database
//!
//! This module provides functionality for extracting and displaying
//! row counts from the storage layer.

use crate::storage::{Store, StoreResult};

/// Row counts of a store
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreStats {
    pub movies: u64,
    pub actors: u64,
    /// Actors whose birth date is known
    pub actors_with_birth_date: u64,
    pub appearances: u64,
}

/// Loads statistics from storage
///
/// # Arguments
///
/// * `store` - The storage backend to query
///
/// # Returns
///
/// * `Ok(StoreStats)` - Successfully loaded statistics
/// * `Err(StoreError)` - Failed to query statistics
pub fn load_statistics(store: &impl Store) -> StoreResult<StoreStats> {
    Ok(StoreStats {
        movies: store.count_movies()?,
        actors: store.count_actors()?,
        actors_with_birth_date: store.count_actors_with_birth_date()?,
        appearances: store.count_appearances()?,
    })
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &StoreStats) {
    println!("=== Crawl Statistics ===\n");

    println!("  Movies: {}", stats.movies);
    println!("  Actors: {}", stats.actors);
    println!("  Appearances: {}", stats.appearances);

    let coverage = if stats.actors > 0 {
        (stats.actors_with_birth_date as f64 / stats.actors as f64) * 100.0
    } else {
        0.0
    };
    println!(
        "  Birth dates known: {} / {} ({:.1}%)",
        stats.actors_with_birth_date, stats.actors, coverage
    );

    if stats.movies > 0 {
        println!(
            "  Average cast size: {:.1}",
            stats.appearances as f64 / stats.movies as f64
        );
    }
}
