//! Configuration module for Reel-Crawler
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every key has a default, so a run without any configuration file is valid.
//!
//! # Example
//!
//! ```no_run
//! use reel_crawler::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("crawler.toml")).unwrap();
//! println!("Ranking page: {}", config.crawler.ranking_url);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, OutputConfig, UserAgentConfig};

// Re-export parser functions
pub use parser::{load_config, load_config_or_default};
pub use validation::validate;
