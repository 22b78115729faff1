//! Page extraction
//!
//! Pure functions turning fetched HTML into typed records:
//! - Ranking rows (movie link, title, year, optional rating)
//! - Cast entries of a movie page
//! - Biographical details of an actor page
//!
//! A missing mandatory element means the site's markup changed; extraction
//! then fails instead of producing partial records.

mod actor;
mod movie;
mod ranking;

pub use actor::{parse_actor, ActorDetails};
pub use movie::{parse_movie, CastEntry, CAST_HEADING};
pub use ranking::{normalize_rating, parse_ranking, RankingPage, RankingRow};

use scraper::{ElementRef, Selector};
use thiserror::Error;
use url::Url;

/// Errors raised when a page does not match the expected markup
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("required structure missing: {what}")]
    MissingElement { what: &'static str },

    #[error("expected exactly one {what}, found {count}")]
    NotUnique { what: &'static str, count: usize },

    #[error("invalid {what}: '{value}'")]
    InvalidValue { what: &'static str, value: String },

    #[error("cannot resolve link '{href}': {reason}")]
    InvalidLink { href: String, reason: String },

    #[error("invalid pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: &'static str, reason: String },
}

/// Result type for extraction operations
pub type ExtractionResult<T> = Result<T, ExtractionError>;

/// Compiles a CSS selector
pub(crate) fn selector(css: &'static str) -> ExtractionResult<Selector> {
    Selector::parse(css).map_err(|e| ExtractionError::InvalidPattern {
        pattern: css,
        reason: e.to_string(),
    })
}

/// Selects the single element matching `selector` below `parent`
pub(crate) fn single_element<'a>(
    parent: ElementRef<'a>,
    selector: &Selector,
    what: &'static str,
) -> ExtractionResult<ElementRef<'a>> {
    let mut matches = parent.select(selector);
    let first = matches
        .next()
        .ok_or(ExtractionError::MissingElement { what })?;

    let extra = matches.count();
    if extra > 0 {
        return Err(ExtractionError::NotUnique {
            what,
            count: extra + 1,
        });
    }

    Ok(first)
}

/// Collects the trimmed text content of an element
pub(crate) fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Resolves a link href against the page it was found on
///
/// The fragment is dropped so the result can serve as a canonical URL.
pub(crate) fn resolve_link(href: &str, base_url: &Url) -> ExtractionResult<String> {
    let href = href.trim();

    if href.is_empty() {
        return Err(ExtractionError::InvalidLink {
            href: href.to_string(),
            reason: "empty href".to_string(),
        });
    }

    let mut absolute = base_url
        .join(href)
        .map_err(|e| ExtractionError::InvalidLink {
            href: href.to_string(),
            reason: e.to_string(),
        })?;

    if absolute.scheme() != "http" && absolute.scheme() != "https" {
        return Err(ExtractionError::InvalidLink {
            href: href.to_string(),
            reason: format!("unsupported scheme '{}'", absolute.scheme()),
        });
    }

    absolute.set_fragment(None);
    Ok(absolute.to_string())
}
