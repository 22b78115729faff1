//! Actor page extraction

use crate::extract::{element_text, selector, ExtractionError, ExtractionResult};
use chrono::NaiveDate;
use regex::Regex;
use scraper::Html;

/// Birth entry such as `nar. 3.7.1975`
const BIRTH_DATE_PATTERN: &str = r"nar\.\s+([0-3]?[0-9])\.([01]?[0-9])\.([0-9]{4})";

/// Details read from an actor page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActorDetails {
    pub birth_date: Option<NaiveDate>,
}

/// Extracts the birth date from an actor's biography list
///
/// Entries are scanned in document order and the first valid match wins.
/// A page without a biography list yields no birth date.
pub fn parse_actor(content: &str) -> ExtractionResult<ActorDetails> {
    let document = Html::parse_document(content);
    let entries = selector("div.info ul li")?;
    let pattern = Regex::new(BIRTH_DATE_PATTERN).map_err(|e| ExtractionError::InvalidPattern {
        pattern: BIRTH_DATE_PATTERN,
        reason: e.to_string(),
    })?;

    for li in document.select(&entries) {
        let text = element_text(li);
        let Some(captures) = pattern.captures(&text) else {
            continue;
        };

        // The pattern guarantees the groups are short digit runs
        let day: u32 = captures[1].parse().unwrap_or(0);
        let month: u32 = captures[2].parse().unwrap_or(0);
        let year: i32 = captures[3].parse().unwrap_or(0);

        match NaiveDate::from_ymd_opt(year, month, day) {
            Some(date) => {
                tracing::debug!("Birth date: {}", date);
                return Ok(ActorDetails {
                    birth_date: Some(date),
                });
            }
            None => {
                tracing::warn!("Ignoring impossible birth date in '{}'", text);
            }
        }
    }

    Ok(ActorDetails::default())
}
