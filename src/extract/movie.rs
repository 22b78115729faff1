//! Movie page extraction

use crate::extract::{element_text, resolve_link, selector, ExtractionError, ExtractionResult};
use scraper::{ElementRef, Html};
use url::Url;

/// Exact text of the heading that introduces the cast list
pub const CAST_HEADING: &str = "Hrají:";

/// One actor credited in a movie's cast section
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CastEntry {
    /// Absolute URL of the actor page
    pub actor_url: String,
    pub name: String,
}

/// Extracts the cast of a movie page in document order
///
/// The cast section is the parent of the single `h4` heading whose text is
/// exactly [`CAST_HEADING`]. Every link inside it is one entry; an actor
/// credited twice yields two entries.
///
/// # Errors
///
/// Fails when the page has no cast heading or more than one.
pub fn parse_movie(content: &str, base_url: &Url) -> ExtractionResult<Vec<CastEntry>> {
    let document = Html::parse_document(content);
    let heading = selector("div > h4")?;
    let link = selector("a[href]")?;

    let headings: Vec<_> = document
        .select(&heading)
        .filter(|h4| element_text(*h4) == CAST_HEADING)
        .collect();

    let h4 = match headings.as_slice() {
        [] => {
            return Err(ExtractionError::MissingElement {
                what: "cast section",
            })
        }
        [single] => *single,
        many => {
            return Err(ExtractionError::NotUnique {
                what: "cast section",
                count: many.len(),
            })
        }
    };

    let section = h4
        .parent()
        .and_then(ElementRef::wrap)
        .ok_or(ExtractionError::MissingElement {
            what: "cast section container",
        })?;

    section
        .select(&link)
        .map(|a| {
            let href = a.value().attr("href").unwrap_or_default();
            let entry = CastEntry {
                actor_url: resolve_link(href, base_url)?,
                name: element_text(a),
            };
            tracing::debug!("Cast entry: {} {}", entry.name, entry.actor_url);
            Ok(entry)
        })
        .collect()
}
