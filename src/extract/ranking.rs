//! Ranking page extraction

use crate::extract::{
    element_text, resolve_link, selector, single_element, ExtractionError, ExtractionResult,
};
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Marker present in the markup of advertisement rows
const AD_SLOT_MARKER: &str = "caroda-slot";

/// One movie listed on the ranking page
#[derive(Debug, Clone, PartialEq)]
pub struct RankingRow {
    /// Absolute URL of the movie page
    pub movie_url: String,
    pub title: String,
    pub year: i32,
    /// Aggregate rating in percent, when the listing shows one
    pub rating: Option<f64>,
}

/// A parsed ranking page
///
/// Rows are extracted on demand by [`RankingPage::rows`], which can be
/// called any number of times.
pub struct RankingPage {
    document: Html,
    base_url: Url,
    table: Selector,
    row: Selector,
    year: Selector,
    link: Selector,
    average: Selector,
}

/// Parses a ranking page
///
/// Fails when the page does not contain exactly one results table.
///
/// # Example
///
/// ```
/// use reel_crawler::extract::parse_ranking;
/// use url::Url;
///
/// let html = r#"<div id="results"><table class="content ui-table-list striped">
///     <tr><td class="film"><a href="/film/1-a/">A</a></td>
///         <td><span class="film-year">(2001)</span></td>
///         <td class="average">87,5%</td></tr>
/// </table></div>"#;
/// let base = Url::parse("https://www.csfd.cz/zebricky/").unwrap();
/// let page = parse_ranking(html, &base).unwrap();
/// let rows: Vec<_> = page.rows().collect::<Result<_, _>>().unwrap();
/// assert_eq!(rows[0].year, 2001);
/// assert_eq!(rows[0].rating, Some(87.5));
/// ```
pub fn parse_ranking(content: &str, base_url: &Url) -> ExtractionResult<RankingPage> {
    let page = RankingPage {
        document: Html::parse_document(content),
        base_url: base_url.clone(),
        table: selector("div#results > table.ui-table-list")?,
        row: selector("tr")?,
        year: selector("td span.film-year")?,
        link: selector("td.film a[href]")?,
        average: selector("td.average")?,
    };

    let tables = page.document.select(&page.table).count();
    match tables {
        0 => Err(ExtractionError::MissingElement {
            what: "ranking results table",
        }),
        1 => Ok(page),
        count => Err(ExtractionError::NotUnique {
            what: "ranking results table",
            count,
        }),
    }
}

impl RankingPage {
    /// Iterates over the listed movies in document order
    ///
    /// Advertisement and empty rows are skipped.
    pub fn rows(&self) -> impl Iterator<Item = ExtractionResult<RankingRow>> + '_ {
        self.document
            .select(&self.table)
            .take(1)
            .flat_map(move |table| {
                table
                    .select(&self.row)
                    .filter(move |tr| owning_table(*tr) == Some(table))
            })
            .enumerate()
            .filter(|(n, tr)| {
                if is_placeholder_row(*tr) {
                    tracing::debug!("Skipping placeholder row {}", n + 1);
                    false
                } else {
                    true
                }
            })
            .map(move |(_, tr)| self.parse_row(tr))
    }

    fn parse_row(&self, tr: ElementRef<'_>) -> ExtractionResult<RankingRow> {
        let year_text = element_text(single_element(tr, &self.year, "film year")?);
        let year = parse_year(&year_text)?;

        let link = single_element(tr, &self.link, "film title link")?;
        let title = element_text(link);
        let href = link
            .value()
            .attr("href")
            .ok_or(ExtractionError::MissingElement { what: "film href" })?;
        let movie_url = resolve_link(href, &self.base_url)?;

        let rating = tr.select(&self.average).next().and_then(|td| {
            let raw = element_text(td);
            let rating = normalize_rating(&raw);
            if rating.is_none() && !raw.is_empty() {
                tracing::warn!("Ignoring unreadable rating '{}' for {}", raw, movie_url);
            }
            rating
        });

        tracing::debug!("Ranking row: {} ({}) {}", title, year, movie_url);

        Ok(RankingRow {
            movie_url,
            title,
            year,
            rating,
        })
    }
}

/// Nearest enclosing `<table>` of a row, so rows of tables nested in ad
/// slots are not taken for listing rows
fn owning_table(tr: ElementRef<'_>) -> Option<ElementRef<'_>> {
    tr.ancestors()
        .filter_map(ElementRef::wrap)
        .find(|el| el.value().name() == "table")
}

/// Returns true for advertisement slots and rows without cells
fn is_placeholder_row(tr: ElementRef<'_>) -> bool {
    let has_children = tr.children().any(|child| child.value().is_element());
    !has_children || tr.html().contains(AD_SLOT_MARKER)
}

/// Parses a parenthesized year such as `(2001)`
fn parse_year(text: &str) -> ExtractionResult<i32> {
    text.trim()
        .trim_start_matches('(')
        .trim_end_matches(')')
        .trim()
        .parse()
        .map_err(|_| ExtractionError::InvalidValue {
            what: "film year",
            value: text.to_string(),
        })
}

/// Normalizes a percentage with a comma decimal separator, e.g. `87,5%` to 87.5
pub fn normalize_rating(text: &str) -> Option<f64> {
    let number = text.trim().trim_end_matches('%').trim().replace(',', ".");
    if number.is_empty() {
        return None;
    }
    number.parse().ok().filter(|value: &f64| value.is_finite())
}
