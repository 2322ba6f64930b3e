//! Summary table extraction
//!
//! The portal renders every borrower listing as a `cellspacing="2"` table
//! whose first row holds `<th>` headers. Each following row becomes a
//! [`Record`] keyed by those headers.

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use super::{cell_text, child_cells};
use crate::error::ParseError;
use crate::record::{FieldValue, Record};

static SUMMARY_TABLE: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"table[cellspacing="2"]"#).expect("invalid selector: summary table")
});
static ROW: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("tr").expect("invalid selector: row"));
static ANCHOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("invalid selector: anchor"));

/// Extract every data row of the summary table, in document order.
///
/// Fails as a whole if any row does not have one cell per header. Duplicate
/// headers keep the value of their last column.
pub fn extract_table(document: &Html) -> Result<Vec<Record>, ParseError> {
    let table = document
        .select(&SUMMARY_TABLE)
        .next()
        .ok_or(ParseError::NoSummaryTable)?;

    let mut rows = table.select(&ROW);

    let headers: Vec<String> = rows
        .next()
        .map(|row| child_cells(row, "th").map(cell_text).collect())
        .unwrap_or_default();
    if headers.is_empty() {
        return Err(ParseError::NoHeaderRow);
    }

    let mut records = Vec::new();
    for (i, row) in rows.enumerate() {
        let cells: Vec<FieldValue> = child_cells(row, "td").map(cell_value).collect();
        if cells.len() != headers.len() {
            return Err(ParseError::ColumnCountMismatch {
                row: i + 1,
                expected: headers.len(),
                found: cells.len(),
            });
        }

        records.push(headers.iter().cloned().zip(cells).collect());
    }

    debug!(
        columns = headers.len(),
        rows = records.len(),
        "Extracted summary table"
    );
    Ok(records)
}

/// Parse and extract in one step.
pub fn extract_table_html(html: &str) -> Result<Vec<Record>, ParseError> {
    extract_table(&Html::parse_document(html))
}

/// Link cells keep the whole cell text, not only the anchor's.
fn cell_value(cell: ElementRef<'_>) -> FieldValue {
    match cell.select(&ANCHOR).next() {
        Some(anchor) => FieldValue::Link {
            text: cell_text(cell),
            href: anchor.value().attr("href").unwrap_or_default().trim().to_string(),
        },
        None => FieldValue::Text(cell_text(cell)),
    }
}
