//! Detail page extraction
//!
//! Item detail pages are two-column forms: every `td.td1` cell alternates
//! between a label and its value, with no header row.

use std::collections::HashMap;
use std::sync::LazyLock;

use scraper::{Html, Selector};

use super::cell_text;
use crate::error::ParseError;

static DETAIL_CELL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("td.td1").expect("invalid selector: detail cell"));

/// Read `td.td1` cells pairwise into a label -> value map.
pub fn extract_pairs(document: &Html) -> Result<HashMap<String, String>, ParseError> {
    let cells: Vec<String> = document.select(&DETAIL_CELL).map(cell_text).collect();
    if cells.len() % 2 != 0 {
        return Err(ParseError::UnpairedDetailCell(cells.len()));
    }

    Ok(cells
        .chunks_exact(2)
        .map(|pair| (pair[0].clone(), pair[1].clone()))
        .collect())
}

pub fn extract_pairs_html(html: &str) -> Result<HashMap<String, String>, ParseError> {
    extract_pairs(&Html::parse_document(html))
}
