//! HTML extraction rules
//!
//! Two rules cover the portal's pages: header/row summary tables and
//! pairwise label/value detail forms.

mod detail_extractor;
mod table_extractor;

pub use detail_extractor::*;
pub use table_extractor::*;

use scraper::ElementRef;

/// Element text with whitespace runs (including `&nbsp;`) collapsed.
fn cell_text(element: ElementRef<'_>) -> String {
    let text: String = element.text().collect();
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Direct children of `row` with the given tag name.
fn child_cells<'a>(row: ElementRef<'a>, tag: &'static str) -> impl Iterator<Item = ElementRef<'a>> {
    row.children()
        .filter_map(ElementRef::wrap)
        .filter(move |el| el.value().name() == tag)
}
