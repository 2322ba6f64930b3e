//! Table cell values and records

use std::collections::HashMap;

use serde::Serialize;

/// One table cell: plain text, or an anchor with its target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldValue {
    Text(String),
    Link { text: String, href: String },
}

impl FieldValue {
    pub fn text(&self) -> &str {
        match self {
            FieldValue::Text(text) | FieldValue::Link { text, .. } => text,
        }
    }

    pub fn href(&self) -> Option<&str> {
        match self {
            FieldValue::Text(_) => None,
            FieldValue::Link { href, .. } => Some(href),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(text: &str) -> Self {
        FieldValue::Text(text.to_string())
    }
}

/// Row of a summary table keyed by its column headers.
pub type Record = HashMap<String, FieldValue>;
