//! Error types
//!
//! One enum per failure domain, unified by [`Error`] at the public entry
//! points. Transport failures pass through untouched.

use thiserror::Error;

/// Failures of the login sequence.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthenticationError {
    /// The landing page did not carry a `<TOKEN>-<nonce>?...login-session` link.
    #[error("token discovery failed")]
    TokenDiscovery,
    /// The credential POST returned a page without any authenticated marker.
    #[error("handshake rejected")]
    HandshakeRejected,
}

/// A structural element was missing or malformed in a portal response.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("no summary table")]
    NoSummaryTable,
    #[error("no header row")]
    NoHeaderRow,
    #[error("column count mismatch in row {row}: expected {expected} cells, found {found}")]
    ColumnCountMismatch {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("malformed row link: {0}")]
    MalformedRowLink(String),
    #[error("missing column: {0}")]
    MissingColumn(String),
    #[error("unpaired detail cell: {0} cells found")]
    UnpairedDetailCell(usize),
    #[error("missing detail label: {0}")]
    MissingDetailLabel(String),
}

/// A public field name with no entry in the translation table.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown field: {0}")]
pub struct UnknownFieldError(pub String);

/// Rejected credential input.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CredentialsError {
    #[error("identifier must be 1 to 8 digits, got {0:?}")]
    Identifier(String),
    #[error("secret must be exactly 6 digits")]
    Secret,
}

/// Configuration loading failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid value for {key}: {value:?}")]
    InvalidValue { key: String, value: String },
}

/// Transport failures reported by a [`crate::PageFetcher`].
#[derive(Debug, Error)]
pub enum FetchError {
    #[error(transparent)]
    Http(#[from] ureq::Error),
}

/// Crate-level error returned by the public entry points.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Authentication(#[from] AuthenticationError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    UnknownField(#[from] UnknownFieldError),
    #[error(transparent)]
    Credentials(#[from] CredentialsError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Fetch(#[from] FetchError),
}

pub type Result<T> = std::result::Result<T, Error>;
