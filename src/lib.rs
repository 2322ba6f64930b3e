//! Client for the SABi library portal
//!
//! The portal has no API. This crate logs in through its session-link
//! protocol and scrapes borrower pages into typed records:
//! - session token discovery and the credential handshake
//! - per-request links with a fresh nonce
//! - summary table and detail page extraction
//! - loans with lazily fetched detail fields
//!
//! ```no_run
//! use sabi_client::{Credentials, Portal, PortalConfig};
//!
//! let credentials = Credentials::from_number(123456, "112233")?;
//! let portal = Portal::connect(&PortalConfig::default(), &credentials)?;
//! for loan in portal.loans()? {
//!     println!("{} {} {}", loan.number(), loan.title()?, loan.barcode()?);
//! }
//! # Ok::<(), sabi_client::Error>(())
//! ```

pub mod config;
pub mod credentials;
pub mod error;
pub mod extractors;
pub mod fetcher;
pub mod links;
pub mod loan;
pub mod portal;
pub mod record;
pub mod repository;
pub mod session;

#[cfg(test)]
mod testing;

pub use config::PortalConfig;
pub use credentials::Credentials;
pub use error::{
    AuthenticationError, ConfigError, CredentialsError, Error, FetchError, ParseError, Result,
    UnknownFieldError,
};
pub use extractors::{extract_pairs, extract_table};
pub use fetcher::{PageFetcher, UreqFetcher};
pub use links::{LinkBuilder, LinkSpec, PortalFunction};
pub use loan::{ExtendedFields, Loan, LoanField};
pub use portal::{Portal, PortalContext};
pub use record::{FieldValue, Record};
pub use repository::RecordRepository;
pub use session::{Session, SessionManager};
