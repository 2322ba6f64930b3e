//! Authenticated portal client
//!
//! [`Portal::connect`] logs in once and then serves listings through the
//! shared [`PortalContext`], which loans also keep for their detail fetches.

use std::fmt;
use std::sync::Arc;

use scraper::Html;
use tracing::debug;

use crate::config::PortalConfig;
use crate::credentials::Credentials;
use crate::error::Result;
use crate::extractors::extract_table;
use crate::fetcher::{PageFetcher, UreqFetcher};
use crate::links::{LinkBuilder, PortalFunction};
use crate::loan::Loan;
use crate::record::Record;
use crate::repository::RecordRepository;
use crate::session::{Session, SessionManager};

/// Established session plus the means to issue requests under it.
pub struct PortalContext {
    links: LinkBuilder,
    session: Session,
    fetcher: Arc<dyn PageFetcher>,
}

impl PortalContext {
    pub(crate) fn new(config: &PortalConfig, session: Session, fetcher: Arc<dyn PageFetcher>) -> Self {
        Self {
            links: LinkBuilder::new(config),
            session,
            fetcher,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Fresh link for `function`, new nonce on every call.
    pub fn link(&self, function: PortalFunction, params: &[(&str, &str)]) -> String {
        self.links.build(&self.session, Some(function.as_str()), params)
    }

    /// GET `function` and parse the response.
    pub fn fetch(&self, function: PortalFunction, params: &[(&str, &str)]) -> Result<Html> {
        let url = self.link(function, params);
        debug!(function = function.as_str(), "Fetching portal page");
        let body = self.fetcher.get(&url)?;
        Ok(Html::parse_document(&body))
    }
}

impl fmt::Debug for PortalContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PortalContext")
            .field("links", &self.links)
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

/// Logged-in client for one borrower.
#[derive(Debug, Clone)]
pub struct Portal {
    context: Arc<PortalContext>,
    repository: RecordRepository,
}

impl Portal {
    /// Log in over HTTP with a [`UreqFetcher`] built from `config`.
    pub fn connect(config: &PortalConfig, credentials: &Credentials) -> Result<Self> {
        Self::connect_with(config, Arc::new(UreqFetcher::new(config)), credentials)
    }

    /// Log in through a caller-supplied fetcher.
    pub fn connect_with(
        config: &PortalConfig,
        fetcher: Arc<dyn PageFetcher>,
        credentials: &Credentials,
    ) -> Result<Self> {
        let mut manager = SessionManager::new(config);
        manager.authenticate(fetcher.as_ref(), credentials)?;

        let context = Arc::new(PortalContext::new(config, manager.into_session(), fetcher));
        Ok(Self {
            repository: RecordRepository::new(Arc::clone(&context)),
            context,
        })
    }

    pub fn session(&self) -> &Session {
        self.context.session()
    }

    pub fn repository(&self) -> &RecordRepository {
        &self.repository
    }

    /// Summary table of any borrower function as raw records.
    pub fn list(&self, function: PortalFunction) -> Result<Vec<Record>> {
        let document = self.context.fetch(function, &[])?;
        Ok(extract_table(&document)?)
    }

    /// Current loans. Extended fields are fetched per loan on first access.
    pub fn loans(&self) -> Result<Vec<Loan>> {
        let records = self.list(PortalFunction::Loan)?;
        Ok(self.repository.to_entities(records)?)
    }

    pub fn holds(&self) -> Result<Vec<Record>> {
        self.list(PortalFunction::Hold)
    }

    /// Fines and payments table.
    pub fn cash(&self) -> Result<Vec<Record>> {
        self.list(PortalFunction::Cash)
    }

    pub fn loan_history(&self) -> Result<Vec<Record>> {
        self.list(PortalFunction::LoanHistory)
    }
}
