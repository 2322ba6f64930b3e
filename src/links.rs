//! Session link construction
//!
//! Every authenticated request goes to `<base>/<TOKEN>-<nonce>` where the
//! nonce is a fresh five digit number. Portal functions are selected through
//! `func=bor-<name>` in the query string.

use rand::Rng;
use url::form_urlencoded;

use crate::config::PortalConfig;
use crate::session::Session;

pub const NONCE_MIN: u32 = 10_000;
pub const NONCE_MAX: u32 = 99_999;

/// Borrower functions exposed by the portal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PortalFunction {
    Info,
    Loan,
    LoanDetail,
    LoanHistory,
    Hold,
    Cash,
}

impl PortalFunction {
    /// Name without the `bor-` prefix.
    pub fn as_str(self) -> &'static str {
        match self {
            PortalFunction::Info => "info",
            PortalFunction::Loan => "loan",
            PortalFunction::LoanDetail => "loan-exp",
            PortalFunction::LoanHistory => "history-loan",
            PortalFunction::Hold => "hold",
            PortalFunction::Cash => "cash",
        }
    }
}

/// One outgoing request address. Built per call, never reused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkSpec<'a> {
    pub base_url: &'a str,
    pub library: &'a str,
    pub token: Option<&'a str>,
    pub nonce: u32,
    pub function: Option<&'a str>,
    pub params: &'a [(&'a str, &'a str)],
}

impl LinkSpec<'_> {
    pub fn render(&self) -> String {
        let Some(token) = self.token else {
            return self.base_url.to_string();
        };

        let mut link = format!("{}/{}-{}", self.base_url, token, self.nonce);

        // Later keys override earlier ones, in first-seen order.
        let mut pairs: Vec<(&str, String)> = Vec::new();
        if let Some(function) = self.function {
            pairs.push(("adm_library", self.library.to_string()));
            pairs.push(("func", format!("bor-{}", function)));
        }
        for &(key, value) in self.params {
            match pairs.iter_mut().find(|(k, _)| *k == key) {
                Some(pair) => pair.1 = value.to_string(),
                None => pairs.push((key, value.to_string())),
            }
        }

        let query = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(&pairs)
            .finish();

        if !query.is_empty() {
            link.push('?');
            link.push_str(&query);
        }
        link
    }
}

/// Produces request URLs from a read-only view of the session.
#[derive(Debug, Clone)]
pub struct LinkBuilder {
    base_url: String,
    library: String,
}

impl LinkBuilder {
    pub fn new(config: &PortalConfig) -> Self {
        Self {
            base_url: config.base().to_string(),
            library: config.library.clone(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Without a token this is the bare base URL, used for token discovery.
    pub fn build(
        &self,
        session: &Session,
        function: Option<&str>,
        params: &[(&str, &str)],
    ) -> String {
        let spec = LinkSpec {
            base_url: &self.base_url,
            library: &self.library,
            token: session.token(),
            nonce: rand::thread_rng().gen_range(NONCE_MIN..=NONCE_MAX),
            function,
            params,
        };
        spec.render()
    }
}
