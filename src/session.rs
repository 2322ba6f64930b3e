//! Session discovery and login handshake

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, info, warn};
use url::form_urlencoded;

use crate::config::PortalConfig;
use crate::credentials::Credentials;
use crate::error::{AuthenticationError, Result};
use crate::fetcher::PageFetcher;
use crate::links::LinkBuilder;

/// `/<TOKEN>-<nonce>?...login-session` inside the landing page.
static RE_SESSION_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"/([A-Z0-9]+)-[0-9]{5}\?.*?login-session").expect("invalid regex: session token")
});

/// Portal session state.
///
/// Starts empty; the handshake fills it in once and it stays fixed afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    token: Option<String>,
    established: bool,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn is_established(&self) -> bool {
        self.established
    }

    /// Token known but not yet usable, for building the login POST link.
    fn discovered(token: String) -> Self {
        Self {
            token: Some(token),
            established: false,
        }
    }

    #[cfg(test)]
    pub(crate) fn established_with(token: String) -> Self {
        Self {
            token: Some(token),
            established: true,
        }
    }
}

/// Pull the session token out of the landing page.
pub fn discover_token(page: &str) -> std::result::Result<String, AuthenticationError> {
    RE_SESSION_TOKEN
        .captures(page)
        .map(|caps| caps[1].to_string())
        .ok_or(AuthenticationError::TokenDiscovery)
}

/// Form body of the credential POST, keys in portal order.
pub fn login_form(library: &str, credentials: &Credentials) -> String {
    form_urlencoded::Serializer::new(String::new())
        .append_pair("func", "login-session")
        .append_pair("login_source", "bor-info")
        .append_pair("bor_library", library)
        .append_pair("bor_id", credentials.identifier())
        .append_pair("bor_verification", credentials.secret())
        .append_pair("x", "0")
        .append_pair("y", "0")
        .finish()
}

/// Owns the [`Session`] and runs the two-step login.
#[derive(Debug, Clone)]
pub struct SessionManager {
    links: LinkBuilder,
    library: String,
    markers: Vec<String>,
    session: Session,
}

impl SessionManager {
    pub fn new(config: &PortalConfig) -> Self {
        Self {
            links: LinkBuilder::new(config),
            library: config.library.clone(),
            markers: config.authenticated_markers.clone(),
            session: Session::new(),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn links(&self) -> &LinkBuilder {
        &self.links
    }

    /// Discover the token and log in.
    ///
    /// Any failure leaves the session untouched; callers retry the whole call.
    /// An already established session is returned as is.
    pub fn authenticate(
        &mut self,
        fetcher: &dyn PageFetcher,
        credentials: &Credentials,
    ) -> Result<&Session> {
        if self.session.is_established() {
            return Ok(&self.session);
        }

        let landing_url = self.links.build(&self.session, None, &[]);
        let landing = fetcher.get(&landing_url)?;
        let token = discover_token(&landing).inspect_err(|_| {
            warn!(url = %landing_url, "No session token in landing page");
        })?;
        debug!(token = %token, "Discovered session token");

        let pending = Session::discovered(token);
        let login_url = self.links.build(&pending, None, &[]);
        let body = login_form(&self.library, credentials);
        let response = fetcher.post(&login_url, &body)?;

        if !self.markers.iter().any(|m| response.contains(m.as_str())) {
            warn!(
                borrower = credentials.identifier(),
                "Login response carries no authenticated marker"
            );
            return Err(AuthenticationError::HandshakeRejected.into());
        }

        self.session = Session {
            established: true,
            ..pending
        };
        info!(borrower = credentials.identifier(), "Session established");
        Ok(&self.session)
    }

    /// Hand the session over, e.g. to a shared portal context.
    pub fn into_session(self) -> Session {
        self.session
    }
}
