//! Portal configuration
//!
//! Defaults target the UFRGS SABi installation. Values can be overridden from
//! JSON or from `SABI_*` environment variables.

use serde::Deserialize;

use crate::error::ConfigError;

pub const DEFAULT_BASE_URL: &str = "http://sabi.ufrgs.br/F";
pub const DEFAULT_LIBRARY: &str = "URS50";
pub const DEFAULT_USER_AGENT: &str = concat!("sabi_client/", env!("CARGO_PKG_VERSION"));
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Connection and protocol settings for one portal installation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PortalConfig {
    /// Portal root, e.g. `http://sabi.ufrgs.br/F`. Session links are built under it.
    pub base_url: String,
    /// Library code sent as `bor_library` and `adm_library`.
    pub library: String,
    pub user_agent: String,
    /// Global per-request timeout applied by [`crate::UreqFetcher`].
    pub timeout_secs: u64,
    /// Substrings of which at least one must appear in the post-login page.
    pub authenticated_markers: Vec<String>,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            library: DEFAULT_LIBRARY.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            authenticated_markers: vec![
                "func=bor-loan".to_string(),
                "func=bor-cash".to_string(),
                "func=bor-hold".to_string(),
            ],
        }
    }
}

impl PortalConfig {
    /// Parse a JSON object; missing keys keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Defaults overridden by `SABI_BASE_URL`, `SABI_LIBRARY`,
    /// `SABI_USER_AGENT`, `SABI_TIMEOUT_SECS` and `SABI_AUTH_MARKERS`
    /// (comma separated).
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`PortalConfig::from_env`] with an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(base_url) = lookup("SABI_BASE_URL") {
            config.base_url = base_url;
        }
        if let Some(library) = lookup("SABI_LIBRARY") {
            config.library = library;
        }
        if let Some(user_agent) = lookup("SABI_USER_AGENT") {
            config.user_agent = user_agent;
        }
        if let Some(timeout) = lookup("SABI_TIMEOUT_SECS") {
            config.timeout_secs = timeout.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: "SABI_TIMEOUT_SECS".to_string(),
                value: timeout.clone(),
            })?;
        }
        if let Some(markers) = lookup("SABI_AUTH_MARKERS") {
            config.authenticated_markers = markers
                .split(',')
                .map(str::trim)
                .filter(|m| !m.is_empty())
                .map(String::from)
                .collect();
            if config.authenticated_markers.is_empty() {
                return Err(ConfigError::InvalidValue {
                    key: "SABI_AUTH_MARKERS".to_string(),
                    value: markers,
                });
            }
        }

        Ok(config)
    }

    /// Base URL without a trailing slash.
    pub fn base(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}
