//! Shared fixtures and a scripted fetcher for unit tests.

use std::sync::{Arc, Mutex};

use crate::config::PortalConfig;
use crate::error::FetchError;
use crate::fetcher::PageFetcher;
use crate::portal::PortalContext;
use crate::session::Session;

pub const BASE_URL: &str = "http://sabi.test/F";
pub const TOKEN: &str = "4XQ8LT5N2VKH3B6Y9M1FJRPCDSAGEU7W";

pub const ACCOUNT_PAGE: &str = r#"
<html><body>
  <table cellspacing="2" border="0">
    <tr><th>Atividade</th><th>Total</th></tr>
    <tr><td>Empréstimos</td><td><a href="http://sabi.test/F/4XQ8LT5N2VKH3B6Y9M1FJRPCDSAGEU7W-23456?func=bor-loan&amp;adm_library=URS50">2</a></td></tr>
    <tr><td>Débito</td><td><a href="http://sabi.test/F/4XQ8LT5N2VKH3B6Y9M1FJRPCDSAGEU7W-23457?func=bor-cash&amp;adm_library=URS50">0,00</a></td></tr>
  </table>
</body></html>
"#;

pub const LOAN_TABLE: &str = r#"
<html><body>
  <table cellspacing="2" border="0" width="100%">
    <tr>
      <th class="text3">N.</th>
      <th class="text3">Título</th>
      <th class="text3">Autor</th>
    </tr>
    <tr>
      <td class="td1"><a href="javascript:open_window('http://sabi.test/F/4XQ8-11111?func=bor-loan-exp&amp;doc_number=42&amp;item_sequence=1&amp;index=0');">001</a></td>
      <td class="td1">O Processo</td>
      <td class="td1">  Kafka </td>
    </tr>
    <tr>
      <td class="td1"><a href="http://sabi.test/F/4XQ8-22222?func=bor-loan-exp&amp;doc_number=000305112&amp;item_sequence=000020&amp;index=1">002</a></td>
      <td class="td1">Grande sertão:
          veredas</td>
      <td class="td1">Rosa, João Guimarães</td>
    </tr>
  </table>
</body></html>
"#;

pub const DETAIL_PAGE: &str = r#"
<html><body>
  <table cellspacing="2">
    <tr><td class="td1">Observação</td><td class="td1">none</td></tr>
    <tr><td class="td1">Código de barras</td><td class="td1">999888</td></tr>
    <tr><td class="td1">Data empréstimo</td><td class="td1">2024-01-01</td></tr>
    <tr><td class="td1">Biblioteca</td><td class="td1">Biblioteca Central</td></tr>
  </table>
</body></html>
"#;

pub fn login_page() -> String {
    format!(
        r#"<html><body>
        <form method="post" action="{base}/{token}-01234?func=login-session&amp;login_source=bor-info">
          <input name="bor_id"><input name="bor_verification" type="password">
        </form>
        </body></html>"#,
        base = BASE_URL,
        token = TOKEN
    )
}

pub fn config() -> PortalConfig {
    PortalConfig {
        base_url: BASE_URL.to_string(),
        ..PortalConfig::default()
    }
}

/// Context with an established session, bypassing the handshake.
pub fn context(fetcher: Arc<ScriptedFetcher>) -> Arc<PortalContext> {
    Arc::new(PortalContext::new(
        &config(),
        Session::established_with(TOKEN.to_string()),
        fetcher,
    ))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

#[derive(Debug, Clone)]
pub struct Request {
    pub method: Method,
    pub url: String,
    pub body: Option<String>,
}

#[derive(Debug)]
enum Matcher {
    Exact(String),
    Contains(String),
}

#[derive(Debug)]
struct Route {
    method: Method,
    matcher: Matcher,
    body: String,
}

/// Answers requests from a fixed route list and records every call.
///
/// Routes are tried in registration order; unmatched requests fail with a 404.
#[derive(Debug, Default)]
pub struct ScriptedFetcher {
    routes: Vec<Route>,
    requests: Mutex<Vec<Request>>,
}

impl ScriptedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// GET of the bare base URL.
    pub fn on_landing(mut self, body: &str) -> Self {
        self.routes.push(Route {
            method: Method::Get,
            matcher: Matcher::Exact(BASE_URL.to_string()),
            body: body.to_string(),
        });
        self
    }

    pub fn on_get(mut self, pattern: &str, body: &str) -> Self {
        self.routes.push(Route {
            method: Method::Get,
            matcher: Matcher::Contains(pattern.to_string()),
            body: body.to_string(),
        });
        self
    }

    pub fn on_post(mut self, pattern: &str, body: &str) -> Self {
        self.routes.push(Route {
            method: Method::Post,
            matcher: Matcher::Contains(pattern.to_string()),
            body: body.to_string(),
        });
        self
    }

    pub fn requests(&self) -> Vec<Request> {
        self.requests.lock().unwrap().clone()
    }

    pub fn count(&self, pattern: &str) -> usize {
        self.requests().iter().filter(|r| r.url.contains(pattern)).count()
    }

    fn respond(&self, method: Method, url: &str, body: Option<&str>) -> Result<String, FetchError> {
        self.requests.lock().unwrap().push(Request {
            method,
            url: url.to_string(),
            body: body.map(String::from),
        });

        self.routes
            .iter()
            .find(|route| {
                route.method == method
                    && match &route.matcher {
                        Matcher::Exact(expected) => url == expected,
                        Matcher::Contains(pattern) => url.contains(pattern.as_str()),
                    }
            })
            .map(|route| route.body.clone())
            .ok_or_else(|| FetchError::Http(ureq::Error::StatusCode(404)))
    }
}

impl PageFetcher for ScriptedFetcher {
    fn get(&self, url: &str) -> Result<String, FetchError> {
        self.respond(Method::Get, url, None)
    }

    fn post(&self, url: &str, body: &str) -> Result<String, FetchError> {
        self.respond(Method::Post, url, Some(body))
    }
}
