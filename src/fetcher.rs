//! HTTP boundary
//!
//! The protocol code only sees [`PageFetcher`]; [`UreqFetcher`] is the
//! blocking implementation used outside tests.

use std::time::Duration;

use crate::config::PortalConfig;
use crate::error::FetchError;

/// Performs the raw GET/POST calls and returns the response body as text.
pub trait PageFetcher: Send + Sync {
    fn get(&self, url: &str) -> Result<String, FetchError>;

    /// POST an already form-urlencoded `body`.
    fn post(&self, url: &str, body: &str) -> Result<String, FetchError>;
}

/// [`PageFetcher`] backed by a shared `ureq` agent.
///
/// Non-2xx statuses are reported as `ureq::Error::StatusCode`.
#[derive(Debug, Clone)]
pub struct UreqFetcher {
    agent: ureq::Agent,
}

impl UreqFetcher {
    pub fn new(config: &PortalConfig) -> Self {
        let agent = ureq::Agent::new_with_config(
            ureq::Agent::config_builder()
                .timeout_global(Some(Duration::from_secs(config.timeout_secs)))
                .user_agent(config.user_agent.as_str())
                .build(),
        );

        Self { agent }
    }

    pub fn from_agent(agent: ureq::Agent) -> Self {
        Self { agent }
    }
}

impl PageFetcher for UreqFetcher {
    fn get(&self, url: &str) -> Result<String, FetchError> {
        let body = self.agent.get(url).call()?.into_body().read_to_string()?;
        Ok(body)
    }

    fn post(&self, url: &str, body: &str) -> Result<String, FetchError> {
        let body = self
            .agent
            .post(url)
            .header("Content-Type", "application/x-www-form-urlencoded")
            .send(body)?
            .into_body()
            .read_to_string()?;
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufRead, BufReader, Read, Write};
    use std::net::TcpListener;
    use std::sync::mpsc;
    use std::thread;

    use crate::extractors::extract_table_html;

    /// Serve one response with raw `body` bytes; the request body is sent back on the channel.
    fn serve_once(content_type: &'static str, body: &'static [u8]) -> (String, mpsc::Receiver<Vec<u8>>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());

            let mut content_length = 0;
            loop {
                let mut line = String::new();
                reader.read_line(&mut line).unwrap();
                if line == "\r\n" || line.is_empty() {
                    break;
                }
                if let Some(value) = line.to_ascii_lowercase().strip_prefix("content-length:") {
                    content_length = value.trim().parse().unwrap();
                }
            }
            let mut request_body = vec![0; content_length];
            reader.read_exact(&mut request_body).unwrap();
            let _ = tx.send(request_body);

            let head = format!(
                "HTTP/1.1 200 OK\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                content_type,
                body.len()
            );
            stream.write_all(head.as_bytes()).unwrap();
            stream.write_all(body).unwrap();
        });

        (format!("http://{}/F", addr), rx)
    }

    fn fetcher() -> UreqFetcher {
        UreqFetcher::new(&PortalConfig {
            timeout_secs: 5,
            ..PortalConfig::default()
        })
    }

    #[test]
    fn test_latin1_page_decoded() {
        let (url, _) = serve_once(
            "text/html; charset=iso-8859-1",
            b"<table cellspacing=\"2\"><tr><th>T\xedtulo</th><th>D\xe9bito</th></tr>\
              <tr><td>Mem\xf3rias p\xf3stumas</td><td>0,00</td></tr></table>",
        );

        let page = fetcher().get(&url).unwrap();
        assert!(!page.contains('\u{FFFD}'));

        let records = extract_table_html(&page).unwrap();
        assert_eq!(records[0]["Título"].text(), "Memórias póstumas");
        assert_eq!(records[0]["Débito"].text(), "0,00");
    }

    #[test]
    fn test_post_sends_form_and_reads_utf8() {
        let (url, requests) = serve_once(
            "text/html; charset=utf-8",
            "<a href=\"x?func=bor-loan\">Empréstimos</a>".as_bytes(),
        );

        let page = fetcher().post(&url, "bor_id=00123456&x=0").unwrap();
        assert_eq!(page, "<a href=\"x?func=bor-loan\">Empréstimos</a>");
        assert_eq!(requests.recv().unwrap(), b"bor_id=00123456&x=0");
    }
}
