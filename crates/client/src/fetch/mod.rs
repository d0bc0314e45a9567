//! HTTP fetch pipeline for archive pages.
//!
//! ### Request shape
//! - Every request is a `GET` of a relative path against the configured root.
//! - Single attempt: no retry, no backoff.
//!
//! ### Safety Gates
//! - Fixed per-request timeout (configurable)
//! - Max redirects: 5
//! - Max body bytes: 10MB (configurable), checked against
//!   `Content-Length` and again after the body is read.

pub mod url;

use reqwest::{Client, header};
use std::time::{Duration, Instant};

pub use self::url::{catalog_path, listing_path, message_path, parse_base_url, resolve};

use ::url::Url;
use marc_core::{AppConfig, Error};

const ACCEPT: &str = "text/html,application/xhtml+xml,text/plain;q=0.9,*/*;q=0.8";

/// Configuration for the fetch client.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Archive root every path is resolved against.
    pub base_url: Url,

    /// User agent string.
    pub user_agent: String,

    /// Maximum response body size in bytes.
    pub max_bytes: usize,

    /// Request timeout.
    pub timeout: Duration,

    /// Maximum number of redirects to follow (default: 5)
    pub max_redirects: usize,
}

impl FetchConfig {
    /// Build fetch settings from the loaded application config.
    pub fn from_app(config: &AppConfig) -> Result<Self, Error> {
        Ok(Self {
            base_url: parse_base_url(&config.base_url)?,
            user_agent: config.user_agent.clone(),
            max_bytes: config.max_bytes,
            timeout: config.timeout(),
            max_redirects: 5,
        })
    }
}

/// Source of raw archive pages.
///
/// Implemented over HTTP by [`FetchClient`]; tests substitute canned pages.
#[async_trait::async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetch the page at `path` (relative to the archive root) as text.
    async fn fetch_text(&self, path: &str) -> Result<String, Error>;
}

/// HTTP fetch client with timeout and size limits.
pub struct FetchClient {
    http: Client,
    config: FetchConfig,
}

impl FetchClient {
    /// Create a new fetch client with the given configuration.
    pub fn new(config: FetchConfig) -> Result<Self, Error> {
        let http = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .use_rustls_tls()
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()
            .map_err(|e| Error::HttpError(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { http, config })
    }

    fn too_large(&self, len: usize) -> Error {
        Error::FetchTooLarge(format!("{len} bytes exceeds {}", self.config.max_bytes))
    }
}

fn transport_error(url: &Url, err: reqwest::Error) -> Error {
    if err.is_timeout() {
        Error::FetchTimeout(format!("{url}: {err}"))
    } else {
        Error::HttpError(format!("network error for {url}: {err}"))
    }
}

#[async_trait::async_trait]
impl Fetcher for FetchClient {
    async fn fetch_text(&self, path: &str) -> Result<String, Error> {
        let start = Instant::now();
        let url = resolve(&self.config.base_url, path)?;
        tracing::debug!(%url, "fetching");

        let response = self
            .http
            .get(url.as_str())
            .header(header::ACCEPT, ACCEPT)
            .send()
            .await
            .map_err(|e| transport_error(&url, e))?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!(%url, status = status.as_u16(), "fetch rejected");
            return Err(Error::HttpError(format!("status {} for {url}", status.as_u16())));
        }

        if let Some(len) = response.content_length()
            && len as usize > self.config.max_bytes
        {
            return Err(self.too_large(len as usize));
        }

        let bytes = response.bytes().await.map_err(|e| transport_error(&url, e))?;
        if bytes.len() > self.config.max_bytes {
            return Err(self.too_large(bytes.len()));
        }

        tracing::debug!(
            %url,
            status = status.as_u16(),
            bytes = bytes.len(),
            fetch_ms = start.elapsed().as_millis() as u64,
            "fetched"
        );

        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    fn config(base_url: Url) -> FetchConfig {
        FetchConfig {
            base_url,
            user_agent: "marc-mcp-test".into(),
            max_bytes: 1024,
            timeout: Duration::from_secs(5),
            max_redirects: 5,
        }
    }

    /// Serve one canned HTTP response; the task yields the raw request.
    async fn serve_once(response: String, delay: Duration) -> (Url, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = vec![0u8; 8192];
            let n = socket.read(&mut buf).await.unwrap();
            tokio::time::sleep(delay).await;
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
            String::from_utf8_lossy(&buf[..n]).into_owned()
        });
        (Url::parse(&format!("http://{addr}/")).unwrap(), handle)
    }

    fn http_response(status: &str, body: &str) -> String {
        format!(
            "HTTP/1.1 {status}\r\nContent-Type: text/html\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        )
    }

    #[test]
    fn test_fetch_config_from_app() {
        let app = AppConfig::default();
        let config = FetchConfig::from_app(&app).unwrap();
        assert_eq!(config.base_url.as_str(), "https://marc.info/");
        assert_eq!(config.timeout, app.timeout());
        assert_eq!(config.max_bytes, app.max_bytes);
        assert_eq!(config.max_redirects, 5);
    }

    #[test]
    fn test_fetch_config_rejects_bad_base_url() {
        let app = AppConfig { base_url: "ftp://marc.info/".into(), ..AppConfig::default() };
        assert!(matches!(FetchConfig::from_app(&app), Err(Error::InvalidUrl(_))));
    }

    #[tokio::test]
    async fn test_fetch_text_success() {
        let (base, server) = serve_once(http_response("200 OK", "<pre>hello</pre>"), Duration::ZERO).await;
        let client = FetchClient::new(config(base)).unwrap();

        let text = client.fetch_text("?l=git&m=1&w=2").await.unwrap();
        assert_eq!(text, "<pre>hello</pre>");

        let request = server.await.unwrap();
        assert!(request.starts_with("GET /?l=git&m=1&w=2 HTTP/1.1"));
        assert!(request.to_lowercase().contains("user-agent: marc-mcp-test"));
    }

    #[tokio::test]
    async fn test_non_success_status_is_http_error() {
        let (base, _server) = serve_once(http_response("404 Not Found", "gone"), Duration::ZERO).await;
        let client = FetchClient::new(config(base)).unwrap();

        let err = client.fetch_text("").await.unwrap_err();
        assert!(matches!(err, Error::HttpError(ref msg) if msg.contains("404")));
        assert!(err.is_transport());
    }

    #[tokio::test]
    async fn test_oversized_body_rejected() {
        let body = "x".repeat(2048);
        let (base, _server) = serve_once(http_response("200 OK", &body), Duration::ZERO).await;
        let client = FetchClient::new(config(base)).unwrap();

        let err = client.fetch_text("").await.unwrap_err();
        assert!(matches!(err, Error::FetchTooLarge(_)));
    }

    #[tokio::test]
    async fn test_slow_server_times_out() {
        let (base, _server) = serve_once(http_response("200 OK", "late"), Duration::from_secs(3)).await;
        let mut config = config(base);
        config.timeout = Duration::from_millis(200);
        let client = FetchClient::new(config).unwrap();

        let err = client.fetch_text("").await.unwrap_err();
        assert!(matches!(err, Error::FetchTimeout(_)));
    }

    #[tokio::test]
    async fn test_connection_refused_is_http_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = FetchClient::new(config(Url::parse(&format!("http://{addr}/")).unwrap())).unwrap();
        let err = client.fetch_text("").await.unwrap_err();
        assert!(matches!(err, Error::HttpError(_)));
    }
}
