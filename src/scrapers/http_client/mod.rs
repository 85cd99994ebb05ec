//! HTTP client that presents itself as a desktop browser.

mod response;
mod user_agent;

pub use response::PageResponse;
pub use user_agent::{resolve_user_agent, UserAgentChoice, DEFAULT_BROWSER_USER_AGENT};

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use tracing::debug;
use url::Url;

use super::{FetchError, PageFetcher};
use crate::config::Settings;
use response::rejects_head;
use user_agent::is_chromium;

const ACCEPT_HTML: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,image/apng,*/*;q=0.8";
const ACCEPT_LANGUAGE: &str = "en-US,en;q=0.9";
const SEC_CH_UA: &str = r#""Chromium";v="122", "Not(A:Brand";v="24", "Google Chrome";v="122""#;

/// HTTP client with browser-like request headers.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    user_agent: String,
    referer: Option<String>,
    page_timeout: Duration,
    probe_timeout: Duration,
}

impl HttpClient {
    /// Create a new HTTP client with the default browser user agent.
    pub fn new(page_timeout: Duration, probe_timeout: Duration) -> Result<Self, reqwest::Error> {
        Self::with_user_agent(None, page_timeout, probe_timeout)
    }

    /// Create a client for a configured user agent (see [`UserAgentChoice`]).
    pub fn with_user_agent(
        user_agent_config: Option<&str>,
        page_timeout: Duration,
        probe_timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let user_agent = resolve_user_agent(user_agent_config);
        let client = Client::builder()
            .user_agent(&user_agent)
            .gzip(true)
            .brotli(true)
            .build()?;

        Ok(Self {
            client,
            user_agent,
            referer: None,
            page_timeout,
            probe_timeout,
        })
    }

    /// Build a client from resolved settings.
    pub fn from_settings(settings: &Settings) -> Result<Self, reqwest::Error> {
        let client = Self::with_user_agent(
            settings.user_agent.as_deref(),
            settings.request_timeout,
            settings.probe_timeout,
        )?;
        Ok(match &settings.referer {
            Some(referer) => client.with_referer(referer.clone()),
            None => client,
        })
    }

    /// Set the Referer header for requests.
    /// Without one, page fetches use the origin of the page being fetched.
    pub fn with_referer(mut self, referer: String) -> Self {
        self.referer = Some(referer);
        self
    }

    /// The user agent this client sends.
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    fn browser_headers(&self, request: RequestBuilder, referer: Option<&str>) -> RequestBuilder {
        let mut request = request
            .header(reqwest::header::ACCEPT, ACCEPT_HTML)
            .header(reqwest::header::ACCEPT_LANGUAGE, ACCEPT_LANGUAGE);

        if let Some(referer) = referer {
            request = request.header(reqwest::header::REFERER, referer);
        }

        if is_chromium(&self.user_agent) {
            request = request
                .header("sec-ch-ua", SEC_CH_UA)
                .header("sec-ch-ua-mobile", "?0")
                .header("sec-ch-ua-platform", "\"macOS\"");
        }

        request
    }

    /// GET a listing page with browser headers and the page timeout.
    pub async fn get(&self, url: &Url) -> Result<PageResponse, reqwest::Error> {
        let referer = self.referer.clone().or_else(|| origin_of(url));
        let request = self
            .browser_headers(self.client.get(url.as_str()), referer.as_deref())
            .timeout(self.page_timeout);

        let start = Instant::now();
        let response = request.send().await?;
        debug!(
            "GET {} -> {} in {}ms",
            url,
            response.status(),
            start.elapsed().as_millis()
        );

        Ok(PageResponse::new(response))
    }

    /// HEAD a candidate with the probe timeout.
    pub async fn head(&self, url: &Url) -> Result<StatusCode, reqwest::Error> {
        let request = self
            .browser_headers(self.client.head(url.as_str()), self.referer.as_deref())
            .timeout(self.probe_timeout);

        let start = Instant::now();
        let response = request.send().await?;
        debug!(
            "HEAD {} -> {} in {}ms",
            url,
            response.status(),
            start.elapsed().as_millis()
        );

        Ok(response.status())
    }

    /// GET a URL only for its status; the body is dropped unread.
    async fn get_status(&self, url: &Url) -> Result<StatusCode, reqwest::Error> {
        let request = self
            .browser_headers(self.client.get(url.as_str()), self.referer.as_deref())
            .timeout(self.probe_timeout);
        let response = request.send().await?;
        debug!("GET (probe) {} -> {}", url, response.status());
        Ok(response.status())
    }
}

#[async_trait]
impl PageFetcher for HttpClient {
    async fn fetch_page(&self, url: &str) -> Result<String, FetchError> {
        let url = parse_http_url(url)?;
        let response = self.get(&url).await?;

        if !response.is_success() {
            return Err(FetchError::Status(response.status));
        }

        debug!(
            "Fetched {} ({})",
            response.final_url,
            response.content_type.as_deref().unwrap_or("unknown content type")
        );
        Ok(response.text().await?)
    }

    async fn probe(&self, url: &str) -> Result<StatusCode, FetchError> {
        let url = parse_http_url(url)?;
        let status = self.head(&url).await?;

        if rejects_head(status) {
            debug!("{} rejected HEAD ({}), retrying with GET", url, status);
            return Ok(self.get_status(&url).await?);
        }

        Ok(status)
    }
}

/// Parse a URL, accepting only http and https.
pub(crate) fn parse_http_url(raw: &str) -> Result<Url, FetchError> {
    let url = Url::parse(raw.trim()).map_err(|e| FetchError::InvalidUrl(format!("{raw}: {e}")))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(FetchError::InvalidUrl(format!(
            "{raw}: unsupported scheme '{other}'"
        ))),
    }
}

/// `scheme://host[:port]/` of a URL, used as the default Referer.
fn origin_of(url: &Url) -> Option<String> {
    let host = url.host_str()?;
    Some(match url.port() {
        Some(port) => format!("{}://{}:{}/", url.scheme(), host, port),
        None => format!("{}://{}/", url.scheme(), host),
    })
}
