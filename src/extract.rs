use std::time::Duration;

use once_cell::sync::Lazy;
use reqwest::StatusCode;
use scraper::{Html, Selector};

use crate::config::Config;

// ── Constants ────────────────────────────────────────────────────────────────

const PROMPT_META_NAME: &str = "description";

static META_SEL: Lazy<Selector> = Lazy::new(|| Selector::parse("meta[name]").unwrap());

// ── Error type ───────────────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    #[error("URL is missing, malformed or not on the allowed host")]
    InvalidUrl,
    #[error("upstream did not answer within the fetch timeout")]
    Timeout,
    #[error("upstream request failed: {0}")]
    Request(String),
    #[error("upstream returned {0}")]
    Upstream(StatusCode),
    #[error("page has no usable description meta tag")]
    NoPrompt,
    #[error("unexpected failure: {0}")]
    Unexpected(String),
}

// Every reqwest failure during a fetch, including a rejected scheme, counts
// as an upstream failure.
impl From<reqwest::Error> for ExtractionError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ExtractionError::Timeout
        } else if e.is_builder() {
            ExtractionError::Request(format!("BuilderError: {}", e))
        } else if e.is_connect() {
            ExtractionError::Request(format!("ConnectError: {}", e))
        } else {
            ExtractionError::Request(format!("RequestError: {}", e))
        }
    }
}

// ── Extractor ────────────────────────────────────────────────────────────────

/// Fetches a page and pulls the prompt out of its description meta tag.
///
/// Holds one pooled client; cloning is cheap and shares the pool.
#[derive(Clone)]
pub struct Extractor {
    client: reqwest::Client,
    timeout: Duration,
}

impl Extractor {
    pub fn new(config: &Config) -> Result<Self, ExtractionError> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            ),
        );
        headers.insert(
            reqwest::header::ACCEPT_LANGUAGE,
            reqwest::header::HeaderValue::from_static("en-US,en;q=0.9"),
        );

        let mut builder = reqwest::ClientBuilder::new()
            .redirect(reqwest::redirect::Policy::limited(10))
            .user_agent(config.user_agent.as_str())
            .default_headers(headers);

        if config.insecure_ssl {
            builder = builder.danger_accept_invalid_certs(true);
        }

        let client = builder
            .build()
            .map_err(|e| ExtractionError::Unexpected(e.to_string()))?;

        Ok(Self {
            client,
            timeout: config.fetch_timeout,
        })
    }

    /// Fetch `url` and return the trimmed description content.
    ///
    /// The caller is expected to have run the URL through
    /// [`crate::validate::is_allowed_url`] first.
    pub async fn extract(&self, url: &str) -> Result<String, ExtractionError> {
        let html = self.fetch_html(url).await?;
        extract_prompt(&html).ok_or(ExtractionError::NoPrompt)
    }

    /// Send plus body read run inside one timeout scope. Dropping the
    /// inner future on expiry aborts the in-flight request.
    async fn fetch_html(&self, url: &str) -> Result<String, ExtractionError> {
        let fetch = async {
            let response = self.client.get(url).send().await?;

            let status = response.status();
            if !status.is_success() {
                return Err(ExtractionError::Upstream(status));
            }

            Ok::<_, ExtractionError>(response.text().await?)
        };

        match tokio::time::timeout(self.timeout, fetch).await {
            Ok(result) => result,
            Err(_) => Err(ExtractionError::Timeout),
        }
    }
}

// ── HTML parsing ─────────────────────────────────────────────────────────────

/// Content of the first `<meta name="description">` whose content is not
/// blank, trimmed.
pub fn extract_prompt(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    document
        .select(&META_SEL)
        .filter(|el| {
            el.value()
                .attr("name")
                .is_some_and(|n| n.trim().eq_ignore_ascii_case(PROMPT_META_NAME))
        })
        .filter_map(|el| el.value().attr("content"))
        .map(str::trim)
        .find(|content| !content.is_empty())
        .map(str::to_string)
}
