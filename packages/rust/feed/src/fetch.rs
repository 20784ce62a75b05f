//! One-shot HTTP fetch of the pattern feed.

use patterndocs_shared::{PatternDocsError, Result};
use reqwest::Client;
use tracing::{debug, info, instrument};
use url::Url;

/// Maximum number of redirects to follow when fetching the feed.
const MAX_REDIRECTS: usize = 3;

/// Default timeout in seconds for the feed request.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// User-Agent string for feed requests.
const USER_AGENT: &str = concat!("patterndocs/", env!("CARGO_PKG_VERSION"));

// ---------------------------------------------------------------------------
// Fetch options
// ---------------------------------------------------------------------------

/// Configuration for the feed fetch.
#[derive(Debug, Clone)]
pub struct FetchOptions {
    /// Timeout for the HTTP request in seconds.
    pub timeout_secs: u64,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

// ---------------------------------------------------------------------------
// Fetching
// ---------------------------------------------------------------------------

/// Fetch the pattern feed and return the raw response body as text.
///
/// One GET, no retries: a network failure, TLS failure, or non-2xx status
/// aborts the run before any output is produced. Charset handling is
/// whatever the HTTP layer provides.
#[instrument(skip_all, fields(url = %url))]
pub async fn fetch_feed(url: &Url, opts: &FetchOptions) -> Result<String> {
    let client = build_client(opts)?;

    info!("fetching pattern feed");

    let response = client
        .get(url.clone())
        .send()
        .await
        .map_err(|e| PatternDocsError::Fetch(format!("{url}: {e}")))?;

    let status = response.status();
    if !status.is_success() {
        return Err(PatternDocsError::Fetch(format!("{url}: HTTP {status}")));
    }

    let body = response
        .text()
        .await
        .map_err(|e| PatternDocsError::Fetch(format!("{url}: failed to read body: {e}")))?;

    debug!(bytes = body.len(), "feed fetched");

    Ok(body)
}

/// Build a reqwest client with appropriate settings.
fn build_client(opts: &FetchOptions) -> Result<Client> {
    Client::builder()
        .user_agent(USER_AGENT)
        .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
        .timeout(std::time::Duration::from_secs(opts.timeout_secs))
        .build()
        .map_err(|e| PatternDocsError::Fetch(format!("failed to build HTTP client: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fetch_returns_body() {
        let server = wiremock::MockServer::start().await;

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/metadata/messages.xml"))
            .respond_with(
                wiremock::ResponseTemplate::new(200)
                    .set_body_string("<MessageCollection></MessageCollection>"),
            )
            .mount(&server)
            .await;

        let url = Url::parse(&format!("{}/metadata/messages.xml", server.uri())).unwrap();
        let body = fetch_feed(&url, &FetchOptions::default()).await.unwrap();

        assert_eq!(body, "<MessageCollection></MessageCollection>");
    }

    #[tokio::test]
    async fn fetch_non_2xx_is_a_fetch_error() {
        let server = wiremock::MockServer::start().await;

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/metadata/messages.xml"))
            .respond_with(wiremock::ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let url = Url::parse(&format!("{}/metadata/messages.xml", server.uri())).unwrap();
        let err = fetch_feed(&url, &FetchOptions::default())
            .await
            .unwrap_err();

        assert!(matches!(err, PatternDocsError::Fetch(_)));
        assert!(err.to_string().contains("HTTP 500"));
    }

    #[tokio::test]
    async fn fetch_missing_feed_is_a_fetch_error() {
        let server = wiremock::MockServer::start().await;

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/metadata/messages.xml"))
            .respond_with(wiremock::ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let url = Url::parse(&format!("{}/metadata/messages.xml", server.uri())).unwrap();
        let err = fetch_feed(&url, &FetchOptions::default())
            .await
            .unwrap_err();

        assert!(err.to_string().contains("HTTP 404"));
    }
}
