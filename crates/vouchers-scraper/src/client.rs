//! HTTP fetch session for the voucher site.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::{Client, Url};

use crate::error::ScraperError;

pub(crate) const BROWSER_ACCEPT: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8";

/// Persistent HTTP session that presents itself as a desktop browser.
///
/// Every fetch is a single best-effort attempt: transient failures are
/// reported to the caller, which skips the shop until the next pass.
pub struct VoucherClient {
    client: Client,
}

impl VoucherClient {
    /// Creates a session with the browser header set and the given timeout.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed (e.g., invalid TLS config).
    pub fn new(timeout_secs: u64, user_agent: &str) -> Result<Self, ScraperError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(BROWSER_ACCEPT));

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .default_headers(headers)
            .build()?;
        Ok(Self { client })
    }

    /// Fetches `url` and returns the response body as text.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::InvalidUrl`]: `url` does not parse.
    /// - [`ScraperError::UnexpectedStatus`]: any non-2xx response.
    /// - [`ScraperError::Http`]: network, TLS, or body decoding failure.
    pub async fn fetch_page(&self, url: &str) -> Result<String, ScraperError> {
        let parsed = Url::parse(url).map_err(|e| ScraperError::InvalidUrl {
            url: url.to_owned(),
            reason: e.to_string(),
        })?;

        let response = self.client.get(parsed).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ScraperError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_owned(),
            });
        }

        let body = response.text().await?;
        tracing::debug!(url, bytes = body.len(), "fetched page");
        Ok(body)
    }
}
