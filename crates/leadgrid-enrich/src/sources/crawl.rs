//! Free discovery source backed by a remote site-extraction service.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;

use crate::error::EnrichError;
use crate::http::{host_of, parse_base_url, retry_after_secs};
use crate::retry::retry_with_backoff;
use crate::sources::ContactSource;
use crate::types::{ContactCandidate, SourceKind};

/// Response of the extraction service: whatever people it could scrape off
/// the domain's public pages. Candidate fields map one-to-one.
#[derive(Debug, Deserialize)]
struct ExtractResponse {
    #[serde(default)]
    contacts: Vec<ContactCandidate>,
}

/// Asks a crawling service to extract contacts from a domain's own pages.
///
/// This is the free tier of the waterfall: no per-lookup charge, scraped
/// rather than verified, so its candidates carry the heuristic confidence
/// default. Transient failures (network, 429, 5xx) are retried with
/// exponential back-off.
pub struct CrawlContactSource {
    client: Client,
    base_url: Url,
    max_retries: u32,
    backoff_base_ms: u64,
}

impl CrawlContactSource {
    /// Creates a crawl source pointed at `base_url` (production value comes
    /// from `AppConfig::crawl_base_url`; tests pass a mock server URI).
    ///
    /// # Errors
    ///
    /// Returns [`EnrichError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`EnrichError::InvalidBaseUrl`] if
    /// `base_url` does not parse.
    pub fn new(
        base_url: &str,
        timeout_secs: u64,
        user_agent: &str,
        max_retries: u32,
        backoff_base_secs: u64,
    ) -> Result<Self, EnrichError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            client,
            base_url: parse_base_url(base_url)?,
            max_retries,
            backoff_base_ms: backoff_base_secs.saturating_mul(1_000),
        })
    }

    fn extract_url(&self, domain: &str) -> Result<Url, EnrichError> {
        let mut url = self
            .base_url
            .join("extract/contacts")
            .map_err(|e| EnrichError::InvalidBaseUrl {
                url: self.base_url.to_string(),
                reason: e.to_string(),
            })?;
        url.query_pairs_mut().append_pair("domain", domain);
        Ok(url)
    }
}

#[async_trait]
impl ContactSource for CrawlContactSource {
    fn tag(&self) -> &str {
        "site_crawl"
    }

    fn kind(&self) -> SourceKind {
        SourceKind::Heuristic
    }

    async fn discover(&self, domain: &str) -> Result<Vec<ContactCandidate>, EnrichError> {
        let url = self.extract_url(domain)?;
        let service_host = host_of(&self.base_url);

        let page: ExtractResponse =
            retry_with_backoff(self.max_retries, self.backoff_base_ms, || {
                let url = url.clone();
                let service_host = service_host.clone();
                async move {
                    let response = self.client.get(url.clone()).send().await?;
                    let status = response.status();

                    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                        return Err(EnrichError::RateLimited {
                            domain: service_host,
                            retry_after_secs: retry_after_secs(&response),
                        });
                    }
                    if !status.is_success() {
                        return Err(EnrichError::UnexpectedStatus {
                            status: status.as_u16(),
                            url: url.to_string(),
                        });
                    }

                    let body = response.text().await?;
                    serde_json::from_str(&body).map_err(|e| EnrichError::Deserialize {
                        context: format!("contact extraction for {domain}"),
                        source: e,
                    })
                }
            })
            .await?;

        Ok(page.contacts)
    }
}
