//! Paid discovery source backed by a commercial domain-search API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;

use crate::error::EnrichError;
use crate::http::{host_of, parse_base_url, retry_after_secs};
use crate::retry::retry_with_backoff;
use crate::sources::ContactSource;
use crate::types::{ContactCandidate, SourceKind};

#[derive(Debug, Deserialize)]
struct DomainSearchResponse {
    #[serde(default)]
    data: DomainSearchData,
}

#[derive(Debug, Default, Deserialize)]
struct DomainSearchData {
    #[serde(default)]
    emails: Vec<EmailRecord>,
}

/// One scored person record from the domain-search endpoint. The API splits
/// names and scores every answer itself.
#[derive(Debug, Deserialize)]
struct EmailRecord {
    value: Option<String>,
    first_name: Option<String>,
    last_name: Option<String>,
    position: Option<String>,
    phone_number: Option<String>,
    confidence: Option<u8>,
}

impl EmailRecord {
    fn into_candidate(self) -> ContactCandidate {
        ContactCandidate {
            name: display_name(self.first_name, self.last_name),
            email: self.value,
            phone: self.phone_number,
            title: self.position,
            confidence: self.confidence,
        }
    }
}

fn display_name(first: Option<String>, last: Option<String>) -> Option<String> {
    let joined = [first, last]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" ");
    let joined = joined.trim().to_owned();
    if joined.is_empty() {
        None
    } else {
        Some(joined)
    }
}

/// Queries a paid domain-search API for verified contacts.
///
/// Last resort of the waterfall: every lookup costs money, but the answers
/// come with the provider's own confidence score, which normalization passes
/// through untouched. Transient failures (network, 429, 5xx) are retried with
/// exponential back-off.
pub struct ContactApiSource {
    client: Client,
    base_url: Url,
    api_key: String,
    max_retries: u32,
    backoff_base_ms: u64,
}

impl ContactApiSource {
    /// Creates an API source pointed at `base_url` (production value comes
    /// from `AppConfig::contact_api_base_url`; tests pass a mock server URI).
    ///
    /// # Errors
    ///
    /// Returns [`EnrichError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`EnrichError::InvalidBaseUrl`] if
    /// `base_url` does not parse.
    pub fn new(
        base_url: &str,
        api_key: impl Into<String>,
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
            api_key: api_key.into(),
            max_retries,
            backoff_base_ms: backoff_base_secs.saturating_mul(1_000),
        })
    }

    fn search_url(&self, domain: &str) -> Result<Url, EnrichError> {
        let mut url = self
            .base_url
            .join("v2/domain-search")
            .map_err(|e| EnrichError::InvalidBaseUrl {
                url: self.base_url.to_string(),
                reason: e.to_string(),
            })?;
        url.query_pairs_mut()
            .append_pair("domain", domain)
            .append_pair("api_key", &self.api_key);
        Ok(url)
    }
}

#[async_trait]
impl ContactSource for ContactApiSource {
    fn tag(&self) -> &str {
        "contact_api"
    }

    fn kind(&self) -> SourceKind {
        SourceKind::PaidApi
    }

    async fn discover(&self, domain: &str) -> Result<Vec<ContactCandidate>, EnrichError> {
        let url = self.search_url(domain)?;
        let service_host = host_of(&self.base_url);

        let parsed: DomainSearchResponse =
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
                        context: format!("domain search for {domain}"),
                        source: e,
                    })
                }
            })
            .await?;

        Ok(parsed
            .data
            .emails
            .into_iter()
            .map(EmailRecord::into_candidate)
            .collect())
    }
}
