//! The paginated area-search capability and its HTTP adapter.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Client, Url};
use serde::Deserialize;

use leadgrid_core::lead::fallback_lead_key;
use leadgrid_core::{GeoBound, LeadRecord};

use crate::error::SearchError;
use crate::http::{host_of, parse_base_url, retry_after_secs};
use crate::retry::retry_with_backoff;

/// One page of area-search results. `next_token` continues the same query;
/// its absence means the result set is exhausted.
#[derive(Debug, Clone)]
pub struct SearchPage {
    pub items: Vec<RawPlace>,
    pub next_token: Option<String>,
}

/// A place exactly as the search source reports it. Known fields are typed;
/// everything else is kept in `extra` so descriptive data survives into the
/// stored lead untouched.
#[derive(Debug, Clone, Deserialize)]
pub struct RawPlace {
    /// Stable identifier, when the source provides one.
    pub id: Option<String>,
    pub name: String,
    pub site: Option<String>,
    pub address: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub category: Option<String>,
    pub rating: Option<f64>,
    pub phone: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl RawPlace {
    /// The dedup identity: the source id, or a hash of the stable identifying
    /// fields when the source supplies none.
    #[must_use]
    pub fn external_key(&self) -> String {
        self.id.clone().unwrap_or_else(|| {
            fallback_lead_key(
                &self.name,
                self.address.as_deref(),
                self.latitude,
                self.longitude,
            )
        })
    }

    /// Materialize this place as a lead under `external_id`, stamped now.
    #[must_use]
    pub fn into_lead(self, external_id: String) -> LeadRecord {
        LeadRecord {
            external_id,
            name: self.name,
            site: self.site,
            address: self.address,
            latitude: self.latitude,
            longitude: self.longitude,
            category: self.category,
            rating: self.rating,
            phone: self.phone,
            extra: serde_json::Value::Object(self.extra),
            fetched_at: Utc::now(),
        }
    }
}

/// Searches one rectangular bound for places matching a query, one page per
/// call. Every call consumes one unit of the metered request budget; the
/// caller does the accounting.
#[async_trait]
pub trait AreaSearch: Send + Sync {
    /// # Errors
    ///
    /// Returns a transport or decode error for the failed page. Callers treat
    /// a failed page as the end of that cell's collection.
    async fn search(
        &self,
        bound: &GeoBound,
        query: &str,
        page_token: Option<&str>,
    ) -> Result<SearchPage, SearchError>;
}

#[derive(Debug, Deserialize)]
struct AreaSearchResponse {
    #[serde(default)]
    places: Vec<RawPlace>,
    #[serde(default)]
    next_page_token: Option<String>,
}

/// Adapter for the metered places API: `GET {base}/places/search` with the
/// bound passed as `rect=south,west,north,east` and the key as a query
/// parameter. Transient failures (network, 429, 5xx) are retried with
/// exponential back-off.
pub struct HttpAreaSearch {
    client: Client,
    base_url: Url,
    api_key: String,
    max_retries: u32,
    backoff_base_secs: u64,
}

impl HttpAreaSearch {
    /// Creates an adapter pointed at `base_url` (production value comes from
    /// `AppConfig::search_base_url`; tests pass a mock server URI).
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`SearchError::InvalidBaseUrl`] if
    /// `base_url` does not parse.
    pub fn new(
        base_url: &str,
        api_key: &str,
        timeout_secs: u64,
        user_agent: &str,
        max_retries: u32,
        backoff_base_secs: u64,
    ) -> Result<Self, SearchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            client,
            base_url: parse_base_url(base_url)?,
            api_key: api_key.to_owned(),
            max_retries,
            backoff_base_secs,
        })
    }

    fn page_url(
        &self,
        bound: &GeoBound,
        query: &str,
        page_token: Option<&str>,
    ) -> Result<Url, SearchError> {
        let mut url =
            self.base_url
                .join("places/search")
                .map_err(|e| SearchError::InvalidBaseUrl {
                    url: self.base_url.to_string(),
                    reason: e.to_string(),
                })?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("key", &self.api_key);
            pairs.append_pair("query", query);
            pairs.append_pair(
                "rect",
                &format!(
                    "{},{},{},{}",
                    bound.south, bound.west, bound.north, bound.east
                ),
            );
            if let Some(token) = page_token {
                pairs.append_pair("page_token", token);
            }
        }
        Ok(url)
    }
}

#[async_trait]
impl AreaSearch for HttpAreaSearch {
    async fn search(
        &self,
        bound: &GeoBound,
        query: &str,
        page_token: Option<&str>,
    ) -> Result<SearchPage, SearchError> {
        let url = self.page_url(bound, query, page_token)?;
        let domain = host_of(&self.base_url);

        let parsed: AreaSearchResponse =
            retry_with_backoff(self.max_retries, self.backoff_base_secs, || {
                let url = url.clone();
                let domain = domain.clone();
                async move {
                    let response = self.client.get(url.clone()).send().await?;
                    let status = response.status();

                    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                        return Err(SearchError::RateLimited {
                            domain,
                            retry_after_secs: retry_after_secs(&response),
                        });
                    }
                    if !status.is_success() {
                        return Err(SearchError::UnexpectedStatus {
                            status: status.as_u16(),
                            url: url.to_string(),
                        });
                    }

                    let body = response.text().await?;
                    serde_json::from_str(&body).map_err(|e| SearchError::Deserialize {
                        context: format!("places page for \"{query}\""),
                        source: e,
                    })
                }
            })
            .await?;

        Ok(SearchPage {
            items: parsed.places,
            next_token: parsed.next_page_token,
        })
    }
}
