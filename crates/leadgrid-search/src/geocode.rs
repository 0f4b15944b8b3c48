//! Place-name resolution to a rectangular search bound.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;

use leadgrid_core::GeoBound;

use crate::error::SearchError;
use crate::http::{host_of, parse_base_url, retry_after_secs};
use crate::retry::retry_with_backoff;

/// Resolves a free-text place name ("Charleston, SC") to a rectangular bound.
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// # Errors
    ///
    /// Returns [`SearchError::PlaceNotFound`] when the place cannot be
    /// resolved, or a transport error. Either way the caller treats the
    /// failure as fatal for the run.
    async fn resolve(&self, place: &str) -> Result<GeoBound, SearchError>;
}

/// One hit from the geocoding service. The bounding box arrives as four
/// decimal strings ordered south, north, west, east.
#[derive(Debug, Deserialize)]
struct GeocodeHit {
    boundingbox: [String; 4],
}

/// Forward-geocoding adapter for a Nominatim-compatible `/search` endpoint.
///
/// Queries with `limit=1` and takes the first hit's bounding box. Transient
/// failures (network, 429, 5xx) are retried with exponential back-off.
pub struct HttpGeocoder {
    client: Client,
    base_url: Url,
    max_retries: u32,
    backoff_base_secs: u64,
}

impl HttpGeocoder {
    /// Creates a geocoder pointed at `base_url` (production value comes from
    /// `AppConfig::geocoder_base_url`; tests pass a mock server URI).
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`SearchError::InvalidBaseUrl`] if
    /// `base_url` does not parse.
    pub fn new(
        base_url: &str,
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
            max_retries,
            backoff_base_secs,
        })
    }

    fn search_url(&self, place: &str) -> Result<Url, SearchError> {
        let mut url = self
            .base_url
            .join("search")
            .map_err(|e| SearchError::InvalidBaseUrl {
                url: self.base_url.to_string(),
                reason: e.to_string(),
            })?;
        url.query_pairs_mut()
            .append_pair("q", place)
            .append_pair("format", "json")
            .append_pair("limit", "1");
        Ok(url)
    }
}

#[async_trait]
impl Geocoder for HttpGeocoder {
    async fn resolve(&self, place: &str) -> Result<GeoBound, SearchError> {
        let url = self.search_url(place)?;
        let domain = host_of(&self.base_url);

        let hits: Vec<GeocodeHit> =
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
                        context: format!("geocoding response for \"{place}\""),
                        source: e,
                    })
                }
            })
            .await?;

        let Some(hit) = hits.first() else {
            return Err(SearchError::PlaceNotFound {
                query: place.to_owned(),
            });
        };
        bound_from_bbox(&hit.boundingbox, place)
    }
}

fn bound_from_bbox(bbox: &[String; 4], place: &str) -> Result<GeoBound, SearchError> {
    let parse = |raw: &str| {
        serde_json::from_str::<f64>(raw.trim()).map_err(|e| SearchError::Deserialize {
            context: format!("bounding box coordinate \"{raw}\" for \"{place}\""),
            source: e,
        })
    };
    let south = parse(&bbox[0])?;
    let north = parse(&bbox[1])?;
    let west = parse(&bbox[2])?;
    let east = parse(&bbox[3])?;
    Ok(GeoBound::new(north, south, east, west)?)
}
