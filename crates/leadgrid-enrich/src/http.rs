//! Plumbing shared by the two reqwest-backed discovery adapters.

use reqwest::Url;

use crate::error::EnrichError;

/// Parse a base URL, forcing exactly one trailing slash so `join` appends a
/// path segment instead of replacing the last one.
pub(crate) fn parse_base_url(base_url: &str) -> Result<Url, EnrichError> {
    let normalised = format!("{}/", base_url.trim_end_matches('/'));
    Url::parse(&normalised).map_err(|e| EnrichError::InvalidBaseUrl {
        url: base_url.to_owned(),
        reason: e.to_string(),
    })
}

/// Remote host name used in rate-limit errors.
pub(crate) fn host_of(url: &Url) -> String {
    url.host_str().unwrap_or("unknown-host").to_owned()
}

/// Parse the `Retry-After` header, defaulting to 60 s when absent or unreadable.
pub(crate) fn retry_after_secs(response: &reqwest::Response) -> u64 {
    response
        .headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(60)
}
