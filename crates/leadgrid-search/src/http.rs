//! Plumbing shared by the reqwest-backed adapters.

use reqwest::Url;

use crate::error::SearchError;

/// Normalise: ensure the base URL ends with exactly one slash so that `join`
/// appends to the path rather than replacing the last segment.
pub(crate) fn parse_base_url(base_url: &str) -> Result<Url, SearchError> {
    let normalised = format!("{}/", base_url.trim_end_matches('/'));
    Url::parse(&normalised).map_err(|e| SearchError::InvalidBaseUrl {
        url: base_url.to_owned(),
        reason: e.to_string(),
    })
}

/// Host name used to identify the remote side in rate-limit errors.
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_gains_exactly_one_trailing_slash() {
        assert_eq!(
            parse_base_url("https://geo.example.com").unwrap().as_str(),
            "https://geo.example.com/"
        );
        assert_eq!(
            parse_base_url("https://geo.example.com///").unwrap().as_str(),
            "https://geo.example.com/"
        );
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        assert!(matches!(
            parse_base_url("not a url"),
            Err(SearchError::InvalidBaseUrl { .. })
        ));
    }

    #[test]
    fn host_of_prefers_the_url_host() {
        let url = Url::parse("https://places.example.com/v1/").unwrap();
        assert_eq!(host_of(&url), "places.example.com");
    }
}
