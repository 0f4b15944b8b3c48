//! Retry with exponential back-off and jitter for the HTTP adapters.
//!
//! [`retry_with_backoff`] wraps any fallible async operation and retries on
//! transient errors (network failures, 429, 5xx). Non-transient errors are
//! returned immediately without any retry.

use std::future::Future;
use std::time::Duration;

use crate::error::SearchError;

/// Returns `true` for errors that are worth retrying after a back-off delay.
///
/// **Retriable:**
/// - [`SearchError::Http`] — network-level failure (timeout, connection reset).
/// - [`SearchError::RateLimited`] — HTTP 429; the server has asked us to back off.
/// - [`SearchError::UnexpectedStatus`] with a 5xx status — transient
///   server/infrastructure error.
///
/// **Not retriable (hard stop):**
/// - [`SearchError::UnexpectedStatus`] with a 4xx status — the request itself
///   is wrong; retrying returns the same answer.
/// - [`SearchError::PlaceNotFound`] — an empty result is an answer, not a fault.
/// - [`SearchError::Deserialize`] — malformed response; retrying won't fix it.
/// - everything else (input and store errors) — never produced inside an
///   adapter call, and retrying would be meaningless.
pub(crate) fn is_retriable(err: &SearchError) -> bool {
    match err {
        SearchError::Http(_) | SearchError::RateLimited { .. } => true,
        SearchError::UnexpectedStatus { status, .. } => *status >= 500,
        _ => false,
    }
}

/// Runs `operation` with up to `max_retries` additional attempts on transient errors.
///
/// Back-off schedule with `backoff_base_secs = 5`:
///
/// | Attempt | Sleep before next attempt   |
/// |---------|-----------------------------|
/// | 1       | 5 000 ms × 2⁰ ± 25 % jitter |
/// | 2       | 5 000 ms × 2¹ ± 25 % jitter |
/// | 3       | 5 000 ms × 2² ± 25 % jitter |
///
/// Delay is capped at 60 s. A base of `0` keeps retries but skips the sleeps,
/// which is what tests use. Non-retriable errors are returned immediately.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_secs: u64,
    mut operation: F,
) -> Result<T, SearchError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, SearchError>>,
{
    const MAX_DELAY_MS: u64 = 60_000;
    let mut attempt = 0u32;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !is_retriable(&err) || attempt >= max_retries {
                    return Err(err);
                }
                attempt += 1;
                let computed = backoff_base_secs
                    .saturating_mul(1_000)
                    .saturating_mul(1u64 << (attempt - 1).min(10));
                let capped = computed.min(MAX_DELAY_MS);
                #[allow(
                    clippy::cast_possible_truncation,
                    clippy::cast_sign_loss,
                    clippy::cast_precision_loss
                )]
                let delay_ms = (capped as f64 * (rand::random::<f64>() * 0.5 + 0.75)) as u64;
                tracing::warn!(
                    attempt,
                    max_retries,
                    delay_ms,
                    error = %err,
                    "transient search error — retrying after back-off"
                );
                if delay_ms > 0 {
                    tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    fn rate_limited() -> SearchError {
        SearchError::RateLimited {
            domain: "api.example.com".to_owned(),
            retry_after_secs: 0,
        }
    }

    fn server_error() -> SearchError {
        SearchError::UnexpectedStatus {
            status: 503,
            url: "https://api.example.com/places/search".to_owned(),
        }
    }

    fn deserialize_err() -> SearchError {
        let src = serde_json::from_str::<()>("invalid").unwrap_err();
        SearchError::Deserialize {
            context: "test".to_owned(),
            source: src,
        }
    }

    #[test]
    fn rate_limited_is_retriable() {
        assert!(is_retriable(&rate_limited()));
    }

    #[test]
    fn server_errors_are_retriable_but_client_errors_are_not() {
        assert!(is_retriable(&server_error()));
        assert!(!is_retriable(&SearchError::UnexpectedStatus {
            status: 403,
            url: "https://api.example.com".to_owned(),
        }));
    }

    #[test]
    fn place_not_found_is_not_retriable() {
        assert!(!is_retriable(&SearchError::PlaceNotFound {
            query: "atlantis".to_owned(),
        }));
    }

    #[test]
    fn deserialize_error_is_not_retriable() {
        assert!(!is_retriable(&deserialize_err()));
    }

    #[tokio::test]
    async fn succeeds_immediately_on_first_try() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = retry_with_backoff(3, 0, || {
            let c = Arc::clone(&c);
            async move {
                c.fetch_add(1, Ordering::SeqCst);
                Ok::<u32, SearchError>(42)
            }
        })
        .await;
        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn retries_on_rate_limited_then_succeeds() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = retry_with_backoff(3, 0, || {
            let c = Arc::clone(&c);
            async move {
                let n = c.fetch_add(1, Ordering::SeqCst);
                if n < 2 {
                    Err(rate_limited())
                } else {
                    Ok::<u32, SearchError>(99)
                }
            }
        })
        .await;
        assert_eq!(result.unwrap(), 99);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn propagates_last_error_after_exhausting_retries() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = retry_with_backoff(2, 0, || {
            let c = Arc::clone(&c);
            async move {
                c.fetch_add(1, Ordering::SeqCst);
                Err::<u32, SearchError>(server_error())
            }
        })
        .await;
        // max_retries=2 → 3 total attempts
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert!(matches!(
            result,
            Err(SearchError::UnexpectedStatus { status: 503, .. })
        ));
    }

    #[tokio::test]
    async fn does_not_retry_place_not_found() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = retry_with_backoff(3, 0, || {
            let c = Arc::clone(&c);
            async move {
                c.fetch_add(1, Ordering::SeqCst);
                Err::<u32, SearchError>(SearchError::PlaceNotFound {
                    query: "atlantis".to_owned(),
                })
            }
        })
        .await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(matches!(result, Err(SearchError::PlaceNotFound { .. })));
    }
}
