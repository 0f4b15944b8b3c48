//! Normalization of raw source candidates into the canonical contact shape.

use std::sync::LazyLock;

use regex::Regex;

use crate::types::{ContactCandidate, NormalizedContact, SourceKind};

/// Confidence assigned to heuristic-source candidates that report none.
pub const HEURISTIC_DEFAULT_CONFIDENCE: u8 = 50;

/// Loose shape check; full RFC validation is the mail server's problem.
static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email regex"));

/// Splits a display name into `(first_name, last_name)`.
///
/// The first whitespace token becomes the first name; all remaining tokens
/// joined with single spaces become the last name. Single-token names get
/// `last_name = None`; blank input gets `(None, None)`.
#[must_use]
pub fn split_name(full_name: &str) -> (Option<String>, Option<String>) {
    let mut tokens = full_name.split_whitespace();
    let first = tokens.next().map(str::to_owned);
    let rest: Vec<&str> = tokens.collect();
    let last = if rest.is_empty() {
        None
    } else {
        Some(rest.join(" "))
    };
    (first, last)
}

fn clean(value: Option<String>) -> Option<String> {
    value.and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_owned())
        }
    })
}

fn clean_email(value: Option<String>) -> Option<String> {
    clean(value).filter(|e| EMAIL_RE.is_match(e))
}

/// Converts one raw candidate into the canonical contact shape, or `None`
/// when nothing usable survives (no name and no valid email).
///
/// Confidence: heuristic sources default to
/// [`HEURISTIC_DEFAULT_CONFIDENCE`] when the candidate reports none; paid-API
/// sources pass the reported value through unchanged — an explicit 0 stays 0,
/// and an absent value reads as 0 rather than the heuristic default. Values
/// above 100 are clamped.
#[must_use]
pub fn normalize_candidate(
    candidate: ContactCandidate,
    source_tag: &str,
    kind: SourceKind,
) -> Option<NormalizedContact> {
    let full_name = clean(candidate.name);
    let email = clean_email(candidate.email);
    if full_name.is_none() && email.is_none() {
        return None;
    }

    let (first_name, last_name) = full_name.as_deref().map_or((None, None), split_name);
    let confidence = match kind {
        SourceKind::Heuristic => candidate
            .confidence
            .unwrap_or(HEURISTIC_DEFAULT_CONFIDENCE),
        SourceKind::PaidApi => candidate.confidence.unwrap_or(0),
    }
    .min(100);

    Some(NormalizedContact {
        full_name,
        first_name,
        last_name,
        email,
        phone: clean(candidate.phone),
        title: clean(candidate.title),
        source_tag: source_tag.to_owned(),
        confidence,
    })
}
