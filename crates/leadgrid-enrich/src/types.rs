//! Contact shapes on both sides of the normalization boundary.
//!
//! Discovery sources hand back [`ContactCandidate`]s — lenient, all-optional
//! raw material. The waterfall immediately normalizes them into
//! [`NormalizedContact`], the only shape that leaves this crate.

use serde::{Deserialize, Serialize};

/// A raw person record as reported by one discovery source.
///
/// Every field is optional; sources differ wildly in what they know. The
/// crawl service's response deserializes straight into this shape, the
/// paid-API adapter maps its own wire format into it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactCandidate {
    /// Display name, e.g. `"Jana Novak"`.
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    /// Job title or position, verbatim from the source.
    pub title: Option<String>,
    /// Source-reported confidence on a 0–100 scale. Meaning differs by
    /// source kind; see [`SourceKind`].
    pub confidence: Option<u8>,
}

/// How a source arrives at its candidates, which decides the confidence
/// default during normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// Scraped or inferred. Candidates without a reported confidence get the
    /// default of 50.
    Heuristic,
    /// A paying API that scores its own answers. Reported confidence is
    /// passed through untouched; absence reads as 0, never as the heuristic
    /// default.
    PaidApi,
}

/// The canonical contact produced by normalization, tagged with the source
/// that found it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NormalizedContact {
    pub full_name: Option<String>,
    /// First whitespace token of the display name.
    pub first_name: Option<String>,
    /// Remaining tokens joined with single spaces; `None` for single-token
    /// names.
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub title: Option<String>,
    pub source_tag: String,
    /// 0–100.
    pub confidence: u8,
}
