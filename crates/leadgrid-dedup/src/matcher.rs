//! Duplicate verdicts: exact-domain first, fuzzy organization-token fallback.
//!
//! Domain equality is a near-certain signal, so it short-circuits. The fuzzy
//! stage compares the lead's business name against tokens derived from
//! contact site domains only — a person's display name never participates,
//! which keeps false positives down at the cost of some recall.

use leadgrid_core::domain::canonical_domain;
use leadgrid_core::LeadRecord;

use crate::fuzzy::fuzzy_match;
use crate::index::{DirectoryContact, DirectoryIndex};

/// Confidence reported for an exact canonical-domain hit.
pub const EXACT_DOMAIN_CONFIDENCE: f64 = 0.95;

/// Minimum fuzzy score for a candidate to appear in a verdict.
pub const FUZZY_SCORE_FLOOR: f64 = 0.85;

/// Organization tokens shorter than this are too ambiguous to score.
pub const MIN_ORG_TOKEN_LEN: usize = 5;

/// Fuzzy matches reported per verdict.
pub const MAX_FUZZY_MATCHES: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    ExactDomain,
    FuzzyName,
}

/// One directory contact implicated in a verdict.
#[derive(Debug, Clone)]
pub struct ScoredMatch {
    pub contact: DirectoryContact,
    /// Fuzzy similarity. `None` for exact-domain matches, which carry no
    /// meaningful per-contact score.
    pub score: Option<f64>,
}

/// Outcome of checking one lead against the directory.
#[derive(Debug, Clone)]
pub struct DuplicateVerdict {
    pub is_duplicate: bool,
    pub kind: Option<MatchKind>,
    /// Best match first.
    pub matches: Vec<ScoredMatch>,
    /// In `[0, 1]`: fixed at [`EXACT_DOMAIN_CONFIDENCE`] for exact hits, the
    /// best fuzzy score otherwise, 0 when the lead looks clean.
    pub confidence: f64,
}

impl DuplicateVerdict {
    fn clean() -> Self {
        Self {
            is_duplicate: false,
            kind: None,
            matches: Vec::new(),
            confidence: 0.0,
        }
    }
}

/// Decide whether `lead` already exists in the directory.
///
/// Pure and synchronous; the index is read-only, so concurrent calls over
/// the same index are safe.
#[must_use]
pub fn check_duplicate(lead: &LeadRecord, index: &DirectoryIndex) -> DuplicateVerdict {
    if let Some(domain) = lead.site.as_deref().and_then(canonical_domain) {
        let shared = index.contacts_for_domain(&domain);
        if !shared.is_empty() {
            return DuplicateVerdict {
                is_duplicate: true,
                kind: Some(MatchKind::ExactDomain),
                matches: shared
                    .into_iter()
                    .map(|contact| ScoredMatch {
                        contact: contact.clone(),
                        score: None,
                    })
                    .collect(),
                confidence: EXACT_DOMAIN_CONFIDENCE,
            };
        }
    }

    let name = lead.name.trim();
    if name.is_empty() {
        return DuplicateVerdict::clean();
    }

    let mut scored: Vec<ScoredMatch> = Vec::new();
    for contact in index.contacts() {
        let Some(token) = contact.org_token.as_deref() else {
            continue;
        };
        if token.chars().count() < MIN_ORG_TOKEN_LEN {
            continue;
        }
        let score = fuzzy_match(name, token);
        if score >= FUZZY_SCORE_FLOOR {
            scored.push(ScoredMatch {
                contact: contact.clone(),
                score: Some(score),
            });
        }
    }

    if scored.is_empty() {
        return DuplicateVerdict::clean();
    }

    scored.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    scored.truncate(MAX_FUZZY_MATCHES);
    let confidence = scored[0].score.unwrap_or(0.0);

    DuplicateVerdict {
        is_duplicate: true,
        kind: Some(MatchKind::FuzzyName),
        matches: scored,
        confidence,
    }
}
