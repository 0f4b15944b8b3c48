//! Ordered contact-discovery fallback over pluggable sources.
//!
//! Sources are tried strictly in the order given — cheap/heuristic tiers
//! first, paid APIs last — and the first one to produce a usable contact
//! wins. Source failures are logged and skipped; running out of sources is a
//! valid outcome, not an error. Nothing here is cached: one invocation, one
//! fresh answer.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::Serialize;

use leadgrid_core::domain::canonical_domain;

use crate::normalize::normalize_candidate;
use crate::sources::ContactSource;
use crate::types::NormalizedContact;

/// Outcome of one discovery run for one subject.
///
/// `source = None` with empty contacts is the "nobody found anything"
/// terminal state — valid, expected, never an error.
#[derive(Debug, Clone, Serialize)]
pub struct WaterfallResult {
    pub subject_id: i64,
    /// Tag of the source that produced the contacts; `None` when every
    /// source came up empty or failed.
    pub source: Option<String>,
    pub contacts: Vec<NormalizedContact>,
}

impl WaterfallResult {
    /// The empty outcome for a subject no source could resolve.
    #[must_use]
    pub fn empty(subject_id: i64) -> Self {
        Self {
            subject_id,
            source: None,
            contacts: Vec::new(),
        }
    }
}

/// One lead to enrich in a batch: its store identifier and whatever site URL
/// the search pipeline captured for it.
#[derive(Debug, Clone)]
pub struct Subject {
    pub id: i64,
    pub site: Option<String>,
}

/// Tries each source in priority order and returns the first non-empty
/// normalized result, tagged with the winning source.
///
/// The raw site is canonicalized to a bare domain first; a site that yields
/// no usable domain short-circuits to the empty outcome without calling any
/// source. A failing source is logged via `tracing::warn!` and skipped.
/// Candidates are normalized per source kind before the emptiness check, so
/// a source whose candidates all normalize away falls through like an empty
/// one.
pub async fn discover(
    subject_id: i64,
    raw_site: &str,
    sources: &[Box<dyn ContactSource>],
) -> WaterfallResult {
    let Some(domain) = canonical_domain(raw_site) else {
        tracing::debug!(subject_id, raw_site, "no usable domain, skipping discovery");
        return WaterfallResult::empty(subject_id);
    };

    for source in sources {
        let candidates = match source.discover(&domain).await {
            Ok(candidates) => candidates,
            Err(e) => {
                tracing::warn!(
                    subject_id,
                    domain = %domain,
                    source = source.tag(),
                    error = %e,
                    "contact source failed — trying the next one"
                );
                continue;
            }
        };

        let contacts: Vec<NormalizedContact> = candidates
            .into_iter()
            .filter_map(|c| normalize_candidate(c, source.tag(), source.kind()))
            .collect();

        if !contacts.is_empty() {
            tracing::debug!(
                subject_id,
                domain = %domain,
                source = source.tag(),
                count = contacts.len(),
                "contacts discovered"
            );
            return WaterfallResult {
                subject_id,
                source: Some(source.tag().to_owned()),
                contacts,
            };
        }
    }

    tracing::debug!(subject_id, domain = %domain, "no contact source produced a result");
    WaterfallResult::empty(subject_id)
}

/// Enriches a batch of subjects strictly sequentially, in input order, with
/// a fixed pause between subjects (skipped when `inter_subject_delay_ms` is
/// zero). Every subject ends up in the returned map: one that fails every
/// source, or has no usable site at all, maps to the empty outcome.
pub async fn discover_batch(
    subjects: &[Subject],
    sources: &[Box<dyn ContactSource>],
    inter_subject_delay_ms: u64,
) -> BTreeMap<i64, WaterfallResult> {
    let mut results = BTreeMap::new();

    for (i, subject) in subjects.iter().enumerate() {
        if i > 0 && inter_subject_delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(inter_subject_delay_ms)).await;
        }

        let result = match subject.site.as_deref() {
            Some(site) => discover(subject.id, site, sources).await,
            None => WaterfallResult::empty(subject.id),
        };
        results.insert(subject.id, result);
    }

    results
}

#[cfg(test)]
#[path = "waterfall_test.rs"]
mod tests;
