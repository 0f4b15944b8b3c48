//! Batch-level statistics over completed waterfall results.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::waterfall::WaterfallResult;

/// Tallies of one completed discovery batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchStats {
    /// Subjects in the batch, resolved or not.
    pub subjects: usize,
    /// Resolved-subject counts keyed by winning source tag.
    pub per_source: BTreeMap<String, usize>,
    /// Subjects no source could resolve.
    pub no_result: usize,
    /// Contacts found across the whole batch.
    pub total_contacts: usize,
}

impl BatchStats {
    /// Tallies a completed batch mapping.
    #[must_use]
    pub fn from_batch(results: &BTreeMap<i64, WaterfallResult>) -> Self {
        let mut per_source: BTreeMap<String, usize> = BTreeMap::new();
        let mut no_result = 0;
        let mut total_contacts = 0;

        for result in results.values() {
            total_contacts += result.contacts.len();
            match &result.source {
                Some(tag) => *per_source.entry(tag.clone()).or_insert(0) += 1,
                None => no_result += 1,
            }
        }

        Self {
            subjects: results.len(),
            per_source,
            no_result,
            total_contacts,
        }
    }

    /// Share of subjects resolved by `source_tag`, formatted like `"50.0%"`.
    ///
    /// Measured against the free tier this doubles as the cost-savings
    /// figure: every free hit is a paid lookup not made. An empty batch
    /// rates `"0.0%"`.
    #[must_use]
    pub fn hit_rate(&self, source_tag: &str) -> String {
        if self.subjects == 0 {
            return "0.0%".to_owned();
        }
        let hits = self.per_source.get(source_tag).copied().unwrap_or(0);
        #[allow(clippy::cast_precision_loss)]
        let rate = (hits as f64 / self.subjects as f64) * 100.0;
        format!("{rate:.1}%")
    }
}
