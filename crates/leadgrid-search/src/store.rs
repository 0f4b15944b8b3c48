//! Persistence seam for harvested leads.

use std::collections::HashSet;

use async_trait::async_trait;
use thiserror::Error;

use leadgrid_core::LeadRecord;

/// Failure inside the persistence collaborator. Wraps whatever error type the
/// collaborator's storage backend produces.
#[derive(Debug, Error)]
#[error(transparent)]
pub struct StoreError(Box<dyn std::error::Error + Send + Sync>);

impl StoreError {
    pub fn new(source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self(source.into())
    }
}

/// The sole source of truth for leads across runs. The pipeline only reads
/// and writes an in-memory view during one run: `seen_ids` seeds the dedup
/// set at run start, `upsert_leads` receives each cell's new records as they
/// are collected. Upserts are keyed by external id with last-write-wins on
/// descriptive fields.
#[async_trait]
pub trait LeadStore: Send + Sync {
    /// Every external id already materialized as a lead.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` when the persisted ids cannot be read. The
    /// orchestrator treats this as fatal for the run.
    async fn seen_ids(&self) -> Result<HashSet<String>, StoreError>;

    /// Persist a batch of leads keyed by external id.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` when the write fails. The orchestrator logs the
    /// failure and continues with the next cell.
    async fn upsert_leads(&self, leads: &[LeadRecord]) -> Result<(), StoreError>;
}
