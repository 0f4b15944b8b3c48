//! Drives the full grid search: geocode, partition, collect cell by cell.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use leadgrid_core::{partition, RequestBudget};

use crate::collector::collect_cell;
use crate::error::SearchError;
use crate::geocode::Geocoder;
use crate::places::AreaSearch;
use crate::progress::{ProgressEvent, ProgressSink};
use crate::store::LeadStore;

/// Terminal tally of one run. Stopping early on budget exhaustion and
/// completing every cell both end here; `budget_exhausted` tells them apart.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub run_id: Uuid,
    pub query: String,
    pub area: String,
    pub cells_total: usize,
    pub cells_completed: usize,
    /// Candidates returned by the source during the run, seen-skips included.
    pub total_found: u64,
    /// Leads materialized on first sight during the run.
    pub total_new: u64,
    pub budget_exhausted: bool,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

/// One grid search pipeline wired to its collaborators.
///
/// Collaborators are injected so persistence, the search source and progress
/// transport stay swappable; the runner owns only the sequencing rules.
pub struct GridSearchRunner<G, S, L, P> {
    geocoder: G,
    search: S,
    store: L,
    progress: P,
    /// Delay between page calls within one cell, skipped when zero.
    inter_page_delay_ms: u64,
}

impl<G, S, L, P> GridSearchRunner<G, S, L, P>
where
    G: Geocoder,
    S: AreaSearch,
    L: LeadStore,
    P: ProgressSink,
{
    pub fn new(geocoder: G, search: S, store: L, progress: P, inter_page_delay_ms: u64) -> Self {
        Self {
            geocoder,
            search,
            store,
            progress,
            inter_page_delay_ms,
        }
    }

    /// Runs one grid search for `query` over the area named by `area`,
    /// subdivided `granularity` × `granularity`.
    ///
    /// Order of operations: resolve the area (one metered call, charged
    /// against `budget` whether it succeeds or not), partition, seed the
    /// seen-id set from the store, then visit cells row-major. Before each
    /// cell the budget is checked; exhaustion stops the run early as a normal
    /// outcome recorded in the summary. Upsert failures are logged and
    /// skipped so one bad write cannot lose the rest of the run.
    ///
    /// # Errors
    ///
    /// - geocoding failure — without a bound there is nothing to search;
    /// - [`SearchError::Grid`] for a zero granularity;
    /// - [`SearchError::Store`] when the seen-id seed cannot be read —
    ///   collecting without it would re-materialize every known lead.
    pub async fn run(
        &self,
        query: &str,
        area: &str,
        granularity: u32,
        budget: &mut RequestBudget,
    ) -> Result<RunSummary, SearchError> {
        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        tracing::info!(run_id = %run_id, query, area, granularity, "starting grid search run");

        let resolved = self.geocoder.resolve(area).await;
        budget.record(1);
        let bound = resolved?;

        let cells = partition(&bound, granularity)?;
        let mut seen = self.store.seen_ids().await?;

        let mut total_found = 0u64;
        let mut total_new = 0u64;
        let mut cells_completed = 0usize;
        let mut budget_exhausted = false;

        for (cell_index, cell) in cells.iter().enumerate() {
            if !budget.has_remaining() {
                budget_exhausted = true;
                tracing::info!(
                    run_id = %run_id,
                    cells_completed,
                    cells_total = cells.len(),
                    used = budget.used(),
                    ceiling = budget.ceiling(),
                    "request budget exhausted — stopping run early"
                );
                break;
            }

            let collection = collect_cell(
                &self.search,
                cell,
                query,
                &mut seen,
                budget,
                self.inter_page_delay_ms,
            )
            .await;

            total_found += collection.found;
            total_new += collection.leads.len() as u64;

            if !collection.leads.is_empty() {
                if let Err(err) = self.store.upsert_leads(&collection.leads).await {
                    tracing::warn!(
                        run_id = %run_id,
                        cell = cell_index,
                        leads = collection.leads.len(),
                        error = %err,
                        "lead upsert failed — continuing with the next cell"
                    );
                }
            }
            cells_completed += 1;

            self.progress.cell_completed(&ProgressEvent {
                cell_index,
                total_cells: cells.len(),
                total_found,
                total_new,
            });
        }

        let summary = RunSummary {
            run_id,
            query: query.to_owned(),
            area: area.to_owned(),
            cells_total: cells.len(),
            cells_completed,
            total_found,
            total_new,
            budget_exhausted,
            started_at,
            finished_at: Utc::now(),
        };
        self.progress.run_finished(&summary);
        Ok(summary)
    }
}

#[cfg(test)]
#[path = "orchestrator_test.rs"]
mod tests;
