//! Run progress reporting seam.

use serde::Serialize;

use crate::orchestrator::RunSummary;

/// Emitted after each completed cell. Counters are cumulative for the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProgressEvent {
    /// Zero-based index of the cell just completed.
    pub cell_index: usize,
    pub total_cells: usize,
    pub total_found: u64,
    pub total_new: u64,
}

/// Receives run progress. Implementations must not block; the orchestrator
/// calls them inline between cells.
pub trait ProgressSink: Send + Sync {
    fn cell_completed(&self, event: &ProgressEvent);
    fn run_finished(&self, summary: &RunSummary);
}

/// Discards all progress.
pub struct NoopProgress;

impl ProgressSink for NoopProgress {
    fn cell_completed(&self, _event: &ProgressEvent) {}
    fn run_finished(&self, _summary: &RunSummary) {}
}

/// Logs progress through `tracing`.
pub struct LogProgress;

impl ProgressSink for LogProgress {
    fn cell_completed(&self, event: &ProgressEvent) {
        tracing::info!(
            cell = event.cell_index + 1,
            total_cells = event.total_cells,
            total_found = event.total_found,
            total_new = event.total_new,
            "cell completed"
        );
    }

    fn run_finished(&self, summary: &RunSummary) {
        tracing::info!(
            run_id = %summary.run_id,
            cells_completed = summary.cells_completed,
            cells_total = summary.cells_total,
            total_found = summary.total_found,
            total_new = summary.total_new,
            budget_exhausted = summary.budget_exhausted,
            "grid search run finished"
        );
    }
}
