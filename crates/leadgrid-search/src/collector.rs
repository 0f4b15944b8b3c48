//! Pagewise collection of one grid cell.

use std::collections::HashSet;
use std::time::Duration;

use leadgrid_core::{GridCell, LeadRecord, RequestBudget};

use crate::places::AreaSearch;

/// Hard cap on search pages per cell. The search source caps usable depth at
/// three pages for one rectangle; anything deeper repeats results.
///
/// Note: each page request may be retried inside the adapter on transient
/// errors, so the effective worst-case request count per cell is
/// `MAX_PAGES_PER_CELL * (1 + max_retries)`.
pub const MAX_PAGES_PER_CELL: usize = 3;

/// What one cell yielded.
#[derive(Debug, Default)]
pub struct CellCollection {
    /// Leads materialized on first sight during this cell.
    pub leads: Vec<LeadRecord>,
    /// Every candidate the source returned, including already-seen skips.
    pub found: u64,
    /// Page calls made (and charged against the budget).
    pub pages: usize,
}

/// Collects one cell: fetches up to [`MAX_PAGES_PER_CELL`] pages, skipping
/// candidates whose external key is already in `seen` and inserting the keys
/// of the ones it materializes, so the same place never becomes two leads
/// across cells or runs.
///
/// Every page attempt records one call against `budget`, success or not.
/// The budget is not checked mid-cell; the orchestrator gates on it between
/// cells. `inter_page_delay_ms` separates page calls of the same cell and is
/// skipped when zero.
///
/// Never fails: a page fetch error ends the cell with whatever was collected
/// so far, logged at warn level.
pub async fn collect_cell<S>(
    search: &S,
    cell: &GridCell,
    query: &str,
    seen: &mut HashSet<String>,
    budget: &mut RequestBudget,
    inter_page_delay_ms: u64,
) -> CellCollection
where
    S: AreaSearch + ?Sized,
{
    let mut collection = CellCollection::default();
    let mut token: Option<String> = None;
    let mut is_first_page = true;

    loop {
        if collection.pages >= MAX_PAGES_PER_CELL {
            break;
        }

        if !is_first_page && inter_page_delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(inter_page_delay_ms)).await;
        }
        is_first_page = false;

        let result = search.search(&cell.bound, query, token.as_deref()).await;
        budget.record(1);
        collection.pages += 1;

        let page = match result {
            Ok(page) => page,
            Err(err) => {
                tracing::warn!(
                    row = cell.row,
                    col = cell.col,
                    page = collection.pages,
                    error = %err,
                    "page fetch failed — keeping partial cell results"
                );
                break;
            }
        };

        for place in page.items {
            collection.found += 1;
            let key = place.external_key();
            if seen.contains(&key) {
                continue;
            }
            seen.insert(key.clone());
            collection.leads.push(place.into_lead(key));
        }

        token = page.next_token;
        if token.is_none() {
            break;
        }
    }

    collection
}

#[cfg(test)]
#[path = "collector_test.rs"]
mod tests;
