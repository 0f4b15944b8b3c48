//! Grid-driven lead acquisition.
//!
//! A place name resolves to a rectangular bound, the bound is subdivided into
//! a grid, and each cell is searched page by page against a metered request
//! budget, deduping on external ids across cells and runs. The pipeline's
//! collaborators (geocoding, area search, persistence, progress) are injected
//! traits; reqwest-backed adapters for the two remote capabilities ship here.

pub mod collector;
pub mod error;
pub mod geocode;
mod http;
pub mod orchestrator;
pub mod places;
pub mod progress;
mod retry;
pub mod store;

pub use collector::{collect_cell, CellCollection, MAX_PAGES_PER_CELL};
pub use error::SearchError;
pub use geocode::{Geocoder, HttpGeocoder};
pub use orchestrator::{GridSearchRunner, RunSummary};
pub use places::{AreaSearch, HttpAreaSearch, RawPlace, SearchPage};
pub use progress::{LogProgress, NoopProgress, ProgressEvent, ProgressSink};
pub use store::{LeadStore, StoreError};
