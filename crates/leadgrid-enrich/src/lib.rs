//! Contact discovery for harvested leads.
//!
//! Given a lead's site URL, the waterfall canonicalizes it to a bare domain
//! and walks an ordered list of discovery sources — free tiers first, paid
//! APIs last — returning the first source's usable contacts, normalized into
//! one canonical shape. Batches run strictly sequentially and feed
//! [`BatchStats`] afterwards.

pub mod error;
mod http;
pub mod normalize;
mod retry;
pub mod sources;
pub mod stats;
pub mod types;
pub mod waterfall;

pub use error::EnrichError;
pub use normalize::{normalize_candidate, split_name, HEURISTIC_DEFAULT_CONFIDENCE};
pub use sources::{ContactApiSource, ContactSource, CrawlContactSource};
pub use stats::BatchStats;
pub use types::{ContactCandidate, NormalizedContact, SourceKind};
pub use waterfall::{discover, discover_batch, Subject, WaterfallResult};
