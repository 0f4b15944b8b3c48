//! Contact discovery source abstractions.
//!
//! Each source answers the same question — who works at this domain? — behind
//! one trait, so the waterfall can try them in priority order without knowing
//! how any of them work.

mod contact_api;
mod crawl;

pub use contact_api::ContactApiSource;
pub use crawl::CrawlContactSource;

use async_trait::async_trait;

use crate::error::EnrichError;
use crate::types::{ContactCandidate, SourceKind};

/// One way of finding the people behind a domain.
#[async_trait]
pub trait ContactSource: Send + Sync {
    /// Stable identifier recorded on every contact this source finds and
    /// counted by the batch statistics.
    fn tag(&self) -> &str;

    /// Decides which confidence default normalization applies.
    fn kind(&self) -> SourceKind;

    /// Looks up raw contact candidates for a bare domain (`widgetco.cz`).
    ///
    /// # Errors
    ///
    /// Transport and decoding failures. The waterfall logs these and moves on
    /// to the next source; they never abort a discovery run.
    async fn discover(&self, domain: &str) -> Result<Vec<ContactCandidate>, EnrichError>;
}
