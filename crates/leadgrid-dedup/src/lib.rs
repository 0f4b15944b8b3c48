//! Duplicate detection against an external CRM directory.
//!
//! One snapshot fetch builds a read-only [`DirectoryIndex`]; every harvested
//! lead is then checked with [`check_duplicate`]: exact canonical-domain
//! matching first, edit-distance matching of the lead name against contact
//! site-domain tokens as the fallback.

pub mod fuzzy;
pub mod index;
pub mod matcher;

pub use fuzzy::fuzzy_match;
pub use index::{
    DirectoryContact, DirectoryIndex, DirectoryRecord, DirectorySnapshot, SnapshotError,
};
pub use matcher::{
    check_duplicate, DuplicateVerdict, MatchKind, ScoredMatch, EXACT_DOMAIN_CONFIDENCE,
    FUZZY_SCORE_FLOOR, MAX_FUZZY_MATCHES, MIN_ORG_TOKEN_LEN,
};
