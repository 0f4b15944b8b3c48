//! The harvested business record and its identity rules.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A business record harvested from the geographic search source.
///
/// Created on first sight of an external identifier; on repeat sight the
/// persistence collaborator updates descriptive fields in place
/// (last-write-wins). The core never deletes a lead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeadRecord {
    /// Stable identifier from the search source, or a derived fallback key
    /// (see [`fallback_lead_key`]) when the source supplies none.
    pub external_id: String,
    pub name: String,
    /// Canonical site URL as reported by the search source.
    pub site: Option<String>,
    /// Free-text address, exactly as reported.
    pub address: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub category: Option<String>,
    pub rating: Option<f64>,
    pub phone: Option<String>,
    /// Descriptive fields preserved opaquely (hours, review counts, ...).
    pub extra: serde_json::Value,
    pub fetched_at: DateTime<Utc>,
}

/// Derive a stable dedup key for a place the search source returned without
/// an identifier.
///
/// Normalized name, address and coordinates are NUL-joined and hashed so the
/// same physical place keys identically across cells and runs.
#[must_use]
pub fn fallback_lead_key(
    name: &str,
    address: Option<&str>,
    latitude: Option<f64>,
    longitude: Option<f64>,
) -> String {
    use sha2::{Digest, Sha256};
    let input = format!(
        "{}\x00{}\x00{}\x00{}",
        name.trim().to_lowercase(),
        address.unwrap_or("").trim().to_lowercase(),
        latitude.map(|v| format!("{v:.6}")).unwrap_or_default(),
        longitude.map(|v| format!("{v:.6}")).unwrap_or_default(),
    );
    format!("{:x}", Sha256::digest(input.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_key_is_stable_across_case_and_whitespace() {
        let a = fallback_lead_key(
            "  Island Coffee ",
            Some("12 King St"),
            Some(32.776_5),
            Some(-79.931_1),
        );
        let b = fallback_lead_key(
            "island coffee",
            Some(" 12 king st "),
            Some(32.776_5),
            Some(-79.931_1),
        );
        assert_eq!(a, b);
    }

    #[test]
    fn fallback_key_differs_when_address_differs() {
        let a = fallback_lead_key("Island Coffee", Some("12 King St"), None, None);
        let b = fallback_lead_key("Island Coffee", Some("14 King St"), None, None);
        assert_ne!(a, b);
    }

    #[test]
    fn fallback_key_handles_missing_fields() {
        let key = fallback_lead_key("Island Coffee", None, None, None);
        assert_eq!(key.len(), 64);
    }

    #[test]
    fn fallback_key_rounds_coordinates_to_six_places() {
        let a = fallback_lead_key("x", None, Some(32.123_456_71), Some(-79.0));
        let b = fallback_lead_key("x", None, Some(32.123_456_74), Some(-79.0));
        assert_eq!(a, b);
    }
}
