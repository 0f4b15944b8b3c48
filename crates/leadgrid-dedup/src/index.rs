//! Directory snapshot ingestion and the exact-domain index.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

use leadgrid_core::domain::{canonical_domain, domain_from_email, org_token};

/// Failure fetching the directory snapshot. Wraps whatever error type the
/// collaborator's transport produces.
#[derive(Debug, Error)]
#[error(transparent)]
pub struct SnapshotError(Box<dyn std::error::Error + Send + Sync>);

impl SnapshotError {
    pub fn new(source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self(source.into())
    }
}

/// External CRM directory, fetched once per dedup session.
#[async_trait]
pub trait DirectorySnapshot: Send + Sync {
    /// Fetch every directory record.
    ///
    /// # Errors
    ///
    /// Returns `SnapshotError` when the snapshot cannot be retrieved.
    async fn fetch_all(&self) -> Result<Vec<DirectoryRecord>, SnapshotError>;
}

/// Raw record shape delivered by the snapshot collaborator.
#[derive(Debug, Clone, Deserialize)]
pub struct DirectoryRecord {
    pub record_id: String,
    pub name: String,
    pub site: Option<String>,
    pub email: Option<String>,
}

/// A directory contact with its derived identity fields.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectoryContact {
    pub record_id: String,
    pub name: String,
    pub site: Option<String>,
    pub email: Option<String>,
    /// Canonical domain from the site URL, falling back to the email's host.
    pub domain: Option<String>,
    /// First label of the site domain, alphanumeric only. What fuzzy
    /// matching compares lead names against; never derived from the email.
    pub org_token: Option<String>,
}

impl DirectoryContact {
    fn from_record(record: DirectoryRecord) -> Self {
        let site_domain = record.site.as_deref().and_then(canonical_domain);
        let domain = site_domain
            .clone()
            .or_else(|| record.email.as_deref().and_then(domain_from_email));
        let org_token = site_domain.as_deref().and_then(org_token);

        Self {
            record_id: record.record_id,
            name: record.name,
            site: record.site,
            email: record.email,
            domain,
            org_token,
        }
    }
}

/// Exact-domain index over one directory snapshot, read-only after build.
///
/// Contacts with no derivable domain are absent from the domain map but stay
/// in the full contact list, so fuzzy fallback still sees them.
#[derive(Debug, Default)]
pub struct DirectoryIndex {
    contacts: Vec<DirectoryContact>,
    by_domain: HashMap<String, Vec<usize>>,
}

impl DirectoryIndex {
    /// Build the index from already-fetched records.
    #[must_use]
    pub fn build(records: Vec<DirectoryRecord>) -> Self {
        let contacts: Vec<DirectoryContact> = records
            .into_iter()
            .map(DirectoryContact::from_record)
            .collect();

        let mut by_domain: HashMap<String, Vec<usize>> = HashMap::new();
        for (i, contact) in contacts.iter().enumerate() {
            if let Some(domain) = &contact.domain {
                by_domain.entry(domain.clone()).or_default().push(i);
            }
        }

        Self {
            contacts,
            by_domain,
        }
    }

    /// Fetch the snapshot and build the index.
    ///
    /// # Errors
    ///
    /// Returns `SnapshotError` when the snapshot fetch fails.
    pub async fn from_snapshot<S>(snapshot: &S) -> Result<Self, SnapshotError>
    where
        S: DirectorySnapshot + ?Sized,
    {
        Ok(Self::build(snapshot.fetch_all().await?))
    }

    /// Every contact in snapshot order, domainless ones included.
    #[must_use]
    pub fn contacts(&self) -> &[DirectoryContact] {
        &self.contacts
    }

    /// All contacts sharing `domain`, in snapshot order. Empty when the
    /// domain is not indexed.
    #[must_use]
    pub fn contacts_for_domain(&self, domain: &str) -> Vec<&DirectoryContact> {
        self.by_domain
            .get(domain)
            .map(|indices| indices.iter().map(|&i| &self.contacts[i]).collect())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.contacts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }

    /// Number of distinct domains in the exact-match map.
    #[must_use]
    pub fn indexed_domain_count(&self) -> usize {
        self.by_domain.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, name: &str, site: Option<&str>, email: Option<&str>) -> DirectoryRecord {
        DirectoryRecord {
            record_id: id.to_string(),
            name: name.to_string(),
            site: site.map(str::to_string),
            email: email.map(str::to_string),
        }
    }

    #[test]
    fn build_groups_contacts_by_site_domain() {
        let index = DirectoryIndex::build(vec![
            record("1", "Jane Novak", Some("https://widgetco.cz/team"), None),
            record("2", "Karel Dvorak", Some("http://www.widgetco.cz"), None),
            record("3", "Sam Ortiz", Some("https://acme.com"), None),
        ]);

        let widgetco = index.contacts_for_domain("widgetco.cz");
        assert_eq!(widgetco.len(), 2);
        assert_eq!(widgetco[0].record_id, "1");
        assert_eq!(widgetco[1].record_id, "2");
        assert_eq!(index.indexed_domain_count(), 2);
    }

    #[test]
    fn email_host_is_the_domain_fallback() {
        let index = DirectoryIndex::build(vec![record(
            "1",
            "Jane Novak",
            None,
            Some("jane@widgetco.cz"),
        )]);

        assert_eq!(index.contacts_for_domain("widgetco.cz").len(), 1);
        // No site means no organization token, even with an email domain.
        assert_eq!(index.contacts()[0].org_token, None);
    }

    #[test]
    fn domainless_contacts_stay_in_the_list_but_not_the_map() {
        let index = DirectoryIndex::build(vec![
            record("1", "No Domain", None, None),
            record("2", "Bad Email", None, Some("not-an-email")),
            record("3", "Indexed", Some("acme.com"), None),
        ]);

        assert_eq!(index.len(), 3);
        assert_eq!(index.indexed_domain_count(), 1);
        assert!(index.contacts()[0].domain.is_none());
        assert!(index.contacts()[1].domain.is_none());
    }

    #[test]
    fn org_token_comes_from_the_site_domain() {
        let index = DirectoryIndex::build(vec![record(
            "1",
            "Jane",
            Some("https://www.bright-star.com/about"),
            Some("jane@other-host.io"),
        )]);

        let contact = &index.contacts()[0];
        assert_eq!(contact.domain.as_deref(), Some("bright-star.com"));
        assert_eq!(contact.org_token.as_deref(), Some("brightstar"));
    }

    #[test]
    fn unknown_domain_yields_no_matches() {
        let index = DirectoryIndex::build(vec![record("1", "Sam", Some("acme.com"), None)]);
        assert!(index.contacts_for_domain("missing.io").is_empty());
    }
}
