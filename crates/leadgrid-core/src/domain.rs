//! Site URL and email canonicalization shared by dedup and enrichment.
//!
//! Everything downstream keys on the bare lowercase domain: the dedup index
//! groups directory contacts by it, and the contact waterfall feeds it to
//! every discovery source.

/// Canonicalize a site URL into a bare lowercase domain.
///
/// Strips the scheme, anything after the host (path, query, fragment), the
/// port, a trailing dot, and a leading `www.`. Returns `None` when no
/// plausible domain remains (empty input or a host without a dot).
#[must_use]
pub fn canonical_domain(site: &str) -> Option<String> {
    let trimmed = site.trim();
    if trimmed.is_empty() {
        return None;
    }

    let without_scheme = trimmed
        .split_once("://")
        .map_or(trimmed, |(_, rest)| rest);
    let host = without_scheme
        .split(['/', '?', '#'])
        .next()
        .unwrap_or_default();
    let host = host.split(':').next().unwrap_or_default();

    let host = host.trim_end_matches('.').to_lowercase();
    let host = host.strip_prefix("www.").unwrap_or(&host);

    if host.is_empty() || !host.contains('.') {
        return None;
    }
    Some(host.to_string())
}

/// Domain of an email address, lowercased. `None` when the input has no
/// usable host part.
#[must_use]
pub fn domain_from_email(email: &str) -> Option<String> {
    let (_, host) = email.trim().rsplit_once('@')?;
    let host = host.trim_end_matches('.').to_lowercase();
    if host.is_empty() || !host.contains('.') {
        return None;
    }
    Some(host)
}

/// Organization token of a domain: the first label, lowercased, with every
/// non-alphanumeric character removed. `None` when nothing survives.
///
/// `bright-star.com` → `brightstar`. The token is what fuzzy dedup compares
/// lead names against; it deliberately says nothing about people's names.
#[must_use]
pub fn org_token(domain: &str) -> Option<String> {
    let label = domain.split('.').next()?;
    let token: String = label
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric())
        .collect();
    if token.is_empty() {
        return None;
    }
    Some(token)
}
