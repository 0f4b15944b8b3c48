//! Edit-distance similarity for organization-name matching.
//!
//! Strings are normalized (lowercase, letters and digits only, accented
//! letters kept) before comparison, so `"Acme Marketing"` and
//! `"acmemarketing"` collapse to the same character material.

/// Normalized strings at least this long qualify for the substring rule.
pub const MIN_SUBSTRING_LEN: usize = 5;

/// Score awarded when one normalized string contains the other.
pub const SUBSTRING_SCORE: f64 = 0.85;

/// Similarity of two strings in `[0, 1]`.
///
/// Equal normalized strings score 1. If the shorter normalized string is at
/// least [`MIN_SUBSTRING_LEN`] characters and a substring of the longer, the
/// pair scores [`SUBSTRING_SCORE`]. Otherwise the score is
/// `(longer.len - edit_distance) / longer.len`. Symmetric in its arguments.
#[must_use]
pub fn fuzzy_match(a: &str, b: &str) -> f64 {
    let na = normalize(a);
    let nb = normalize(b);

    if na == nb {
        return 1.0;
    }
    if na.is_empty() || nb.is_empty() {
        return 0.0;
    }

    let (shorter, longer) = if na.chars().count() <= nb.chars().count() {
        (&na, &nb)
    } else {
        (&nb, &na)
    };

    if shorter.chars().count() >= MIN_SUBSTRING_LEN && longer.contains(shorter.as_str()) {
        return SUBSTRING_SCORE;
    }

    let distance = edit_distance(&na, &nb);
    let longer_len = longer.chars().count();

    // distance never exceeds the longer length, so the ratio stays in [0, 1];
    // callers gate on a threshold anyway.
    #[allow(clippy::cast_precision_loss)]
    {
        (longer_len as f64 - distance as f64) / longer_len as f64
    }
}

/// Lowercase and keep only letters and digits (accented letters included).
/// Whitespace and punctuation vanish, which also trims the ends.
fn normalize(s: &str) -> String {
    s.to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric())
        .collect()
}

/// Classic Levenshtein distance: insertion, deletion and substitution each
/// cost 1. Two-row dynamic program over chars.
fn edit_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0usize; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let substitution = prev[j] + usize::from(ca != cb);
            let deletion = prev[j + 1] + 1;
            let insertion = curr[j] + 1;
            curr[j + 1] = substitution.min(deletion).min(insertion);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}
