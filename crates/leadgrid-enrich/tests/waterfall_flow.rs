//! End-to-end discovery batches: the waterfall plus its statistics.

use std::collections::HashMap;

use async_trait::async_trait;

use leadgrid_enrich::error::EnrichError;
use leadgrid_enrich::sources::ContactSource;
use leadgrid_enrich::stats::BatchStats;
use leadgrid_enrich::types::{ContactCandidate, SourceKind};
use leadgrid_enrich::waterfall::{discover_batch, Subject};

/// Answers a fixed candidate list per domain; unknown domains come up empty.
struct ScriptedSource {
    tag: &'static str,
    kind: SourceKind,
    answers: HashMap<&'static str, Vec<ContactCandidate>>,
}

#[async_trait]
impl ContactSource for ScriptedSource {
    fn tag(&self) -> &str {
        self.tag
    }

    fn kind(&self) -> SourceKind {
        self.kind
    }

    async fn discover(&self, domain: &str) -> Result<Vec<ContactCandidate>, EnrichError> {
        Ok(self.answers.get(domain).cloned().unwrap_or_default())
    }
}

fn named(name: &str) -> ContactCandidate {
    ContactCandidate {
        name: Some(name.to_owned()),
        ..ContactCandidate::default()
    }
}

fn scored(email: &str, confidence: u8) -> ContactCandidate {
    ContactCandidate {
        email: Some(email.to_owned()),
        confidence: Some(confidence),
        ..ContactCandidate::default()
    }
}

fn subject(id: i64, site: &str) -> Subject {
    Subject {
        id,
        site: Some(site.to_owned()),
    }
}

#[tokio::test]
async fn a_mixed_batch_resolves_tallied_by_winning_source() {
    // Free tier knows two domains, the paid API knows a third, the fourth
    // resolves nowhere.
    let free = ScriptedSource {
        tag: "site_crawl",
        kind: SourceKind::Heuristic,
        answers: HashMap::from([
            ("widgetco.cz", vec![named("Jana Novak")]),
            ("acme.com", vec![named("Ana Maria Silva")]),
        ]),
    };
    let paid = ScriptedSource {
        tag: "contact_api",
        kind: SourceKind::PaidApi,
        answers: HashMap::from([("brightstar.io", vec![scored("ceo@brightstar.io", 87)])]),
    };
    let sources: Vec<Box<dyn ContactSource>> = vec![Box::new(free), Box::new(paid)];

    let subjects = vec![
        subject(1, "https://widgetco.cz"),
        subject(2, "https://www.acme.com/about"),
        subject(3, "https://brightstar.io"),
        subject(4, "https://nowhere.org"),
    ];

    let results = discover_batch(&subjects, &sources, 0).await;

    assert_eq!(results.len(), 4);
    assert_eq!(results[&1].source.as_deref(), Some("site_crawl"));
    assert_eq!(results[&2].source.as_deref(), Some("site_crawl"));
    assert_eq!(results[&3].source.as_deref(), Some("contact_api"));
    assert_eq!(results[&4].source, None);

    // Normalization ran at the boundary: names split, defaults applied,
    // paid scores passed through.
    let jana = &results[&1].contacts[0];
    assert_eq!(jana.first_name.as_deref(), Some("Jana"));
    assert_eq!(jana.last_name.as_deref(), Some("Novak"));
    assert_eq!(jana.confidence, 50);

    let ana = &results[&2].contacts[0];
    assert_eq!(ana.first_name.as_deref(), Some("Ana"));
    assert_eq!(ana.last_name.as_deref(), Some("Maria Silva"));

    let ceo = &results[&3].contacts[0];
    assert_eq!(ceo.source_tag, "contact_api");
    assert_eq!(ceo.confidence, 87);

    let stats = BatchStats::from_batch(&results);
    assert_eq!(stats.subjects, 4);
    assert_eq!(stats.per_source.get("site_crawl"), Some(&2));
    assert_eq!(stats.per_source.get("contact_api"), Some(&1));
    assert_eq!(stats.no_result, 1);
    assert_eq!(stats.total_contacts, 3);
    assert_eq!(
        stats.hit_rate("site_crawl"),
        "50.0%",
        "two of four subjects resolved without touching the paid tier"
    );
}

#[tokio::test]
async fn a_fully_free_batch_saves_every_paid_lookup() {
    let free = ScriptedSource {
        tag: "site_crawl",
        kind: SourceKind::Heuristic,
        answers: HashMap::from([
            ("widgetco.cz", vec![named("Jana Novak")]),
            ("acme.com", vec![named("Petr Svoboda"), named("Eva Horak")]),
        ]),
    };
    let paid = ScriptedSource {
        tag: "contact_api",
        kind: SourceKind::PaidApi,
        answers: HashMap::from([
            ("widgetco.cz", vec![scored("a@widgetco.cz", 90)]),
            ("acme.com", vec![scored("b@acme.com", 90)]),
        ]),
    };
    let sources: Vec<Box<dyn ContactSource>> = vec![Box::new(free), Box::new(paid)];

    let subjects = vec![
        subject(10, "https://widgetco.cz"),
        subject(11, "https://acme.com"),
    ];

    let results = discover_batch(&subjects, &sources, 0).await;
    let stats = BatchStats::from_batch(&results);

    assert_eq!(stats.hit_rate("site_crawl"), "100.0%");
    assert_eq!(stats.per_source.get("contact_api"), None);
    assert_eq!(stats.no_result, 0);
    assert_eq!(stats.total_contacts, 3);
}
