use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::*;
use crate::error::EnrichError;
use crate::types::{ContactCandidate, SourceKind};

enum Script {
    Succeed(Vec<ContactCandidate>),
    Fail,
}

/// Scripted source: returns the same canned answer on every call and counts
/// how often it was consulted.
struct StubSource {
    tag: &'static str,
    kind: SourceKind,
    script: Script,
    calls: Arc<AtomicU32>,
}

#[async_trait]
impl ContactSource for StubSource {
    fn tag(&self) -> &str {
        self.tag
    }

    fn kind(&self) -> SourceKind {
        self.kind
    }

    async fn discover(&self, _domain: &str) -> Result<Vec<ContactCandidate>, EnrichError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.script {
            Script::Succeed(candidates) => Ok(candidates.clone()),
            Script::Fail => Err(EnrichError::UnexpectedStatus {
                status: 500,
                url: "https://source.example.com".to_owned(),
            }),
        }
    }
}

/// Records the domains it is asked about.
struct DomainProbe {
    domains: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl ContactSource for DomainProbe {
    fn tag(&self) -> &str {
        "probe"
    }

    fn kind(&self) -> SourceKind {
        SourceKind::Heuristic
    }

    async fn discover(&self, domain: &str) -> Result<Vec<ContactCandidate>, EnrichError> {
        self.domains.lock().unwrap().push(domain.to_owned());
        Ok(vec![named("Jana Novak")])
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

fn stub(
    tag: &'static str,
    kind: SourceKind,
    script: Script,
) -> (Box<dyn ContactSource>, Arc<AtomicU32>) {
    let calls = Arc::new(AtomicU32::new(0));
    let source = StubSource {
        tag,
        kind,
        script,
        calls: Arc::clone(&calls),
    };
    (Box::new(source), calls)
}

#[tokio::test]
async fn first_non_empty_source_wins_and_later_sources_are_not_consulted() {
    let (free, free_calls) = stub(
        "site_crawl",
        SourceKind::Heuristic,
        Script::Succeed(vec![named("Jana Novak"), named("Petr Svoboda")]),
    );
    let (paid, paid_calls) = stub(
        "contact_api",
        SourceKind::PaidApi,
        Script::Succeed(vec![scored("ceo@widgetco.cz", 99)]),
    );
    let sources = vec![free, paid];

    let result = discover(7, "https://widgetco.cz", &sources).await;

    assert_eq!(result.subject_id, 7);
    assert_eq!(result.source.as_deref(), Some("site_crawl"));
    assert_eq!(result.contacts.len(), 2);
    assert!(
        result.contacts.iter().all(|c| c.confidence == 50),
        "heuristic candidates without a score get the default"
    );
    assert_eq!(free_calls.load(Ordering::SeqCst), 1);
    assert_eq!(
        paid_calls.load(Ordering::SeqCst),
        0,
        "the paid tier must not be consulted once the free tier answered"
    );
}

#[tokio::test]
async fn failing_source_is_skipped_never_fatal() {
    let (free, free_calls) = stub("site_crawl", SourceKind::Heuristic, Script::Fail);
    let (paid, _) = stub(
        "contact_api",
        SourceKind::PaidApi,
        Script::Succeed(vec![scored("jana@widgetco.cz", 91)]),
    );
    let sources = vec![free, paid];

    let result = discover(7, "https://widgetco.cz", &sources).await;

    assert_eq!(free_calls.load(Ordering::SeqCst), 1);
    assert_eq!(result.source.as_deref(), Some("contact_api"));
    assert_eq!(result.contacts.len(), 1);
    assert_eq!(result.contacts[0].confidence, 91, "paid score passes through");
    assert_eq!(result.contacts[0].source_tag, "contact_api");
}

#[tokio::test]
async fn empty_source_falls_through_to_the_next() {
    let (free, _) = stub("site_crawl", SourceKind::Heuristic, Script::Succeed(vec![]));
    let (paid, paid_calls) = stub(
        "contact_api",
        SourceKind::PaidApi,
        Script::Succeed(vec![scored("jana@widgetco.cz", 88)]),
    );
    let sources = vec![free, paid];

    let result = discover(7, "https://widgetco.cz", &sources).await;

    assert_eq!(result.source.as_deref(), Some("contact_api"));
    assert_eq!(paid_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn candidates_that_normalize_away_do_not_count_as_a_hit() {
    // A candidate with neither name nor valid email is dropped by
    // normalization, so this source is effectively empty.
    let (free, _) = stub(
        "site_crawl",
        SourceKind::Heuristic,
        Script::Succeed(vec![ContactCandidate::default()]),
    );
    let (paid, _) = stub(
        "contact_api",
        SourceKind::PaidApi,
        Script::Succeed(vec![scored("jana@widgetco.cz", 77)]),
    );
    let sources = vec![free, paid];

    let result = discover(7, "https://widgetco.cz", &sources).await;

    assert_eq!(result.source.as_deref(), Some("contact_api"));
}

#[tokio::test]
async fn exhausting_every_source_yields_the_empty_outcome() {
    let (first, _) = stub("site_crawl", SourceKind::Heuristic, Script::Fail);
    let (second, _) = stub("contact_api", SourceKind::PaidApi, Script::Succeed(vec![]));
    let sources = vec![first, second];

    let result = discover(42, "https://widgetco.cz", &sources).await;

    assert_eq!(result.subject_id, 42);
    assert_eq!(result.source, None);
    assert!(result.contacts.is_empty());
}

#[tokio::test]
async fn an_unusable_site_short_circuits_before_any_source_call() {
    let (free, free_calls) = stub(
        "site_crawl",
        SourceKind::Heuristic,
        Script::Succeed(vec![named("Jana Novak")]),
    );
    let sources = vec![free];

    let result = discover(7, "localhost", &sources).await;

    assert_eq!(result.source, None);
    assert!(result.contacts.is_empty());
    assert_eq!(
        free_calls.load(Ordering::SeqCst),
        0,
        "no source may be called without a canonical domain"
    );
}

#[tokio::test]
async fn sources_receive_the_canonical_domain() {
    let domains = Arc::new(Mutex::new(Vec::new()));
    let probe = Box::new(DomainProbe {
        domains: Arc::clone(&domains),
    }) as Box<dyn ContactSource>;
    let sources = vec![probe];

    discover(7, "HTTPS://WWW.WidgetCo.CZ/team?ref=1", &sources).await;

    assert_eq!(*domains.lock().unwrap(), vec!["widgetco.cz".to_owned()]);
}

#[tokio::test]
async fn batch_covers_every_subject_and_keeps_results_keyed_by_id() {
    let (free, free_calls) = stub(
        "site_crawl",
        SourceKind::Heuristic,
        Script::Succeed(vec![named("Jana Novak")]),
    );
    let sources = vec![free];
    let subjects = vec![
        Subject {
            id: 7,
            site: Some("https://widgetco.cz".to_owned()),
        },
        Subject { id: 3, site: None },
        Subject {
            id: 9,
            site: Some("https://acme.com".to_owned()),
        },
    ];

    let results = discover_batch(&subjects, &sources, 0).await;

    assert_eq!(results.len(), 3);
    assert_eq!(
        results.keys().copied().collect::<Vec<_>>(),
        vec![3, 7, 9],
        "results are keyed by subject id"
    );
    assert_eq!(results[&3].source, None, "site-less subject gets the empty outcome");
    assert_eq!(results[&7].source.as_deref(), Some("site_crawl"));
    assert_eq!(results[&9].source.as_deref(), Some("site_crawl"));
    assert_eq!(
        free_calls.load(Ordering::SeqCst),
        2,
        "the site-less subject must not trigger a source call"
    );
}
