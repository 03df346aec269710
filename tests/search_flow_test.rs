//! Debounce and staleness properties of search-as-you-type, plus the
//! selection-to-filter handoff.

mod common;

use std::sync::Arc;
use std::time::Duration;

use pitboss::config::SearchConfig;
use pitboss::list::RemoteListController;
use pitboss::search::DebouncedSearchResolver;

use common::{ScriptedListBackend, ScriptedSearchBackend};

fn config(debounce_ms: u64) -> SearchConfig {
    SearchConfig {
        debounce_ms,
        min_query_len: 2,
    }
}

#[tokio::test]
async fn test_typing_burst_issues_exactly_one_request_for_final_text() {
    let backend = Arc::new(ScriptedSearchBackend::new());
    let resolver = DebouncedSearchResolver::start(backend.clone(), config(50));

    // Keystrokes land faster than the window; only "alice" may go out.
    for text in ["al", "ali", "alic", "alice"] {
        resolver.input(text);
        tokio::time::sleep(Duration::from_millis(12)).await;
    }
    tokio::time::sleep(Duration::from_millis(180)).await;

    assert_eq!(backend.query_log(), vec!["alice".to_string()]);
    assert_eq!(resolver.snapshot().results[0].id, "match-alice");
}

#[tokio::test]
async fn test_epoch_one_arriving_after_epoch_two_is_discarded() {
    let backend = Arc::new(
        ScriptedSearchBackend::new()
            .with_delay("al", Duration::from_millis(150))
            .with_delay("alice", Duration::from_millis(10)),
    );
    let resolver = DebouncedSearchResolver::start(backend.clone(), config(40));

    resolver.input("al");
    // First window elapses; the slow lookup for "al" goes out.
    tokio::time::sleep(Duration::from_millis(60)).await;
    resolver.input("alice");
    // Both lookups are now in flight; "alice" returns first, "al" later.
    tokio::time::sleep(Duration::from_millis(300)).await;

    assert_eq!(
        backend.query_log(),
        vec!["al".to_string(), "alice".to_string()]
    );
    let snapshot = resolver.snapshot();
    assert_eq!(snapshot.results.len(), 1);
    assert_eq!(
        snapshot.results[0].id, "match-alice",
        "the older epoch's late response must never overwrite newer results"
    );
}

#[tokio::test]
async fn test_selection_flows_into_list_filter() {
    let search = Arc::new(ScriptedSearchBackend::new());
    let resolver = DebouncedSearchResolver::start(search.clone(), config(30));
    let list = Arc::new(ScriptedListBackend::new(10, 5));
    let controller = RemoteListController::new(list.clone(), 25);
    controller.load().await.unwrap();

    resolver.input("alice");
    tokio::time::sleep(Duration::from_millis(120)).await;
    let pick = resolver.snapshot().results[0].clone();
    resolver.select(pick.clone());

    // The screen reads the recorded pick into its filter set.
    let mut filters = controller.filters();
    filters.set("player_id", pick.id.clone());
    controller.set_filters(filters).await.unwrap();

    let requests = list.requests.lock();
    let body = requests.last().unwrap().to_body();
    assert_eq!(body.filter["player_id"], "match-alice");
    assert_eq!(requests.last().unwrap().page, 1);

    // And the resolver is back to a blank, closed field.
    let snapshot = resolver.snapshot();
    assert!(snapshot.query.is_empty());
    assert!(!snapshot.open);
}

#[tokio::test]
async fn test_clearing_the_field_beats_a_lookup_already_in_flight() {
    let backend = Arc::new(
        ScriptedSearchBackend::new().with_delay("alice", Duration::from_millis(100)),
    );
    let resolver = DebouncedSearchResolver::start(backend.clone(), config(30));

    resolver.input("alice");
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(backend.query_log().len(), 1, "lookup is in flight");

    resolver.input("");
    let cleared = resolver.snapshot();
    assert!(cleared.results.is_empty());
    assert!(!cleared.loading);

    tokio::time::sleep(Duration::from_millis(150)).await;
    let after = resolver.snapshot();
    assert!(after.results.is_empty(), "late response stays discarded");
    assert!(!after.open);
}
