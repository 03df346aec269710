//! End-to-end action flows: dispatch, reconciliation, confirmation
//! lifecycle, and the fire-and-forget audit write.

mod common;

use std::sync::Arc;
use std::time::Duration;

use pitboss::action::{ActionDispatcher, ActionKind, ActionRequest, run_action};
use pitboss::error::ConsoleError;
use pitboss::list::RemoteListController;
use pitboss::overlay::OverlayState;

use common::{
    FailingAuditSink, Harness, RecordingNotifier, ScriptedActionBackend, ScriptedListBackend,
    TestRow,
};

#[derive(Debug, Clone, Default, PartialEq)]
struct NoDraft;

async fn loaded_controller(
    backend: Arc<ScriptedListBackend>,
) -> RemoteListController<TestRow> {
    let controller = RemoteListController::new(backend, 25);
    controller.load().await.unwrap();
    controller
}

#[tokio::test]
async fn test_approve_removes_item_and_decrements_total_without_reload() {
    let list = Arc::new(ScriptedListBackend::new(3, 3));
    let controller = loaded_controller(list.clone()).await;
    let harness = Harness::new();
    let dispatcher = ActionDispatcher::new(
        Arc::new(ScriptedActionBackend::ok()),
        harness.notifier.clone(),
        harness.audit.clone(),
    );
    let mut overlay: OverlayState<NoDraft> = OverlayState::new();

    let target = controller.snapshot().page.items[0].id.clone();
    run_action(
        &dispatcher,
        &controller,
        &mut overlay,
        ActionRequest::new(ActionKind::Approve, "withdrawals", &target),
        None,
        "withdrawal",
    )
    .await
    .unwrap();

    let snapshot = controller.snapshot();
    assert!(snapshot.page.items.iter().all(|r| r.id != target));
    assert_eq!(snapshot.page.total_count, 2);
    assert_eq!(list.request_count(), 1, "no page reload was triggered");

    assert_eq!(
        harness.notifier.successes.lock().clone(),
        vec!["approve completed".to_string()]
    );

    // The audit write is detached; give it a beat to land.
    tokio::time::sleep(Duration::from_millis(30)).await;
    let entries = harness.audit.entries.lock();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].action, "approve");
    assert_eq!(entries[0].resource_id, target);
}

#[tokio::test]
async fn test_failed_delete_keeps_list_and_confirmation_dialog() {
    let list = Arc::new(ScriptedListBackend::new(2, 2));
    let controller = loaded_controller(list.clone()).await;
    let harness = Harness::new();
    let dispatcher = ActionDispatcher::new(
        Arc::new(ScriptedActionBackend::failing("locked")),
        harness.notifier.clone(),
        harness.audit.clone(),
    );
    let mut overlay: OverlayState<NoDraft> = OverlayState::new();

    overlay.begin_confirmation(ActionKind::Delete, "p1-0");
    let err = run_action(
        &dispatcher,
        &controller,
        &mut overlay,
        ActionRequest::new(ActionKind::Delete, "campaigns", "p1-0"),
        None,
        "campaign",
    )
    .await
    .unwrap_err();

    assert_eq!(err.user_message(), "locked");
    assert_eq!(
        harness.notifier.errors.lock().clone(),
        vec!["locked".to_string()]
    );

    let snapshot = controller.snapshot();
    assert_eq!(snapshot.page.items.len(), 2, "list unchanged");
    assert_eq!(snapshot.page.total_count, 2);
    assert!(
        overlay.confirmation().is_some(),
        "dialog stays open for retry or cancel"
    );

    tokio::time::sleep(Duration::from_millis(30)).await;
    assert!(harness.audit.entries.lock().is_empty(), "no audit on failure");
}

#[tokio::test]
async fn test_audit_sink_failure_never_fails_the_action() {
    let list = Arc::new(ScriptedListBackend::new(1, 1));
    let controller = loaded_controller(list.clone()).await;
    let notifier = Arc::new(RecordingNotifier::default());
    let dispatcher = ActionDispatcher::new(
        Arc::new(ScriptedActionBackend::ok()),
        notifier.clone(),
        Arc::new(FailingAuditSink),
    );
    let mut overlay: OverlayState<NoDraft> = OverlayState::new();

    let outcome = run_action(
        &dispatcher,
        &controller,
        &mut overlay,
        ActionRequest::new(ActionKind::Approve, "withdrawals", "p1-0"),
        None,
        "withdrawal",
    )
    .await;

    assert!(outcome.is_ok(), "sink failure must not surface");
    tokio::time::sleep(Duration::from_millis(30)).await;
    assert_eq!(notifier.successes.lock().len(), 1);
    assert!(notifier.errors.lock().is_empty());
}

#[tokio::test]
async fn test_duplicate_invocation_rejected_while_dispatching() {
    let mut backend = ScriptedActionBackend::ok();
    backend.delay = Duration::from_millis(80);
    let harness = Harness::new();
    let dispatcher = Arc::new(ActionDispatcher::new(
        Arc::new(backend),
        harness.notifier.clone(),
        harness.audit.clone(),
    ));

    let first = {
        let dispatcher = Arc::clone(&dispatcher);
        tokio::spawn(async move {
            dispatcher
                .dispatch(&ActionRequest::new(ActionKind::Send, "campaigns", "C1"))
                .await
        })
    };
    tokio::time::sleep(Duration::from_millis(20)).await;

    let duplicate = dispatcher
        .dispatch(&ActionRequest::new(ActionKind::Send, "campaigns", "C1"))
        .await;
    assert!(matches!(
        duplicate,
        Err(ConsoleError::DispatchInFlight { .. })
    ));

    // A different campaign sends concurrently without issue.
    let other = dispatcher
        .dispatch(&ActionRequest::new(ActionKind::Send, "campaigns", "C2"))
        .await;
    assert!(other.is_ok());

    first.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_patch_reconciliation_updates_row_in_place() {
    let list = Arc::new(ScriptedListBackend::new(2, 2));
    let controller = loaded_controller(list.clone()).await;
    let harness = Harness::new();
    let dispatcher = ActionDispatcher::new(
        Arc::new(ScriptedActionBackend::ok()),
        harness.notifier.clone(),
        harness.audit.clone(),
    );
    let mut overlay: OverlayState<NoDraft> = OverlayState::new();

    run_action(
        &dispatcher,
        &controller,
        &mut overlay,
        ActionRequest::new(ActionKind::Suspend, "admin-users", "p1-1"),
        Some(Box::new(|row: &mut TestRow| {
            row.status = "suspended".to_string();
        })),
        "security",
    )
    .await
    .unwrap();

    let snapshot = controller.snapshot();
    let patched = snapshot.page.items.iter().find(|r| r.id == "p1-1").unwrap();
    assert_eq!(patched.status, "suspended");
    assert_eq!(snapshot.page.total_count, 2, "patch keeps the row counted");
    assert_eq!(list.request_count(), 1);
}

#[tokio::test]
async fn test_patch_for_vanished_row_is_silent_noop() {
    let list = Arc::new(ScriptedListBackend::new(1, 1));
    let controller = loaded_controller(list.clone()).await;
    let harness = Harness::new();
    let dispatcher = ActionDispatcher::new(
        Arc::new(ScriptedActionBackend::ok()),
        harness.notifier.clone(),
        harness.audit.clone(),
    );
    let mut overlay: OverlayState<NoDraft> = OverlayState::new();

    // The action succeeds server-side for a row that already left this page.
    let outcome = run_action(
        &dispatcher,
        &controller,
        &mut overlay,
        ActionRequest::new(ActionKind::Unsuspend, "admin-users", "gone-row"),
        Some(Box::new(|row: &mut TestRow| {
            row.status = "active".to_string();
        })),
        "security",
    )
    .await;

    assert!(outcome.is_ok());
    assert_eq!(controller.snapshot().page.items.len(), 1);
}

#[tokio::test]
async fn test_reload_reconciliation_fetches_again() {
    let list = Arc::new(ScriptedListBackend::new(5, 5));
    let controller = loaded_controller(list.clone()).await;
    let harness = Harness::new();
    let dispatcher = ActionDispatcher::new(
        Arc::new(ScriptedActionBackend::ok()),
        harness.notifier.clone(),
        harness.audit.clone(),
    );
    let mut overlay: OverlayState<NoDraft> = OverlayState::new();

    run_action(
        &dispatcher,
        &controller,
        &mut overlay,
        ActionRequest::new(ActionKind::Send, "campaigns", "p1-0"),
        None,
        "campaign",
    )
    .await
    .unwrap();

    assert_eq!(list.request_count(), 2, "send refreshes the page");
}
