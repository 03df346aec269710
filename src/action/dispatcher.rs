//! Action execution and list reconciliation.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use crate::action::{ActionKind, ActionOutcome, ActionRequest};
use crate::audit::{self, AuditEntry, AuditSink};
use crate::error::{ConsoleError, Result};
use crate::list::RemoteListController;
use crate::notify::Notifier;
use crate::overlay::{ModalKind, OverlayState};
use crate::types::HasId;

/// Executes one [`ActionRequest`] against the remote API.
///
/// Implementations map the failure envelope (`success: false` or a 4xx)
/// to [`ConsoleError::Validation`] so the operator sees the server's
/// wording.
#[async_trait]
pub trait ActionBackend: Send + Sync {
    async fn execute(&self, request: &ActionRequest) -> Result<ActionOutcome>;
}

/// Dispatches named operations and keeps per-target re-entrancy.
///
/// While a `(kind, target)` pair is in flight, a duplicate invocation for
/// the same pair is rejected; invocations for other targets proceed
/// concurrently.
pub struct ActionDispatcher {
    backend: Arc<dyn ActionBackend>,
    notifier: Arc<dyn Notifier>,
    audit: Arc<dyn AuditSink>,
    in_flight: Arc<DashMap<(ActionKind, String), ()>>,
}

impl ActionDispatcher {
    pub fn new(
        backend: Arc<dyn ActionBackend>,
        notifier: Arc<dyn Notifier>,
        audit: Arc<dyn AuditSink>,
    ) -> Self {
        Self {
            backend,
            notifier,
            audit,
            in_flight: Arc::new(DashMap::new()),
        }
    }

    /// Whether a dispatch for this kind and target is currently running.
    /// Callers disable the triggering button off this.
    pub fn is_in_flight(&self, kind: ActionKind, target_id: &str) -> bool {
        self.in_flight
            .contains_key(&(kind, target_id.to_string()))
    }

    /// Execute the request remotely. Holds the in-flight slot for the
    /// duration; duplicate invocations for the same `(kind, target)` get
    /// [`ConsoleError::DispatchInFlight`].
    pub async fn dispatch(&self, request: &ActionRequest) -> Result<ActionOutcome> {
        let _guard = self.begin(request)?;
        self.backend.execute(request).await
    }

    fn begin(&self, request: &ActionRequest) -> Result<InFlightGuard> {
        let key = (request.kind, request.target_id.clone());
        match self.in_flight.entry(key.clone()) {
            Entry::Occupied(_) => Err(ConsoleError::DispatchInFlight {
                kind: request.kind.to_string(),
                target: request.target_id.clone(),
            }),
            Entry::Vacant(vacant) => {
                vacant.insert(());
                Ok(InFlightGuard {
                    map: Arc::clone(&self.in_flight),
                    key,
                })
            }
        }
    }

    pub(crate) fn notify_success(&self, message: &str) {
        self.notifier.success(message);
    }

    pub(crate) fn notify_error(&self, message: &str) {
        self.notifier.error(message);
    }

    pub(crate) fn record_audit(&self, entry: AuditEntry) {
        audit::record_detached(Arc::clone(&self.audit), entry);
    }
}

/// Releases the in-flight slot when the dispatch resolves, success or not.
struct InFlightGuard {
    map: Arc<DashMap<(ActionKind, String), ()>>,
    key: (ActionKind, String),
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.map.remove(&self.key);
    }
}

/// Run one operator action end to end: dispatch remotely, reconcile the
/// owning list per the action's policy, clear the confirmation/modal tied
/// to it, then emit the toast and the activity-log write.
///
/// On failure everything is left as it was — list untouched, confirmation
/// dialog still up — so the operator can retry or cancel. The audit write
/// is fire-and-forget and cannot fail the already-committed action.
pub async fn run_action<T, D>(
    dispatcher: &ActionDispatcher,
    controller: &RemoteListController<T>,
    overlay: &mut OverlayState<D>,
    request: ActionRequest,
    patch: Option<Box<dyn FnOnce(&mut T) + Send>>,
    audit_category: &str,
) -> Result<ActionOutcome>
where
    T: HasId + Clone + Send + Sync + 'static,
    D: Default,
{
    let outcome = match dispatcher.dispatch(&request).await {
        Ok(outcome) => outcome,
        Err(e) => {
            dispatcher.notify_error(&e.user_message());
            return Err(e);
        }
    };

    controller
        .reconcile(request.kind.reconciliation(), &request.target_id, patch)
        .await;

    overlay.clear_confirmation();
    match request.kind {
        ActionKind::Create if overlay.is_modal_open(ModalKind::Create) => overlay.close_modal(),
        ActionKind::Update if overlay.is_modal_open(ModalKind::Edit) => overlay.close_modal(),
        _ => {}
    }

    let message = outcome
        .message
        .clone()
        .unwrap_or_else(|| format!("{} completed", request.kind));
    dispatcher.notify_success(&message);
    dispatcher.record_audit(AuditEntry::for_action(&request, audit_category));

    Ok(outcome)
}
