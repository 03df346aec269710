//! Paused-withdrawal management.
//!
//! The list shows withdrawals held for review. Approve releases the payout
//! and the row leaves the list optimistically; reject requires a
//! confirmation dialog with an optional reason.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::action::{
    ActionBackend, ActionDispatcher, ActionKind, ActionOutcome, ActionRequest, run_action,
};
use crate::api::{ApiClient, HttpActionBackend, HttpListBackend, ListRoute};
use crate::audit::AuditSink;
use crate::config::ConsoleConfig;
use crate::error::{ConsoleError, Result};
use crate::list::{ListBackend, RemoteListController};
use crate::notify::Notifier;
use crate::overlay::OverlayState;
use crate::query::FilterSet;
use crate::types::HasId;

const RESOURCE: &str = "withdrawals";
const AUDIT_CATEGORY: &str = "withdrawal";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WithdrawalStatus {
    Paused,
    Approved,
    Rejected,
}

enum_display!(
    WithdrawalStatus,
    {
        Paused => "paused",
        Approved => "approved",
        Rejected => "rejected",
    }
);

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Withdrawal {
    pub id: String,
    pub player_id: String,
    pub player_name: String,
    pub amount: f64,
    pub currency: String,
    pub status: WithdrawalStatus,
    pub requested_at: String,
}

impl HasId for Withdrawal {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Draft state for the reject dialog.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RejectDraft {
    pub reason: String,
}

pub struct WithdrawalsScreen {
    pub controller: RemoteListController<Withdrawal>,
    pub overlay: OverlayState<RejectDraft>,
    dispatcher: ActionDispatcher,
}

impl WithdrawalsScreen {
    pub fn new(
        client: &ApiClient,
        config: &ConsoleConfig,
        notifier: Arc<dyn Notifier>,
        audit: Arc<dyn AuditSink>,
    ) -> Self {
        Self::from_parts(
            Arc::new(HttpListBackend::new(
                client.clone(),
                ListRoute::Filtered(RESOURCE.to_string()),
            )),
            Arc::new(HttpActionBackend::new(client.clone())),
            notifier,
            audit,
            config.page_size,
        )
    }

    pub fn from_parts(
        list: Arc<dyn ListBackend<Withdrawal>>,
        actions: Arc<dyn ActionBackend>,
        notifier: Arc<dyn Notifier>,
        audit: Arc<dyn AuditSink>,
        page_size: u32,
    ) -> Self {
        Self {
            controller: RemoteListController::new(list, page_size),
            overlay: OverlayState::new(),
            dispatcher: ActionDispatcher::new(actions, notifier, audit),
        }
    }

    /// Initial fetch for the screen.
    pub async fn open(&self) -> Result<()> {
        self.controller.load().await
    }

    /// Show only withdrawals in the given status.
    pub async fn filter_by_status(&self, status: Option<WithdrawalStatus>) -> Result<()> {
        let mut filters = self.controller.filters();
        match status {
            Some(status) => filters.set("status", status.to_string()),
            None => filters.clear("status"),
        };
        self.controller.set_filters(filters).await
    }

    /// Release the payout. The row leaves the list without a reload.
    pub async fn approve(&mut self, id: &str) -> Result<ActionOutcome> {
        run_action(
            &self.dispatcher,
            &self.controller,
            &mut self.overlay,
            ActionRequest::new(ActionKind::Approve, RESOURCE, id),
            None,
            AUDIT_CATEGORY,
        )
        .await
    }

    /// Stage a rejection; the confirm dialog collects an optional reason.
    pub fn request_reject(&mut self, id: &str) {
        self.overlay.begin_confirmation(ActionKind::Reject, id);
    }

    /// The operator confirmed the staged rejection.
    pub async fn confirm_reject(&mut self) -> Result<ActionOutcome> {
        let pending = self
            .overlay
            .confirmation()
            .cloned()
            .ok_or_else(|| ConsoleError::Other("no rejection staged".to_string()))?;

        let reason = self.overlay.draft().reason.trim().to_string();
        let mut request = ActionRequest::new(pending.kind, RESOURCE, pending.target_id);
        if !reason.is_empty() {
            request = request.with_payload(serde_json::json!({ "reason": reason }));
        }

        run_action(
            &self.dispatcher,
            &self.controller,
            &mut self.overlay,
            request,
            None,
            AUDIT_CATEGORY,
        )
        .await
    }

    pub fn cancel_reject(&mut self) {
        self.overlay.cancel_confirmation();
    }

    pub fn is_action_in_flight(&self, kind: ActionKind, id: &str) -> bool {
        self.dispatcher.is_in_flight(kind, id)
    }
}

/// Convenience: the default filter for this screen shows paused rows only.
pub fn paused_only() -> FilterSet {
    let mut filters = FilterSet::new();
    filters.set("status", WithdrawalStatus::Paused.to_string());
    filters
}
