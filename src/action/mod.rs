//! Named state-changing operations and their list reconciliation.
//!
//! Every row-level button and modal submit in the console funnels into an
//! [`ActionRequest`] executed by the [`dispatcher::ActionDispatcher`]. The
//! action's kind determines how the owning screen's list is reconciled
//! after the server confirms the change.

pub mod dispatcher;

pub use dispatcher::{ActionBackend, ActionDispatcher, run_action};

use serde::{Deserialize, Serialize};

/// The closed set of operations the console can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Approve,
    Reject,
    Pause,
    Unpause,
    Send,
    Delete,
    Suspend,
    Unsuspend,
    Promote,
    Create,
    Update,
}

enum_display_fromstr!(
    ActionKind,
    crate::error::ConsoleError::invalid_action_kind,
    {
        Approve => "approve",
        Reject => "reject",
        Pause => "pause",
        Unpause => "unpause",
        Send => "send",
        Delete => "delete",
        Suspend => "suspend",
        Unsuspend => "unsuspend",
        Promote => "promote",
        Create => "create",
        Update => "update",
    }
);

/// How a successful action updates locally cached list state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcilePolicy {
    /// The item leaves the current page (approve, reject, delete).
    Remove,
    /// The item's fields change in place (status flips, updates).
    Patch,
    /// Aggregate counts shift; fetch the page again (create, send).
    Reload,
}

impl ActionKind {
    pub fn reconciliation(self) -> ReconcilePolicy {
        match self {
            Self::Approve | Self::Reject | Self::Delete => ReconcilePolicy::Remove,
            Self::Pause
            | Self::Unpause
            | Self::Suspend
            | Self::Unsuspend
            | Self::Promote
            | Self::Update => ReconcilePolicy::Patch,
            Self::Create | Self::Send => ReconcilePolicy::Reload,
        }
    }

    /// Destructive or irreversible kinds require a confirmation dialog
    /// before dispatch.
    pub fn requires_confirmation(self) -> bool {
        matches!(self, Self::Reject | Self::Delete | Self::Send)
    }
}

/// One operator-triggered operation against one target entity.
///
/// Created when the operator clicks a row action, consumed exactly once by
/// the dispatcher, discarded after resolution.
#[derive(Debug, Clone)]
pub struct ActionRequest {
    pub kind: ActionKind,
    /// Resource noun as the backend routes it, e.g. `withdrawals`.
    pub resource: String,
    pub target_id: String,
    /// Free-form extras such as a rejection reason or a full entity body.
    pub payload: Option<serde_json::Value>,
}

impl ActionRequest {
    pub fn new(kind: ActionKind, resource: impl Into<String>, target_id: impl Into<String>) -> Self {
        Self {
            kind,
            resource: resource.into(),
            target_id: target_id.into(),
            payload: None,
        }
    }

    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = Some(payload);
        self
    }
}

/// What the server reported back for a successful action.
#[derive(Debug, Clone, Default)]
pub struct ActionOutcome {
    pub message: Option<String>,
    pub data: Option<serde_json::Value>,
}
