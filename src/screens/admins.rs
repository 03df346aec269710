//! Admin-user security management.
//!
//! Suspend/unsuspend/promote flip account state in place; the user picker
//! is a debounced search against the admin directory, and the recorded
//! pick narrows the list to that user's rows.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::action::{
    ActionBackend, ActionDispatcher, ActionKind, ActionOutcome, ActionRequest, run_action,
};
use crate::api::{ApiClient, HttpActionBackend, HttpListBackend, HttpSearchBackend, ListRoute};
use crate::audit::AuditSink;
use crate::config::ConsoleConfig;
use crate::error::{ConsoleError, Result};
use crate::list::{ListBackend, RemoteListController};
use crate::notify::Notifier;
use crate::overlay::{ModalKind, OverlayState};
use crate::search::{DebouncedSearchResolver, SearchBackend};
use crate::types::HasId;

const RESOURCE: &str = "admin-users";
const SEARCH_RESOURCE: &str = "admin-users/search";
const AUDIT_CATEGORY: &str = "security";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdminRole {
    Support,
    Manager,
    SuperAdmin,
}

enum_display!(
    AdminRole,
    {
        Support => "support",
        Manager => "manager",
        SuperAdmin => "super_admin",
    }
);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdminStatus {
    Active,
    Suspended,
}

enum_display!(
    AdminStatus,
    {
        Active => "active",
        Suspended => "suspended",
    }
);

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AdminUser {
    pub id: String,
    pub username: String,
    pub email: String,
    pub role: AdminRole,
    pub status: AdminStatus,
    #[serde(default)]
    pub last_login_at: Option<String>,
}

impl HasId for AdminUser {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Draft state for the create-admin dialog.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdminDraft {
    pub username: String,
    pub email: String,
    pub role: Option<AdminRole>,
}

impl AdminDraft {
    fn to_payload(&self) -> Result<serde_json::Value> {
        if self.username.trim().is_empty() {
            return Err(ConsoleError::Validation {
                message: "username is required".to_string(),
            });
        }
        if !self.email.contains('@') {
            return Err(ConsoleError::Validation {
                message: "a valid email is required".to_string(),
            });
        }
        let role = self.role.ok_or_else(|| ConsoleError::Validation {
            message: "a role is required".to_string(),
        })?;
        Ok(serde_json::json!({
            "username": self.username.trim(),
            "email": self.email.trim(),
            "role": role,
        }))
    }
}

pub struct AdminsScreen {
    pub controller: RemoteListController<AdminUser>,
    pub overlay: OverlayState<AdminDraft>,
    pub picker: DebouncedSearchResolver<AdminUser>,
    dispatcher: ActionDispatcher,
}

impl AdminsScreen {
    pub fn new(
        client: &ApiClient,
        config: &ConsoleConfig,
        notifier: Arc<dyn Notifier>,
        audit: Arc<dyn AuditSink>,
    ) -> Self {
        Self::from_parts(
            Arc::new(HttpListBackend::new(
                client.clone(),
                ListRoute::Query(RESOURCE.to_string()),
            )),
            Arc::new(HttpSearchBackend::new(client.clone(), SEARCH_RESOURCE)),
            Arc::new(HttpActionBackend::new(client.clone())),
            notifier,
            audit,
            config,
        )
    }

    pub fn from_parts(
        list: Arc<dyn ListBackend<AdminUser>>,
        search: Arc<dyn SearchBackend<AdminUser>>,
        actions: Arc<dyn ActionBackend>,
        notifier: Arc<dyn Notifier>,
        audit: Arc<dyn AuditSink>,
        config: &ConsoleConfig,
    ) -> Self {
        Self {
            controller: RemoteListController::new(list, config.page_size),
            overlay: OverlayState::new(),
            picker: DebouncedSearchResolver::start(search, config.search.clone()),
            dispatcher: ActionDispatcher::new(actions, notifier, audit),
        }
    }

    pub async fn open(&self) -> Result<()> {
        self.controller.load().await
    }

    /// Apply the picker's recorded selection as the list filter, or clear
    /// it when the selection was removed.
    pub async fn apply_picker_selection(&self) -> Result<()> {
        let mut filters = self.controller.filters();
        match self.picker.selection() {
            Some(user) => filters.set("user_id", user.id.clone()),
            None => filters.clear("user_id"),
        };
        self.controller.set_filters(filters).await
    }

    pub fn open_create_dialog(&mut self) {
        self.overlay.open_modal(ModalKind::Create);
    }

    pub async fn create_admin(&mut self) -> Result<ActionOutcome> {
        let payload = self.overlay.draft().to_payload()?;
        run_action(
            &self.dispatcher,
            &self.controller,
            &mut self.overlay,
            ActionRequest::new(ActionKind::Create, RESOURCE, "").with_payload(payload),
            None,
            AUDIT_CATEGORY,
        )
        .await
    }

    /// Lock the account. The row's status flips in place.
    pub async fn suspend(&mut self, id: &str) -> Result<ActionOutcome> {
        run_action(
            &self.dispatcher,
            &self.controller,
            &mut self.overlay,
            ActionRequest::new(ActionKind::Suspend, RESOURCE, id),
            Some(Box::new(|u: &mut AdminUser| {
                u.status = AdminStatus::Suspended;
            })),
            AUDIT_CATEGORY,
        )
        .await
    }

    pub async fn unsuspend(&mut self, id: &str) -> Result<ActionOutcome> {
        run_action(
            &self.dispatcher,
            &self.controller,
            &mut self.overlay,
            ActionRequest::new(ActionKind::Unsuspend, RESOURCE, id),
            Some(Box::new(|u: &mut AdminUser| {
                u.status = AdminStatus::Active;
            })),
            AUDIT_CATEGORY,
        )
        .await
    }

    /// Raise the account to a higher role.
    pub async fn promote(&mut self, id: &str, role: AdminRole) -> Result<ActionOutcome> {
        run_action(
            &self.dispatcher,
            &self.controller,
            &mut self.overlay,
            ActionRequest::new(ActionKind::Promote, RESOURCE, id)
                .with_payload(serde_json::json!({ "role": role })),
            Some(Box::new(move |u: &mut AdminUser| {
                u.role = role;
            })),
            AUDIT_CATEGORY,
        )
        .await
    }

    /// Tear down the picker's background task when the screen goes away.
    pub fn close(&self) {
        self.picker.dispose();
    }
}
