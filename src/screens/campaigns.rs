//! Notification-campaign management.
//!
//! Campaigns target an audience segment and are sent through the
//! platform's delivery pipeline (delivery mechanics live server-side).
//! Send and delete are both confirmed; a successful send reloads the page
//! because aggregate counts shift, a successful delete removes the row.

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
use crate::overlay::{ModalKind, OverlayState};
use crate::query::Segment;
use crate::types::HasId;

const RESOURCE: &str = "campaigns";
const AUDIT_CATEGORY: &str = "campaign";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CampaignStatus {
    Draft,
    Scheduled,
    Sending,
    Sent,
    Paused,
}

enum_display!(
    CampaignStatus,
    {
        Draft => "draft",
        Scheduled => "scheduled",
        Sending => "sending",
        Sent => "sent",
        Paused => "paused",
    }
);

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Campaign {
    pub id: String,
    pub name: String,
    pub message: String,
    pub segment: Segment,
    pub status: CampaignStatus,
    pub created_at: String,
    #[serde(default)]
    pub sent_count: u64,
}

impl HasId for Campaign {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Draft state for the create/edit dialog.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CampaignDraft {
    pub name: String,
    pub message: String,
    pub segment: Option<Segment>,
}

impl CampaignDraft {
    /// Validate and render into the create/update payload.
    fn to_payload(&self) -> Result<serde_json::Value> {
        if self.name.trim().is_empty() {
            return Err(ConsoleError::Validation {
                message: "campaign name is required".to_string(),
            });
        }
        if self.message.trim().is_empty() {
            return Err(ConsoleError::Validation {
                message: "campaign message is required".to_string(),
            });
        }
        let segment = self.segment.as_ref().ok_or_else(|| ConsoleError::Validation {
            message: "an audience segment is required".to_string(),
        })?;
        segment.validate()?;

        Ok(serde_json::json!({
            "name": self.name.trim(),
            "message": self.message.trim(),
            "segment": segment,
        }))
    }
}

pub struct CampaignsScreen {
    pub controller: RemoteListController<Campaign>,
    pub overlay: OverlayState<CampaignDraft>,
    dispatcher: ActionDispatcher,
}

impl CampaignsScreen {
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
        list: Arc<dyn ListBackend<Campaign>>,
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

    pub async fn open(&self) -> Result<()> {
        self.controller.load().await
    }

    pub fn open_create_dialog(&mut self) {
        self.overlay.open_modal(ModalKind::Create);
    }

    /// Submit the create dialog. The segment is validated before any
    /// request leaves the console.
    pub async fn create_campaign(&mut self) -> Result<ActionOutcome> {
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

    pub fn request_send(&mut self, id: &str) {
        self.overlay.begin_confirmation(ActionKind::Send, id);
    }

    pub fn request_delete(&mut self, id: &str) {
        self.overlay.begin_confirmation(ActionKind::Delete, id);
    }

    /// The operator confirmed whatever is staged (send or delete).
    pub async fn confirm_pending(&mut self) -> Result<ActionOutcome> {
        let pending = self
            .overlay
            .confirmation()
            .cloned()
            .ok_or_else(|| ConsoleError::Other("nothing staged to confirm".to_string()))?;

        run_action(
            &self.dispatcher,
            &self.controller,
            &mut self.overlay,
            ActionRequest::new(pending.kind, RESOURCE, pending.target_id),
            None,
            AUDIT_CATEGORY,
        )
        .await
    }

    pub fn cancel_pending(&mut self) {
        self.overlay.cancel_confirmation();
    }

    /// Pause delivery for a scheduled or sending campaign. The row's
    /// status flips in place.
    pub async fn pause(&mut self, id: &str) -> Result<ActionOutcome> {
        run_action(
            &self.dispatcher,
            &self.controller,
            &mut self.overlay,
            ActionRequest::new(ActionKind::Pause, RESOURCE, id),
            Some(Box::new(|c: &mut Campaign| {
                c.status = CampaignStatus::Paused;
            })),
            AUDIT_CATEGORY,
        )
        .await
    }

    pub async fn unpause(&mut self, id: &str) -> Result<ActionOutcome> {
        run_action(
            &self.dispatcher,
            &self.controller,
            &mut self.overlay,
            ActionRequest::new(ActionKind::Unpause, RESOURCE, id),
            Some(Box::new(|c: &mut Campaign| {
                c.status = CampaignStatus::Scheduled;
            })),
            AUDIT_CATEGORY,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use pitboss_api::PageEnvelope;

    use crate::audit::NullAuditSink;
    use crate::notify::NoopNotifier;
    use crate::query::{Page, PageRequest};

    fn campaign(id: &str) -> Campaign {
        Campaign {
            id: id.to_string(),
            name: "Summer promo".to_string(),
            message: "Free spins await".to_string(),
            segment: Segment::AllUsers,
            status: CampaignStatus::Scheduled,
            created_at: "2026-07-01T00:00:00Z".to_string(),
            sent_count: 0,
        }
    }

    struct CountingList {
        rows: Vec<Campaign>,
        fetches: Mutex<u32>,
    }

    #[async_trait]
    impl ListBackend<Campaign> for CountingList {
        async fn fetch_page(&self, request: &PageRequest) -> Result<Page<Campaign>> {
            *self.fetches.lock() += 1;
            Ok(Page::from_envelope(
                PageEnvelope {
                    items: self.rows.clone(),
                    total: self.rows.len() as u64,
                    page: request.page,
                    total_pages: None,
                },
                request.per_page,
            ))
        }
    }

    struct OkActions;

    #[async_trait]
    impl ActionBackend for OkActions {
        async fn execute(&self, _request: &ActionRequest) -> Result<ActionOutcome> {
            Ok(ActionOutcome::default())
        }
    }

    fn screen(rows: Vec<Campaign>) -> (CampaignsScreen, Arc<CountingList>) {
        let list = Arc::new(CountingList {
            rows,
            fetches: Mutex::new(0),
        });
        let screen = CampaignsScreen::from_parts(
            list.clone(),
            Arc::new(OkActions),
            Arc::new(NoopNotifier),
            Arc::new(NullAuditSink),
            25,
        );
        (screen, list)
    }

    #[tokio::test]
    async fn test_create_requires_valid_segment() {
        let (mut screen, _list) = screen(vec![]);
        screen.open_create_dialog();
        screen.overlay.replace_draft(CampaignDraft {
            name: "Promo".to_string(),
            message: "Hello".to_string(),
            segment: None,
        });

        let err = screen.create_campaign().await.unwrap_err();
        assert!(err.user_message().contains("segment"));
    }

    #[tokio::test]
    async fn test_create_reloads_and_closes_dialog() {
        let (mut screen, list) = screen(vec![campaign("C1")]);
        screen.open().await.unwrap();
        assert_eq!(*list.fetches.lock(), 1);

        screen.open_create_dialog();
        screen.overlay.replace_draft(CampaignDraft {
            name: "Promo".to_string(),
            message: "Hello".to_string(),
            segment: Some(Segment::AllUsers),
        });
        screen.create_campaign().await.unwrap();

        assert_eq!(*list.fetches.lock(), 2, "create triggers a reload");
        assert!(screen.overlay.open_modal_kind().is_none());
        assert_eq!(screen.overlay.draft(), &CampaignDraft::default());
    }

    #[tokio::test]
    async fn test_delete_removes_row_without_reload() {
        let (mut screen, list) = screen(vec![campaign("C9"), campaign("C10")]);
        screen.open().await.unwrap();

        screen.request_delete("C9");
        screen.confirm_pending().await.unwrap();

        assert_eq!(*list.fetches.lock(), 1, "no reload for delete");
        let snapshot = screen.controller.snapshot();
        assert!(snapshot.page.items.iter().all(|c| c.id != "C9"));
        assert_eq!(snapshot.page.total_count, 1);
    }

    #[tokio::test]
    async fn test_send_reloads_page() {
        let (mut screen, list) = screen(vec![campaign("C1")]);
        screen.open().await.unwrap();

        screen.request_send("C1");
        screen.confirm_pending().await.unwrap();

        assert_eq!(*list.fetches.lock(), 2, "send refreshes aggregates");
        assert!(screen.overlay.confirmation().is_none());
    }

    #[tokio::test]
    async fn test_pause_patches_status_in_place() {
        let (mut screen, list) = screen(vec![campaign("C1")]);
        screen.open().await.unwrap();

        screen.pause("C1").await.unwrap();

        assert_eq!(*list.fetches.lock(), 1, "patch does not reload");
        assert_eq!(
            screen.controller.snapshot().page.items[0].status,
            CampaignStatus::Paused
        );
    }

    #[test]
    fn test_draft_payload_shape() {
        let draft = CampaignDraft {
            name: "  Promo  ".to_string(),
            message: "Hello".to_string(),
            segment: Some(Segment::AllUsers),
        };
        let payload = draft.to_payload().unwrap();
        assert_eq!(payload["name"], "Promo");
        assert_eq!(payload["segment"]["segment_type"], "all_users");
    }

    #[test]
    fn test_draft_rejects_invalid_segment() {
        let draft = CampaignDraft {
            name: "Promo".to_string(),
            message: "Hello".to_string(),
            segment: Some(Segment::PlayerList { player_ids: vec![] }),
        };
        assert!(draft.to_payload().is_err());
    }
}
