#[macro_use]
pub mod macros;

pub mod action;
pub mod api;
pub mod audit;
pub mod config;
pub mod error;
pub mod list;
pub mod notify;
pub mod overlay;
pub mod query;
pub mod screens;
pub mod search;
pub mod types;

pub use action::{
    ActionBackend, ActionDispatcher, ActionKind, ActionOutcome, ActionRequest, ReconcilePolicy,
    run_action,
};
pub use api::{ApiClient, ExportDownload, ExportFormat, HttpListBackend, ListRoute};
pub use audit::{AuditEntry, AuditSink, Severity, record_detached};
pub use config::ConsoleConfig;
pub use error::{ConsoleError, Result};
pub use list::{ListBackend, ListSnapshot, RemoteListController};
pub use notify::Notifier;
pub use overlay::{ModalKind, OverlayState, PendingConfirmation};
pub use query::{FilterSet, FilterValue, Page, PageRequest, Segment, SortDirection, SortSpec};
pub use search::{DebouncedSearchResolver, SearchBackend, SearchSnapshot};
pub use types::HasId;
