//! HTTP transport for the platform REST API.
//!
//! [`client::ApiClient`] owns the shared `reqwest` client, base URL, and
//! credential; the adapter types in [`adapters`] bind it to the component
//! seams ([`crate::list::ListBackend`], [`crate::search::SearchBackend`],
//! [`crate::action::ActionBackend`], [`crate::audit::AuditSink`]) for a
//! named resource route.

pub mod adapters;
pub mod client;
pub mod export;

pub use adapters::{
    HttpActionBackend, HttpAuditSink, HttpListBackend, HttpSearchBackend, ListRoute,
};
pub use client::ApiClient;
pub use export::{ExportDownload, ExportFormat, export_filename};
