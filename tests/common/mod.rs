//! Shared fixtures and mock backends for integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use pitboss_api::PageEnvelope;

use pitboss::action::{ActionBackend, ActionOutcome, ActionRequest};
use pitboss::audit::{AuditEntry, AuditSink};
use pitboss::error::{ConsoleError, Result};
use pitboss::list::ListBackend;
use pitboss::notify::Notifier;
use pitboss::query::{Page, PageRequest};
use pitboss::search::SearchBackend;
use pitboss::types::HasId;

/// Minimal list row used across the suites.
#[derive(Debug, Clone, PartialEq)]
pub struct TestRow {
    pub id: String,
    pub label: String,
    pub status: String,
}

impl HasId for TestRow {
    fn id(&self) -> &str {
        &self.id
    }
}

pub fn row(id: &str) -> TestRow {
    TestRow {
        id: id.to_string(),
        label: format!("row {id}"),
        status: "paused".to_string(),
    }
}

/// Rows tagged with the page they came from, so tests can tell which
/// response ended up displayed.
pub fn rows_for_page(page: u32, count: usize) -> Vec<TestRow> {
    (0..count)
        .map(|i| TestRow {
            id: format!("p{page}-{i}"),
            label: format!("page {page} row {i}"),
            status: "paused".to_string(),
        })
        .collect()
}

/// List backend with a programmable per-page delay and a request log.
pub struct ScriptedListBackend {
    pub total: u64,
    pub page_rows: usize,
    pub delays: HashMap<u32, Duration>,
    pub requests: Mutex<Vec<PageRequest>>,
}

impl ScriptedListBackend {
    pub fn new(total: u64, page_rows: usize) -> Self {
        Self {
            total,
            page_rows,
            delays: HashMap::new(),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn with_delay(mut self, page: u32, delay: Duration) -> Self {
        self.delays.insert(page, delay);
        self
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }
}

#[async_trait]
impl ListBackend<TestRow> for ScriptedListBackend {
    async fn fetch_page(&self, request: &PageRequest) -> Result<Page<TestRow>> {
        self.requests.lock().push(request.clone());
        if let Some(delay) = self.delays.get(&request.page) {
            tokio::time::sleep(*delay).await;
        }
        Ok(Page::from_envelope(
            PageEnvelope {
                items: rows_for_page(request.page, self.page_rows),
                total: self.total,
                page: request.page,
                total_pages: None,
            },
            request.per_page,
        ))
    }
}

/// Action backend with scripted outcomes and a request log.
pub struct ScriptedActionBackend {
    pub fail_with: Option<String>,
    pub delay: Duration,
    pub requests: Mutex<Vec<ActionRequest>>,
}

impl ScriptedActionBackend {
    pub fn ok() -> Self {
        Self {
            fail_with: None,
            delay: Duration::ZERO,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            fail_with: Some(message.to_string()),
            delay: Duration::ZERO,
            requests: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl ActionBackend for ScriptedActionBackend {
    async fn execute(&self, request: &ActionRequest) -> Result<ActionOutcome> {
        self.requests.lock().push(request.clone());
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        match &self.fail_with {
            Some(message) => Err(ConsoleError::Validation {
                message: message.clone(),
            }),
            None => Ok(ActionOutcome {
                message: None,
                data: None,
            }),
        }
    }
}

/// Notifier that records every toast.
#[derive(Default)]
pub struct RecordingNotifier {
    pub successes: Mutex<Vec<String>>,
    pub errors: Mutex<Vec<String>>,
}

impl Notifier for RecordingNotifier {
    fn success(&self, message: &str) {
        self.successes.lock().push(message.to_string());
    }

    fn error(&self, message: &str) {
        self.errors.lock().push(message.to_string());
    }
}

/// Audit sink that records entries.
#[derive(Default)]
pub struct RecordingAuditSink {
    pub entries: Mutex<Vec<AuditEntry>>,
}

#[async_trait]
impl AuditSink for RecordingAuditSink {
    async fn record(&self, entry: AuditEntry) -> Result<()> {
        self.entries.lock().push(entry);
        Ok(())
    }
}

/// Audit sink that always fails, for fire-and-forget verification.
pub struct FailingAuditSink;

#[async_trait]
impl AuditSink for FailingAuditSink {
    async fn record(&self, _entry: AuditEntry) -> Result<()> {
        Err(ConsoleError::Api("audit sink unreachable".to_string()))
    }
}

/// Search backend with per-query delays, returning one candidate per query.
pub struct ScriptedSearchBackend {
    pub delays: HashMap<String, Duration>,
    pub queries: Mutex<Vec<String>>,
}

impl ScriptedSearchBackend {
    pub fn new() -> Self {
        Self {
            delays: HashMap::new(),
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn with_delay(mut self, query: &str, delay: Duration) -> Self {
        self.delays.insert(query.to_string(), delay);
        self
    }

    pub fn query_log(&self) -> Vec<String> {
        self.queries.lock().clone()
    }
}

#[async_trait]
impl SearchBackend<TestRow> for ScriptedSearchBackend {
    async fn lookup(&self, query: &str) -> Result<Vec<TestRow>> {
        self.queries.lock().push(query.to_string());
        if let Some(delay) = self.delays.get(query) {
            tokio::time::sleep(*delay).await;
        }
        Ok(vec![TestRow {
            id: format!("match-{query}"),
            label: query.to_string(),
            status: "active".to_string(),
        }])
    }
}

/// Recording collaborators for dispatcher-driven tests.
pub struct Harness {
    pub notifier: Arc<RecordingNotifier>,
    pub audit: Arc<RecordingAuditSink>,
}

impl Harness {
    pub fn new() -> Self {
        Self {
            notifier: Arc::new(RecordingNotifier::default()),
            audit: Arc::new(RecordingAuditSink::default()),
        }
    }
}
