//! Debounced search-as-you-type against a remote lookup endpoint.
//!
//! The resolver runs as an owned background task fed by an input channel.
//! Keystrokes restart a quiet window; only when the window elapses does a
//! lookup fire. Each lookup carries a monotonically increasing epoch, and
//! a response is published only while its epoch is still the latest — an
//! out-of-order completion for an older query resolves into silence
//! instead of overwriting newer results.

pub mod backend;

pub use backend::SearchBackend;

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::config::SearchConfig;

/// Point-in-time view of the search field for rendering.
#[derive(Debug, Clone)]
pub struct SearchSnapshot<T> {
    /// Raw text as typed (not trimmed).
    pub query: String,
    /// Most recent published results.
    pub results: Vec<T>,
    /// A lookup is in flight.
    pub loading: bool,
    /// The results list is visible.
    pub open: bool,
    /// The recorded pick, if the operator selected a result.
    pub selection: Option<T>,
}

impl<T> Default for SearchSnapshot<T> {
    fn default() -> Self {
        Self {
            query: String::new(),
            results: Vec::new(),
            loading: false,
            open: false,
            selection: None,
        }
    }
}

enum InputEvent {
    Changed(String),
    /// Drop any pending debounce window (the input was cleared or a
    /// selection was made).
    Cancel,
}

struct SearchShared<T> {
    snapshot: Mutex<SearchSnapshot<T>>,
    epoch: AtomicU64,
}

/// Debounced remote lookup bound to one text input.
///
/// Owns its background task: [`DebouncedSearchResolver::start`] spawns it,
/// [`DebouncedSearchResolver::dispose`] (or drop) tears it down.
pub struct DebouncedSearchResolver<T> {
    shared: Arc<SearchShared<T>>,
    tx: mpsc::UnboundedSender<InputEvent>,
    task: JoinHandle<()>,
}

impl<T: Clone + Send + Sync + 'static> DebouncedSearchResolver<T> {
    /// Spawn the debounce loop for the given backend.
    pub fn start(backend: Arc<dyn SearchBackend<T>>, config: SearchConfig) -> Self {
        let shared = Arc::new(SearchShared {
            snapshot: Mutex::new(SearchSnapshot::default()),
            epoch: AtomicU64::new(0),
        });
        let (tx, rx) = mpsc::unbounded_channel();

        let task = tokio::spawn(run_loop(Arc::clone(&shared), backend, config, rx));

        Self { shared, tx, task }
    }

    /// Feed a keystroke's worth of input.
    ///
    /// Clearing to empty takes effect immediately: results vanish without
    /// waiting out the debounce window and any in-flight lookup is
    /// invalidated.
    pub fn input(&self, text: &str) {
        {
            let mut snap = self.shared.snapshot.lock();
            snap.query = text.to_string();
        }

        if text.trim().is_empty() {
            self.invalidate_and_clear();
            let _ = self.tx.send(InputEvent::Cancel);
        } else {
            let _ = self.tx.send(InputEvent::Changed(text.to_string()));
        }
    }

    /// The input regained focus. Cached results from the previous lookup
    /// are re-shown without re-querying, as long as no selection has been
    /// recorded since.
    pub fn focus(&self) {
        let mut snap = self.shared.snapshot.lock();
        if snap.selection.is_none() && !snap.results.is_empty() {
            snap.open = true;
        }
    }

    /// Hide the results list (blur / outside interaction). The cache is
    /// kept for the next focus.
    pub fn dismiss(&self) {
        self.shared.snapshot.lock().open = false;
    }

    /// Record a picked result: clears the query text, stores the pick for
    /// the screen to read into its filter, and closes the list.
    pub fn select(&self, item: T) {
        {
            let mut snap = self.shared.snapshot.lock();
            snap.selection = Some(item);
            snap.query.clear();
            snap.results = Vec::new();
            snap.open = false;
            snap.loading = false;
        }
        self.shared.epoch.fetch_add(1, Ordering::SeqCst);
        let _ = self.tx.send(InputEvent::Cancel);
    }

    pub fn selection(&self) -> Option<T> {
        self.shared.snapshot.lock().selection.clone()
    }

    /// Unset the recorded pick (the operator removed the filter chip).
    pub fn clear_selection(&self) {
        self.shared.snapshot.lock().selection = None;
    }

    pub fn snapshot(&self) -> SearchSnapshot<T> {
        self.shared.snapshot.lock().clone()
    }

    pub fn is_loading(&self) -> bool {
        self.shared.snapshot.lock().loading
    }

    /// Stop the background task. Further input is ignored.
    pub fn dispose(&self) {
        self.task.abort();
    }

    fn invalidate_and_clear(&self) {
        self.shared.epoch.fetch_add(1, Ordering::SeqCst);
        let mut snap = self.shared.snapshot.lock();
        snap.results = Vec::new();
        snap.loading = false;
        snap.open = false;
    }
}

impl<T> Drop for DebouncedSearchResolver<T> {
    fn drop(&mut self) {
        self.task.abort();
    }
}

struct PendingQuery {
    query: String,
    deadline: Instant,
}

async fn run_loop<T: Clone + Send + Sync + 'static>(
    shared: Arc<SearchShared<T>>,
    backend: Arc<dyn SearchBackend<T>>,
    config: SearchConfig,
    mut rx: mpsc::UnboundedReceiver<InputEvent>,
) {
    let window = Duration::from_millis(config.debounce_ms);
    let mut pending: Option<PendingQuery> = None;

    loop {
        // Wait for the next keystroke, or for the quiet window to elapse
        // when one is running.
        let event = if let Some(deadline) = pending.as_ref().map(|p| p.deadline) {
            tokio::select! {
                event = rx.recv() => event,
                _ = tokio::time::sleep_until(deadline) => {
                    if let Some(p) = pending.take() {
                        issue_lookup(&shared, &backend, p.query);
                    }
                    continue;
                }
            }
        } else {
            rx.recv().await
        };

        let Some(event) = event else {
            // Channel closed — the resolver was disposed.
            break;
        };

        match event {
            InputEvent::Changed(text) => {
                let trimmed = text.trim();
                if trimmed.chars().count() >= config.min_query_len {
                    pending = Some(PendingQuery {
                        query: trimmed.to_string(),
                        deadline: Instant::now() + window,
                    });
                } else {
                    // Too short to query; close the list but keep any
                    // cached results for a later refocus.
                    pending = None;
                    let mut snap = shared.snapshot.lock();
                    snap.open = false;
                    snap.loading = false;
                }
            }
            InputEvent::Cancel => pending = None,
        }
    }
}

/// Fire one lookup, tagged with the next epoch. Runs detached so the
/// debounce loop keeps consuming keystrokes while the request is out.
fn issue_lookup<T: Clone + Send + Sync + 'static>(
    shared: &Arc<SearchShared<T>>,
    backend: &Arc<dyn SearchBackend<T>>,
    query: String,
) {
    let epoch = shared.epoch.fetch_add(1, Ordering::SeqCst) + 1;
    shared.snapshot.lock().loading = true;

    let shared = Arc::clone(shared);
    let backend = Arc::clone(backend);
    tokio::spawn(async move {
        let outcome = backend.lookup(&query).await;

        let mut snap = shared.snapshot.lock();
        if shared.epoch.load(Ordering::SeqCst) != epoch {
            tracing::debug!(epoch, %query, "dropping stale search response");
            return;
        }
        snap.loading = false;
        match outcome {
            Ok(results) => {
                snap.results = results;
                snap.open = true;
            }
            Err(e) => {
                // Search is advisory; show "no results" rather than an
                // error banner.
                tracing::warn!(%query, error = %e, "search lookup failed");
                snap.results = Vec::new();
                snap.open = true;
            }
        }
    });
}
