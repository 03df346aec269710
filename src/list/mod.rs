//! Paginated remote list ownership.
//!
//! A [`RemoteListController`] owns one screen's slice of a server-side
//! collection: the current page, the merged query parameters (page index,
//! sort, filters), and the loading/error flags the table renders from.
//! Handles are cheap clones over shared state, so a suspended load never
//! blocks the event loop or other interactions.

pub mod backend;

pub use backend::ListBackend;

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;

use crate::action::ReconcilePolicy;
use crate::error::{ConsoleError, Result};
use crate::query::{FilterSet, Page, PageRequest, SortSpec};
use crate::types::HasId;

/// Point-in-time view of a controller for rendering.
#[derive(Debug, Clone)]
pub struct ListSnapshot<T> {
    pub page: Page<T>,
    pub loading: bool,
    pub error: Option<String>,
}

struct ListState<T> {
    page: Page<T>,
    page_index: u32,
    sort: Option<SortSpec<String>>,
    filters: FilterSet,
    loading: bool,
    error: Option<String>,
}

struct ListInner<T> {
    backend: Arc<dyn ListBackend<T>>,
    page_size: u32,
    /// Monotonic tag for issued loads. Only the response carrying the
    /// latest tag may commit; earlier responses resolve into silence.
    epoch: AtomicU64,
    state: Mutex<ListState<T>>,
}

/// Controller for one paginated, filtered, sortable remote collection.
pub struct RemoteListController<T> {
    inner: Arc<ListInner<T>>,
}

impl<T> Clone for RemoteListController<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Clone + Send + Sync + 'static> RemoteListController<T> {
    pub fn new(backend: Arc<dyn ListBackend<T>>, page_size: u32) -> Self {
        Self {
            inner: Arc::new(ListInner {
                backend,
                page_size,
                epoch: AtomicU64::new(0),
                state: Mutex::new(ListState {
                    page: Page::empty(page_size),
                    page_index: 1,
                    sort: None,
                    filters: FilterSet::new(),
                    loading: false,
                    error: None,
                }),
            }),
        }
    }

    /// Fetch the page described by the current query parameters.
    ///
    /// Out-of-order completions are resolved by issuance order: when a
    /// newer load has been issued meanwhile, this one's response is
    /// dropped without touching state. On failure the previous page stays
    /// visible and only the error message changes.
    pub async fn load(&self) -> Result<()> {
        let epoch = self.inner.epoch.fetch_add(1, Ordering::SeqCst) + 1;

        let request = {
            let mut state = self.inner.state.lock();
            state.loading = true;
            PageRequest {
                page: state.page_index,
                per_page: self.inner.page_size,
                sort: state.sort.clone(),
                filters: state.filters.clone(),
            }
        };

        let outcome = self.inner.backend.fetch_page(&request).await;

        let mut state = self.inner.state.lock();
        if self.inner.epoch.load(Ordering::SeqCst) != epoch {
            tracing::debug!(epoch, "dropping stale list response");
            return Ok(());
        }
        state.loading = false;

        match outcome {
            Ok(page) => {
                // The server may clamp the requested index (e.g. past the
                // last page); keep the query in step with what it returned.
                state.page_index = page.page_index;
                state.page = page;
                state.error = None;
                Ok(())
            }
            Err(e @ ConsoleError::MalformedResponse(_)) => {
                state.page = Page::empty(self.inner.page_size);
                state.error = Some(e.user_message());
                Err(e)
            }
            Err(e) => {
                state.error = Some(e.user_message());
                Err(e)
            }
        }
    }

    /// Jump to a page and fetch it. Indexes below 1 are clamped up.
    pub async fn set_page(&self, page_index: u32) -> Result<()> {
        {
            let mut state = self.inner.state.lock();
            state.page_index = page_index.max(1);
        }
        self.load().await
    }

    /// Apply a header click: same column toggles direction, a new column
    /// starts over descending. Triggers a fetch with the merged parameters.
    pub async fn set_sort(&self, field: impl Into<String>) -> Result<()> {
        {
            let mut state = self.inner.state.lock();
            let field = field.into();
            state.sort = Some(match state.sort.take() {
                Some(mut spec) => {
                    spec.select(field);
                    spec
                }
                None => SortSpec::descending(field),
            });
        }
        self.load().await
    }

    /// Replace the filter set and fetch from the first page.
    pub async fn set_filters(&self, filters: FilterSet) -> Result<()> {
        {
            let mut state = self.inner.state.lock();
            state.filters = filters;
            state.page_index = 1;
        }
        self.load().await
    }

    /// Re-fetch with unchanged parameters.
    pub async fn reload(&self) -> Result<()> {
        self.load().await
    }

    pub fn snapshot(&self) -> ListSnapshot<T> {
        let state = self.inner.state.lock();
        ListSnapshot {
            page: state.page.clone(),
            loading: state.loading,
            error: state.error.clone(),
        }
    }

    pub fn is_loading(&self) -> bool {
        self.inner.state.lock().loading
    }

    pub fn error(&self) -> Option<String> {
        self.inner.state.lock().error.clone()
    }

    pub fn sort(&self) -> Option<SortSpec<String>> {
        self.inner.state.lock().sort.clone()
    }

    pub fn filters(&self) -> FilterSet {
        self.inner.state.lock().filters.clone()
    }
}

impl<T: HasId + Clone + Send + Sync + 'static> RemoteListController<T> {
    /// Optimistically drop an item after a destructive action succeeded.
    /// Safe to call twice; `total_count` never underflows. Pagination
    /// metadata refreshes on the next full load.
    pub fn apply_local_removal(&self, id: &str) -> bool {
        self.inner.state.lock().page.remove_item(id)
    }

    /// Optimistically merge an update into the matching item. No-op when
    /// the item is no longer on this page.
    pub fn apply_local_patch(&self, id: &str, patch: impl FnOnce(&mut T)) -> bool {
        self.inner.state.lock().page.patch_item(id, patch)
    }

    /// Apply an action's declared reconciliation to this list.
    pub async fn reconcile(
        &self,
        policy: ReconcilePolicy,
        target_id: &str,
        patch: Option<Box<dyn FnOnce(&mut T) + Send>>,
    ) {
        match policy {
            ReconcilePolicy::Remove => {
                self.apply_local_removal(target_id);
            }
            ReconcilePolicy::Patch => {
                if let Some(patch) = patch {
                    self.apply_local_patch(target_id, patch);
                }
            }
            ReconcilePolicy::Reload => {
                // A failed refresh keeps prior data and records its own
                // error state; the action itself already succeeded.
                let _ = self.reload().await;
            }
        }
    }
}
