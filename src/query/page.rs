//! Pagination types.

use pitboss_api::{ListRequestBody, PageEnvelope};

use crate::query::{FilterSet, SortSpec};
use crate::types::HasId;

/// One fetched slice of a server-side collection, plus its pagination
/// metadata. `page_index` is 1-based.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_count: u64,
    pub page_index: u32,
    pub page_size: u32,
    pub total_pages: u32,
}

impl<T> Page<T> {
    /// An empty page, used before the first load resolves.
    pub fn empty(page_size: u32) -> Self {
        Self {
            items: Vec::new(),
            total_count: 0,
            page_index: 1,
            page_size,
            total_pages: 0,
        }
    }

    /// Build from a wire envelope. Derives `total_pages` when the server
    /// did not supply it and clamps `page_index` into `[1, max(total_pages, 1)]`.
    pub fn from_envelope(envelope: PageEnvelope<T>, page_size: u32) -> Self {
        let total_pages = envelope
            .total_pages
            .unwrap_or_else(|| envelope.computed_total_pages(page_size));
        let page_index = envelope.page.clamp(1, total_pages.max(1));
        Self {
            items: envelope.items,
            total_count: envelope.total,
            page_index,
            page_size,
            total_pages,
        }
    }

    pub fn has_previous(&self) -> bool {
        self.page_index > 1
    }

    pub fn has_next(&self) -> bool {
        self.page_index < self.total_pages
    }
}

impl<T: HasId> Page<T> {
    /// Remove an item without a server round-trip. Idempotent: a second
    /// call for the same id is a no-op and `total_count` never underflows.
    ///
    /// `page_index` and `total_pages` are left alone; they refresh on the
    /// next full load.
    pub fn remove_item(&mut self, id: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.id() != id);
        if self.items.len() < before {
            self.total_count = self.total_count.saturating_sub(1);
            true
        } else {
            false
        }
    }

    /// Merge a partial update into the matching item. Silent no-op when
    /// the id is no longer on this page.
    pub fn patch_item(&mut self, id: &str, patch: impl FnOnce(&mut T)) -> bool {
        match self.items.iter_mut().find(|item| item.id() == id) {
            Some(item) => {
                patch(item);
                true
            }
            None => false,
        }
    }
}

/// The merged parameters of one list fetch.
#[derive(Debug, Clone, PartialEq)]
pub struct PageRequest {
    pub page: u32,
    pub per_page: u32,
    pub sort: Option<SortSpec<String>>,
    pub filters: FilterSet,
}

impl PageRequest {
    /// Render into the body of a filtered list fetch (`POST <resource>`).
    /// The sort selection rides inside the dynamic `filter` keys.
    pub fn to_body(&self) -> ListRequestBody {
        let mut filter = self.filters.to_wire();
        if let Some(sort) = &self.sort {
            filter.insert("sort_by".to_string(), sort.field.clone().into());
            filter.insert("sort_dir".to_string(), sort.direction.to_string().into());
        }
        ListRequestBody {
            page: self.page,
            per_page: self.per_page,
            filter,
        }
    }

    /// Render into query parameters for a plain GET list fetch.
    pub fn to_query_params(&self) -> Vec<(String, String)> {
        let mut params = vec![
            ("page".to_string(), self.page.to_string()),
            ("per_page".to_string(), self.per_page.to_string()),
        ];
        if let Some(sort) = &self.sort {
            params.push(("sort_by".to_string(), sort.field.clone()));
            params.push(("sort_dir".to_string(), sort.direction.to_string()));
        }
        params.extend(self.filters.to_query_params());
        params
    }
}
