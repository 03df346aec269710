//! Data source seam for paginated lists.

use async_trait::async_trait;

use crate::error::Result;
use crate::query::{Page, PageRequest};

/// Fetches one page of a remote collection.
///
/// Implementations decode the wire envelope into a [`Page`]; a body that
/// does not match the expected shape must surface as
/// [`crate::error::ConsoleError::MalformedResponse`], never a panic.
#[async_trait]
pub trait ListBackend<T>: Send + Sync {
    async fn fetch_page(&self, request: &PageRequest) -> Result<Page<T>>;
}
