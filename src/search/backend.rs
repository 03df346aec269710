//! Lookup seam for search-as-you-type.

use async_trait::async_trait;

use crate::error::Result;

/// Resolves a free-text query to candidate entities.
///
/// Lookups are advisory: implementations should return whatever matched
/// and let transport failures surface as errors — the resolver downgrades
/// them to an empty result list.
#[async_trait]
pub trait SearchBackend<T>: Send + Sync {
    async fn lookup(&self, query: &str) -> Result<Vec<T>>;
}
