//! REST wire-envelope types for the pitboss console.
//!
//! Every backend resource speaks one of two shapes: a flat paginated
//! envelope (`items` + `total` + `page` + `total_pages`) or a `data`
//! envelope carrying `success` and an optional `message`. These types are
//! deliberately serde-only — decoding policy (what counts as malformed,
//! how pages are clamped) belongs to the consuming crate.
//!
//! Separating these into their own crate keeps the wire contract in one
//! place and avoids recompiling it when unrelated console code changes.

use serde::{Deserialize, Serialize};

/// Flat paginated list envelope.
///
/// `total_pages` is optional on the wire; some resources let the client
/// derive it from `total` and the requested page size.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageEnvelope<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_pages: Option<u32>,
}

impl<T> PageEnvelope<T> {
    /// Pages needed to hold `total` items at `per_page` items each.
    pub fn computed_total_pages(&self, per_page: u32) -> u32 {
        if per_page == 0 {
            return 0;
        }
        self.total.div_ceil(u64::from(per_page)) as u32
    }
}

/// Generic `data` envelope used by resources that wrap their payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct DataEnvelope<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

/// Result envelope for single-action endpoints
/// (`POST <resource>/<id>/<action>`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionEnvelope {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

/// Request body for filtered list fetches (`POST <resource>`).
///
/// `filter` carries only the keys the operator actually set; absent keys
/// must be omitted entirely rather than sent as empty strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListRequestBody {
    pub page: u32,
    pub per_page: u32,
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub filter: serde_json::Map<String, serde_json::Value>,
}

/// Payload for the activity-log sink.
///
/// Field names follow the backend contract verbatim; the console's typed
/// audit enums render into the string fields before the request is built.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityLogRequest {
    pub action: String,
    pub category: String,
    pub severity: String,
    pub resource_type: String,
    pub resource_id: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}
