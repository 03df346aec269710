//! Filter composition for list queries.
//!
//! A `FilterSet` holds only the filters the operator actually set. Blank
//! values are never stored and never serialized — sending `status=""` to
//! the backend would over-constrain the server-side query, so clearing a
//! filter must restore the exact unfiltered request shape.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{Map, Value};

/// A single filter value. Ranges keep their bounds optional so screens can
/// populate one side at a time.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FilterValue {
    Text(String),
    Int(i64),
    Decimal(f64),
    Flag(bool),
    /// ISO-8601 date string, e.g. `2026-08-06`
    Date(String),
    IntRange {
        #[serde(skip_serializing_if = "Option::is_none")]
        min: Option<i64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        max: Option<i64>,
    },
    DateRange {
        #[serde(skip_serializing_if = "Option::is_none")]
        from: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        to: Option<String>,
    },
}

impl FilterValue {
    /// A blank value carries no constraint and is dropped at the boundary.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Text(s) => s.trim().is_empty(),
            Self::Date(s) => s.trim().is_empty(),
            Self::IntRange { min, max } => min.is_none() && max.is_none(),
            Self::DateRange { from, to } => from.is_none() && to.is_none(),
            Self::Int(_) | Self::Decimal(_) | Self::Flag(_) => false,
        }
    }
}

impl From<&str> for FilterValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<i64> for FilterValue {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<bool> for FilterValue {
    fn from(b: bool) -> Self {
        Self::Flag(b)
    }
}

/// The set of filters currently applied to one screen's list.
///
/// Backed by a `BTreeMap` so the serialized request body is stable across
/// insert orders.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSet {
    values: BTreeMap<String, FilterValue>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a filter. Blank values clear the key instead of storing it.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<FilterValue>) -> &mut Self {
        let key = key.into();
        let value = value.into();
        if value.is_blank() {
            self.values.remove(&key);
        } else {
            self.values.insert(key, value);
        }
        self
    }

    /// Remove a filter.
    pub fn clear(&mut self, key: &str) -> &mut Self {
        self.values.remove(key);
        self
    }

    pub fn get(&self, key: &str) -> Option<&FilterValue> {
        self.values.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Render into the `filter` object of an outgoing request body.
    pub fn to_wire(&self) -> Map<String, Value> {
        self.values
            .iter()
            .filter_map(|(k, v)| {
                serde_json::to_value(v)
                    .ok()
                    .map(|value| (k.clone(), value))
            })
            .collect()
    }

    /// Render into flat query parameters for GET list endpoints. Range
    /// values expand into `<key>_min`/`<key>_max` (or `_from`/`_to`) pairs.
    pub fn to_query_params(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();
        for (key, value) in &self.values {
            match value {
                FilterValue::Text(s) | FilterValue::Date(s) => {
                    params.push((key.clone(), s.clone()));
                }
                FilterValue::Int(n) => params.push((key.clone(), n.to_string())),
                FilterValue::Decimal(d) => params.push((key.clone(), d.to_string())),
                FilterValue::Flag(b) => params.push((key.clone(), b.to_string())),
                FilterValue::IntRange { min, max } => {
                    if let Some(min) = min {
                        params.push((format!("{key}_min"), min.to_string()));
                    }
                    if let Some(max) = max {
                        params.push((format!("{key}_max"), max.to_string()));
                    }
                }
                FilterValue::DateRange { from, to } => {
                    if let Some(from) = from {
                        params.push((format!("{key}_from"), from.clone()));
                    }
                    if let Some(to) = to {
                        params.push((format!("{key}_to"), to.clone()));
                    }
                }
            }
        }
        params
    }
}
