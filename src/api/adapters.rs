//! Bindings from the HTTP client to the component seams.
//!
//! Each adapter pairs the shared [`ApiClient`] with one resource route so
//! screens can hand trait objects to their controller, resolver, and
//! dispatcher without knowing transport details.

use std::marker::PhantomData;

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::action::{ActionBackend, ActionKind, ActionOutcome, ActionRequest};
use crate::audit::{AuditEntry, AuditSink};
use crate::error::Result;
use crate::list::ListBackend;
use crate::query::{Page, PageRequest};
use crate::search::SearchBackend;

use super::client::ApiClient;

/// How a resource's list endpoint is shaped.
#[derive(Debug, Clone)]
pub enum ListRoute {
    /// `GET <resource>` with query parameters.
    Query(String),
    /// `POST <resource>` with a `{page, per_page, filter}` body.
    Filtered(String),
}

/// [`ListBackend`] over the REST API for one resource.
pub struct HttpListBackend<T> {
    client: ApiClient,
    route: ListRoute,
    _marker: PhantomData<fn() -> T>,
}

impl<T> HttpListBackend<T> {
    pub fn new(client: ApiClient, route: ListRoute) -> Self {
        Self {
            client,
            route,
            _marker: PhantomData,
        }
    }
}

#[async_trait]
impl<T: DeserializeOwned + Send + Sync> ListBackend<T> for HttpListBackend<T> {
    async fn fetch_page(&self, request: &PageRequest) -> Result<Page<T>> {
        match &self.route {
            ListRoute::Query(resource) => self.client.fetch_page_query(resource, request).await,
            ListRoute::Filtered(resource) => {
                self.client.fetch_page_filtered(resource, request).await
            }
        }
    }
}

/// [`SearchBackend`] over the REST API for one lookup resource.
pub struct HttpSearchBackend<T> {
    client: ApiClient,
    resource: String,
    limit: u32,
    _marker: PhantomData<fn() -> T>,
}

impl<T> HttpSearchBackend<T> {
    pub fn new(client: ApiClient, resource: impl Into<String>) -> Self {
        Self {
            client,
            resource: resource.into(),
            limit: 10,
            _marker: PhantomData,
        }
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }
}

#[async_trait]
impl<T: DeserializeOwned + Send + Sync> SearchBackend<T> for HttpSearchBackend<T> {
    async fn lookup(&self, query: &str) -> Result<Vec<T>> {
        self.client.search(&self.resource, query, self.limit).await
    }
}

/// [`ActionBackend`] over the REST API. Routes each kind to its verb:
/// create/update/delete use the entity endpoints, everything else posts
/// to `<resource>/<id>/<action>`.
pub struct HttpActionBackend {
    client: ApiClient,
}

impl HttpActionBackend {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ActionBackend for HttpActionBackend {
    async fn execute(&self, request: &ActionRequest) -> Result<ActionOutcome> {
        let empty = serde_json::json!({});
        match request.kind {
            ActionKind::Create => {
                let body = request.payload.as_ref().unwrap_or(&empty);
                self.client.create(&request.resource, body).await
            }
            ActionKind::Update => {
                let body = request.payload.as_ref().unwrap_or(&empty);
                self.client
                    .update(&request.resource, &request.target_id, body)
                    .await
            }
            ActionKind::Delete => {
                self.client
                    .delete(&request.resource, &request.target_id)
                    .await
            }
            kind => {
                self.client
                    .post_action(
                        &request.resource,
                        &request.target_id,
                        &kind.to_string(),
                        request.payload.as_ref(),
                    )
                    .await
            }
        }
    }
}

/// [`AuditSink`] posting entries to the activity-log resource.
pub struct HttpAuditSink {
    client: ApiClient,
    resource: String,
}

impl HttpAuditSink {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            resource: "activity-logs".to_string(),
        }
    }

    pub fn with_resource(mut self, resource: impl Into<String>) -> Self {
        self.resource = resource.into();
        self
    }
}

#[async_trait]
impl AuditSink for HttpAuditSink {
    async fn record(&self, entry: AuditEntry) -> Result<()> {
        let body = serde_json::to_value(entry.to_wire())?;
        self.client.create(&self.resource, &body).await?;
        Ok(())
    }
}
