//! Shared HTTP client for the platform REST API.

use std::sync::Arc;
use std::time::Duration;

use reqwest::RequestBuilder;
use secrecy::{ExposeSecret, SecretBox};
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

use pitboss_api::{ActionEnvelope, DataEnvelope, PageEnvelope};

use crate::action::ActionOutcome;
use crate::config::ConsoleConfig;
use crate::error::{ConsoleError, Result};
use crate::query::{FilterSet, Page, PageRequest};

use super::export::{ExportDownload, ExportFormat, export_filename};

/// Authenticated HTTP client bound to the platform's base URL.
///
/// Cheap to clone; the underlying connection pool and credential are
/// shared. This layer never mutates the session — it only attaches the
/// auth header to outgoing requests.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    token: Option<Arc<SecretBox<String>>>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url.as_str())
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl ApiClient {
    pub fn new(config: &ConsoleConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| ConsoleError::Config(format!("invalid base_url: {e}")))?;

        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        let token = config
            .api_token()
            .map(|t| Arc::new(SecretBox::new(Box::new(t))));

        Ok(Self {
            http,
            base_url,
            token,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| ConsoleError::Config(format!("invalid endpoint '{path}': {e}")))
    }

    fn authed(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => builder.bearer_auth(token.expose_secret()),
            None => builder,
        }
    }

    /// Fetch a page via `GET <resource>?page=..&per_page=..[&filters]`.
    pub async fn fetch_page_query<T: DeserializeOwned>(
        &self,
        resource: &str,
        request: &PageRequest,
    ) -> Result<Page<T>> {
        let url = self.endpoint(resource)?;
        let response = self
            .authed(self.http.get(url).query(&request.to_query_params()))
            .send()
            .await?;
        let response = check_status(response).await?;
        let bytes = response.bytes().await?;
        page_from_slice(&bytes, request.per_page)
    }

    /// Fetch a page via `POST <resource>` with a `{page, per_page, filter}`
    /// body.
    pub async fn fetch_page_filtered<T: DeserializeOwned>(
        &self,
        resource: &str,
        request: &PageRequest,
    ) -> Result<Page<T>> {
        let url = self.endpoint(resource)?;
        let response = self
            .authed(self.http.post(url).json(&request.to_body()))
            .send()
            .await?;
        let response = check_status(response).await?;
        let bytes = response.bytes().await?;
        page_from_slice(&bytes, request.per_page)
    }

    /// Search-as-you-type lookup: `GET <resource>?q=<query>&per_page=<limit>`.
    pub async fn search<T: DeserializeOwned>(
        &self,
        resource: &str,
        query: &str,
        limit: u32,
    ) -> Result<Vec<T>> {
        let url = self.endpoint(resource)?;
        let limit_param = limit.to_string();
        let response = self
            .authed(
                self.http
                    .get(url)
                    .query(&[("q", query), ("per_page", limit_param.as_str())]),
            )
            .send()
            .await?;
        let response = check_status(response).await?;
        let bytes = response.bytes().await?;
        let page: Page<T> = page_from_slice(&bytes, limit)?;
        Ok(page.items)
    }

    /// Invoke a single-action endpoint: `POST <resource>/<id>/<action>`.
    pub async fn post_action(
        &self,
        resource: &str,
        id: &str,
        action: &str,
        payload: Option<&Value>,
    ) -> Result<ActionOutcome> {
        let url = self.endpoint(&format!("{resource}/{id}/{action}"))?;
        let mut builder = self.authed(self.http.post(url));
        if let Some(payload) = payload {
            builder = builder.json(payload);
        }
        let response = check_status(builder.send().await?).await?;
        let bytes = response.bytes().await?;
        outcome_from_slice(&bytes)
    }

    /// Create an entity: `POST <resource>`.
    pub async fn create(&self, resource: &str, body: &Value) -> Result<ActionOutcome> {
        let url = self.endpoint(resource)?;
        let response = check_status(self.authed(self.http.post(url).json(body)).send().await?)
            .await?;
        let bytes = response.bytes().await?;
        outcome_from_slice(&bytes)
    }

    /// Update an entity: `PUT <resource>/<id>`.
    pub async fn update(&self, resource: &str, id: &str, body: &Value) -> Result<ActionOutcome> {
        let url = self.endpoint(&format!("{resource}/{id}"))?;
        let response = check_status(self.authed(self.http.put(url).json(body)).send().await?)
            .await?;
        let bytes = response.bytes().await?;
        outcome_from_slice(&bytes)
    }

    /// Delete an entity: `DELETE <resource>/<id>`.
    pub async fn delete(&self, resource: &str, id: &str) -> Result<ActionOutcome> {
        let url = self.endpoint(&format!("{resource}/{id}"))?;
        let response = check_status(self.authed(self.http.delete(url)).send().await?).await?;
        let bytes = response.bytes().await?;
        outcome_from_slice(&bytes)
    }

    /// Request a filtered report export and name the downloaded blob
    /// `<report-name>-<date>.<format>`.
    pub async fn download_export(
        &self,
        resource: &str,
        report_name: &str,
        format: ExportFormat,
        filters: &FilterSet,
    ) -> Result<ExportDownload> {
        let url = self.endpoint(resource)?;
        let body = serde_json::json!({
            "format": format.to_string(),
            "filter": filters.to_wire(),
        });
        let response = check_status(self.authed(self.http.post(url).json(&body)).send().await?)
            .await?;
        let bytes = response.bytes().await?.to_vec();
        Ok(ExportDownload {
            filename: export_filename(report_name, format),
            bytes,
        })
    }
}

/// Map an HTTP status onto the error taxonomy. 4xx carries the server's
/// wording for inline display; everything else non-2xx is a server fault.
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = response
        .json::<Value>()
        .await
        .ok()
        .and_then(|body| {
            body.get("message")
                .or_else(|| body.get("error"))
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .unwrap_or_else(|| format!("HTTP {status}"));

    if status.is_client_error() {
        Err(ConsoleError::Validation { message })
    } else {
        Err(ConsoleError::Api(message))
    }
}

/// Decode a list response body. Accepts both the flat page envelope and
/// the `data`-wrapped variant; anything else is malformed, never a panic.
fn page_from_slice<T: DeserializeOwned>(bytes: &[u8], per_page: u32) -> Result<Page<T>> {
    let value: Value = serde_json::from_slice(bytes)
        .map_err(|e| ConsoleError::MalformedResponse(format!("list body is not JSON: {e}")))?;

    if value.get("items").is_some() {
        let envelope: PageEnvelope<T> = serde_json::from_value(value)
            .map_err(|e| ConsoleError::MalformedResponse(e.to_string()))?;
        return Ok(Page::from_envelope(envelope, per_page));
    }

    if value.get("success").is_some() || value.get("data").is_some() {
        let envelope: DataEnvelope<PageEnvelope<T>> = serde_json::from_value(value)
            .map_err(|e| ConsoleError::MalformedResponse(e.to_string()))?;
        if !envelope.success {
            return Err(ConsoleError::Api(
                envelope.message.unwrap_or_else(|| "unknown error".to_string()),
            ));
        }
        let page = envelope.data.ok_or_else(|| {
            ConsoleError::MalformedResponse("success envelope missing 'data'".to_string())
        })?;
        return Ok(Page::from_envelope(page, per_page));
    }

    Err(ConsoleError::MalformedResponse(
        "list body has neither 'items' nor 'data'".to_string(),
    ))
}

/// Decode an action response body. `success: false` becomes a
/// [`ConsoleError::Validation`] carrying the server's message.
fn outcome_from_slice(bytes: &[u8]) -> Result<ActionOutcome> {
    // Some mutation endpoints reply with an empty body on success.
    if bytes.is_empty() {
        return Ok(ActionOutcome::default());
    }

    let envelope: ActionEnvelope = serde_json::from_slice(bytes)
        .map_err(|e| ConsoleError::MalformedResponse(format!("action body: {e}")))?;

    if envelope.success {
        Ok(ActionOutcome {
            message: envelope.message,
            data: envelope.data,
        })
    } else {
        Err(ConsoleError::Validation {
            message: envelope
                .message
                .unwrap_or_else(|| "The operation failed. Try again.".to_string()),
        })
    }
}
