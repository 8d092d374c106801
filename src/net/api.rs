//! REST client for the inventory API.
//!
//! [`ApiClient`] is a thin `reqwest` wrapper; response bodies are decoded by
//! the pure `parse_*` functions below so the wire quirks can be tested without
//! a server.
//!
//! ERROR HANDLING
//! ==============
//! Transport failures, non-2xx statuses and malformed bodies stay distinct in
//! [`ApiError`]. Callers word their own message per operation and only look
//! at the status to single out 401 and 403.

use std::time::Duration;

use reqwest::{Method, RequestBuilder, Response};
use serde::Deserialize;

use super::types::{
    FieldChange, HistoryExport, HistoryQuery, HistoryRecord, Item, ItemPatch, LoginRequest, LoginResponse, NewItem,
    export_filename,
};
use crate::config::HttpTimeouts;

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced by inventory API calls.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request could not be sent or its body could not be read.
    #[error("request failed: {0}")]
    Network(String),

    /// The server answered with a non-success status.
    #[error("server returned status {status}")]
    Status { status: u16, body: String },

    /// The response body did not have the expected shape.
    #[error("unexpected response body: {0}")]
    Parse(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

impl ApiError {
    /// HTTP status of a rejected request, if the server answered at all.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    #[must_use]
    pub fn is_forbidden(&self) -> bool {
        self.status() == Some(403)
    }
}

// =============================================================================
// TRAIT
// =============================================================================

/// Operations the client performs against the inventory backend.
///
/// Every call except [`InventoryApi::login`] takes the bearer token of the
/// current session.
#[async_trait::async_trait]
pub trait InventoryApi: Send + Sync {
    /// `POST /auth/login`.
    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ApiError>;

    /// `GET /items`.
    async fn list_items(&self, token: &str) -> Result<Vec<Item>, ApiError>;

    /// `POST /items`.
    async fn create_item(&self, token: &str, item: &NewItem) -> Result<Item, ApiError>;

    /// `PUT /items/{id}` with a sparse body.
    async fn update_item(&self, token: &str, id: i64, patch: &ItemPatch) -> Result<Item, ApiError>;

    /// `DELETE /items/{id}`.
    async fn delete_item(&self, token: &str, id: i64) -> Result<(), ApiError>;

    /// `GET /items/{id}/history`.
    async fn item_history(
        &self,
        token: &str,
        item_id: i64,
        query: &HistoryQuery,
    ) -> Result<Vec<HistoryRecord>, ApiError>;

    /// `GET /history/{id}/diff`.
    async fn history_diff(&self, token: &str, history_id: i64) -> Result<Vec<FieldChange>, ApiError>;

    /// `GET /items/{id}/history/export`.
    async fn export_history(&self, token: &str, item_id: i64) -> Result<HistoryExport, ApiError>;
}

// =============================================================================
// CLIENT
// =============================================================================

/// HTTP implementation of [`InventoryApi`].
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Build a client rooted at `base_url` (e.g. `http://localhost:8080/api`).
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::HttpClientBuild`] if the TLS backend cannot start.
    pub fn new(base_url: &str, timeouts: HttpTimeouts) -> Result<Self, ApiError> {
        let mut builder = reqwest::Client::builder().connect_timeout(Duration::from_secs(timeouts.connect_secs));
        if let Some(request_secs) = timeouts.request_secs {
            builder = builder.timeout(Duration::from_secs(request_secs));
        }
        let http = builder
            .build()
            .map_err(|e| ApiError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, base_url: base_url.trim_end_matches('/').to_owned() })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str, token: Option<&str>) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(%method, %url, "api request");
        let request = self.http.request(method, url);
        match token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Send and reject non-2xx statuses, keeping the body for diagnostics.
    async fn execute(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        tracing::debug!(status = status.as_u16(), %body, "api request rejected");
        Err(ApiError::Status { status: status.as_u16(), body })
    }

    async fn execute_text(&self, request: RequestBuilder) -> Result<String, ApiError> {
        self.execute(request)
            .await?
            .text()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))
    }
}

#[async_trait::async_trait]
impl InventoryApi for ApiClient {
    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ApiError> {
        let body = self
            .execute_text(self.request(Method::POST, "/auth/login", None).json(request))
            .await?;
        parse_login(&body)
    }

    async fn list_items(&self, token: &str) -> Result<Vec<Item>, ApiError> {
        let body = self
            .execute_text(self.request(Method::GET, "/items", Some(token)))
            .await?;
        parse_items(&body)
    }

    async fn create_item(&self, token: &str, item: &NewItem) -> Result<Item, ApiError> {
        let body = self
            .execute_text(self.request(Method::POST, "/items", Some(token)).json(item))
            .await?;
        parse_item(&body)
    }

    async fn update_item(&self, token: &str, id: i64, patch: &ItemPatch) -> Result<Item, ApiError> {
        let path = format!("/items/{id}");
        let body = self
            .execute_text(self.request(Method::PUT, &path, Some(token)).json(patch))
            .await?;
        parse_item(&body)
    }

    async fn delete_item(&self, token: &str, id: i64) -> Result<(), ApiError> {
        let path = format!("/items/{id}");
        self.execute(self.request(Method::DELETE, &path, Some(token)))
            .await?;
        Ok(())
    }

    async fn item_history(
        &self,
        token: &str,
        item_id: i64,
        query: &HistoryQuery,
    ) -> Result<Vec<HistoryRecord>, ApiError> {
        let path = format!("/items/{item_id}/history");
        let body = self
            .execute_text(self.request(Method::GET, &path, Some(token)).query(query))
            .await?;
        parse_history(&body)
    }

    async fn history_diff(&self, token: &str, history_id: i64) -> Result<Vec<FieldChange>, ApiError> {
        let path = format!("/history/{history_id}/diff");
        let body = self
            .execute_text(self.request(Method::GET, &path, Some(token)))
            .await?;
        parse_diff(&body)
    }

    async fn export_history(&self, token: &str, item_id: i64) -> Result<HistoryExport, ApiError> {
        let path = format!("/items/{item_id}/history/export");
        let bytes = self
            .execute(self.request(Method::GET, &path, Some(token)))
            .await?
            .bytes()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Ok(HistoryExport { filename: export_filename(item_id), bytes: bytes.to_vec() })
    }
}

// =============================================================================
// PARSING
// =============================================================================

/// History listings come either as a bare array or wrapped with paging info.
///
/// The envelope's `history` key is required (it may be `null`); any other
/// object is a parse error rather than an empty listing.
#[derive(Deserialize)]
#[serde(untagged)]
enum HistoryPayload {
    Bare(Option<Vec<HistoryRecord>>),
    Envelope {
        #[serde(deserialize_with = "Option::deserialize")]
        history: Option<Vec<HistoryRecord>>,
    },
}

fn decode<'a, T: Deserialize<'a>>(body: &'a str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|e| ApiError::Parse(e.to_string()))
}

fn parse_login(body: &str) -> Result<LoginResponse, ApiError> {
    decode(body)
}

fn parse_item(body: &str) -> Result<Item, ApiError> {
    decode(body)
}

/// `null` is how the backend spells an empty list.
fn parse_items(body: &str) -> Result<Vec<Item>, ApiError> {
    decode::<Option<Vec<Item>>>(body).map(Option::unwrap_or_default)
}

fn parse_history(body: &str) -> Result<Vec<HistoryRecord>, ApiError> {
    let records = match decode::<HistoryPayload>(body)? {
        HistoryPayload::Bare(records) | HistoryPayload::Envelope { history: records } => records,
    };
    Ok(records.unwrap_or_default())
}

fn parse_diff(body: &str) -> Result<Vec<FieldChange>, ApiError> {
    decode::<Option<Vec<FieldChange>>>(body).map(Option::unwrap_or_default)
}

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;
