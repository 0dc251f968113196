//! Document catalog client.
//!
//! Typed access to the backend document service: paginated canonical
//! listings, per-subject fetches, and the batch status commit. The trait is
//! the seam the review session depends on, so tests drive the engine with a
//! scripted fake instead of a live backend. No retry or backoff here; a
//! failed call surfaces once and the caller decides.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::auth::AuthSession;
use crate::config::CatalogConfig;
use crate::models::document::CatalogDocument;
use crate::models::enums::DocumentStatus;

const API_PATH: &str = "/api/v1/document";

/// Errors from catalog calls.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Could not reach the document catalog at {0}")]
    Connection(String),

    #[error("Catalog request timed out after {0}s")]
    Timeout(u64),

    #[error("Catalog returned {status}: {body}")]
    Backend { status: u16, body: String },

    #[error("Catalog response could not be parsed: {0}")]
    ResponseParsing(String),

    #[error("HTTP error: {0}")]
    Http(String),
}

/// One page of the canonical listing.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentPage {
    pub content: Vec<CatalogDocument>,
    #[serde(default)]
    pub total_elements: u64,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub number: u32,
    #[serde(default)]
    pub size: u32,
}

/// One entry of a batch status commit, in the backend vocabulary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusUpdate {
    pub id: String,
    pub status: DocumentStatus,
}

/// Backend acknowledgement of a batch commit. Parsed leniently; only the
/// HTTP outcome drives the session state machine.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommitAck {
    #[serde(default)]
    pub updated: u32,
}

/// The document catalog collaborator, as the engine sees it.
pub trait DocumentCatalog: Send + Sync {
    /// Paginated canonical listing.
    fn fetch_all(&self, page: u32, size: u32) -> Result<DocumentPage, CatalogError>;

    /// Every canonical document in one subject's dossier.
    fn fetch_by_subject(&self, subject: &str) -> Result<Vec<CatalogDocument>, CatalogError>;

    fn fetch_by_id(&self, id: &str) -> Result<CatalogDocument, CatalogError>;

    /// Batch status commit. The only call that moves canonical state.
    fn commit_statuses(&self, updates: &[StatusUpdate]) -> Result<CommitAck, CatalogError>;

    /// Where the presentation layer fetches the stored file from.
    fn download_url(&self, id: &str, attachment: bool) -> String;
}

/// HTTP implementation over the backend REST API.
///
/// Attaches the reviewer's bearer token to every request when a login is
/// active.
pub struct HttpCatalog {
    base_url: String,
    client: reqwest::blocking::Client,
    auth: Arc<AuthSession>,
    timeout_secs: u64,
}

impl HttpCatalog {
    pub fn new(config: &CatalogConfig, auth: Arc<AuthSession>) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client,
            auth,
            timeout_secs: config.timeout_secs,
        }
    }

    fn api_url(&self) -> String {
        format!("{}{}", self.base_url, API_PATH)
    }

    fn send_error(&self, e: reqwest::Error) -> CatalogError {
        if e.is_connect() {
            CatalogError::Connection(self.base_url.clone())
        } else if e.is_timeout() {
            CatalogError::Timeout(self.timeout_secs)
        } else {
            CatalogError::Http(e.to_string())
        }
    }

    fn authorize(
        &self,
        request: reqwest::blocking::RequestBuilder,
    ) -> reqwest::blocking::RequestBuilder {
        match self.auth.token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    fn read_json<T: DeserializeOwned>(
        &self,
        request: reqwest::blocking::RequestBuilder,
    ) -> Result<T, CatalogError> {
        let response = self
            .authorize(request)
            .send()
            .map_err(|e| self.send_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(CatalogError::Backend {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json()
            .map_err(|e| CatalogError::ResponseParsing(e.to_string()))
    }
}

impl DocumentCatalog for HttpCatalog {
    fn fetch_all(&self, page: u32, size: u32) -> Result<DocumentPage, CatalogError> {
        let request = self
            .client
            .get(self.api_url())
            .query(&[("page", page), ("size", size)]);
        self.read_json(request)
    }

    fn fetch_by_subject(&self, subject: &str) -> Result<Vec<CatalogDocument>, CatalogError> {
        let request = self
            .client
            .get(format!("{}/subject/{subject}", self.api_url()));
        self.read_json(request)
    }

    fn fetch_by_id(&self, id: &str) -> Result<CatalogDocument, CatalogError> {
        let request = self.client.get(format!("{}/{id}", self.api_url()));
        self.read_json(request)
    }

    fn commit_statuses(&self, updates: &[StatusUpdate]) -> Result<CommitAck, CatalogError> {
        tracing::info!(count = updates.len(), "Committing status batch");
        let request = self
            .client
            .post(format!("{}/status", self.api_url()))
            .json(updates);
        self.read_json(request)
    }

    fn download_url(&self, id: &str, attachment: bool) -> String {
        format!("{}/{id}/download?attachment={attachment}", self.api_url())
    }
}
