//! External collaborators: the clinic REST backend and the blob-storage
//! service, behind trait seams.
//!
//! Both are black boxes consumed over HTTP. The traits exist so the
//! aggregation logic can be exercised against in-memory mocks; the HTTP
//! implementations take an injected `reqwest::Client` rather than sharing a
//! global singleton.

mod http;
mod mock;

pub use http::{HttpBlobGateway, HttpRecordGateway};
pub use mock::{sample_attachment, MockBlobGateway, MockRecordGateway};

use uuid::Uuid;

use crate::models::{Attachment, EntryKind, NewAttachment, NewEntry, RecordContainer, RecordEntry};

/// Errors from gateway exchanges.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Could not reach backend at {0}")]
    Connection(String),
    #[error("Request timed out after {0}s")]
    Timeout(u64),
    #[error("Backend returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Could not decode response: {0}")]
    Decode(String),
}

/// Record backend contract.
///
/// GETs are idempotent; creation POSTs return the created resource with its
/// server-generated identifier. `list_entries` returns entries in server
/// order — the aggregator's tie-break rules depend on that order.
#[allow(async_fn_in_trait)]
pub trait RecordGateway {
    /// `GET /patients/{id}/prontuario`. A patient with no container yet
    /// yields `GatewayError::NotFound`.
    async fn container_for_patient(&self, patient_id: &str) -> Result<RecordContainer, GatewayError>;

    /// `GET /prontuarios/{containerId}/entradas[?tipo=...]`
    async fn list_entries(
        &self,
        container_id: Uuid,
        kind: Option<EntryKind>,
    ) -> Result<Vec<RecordEntry>, GatewayError>;

    /// `POST /prontuarios/{containerId}/entradas`
    async fn create_entry(
        &self,
        container_id: Uuid,
        entry: &NewEntry,
    ) -> Result<RecordEntry, GatewayError>;

    /// `DELETE /prontuarios/entradas/{entryId}`
    async fn delete_entry(&self, entry_id: Uuid) -> Result<(), GatewayError>;

    /// `POST /prontuarios/{containerId}/entradas/{entryId}/arquivos`
    async fn attach_file(
        &self,
        container_id: Uuid,
        entry_id: Uuid,
        attachment: &NewAttachment,
    ) -> Result<Attachment, GatewayError>;
}

/// Blob-storage contract.
#[allow(async_fn_in_trait)]
pub trait BlobGateway {
    /// `POST /arquivos/upload` (multipart). Returns the opaque storage path.
    async fn upload(&self, filename: &str, bytes: Vec<u8>, mime: &str) -> Result<String, GatewayError>;

    /// `POST /arquivos/url`. Exchanges a storage path for a time-limited
    /// signed URL. The URL is never persisted by this client.
    async fn sign_url(&self, path: &str) -> Result<String, GatewayError>;
}
