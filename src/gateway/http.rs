use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{BlobGateway, GatewayError, RecordGateway};
use crate::config;
use crate::models::{Attachment, EntryKind, NewAttachment, NewEntry, RecordContainer, RecordEntry};

/// HTTP client for the clinic record backend.
pub struct HttpRecordGateway {
    base_url: String,
    client: reqwest::Client,
    timeout_secs: u64,
}

impl HttpRecordGateway {
    /// Create a gateway with its own properly-configured HTTP client.
    pub fn new(base_url: &str, timeout_secs: u64) -> Self {
        Self::with_client(base_url, build_client(timeout_secs), timeout_secs)
    }

    /// Create a gateway around an injected HTTP client (shared pools, tests).
    pub fn with_client(base_url: &str, client: reqwest::Client, timeout_secs: u64) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            timeout_secs,
        }
    }

    /// Gateway for the environment-configured backend.
    pub fn from_env() -> Self {
        Self::new(&config::api_base_url(), config::DEFAULT_TIMEOUT_SECS)
    }

    fn transport_error(&self, err: reqwest::Error) -> GatewayError {
        transport_error(&self.base_url, self.timeout_secs, err)
    }
}

impl RecordGateway for HttpRecordGateway {
    async fn container_for_patient(&self, patient_id: &str) -> Result<RecordContainer, GatewayError> {
        let url = format!("{}/patients/{}/prontuario", self.base_url, patient_id);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;
        expect_json(&format!("prontuario for patient {patient_id}"), response).await
    }

    async fn list_entries(
        &self,
        container_id: Uuid,
        kind: Option<EntryKind>,
    ) -> Result<Vec<RecordEntry>, GatewayError> {
        let url = format!("{}/prontuarios/{}/entradas", self.base_url, container_id);
        let mut request = self.client.get(&url);
        if let Some(kind) = kind {
            request = request.query(&[("tipo", kind.as_str())]);
        }
        let response = request.send().await.map_err(|e| self.transport_error(e))?;
        expect_json(&format!("entries of prontuario {container_id}"), response).await
    }

    async fn create_entry(
        &self,
        container_id: Uuid,
        entry: &NewEntry,
    ) -> Result<RecordEntry, GatewayError> {
        let url = format!("{}/prontuarios/{}/entradas", self.base_url, container_id);
        let response = self
            .client
            .post(&url)
            .json(entry)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;
        let created: RecordEntry =
            expect_json(&format!("prontuario {container_id}"), response).await?;
        tracing::debug!(%container_id, kind = %created.kind, entry = %created.id, "created record entry");
        Ok(created)
    }

    async fn delete_entry(&self, entry_id: Uuid) -> Result<(), GatewayError> {
        let url = format!("{}/prontuarios/entradas/{}", self.base_url, entry_id);
        let response = self
            .client
            .delete(&url)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;
        expect_success(&format!("entry {entry_id}"), response).await
    }

    async fn attach_file(
        &self,
        container_id: Uuid,
        entry_id: Uuid,
        attachment: &NewAttachment,
    ) -> Result<Attachment, GatewayError> {
        let url = format!(
            "{}/prontuarios/{}/entradas/{}/arquivos",
            self.base_url, container_id, entry_id
        );
        let response = self
            .client
            .post(&url)
            .json(attachment)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;
        expect_json(&format!("entry {entry_id}"), response).await
    }
}

/// HTTP client for the blob-storage service.
pub struct HttpBlobGateway {
    base_url: String,
    client: reqwest::Client,
    timeout_secs: u64,
}

/// Request body for `POST /arquivos/url`.
#[derive(Serialize)]
struct SignUrlRequest<'a> {
    path: &'a str,
}

/// Response body from `POST /arquivos/url`.
#[derive(Deserialize)]
struct SignUrlResponse {
    url: String,
}

/// Response body from `POST /arquivos/upload`.
#[derive(Deserialize)]
struct UploadResponse {
    path: String,
}

impl HttpBlobGateway {
    pub fn new(base_url: &str, timeout_secs: u64) -> Self {
        Self::with_client(base_url, build_client(timeout_secs), timeout_secs)
    }

    pub fn with_client(base_url: &str, client: reqwest::Client, timeout_secs: u64) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            timeout_secs,
        }
    }

    pub fn from_env() -> Self {
        Self::new(&config::storage_base_url(), config::DEFAULT_TIMEOUT_SECS)
    }

    fn transport_error(&self, err: reqwest::Error) -> GatewayError {
        transport_error(&self.base_url, self.timeout_secs, err)
    }
}

impl BlobGateway for HttpBlobGateway {
    async fn upload(&self, filename: &str, bytes: Vec<u8>, mime: &str) -> Result<String, GatewayError> {
        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(filename.to_string())
            .mime_str(mime)
            .map_err(|e| GatewayError::Decode(format!("invalid MIME type {mime}: {e}")))?;
        let form = reqwest::multipart::Form::new().part("file", part);

        let url = format!("{}/arquivos/upload", self.base_url);
        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;
        let parsed: UploadResponse = expect_json(&format!("upload of {filename}"), response).await?;
        tracing::debug!(filename, path = %parsed.path, "uploaded file");
        Ok(parsed.path)
    }

    async fn sign_url(&self, path: &str) -> Result<String, GatewayError> {
        let url = format!("{}/arquivos/url", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&SignUrlRequest { path })
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;
        let parsed: SignUrlResponse = expect_json(&format!("signed URL for {path}"), response).await?;
        Ok(parsed.url)
    }
}

fn build_client(timeout_secs: u64) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_secs))
        .build()
        .expect("Failed to create HTTP client")
}

fn transport_error(base_url: &str, timeout_secs: u64, err: reqwest::Error) -> GatewayError {
    if err.is_connect() {
        GatewayError::Connection(base_url.to_string())
    } else if err.is_timeout() {
        GatewayError::Timeout(timeout_secs)
    } else {
        GatewayError::Decode(err.to_string())
    }
}

async fn expect_success(what: &str, response: reqwest::Response) -> Result<(), GatewayError> {
    let status = response.status();
    if status.as_u16() == 404 {
        return Err(GatewayError::NotFound(what.to_string()));
    }
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(GatewayError::Status {
            status: status.as_u16(),
            body,
        });
    }
    Ok(())
}

async fn expect_json<T: DeserializeOwned>(
    what: &str,
    response: reqwest::Response,
) -> Result<T, GatewayError> {
    let status = response.status();
    if status.as_u16() == 404 {
        return Err(GatewayError::NotFound(what.to_string()));
    }
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(GatewayError::Status {
            status: status.as_u16(),
            body,
        });
    }
    response
        .json::<T>()
        .await
        .map_err(|e| GatewayError::Decode(e.to_string()))
}
