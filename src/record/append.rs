use uuid::Uuid;

use crate::error::RecordError;
use crate::gateway::{BlobGateway, RecordGateway};
use crate::models::{classify_document, EntryKind, NewAttachment, NewEntry, RecordEntry};

/// Description given to the fallback entry created when a file arrives
/// without a target entry.
const FALLBACK_ENTRY_DESCRIPTION: &str = "Anexo de arquivo";

/// A file handed over by the caller for upload.
#[derive(Debug, Clone)]
pub struct FileUpload {
    pub filename: String,
    pub bytes: Vec<u8>,
    /// Guessed from the filename extension when absent.
    pub mime_type: Option<String>,
    pub description: Option<String>,
}

/// Write-side entry point: appends entries and attaches files.
///
/// Every write is a single independent POST; the only multi-step sequence
/// is "create fallback entry, then attach", which is compensated on
/// failure so no orphaned empty entry survives it.
pub struct RecordAppender<G, B> {
    records: G,
    blobs: B,
}

impl<G: RecordGateway, B: BlobGateway> RecordAppender<G, B> {
    pub fn new(records: G, blobs: B) -> Self {
        Self { records, blobs }
    }

    pub fn records(&self) -> &G {
        &self.records
    }

    pub fn blobs(&self) -> &B {
        &self.blobs
    }

    /// Append a typed entry. Blank descriptions are rejected before any
    /// network call.
    pub async fn append_entry(
        &self,
        container_id: Uuid,
        kind: EntryKind,
        description: &str,
    ) -> Result<RecordEntry, RecordError> {
        let description = description.trim();
        if description.is_empty() {
            return Err(RecordError::Validation("entry description is empty".into()));
        }
        let entry = NewEntry {
            kind,
            description: description.to_string(),
        };
        let created = self.records.create_entry(container_id, &entry).await?;
        tracing::info!(%container_id, kind = %created.kind, entry = %created.id, "appended record entry");
        Ok(created)
    }

    /// Upload a file and attach it to an entry.
    ///
    /// With `entry_id = None` a GeneralObservation entry is created to hold
    /// the file — attachments never exist without an entry. If the
    /// attachment POST then fails, the freshly created entry is deleted
    /// before the error is returned, so the failure leaves no orphan.
    pub async fn attach_file(
        &self,
        container_id: Uuid,
        entry_id: Option<Uuid>,
        upload: FileUpload,
    ) -> Result<RecordEntry, RecordError> {
        if upload.filename.trim().is_empty() {
            return Err(RecordError::Validation("attachment filename is empty".into()));
        }

        let mime = upload.mime_type.clone().unwrap_or_else(|| {
            mime_guess::from_path(&upload.filename)
                .first_or_octet_stream()
                .essence_str()
                .to_string()
        });
        let kind = classify_document(&upload.filename, Some(&mime));

        // Upload before creating any entry: an upload failure must not
        // leave an empty entry behind.
        let storage_path = self
            .blobs
            .upload(&upload.filename, upload.bytes, &mime)
            .await?;

        let (entry, created_fallback) = match entry_id {
            Some(id) => (id, false),
            None => {
                let entry = self
                    .records
                    .create_entry(
                        container_id,
                        &NewEntry {
                            kind: EntryKind::GeneralObservation,
                            description: FALLBACK_ENTRY_DESCRIPTION.to_string(),
                        },
                    )
                    .await?;
                (entry.id, true)
            }
        };

        let attachment = NewAttachment {
            filename: upload.filename,
            storage_path,
            mime_type: mime,
            document_kind: kind,
            description: upload.description,
        };

        match self.records.attach_file(container_id, entry, &attachment).await {
            Ok(created) => {
                tracing::info!(entry = %entry, attachment = %created.id, kind = %created.document_kind, "attached file");
                self.refetch_entry(container_id, entry).await
            }
            Err(err) => {
                if created_fallback {
                    // compensating cleanup, best effort
                    if let Err(cleanup) = self.records.delete_entry(entry).await {
                        tracing::warn!(entry = %entry, %cleanup, "could not delete fallback entry after failed attachment");
                    }
                }
                Err(err.into())
            }
        }
    }

    /// Return the post-write state of the touched entry so callers can
    /// update their lanes without a full re-aggregation.
    async fn refetch_entry(
        &self,
        container_id: Uuid,
        entry_id: Uuid,
    ) -> Result<RecordEntry, RecordError> {
        let entries = self.records.list_entries(container_id, None).await?;
        entries
            .into_iter()
            .find(|e| e.id == entry_id)
            .ok_or_else(|| RecordError::NotFound(format!("entry {entry_id}")))
    }
}
