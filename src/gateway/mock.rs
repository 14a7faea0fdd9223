//! In-memory gateways for tests — same role as a stub backend.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};
use std::sync::Mutex;

use chrono::NaiveDateTime;
use uuid::Uuid;

use super::{BlobGateway, GatewayError, RecordGateway};
use crate::models::{
    Attachment, DocumentKind, EntryKind, NewAttachment, NewEntry, RecordContainer, RecordEntry,
};

/// Seed epoch for generated timestamps: 2026-01-01 00:00:00.
const CLOCK_EPOCH: i64 = 1_767_225_600;

fn timestamp(secs: i64) -> NaiveDateTime {
    chrono::DateTime::from_timestamp(secs, 0)
        .map(|d| d.naive_utc())
        .unwrap_or_default()
}

/// Build an attachment the way the backend would return it.
pub fn sample_attachment(filename: &str, storage_path: &str, kind: DocumentKind) -> Attachment {
    Attachment {
        id: Uuid::new_v4(),
        filename: filename.to_string(),
        storage_path: storage_path.to_string(),
        mime_type: mime_guess::from_path(filename)
            .first_or_octet_stream()
            .essence_str()
            .to_string(),
        document_kind: kind,
        description: None,
        uploaded_at: timestamp(CLOCK_EPOCH),
    }
}

/// In-memory record backend. Entries are returned in insertion order,
/// which stands in for the server order the tie-break rules rely on.
#[derive(Default)]
pub struct MockRecordGateway {
    containers: Mutex<HashMap<String, RecordContainer>>,
    entries: Mutex<Vec<RecordEntry>>,
    deleted: Mutex<Vec<Uuid>>,
    clock: AtomicI64,
    fail_all: AtomicBool,
    fail_attach: AtomicBool,
}

impl MockRecordGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a container for a patient, returning its id.
    pub fn register_container(&self, patient_id: &str) -> Uuid {
        let container = RecordContainer {
            id: Uuid::new_v4(),
            patient_id: patient_id.to_string(),
        };
        let id = container.id;
        self.containers
            .lock()
            .expect("containers lock")
            .insert(patient_id.to_string(), container);
        id
    }

    /// Seed an entry with an explicit creation offset (seconds past the
    /// mock epoch), so tests control ordering precisely.
    pub fn seed_entry(
        &self,
        container_id: Uuid,
        kind: EntryKind,
        description: &str,
        created_offset_secs: i64,
    ) -> Uuid {
        self.seed_entry_with_attachments(container_id, kind, description, created_offset_secs, vec![])
    }

    pub fn seed_entry_with_attachments(
        &self,
        container_id: Uuid,
        kind: EntryKind,
        description: &str,
        created_offset_secs: i64,
        attachments: Vec<Attachment>,
    ) -> Uuid {
        let entry = RecordEntry {
            id: Uuid::new_v4(),
            container_id,
            kind,
            description: description.to_string(),
            created_at: timestamp(CLOCK_EPOCH + created_offset_secs),
            professional_id: None,
            attachments,
        };
        let id = entry.id;
        self.entries.lock().expect("entries lock").push(entry);
        id
    }

    /// Every subsequent call fails with a 500, as a downed backend would.
    pub fn fail_everything(&self) {
        self.fail_all.store(true, Ordering::SeqCst);
    }

    /// Only `attach_file` fails — exercises the two-step compensation path.
    pub fn fail_attachments(&self) {
        self.fail_attach.store(true, Ordering::SeqCst);
    }

    /// Ids passed to `delete_entry`, oldest first.
    pub fn deleted_entries(&self) -> Vec<Uuid> {
        self.deleted.lock().expect("deleted lock").clone()
    }

    pub fn entry_count(&self) -> usize {
        self.entries.lock().expect("entries lock").len()
    }

    fn outage() -> GatewayError {
        GatewayError::Status {
            status: 500,
            body: "mock backend failure".into(),
        }
    }

    fn check_up(&self) -> Result<(), GatewayError> {
        if self.fail_all.load(Ordering::SeqCst) {
            Err(Self::outage())
        } else {
            Ok(())
        }
    }
}

impl RecordGateway for MockRecordGateway {
    async fn container_for_patient(&self, patient_id: &str) -> Result<RecordContainer, GatewayError> {
        self.check_up()?;
        self.containers
            .lock()
            .expect("containers lock")
            .get(patient_id)
            .cloned()
            .ok_or_else(|| GatewayError::NotFound(format!("prontuario for patient {patient_id}")))
    }

    async fn list_entries(
        &self,
        container_id: Uuid,
        kind: Option<EntryKind>,
    ) -> Result<Vec<RecordEntry>, GatewayError> {
        self.check_up()?;
        Ok(self
            .entries
            .lock()
            .expect("entries lock")
            .iter()
            .filter(|e| e.container_id == container_id)
            .filter(|e| kind.map_or(true, |k| e.kind == k))
            .cloned()
            .collect())
    }

    async fn create_entry(
        &self,
        container_id: Uuid,
        entry: &NewEntry,
    ) -> Result<RecordEntry, GatewayError> {
        self.check_up()?;
        let tick = self.clock.fetch_add(1, Ordering::SeqCst);
        let created = RecordEntry {
            id: Uuid::new_v4(),
            container_id,
            kind: entry.kind,
            description: entry.description.clone(),
            // created entries land after any seeded history
            created_at: timestamp(CLOCK_EPOCH + 1_000_000 + tick),
            professional_id: None,
            attachments: vec![],
        };
        self.entries
            .lock()
            .expect("entries lock")
            .push(created.clone());
        Ok(created)
    }

    async fn delete_entry(&self, entry_id: Uuid) -> Result<(), GatewayError> {
        self.check_up()?;
        let mut entries = self.entries.lock().expect("entries lock");
        let before = entries.len();
        entries.retain(|e| e.id != entry_id);
        if entries.len() == before {
            return Err(GatewayError::NotFound(format!("entry {entry_id}")));
        }
        self.deleted.lock().expect("deleted lock").push(entry_id);
        Ok(())
    }

    async fn attach_file(
        &self,
        _container_id: Uuid,
        entry_id: Uuid,
        attachment: &NewAttachment,
    ) -> Result<Attachment, GatewayError> {
        self.check_up()?;
        if self.fail_attach.load(Ordering::SeqCst) {
            return Err(Self::outage());
        }
        let created = Attachment {
            id: Uuid::new_v4(),
            filename: attachment.filename.clone(),
            storage_path: attachment.storage_path.clone(),
            mime_type: attachment.mime_type.clone(),
            document_kind: attachment.document_kind,
            description: attachment.description.clone(),
            uploaded_at: timestamp(CLOCK_EPOCH + self.clock.fetch_add(1, Ordering::SeqCst)),
        };
        let mut entries = self.entries.lock().expect("entries lock");
        let entry = entries
            .iter_mut()
            .find(|e| e.id == entry_id)
            .ok_or_else(|| GatewayError::NotFound(format!("entry {entry_id}")))?;
        entry.attachments.push(created.clone());
        Ok(created)
    }
}

/// In-memory blob storage. Counts calls so tests can assert the
/// pass-through law (absolute URLs must never reach the gateway).
#[derive(Default)]
pub struct MockBlobGateway {
    upload_calls: AtomicUsize,
    sign_calls: AtomicUsize,
    failing_paths: Mutex<HashSet<String>>,
    fail_uploads: AtomicBool,
}

impl MockBlobGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the signed-URL exchange fail for one specific path.
    pub fn fail_path(&self, path: &str) {
        self.failing_paths
            .lock()
            .expect("failing paths lock")
            .insert(path.to_string());
    }

    pub fn fail_uploads(&self) {
        self.fail_uploads.store(true, Ordering::SeqCst);
    }

    pub fn upload_calls(&self) -> usize {
        self.upload_calls.load(Ordering::SeqCst)
    }

    pub fn sign_calls(&self) -> usize {
        self.sign_calls.load(Ordering::SeqCst)
    }
}

impl BlobGateway for MockBlobGateway {
    async fn upload(&self, filename: &str, _bytes: Vec<u8>, _mime: &str) -> Result<String, GatewayError> {
        self.upload_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_uploads.load(Ordering::SeqCst) {
            return Err(GatewayError::Status {
                status: 500,
                body: "mock storage failure".into(),
            });
        }
        Ok(format!("uploads/{filename}"))
    }

    async fn sign_url(&self, path: &str) -> Result<String, GatewayError> {
        self.sign_calls.fetch_add(1, Ordering::SeqCst);
        if self.failing_paths.lock().expect("failing paths lock").contains(path) {
            return Err(GatewayError::Status {
                status: 500,
                body: format!("mock exchange failure for {path}"),
            });
        }
        Ok(format!("https://storage.example/signed/{path}?expira=3600"))
    }
}
