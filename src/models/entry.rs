use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::attachment::Attachment;
use super::enums::EntryKind;

/// One timestamped, typed note within a patient's record ("entrada").
///
/// Entries are immutable once created; corrections and new information are
/// appended as new entries. The most recent ANAMNESE entry is the
/// authoritative current anamnesis, older ones are history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordEntry {
    pub id: Uuid,
    #[serde(rename = "prontuario_id")]
    pub container_id: Uuid,
    #[serde(rename = "tipo")]
    pub kind: EntryKind,
    #[serde(rename = "descricao")]
    pub description: String,
    #[serde(rename = "data_criacao")]
    pub created_at: NaiveDateTime,
    #[serde(rename = "profissional_id")]
    pub professional_id: Option<Uuid>,
    #[serde(rename = "arquivos", default)]
    pub attachments: Vec<Attachment>,
}

impl RecordEntry {
    /// Whether any attachment belongs to the image lane (photo/radiograph).
    pub fn has_image_attachment(&self) -> bool {
        self.attachments.iter().any(|a| a.document_kind.is_image())
    }

    /// Whether any attachment belongs to the document lane.
    pub fn has_document_attachment(&self) -> bool {
        self.attachments.iter().any(|a| !a.document_kind.is_image())
    }
}

/// Payload for `POST /prontuarios/{id}/entradas`.
#[derive(Debug, Clone, Serialize)]
pub struct NewEntry {
    #[serde(rename = "tipo")]
    pub kind: EntryKind,
    #[serde(rename = "descricao")]
    pub description: String,
}
