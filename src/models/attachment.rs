use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::DocumentKind;

/// A file linked to exactly one record entry.
///
/// `storage_path` is opaque: either a blob-storage path that must be
/// exchanged for a signed URL before display, or a full URL on legacy
/// entries created before the signed-URL scheme existed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attachment {
    pub id: Uuid,
    #[serde(rename = "nome_arquivo")]
    pub filename: String,
    #[serde(rename = "url_arquivo")]
    pub storage_path: String,
    #[serde(rename = "tipo_arquivo")]
    pub mime_type: String,
    #[serde(rename = "tipo_documento")]
    pub document_kind: DocumentKind,
    #[serde(rename = "descricao")]
    pub description: Option<String>,
    #[serde(rename = "data_upload")]
    pub uploaded_at: NaiveDateTime,
}

/// Payload for `POST /prontuarios/{id}/entradas/{id}/arquivos`.
#[derive(Debug, Clone, Serialize)]
pub struct NewAttachment {
    #[serde(rename = "nome_arquivo")]
    pub filename: String,
    #[serde(rename = "url_arquivo")]
    pub storage_path: String,
    #[serde(rename = "tipo_arquivo")]
    pub mime_type: String,
    #[serde(rename = "tipo_documento")]
    pub document_kind: DocumentKind,
    #[serde(rename = "descricao")]
    pub description: Option<String>,
}

/// Classify an uploaded file into a document kind.
///
/// Dental radiographs arrive as plain images; the clinic's convention is a
/// "raio" marker in the filename (raio-x, raiox), so that check runs before
/// the MIME check. When the caller has no MIME type it is guessed from the
/// filename extension.
pub fn classify_document(filename: &str, mime: Option<&str>) -> DocumentKind {
    let lower = filename.to_lowercase();
    if lower.contains("raio") {
        return DocumentKind::Radiograph;
    }

    let guessed;
    let mime = match mime {
        Some(m) => m,
        None => {
            guessed = mime_guess::from_path(filename)
                .first_or_octet_stream()
                .essence_str()
                .to_string();
            guessed.as_str()
        }
    };

    if mime.starts_with("image/") {
        return DocumentKind::Photo;
    }
    if lower.contains("atestado") {
        return DocumentKind::Certificate;
    }
    DocumentKind::Other
}
