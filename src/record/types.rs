use serde::Serialize;

use crate::models::{Attachment, RecordEntry};

/// A patient's record partitioned into display lanes — single payload.
///
/// A patient with no container yet gets the default (all lanes empty);
/// that is the normal "new patient" state, not an error.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RecordLanes {
    /// The authoritative current anamnesis: maximal creation timestamp,
    /// first in server order on ties.
    pub latest_anamnesis: Option<RecordEntry>,
    /// All ANAMNESE entries, newest first. History is preserved even though
    /// only the latest is authoritative.
    pub anamnesis_history: Vec<RecordEntry>,
    /// All non-ANAMNESE entries, newest first.
    pub timeline: Vec<RecordEntry>,
    /// Entries carrying at least one photo/radiograph attachment.
    pub image_entries: Vec<RecordEntry>,
    /// Entries carrying at least one attachment of any other kind.
    pub document_entries: Vec<RecordEntry>,
}

impl RecordLanes {
    pub fn is_empty(&self) -> bool {
        self.latest_anamnesis.is_none() && self.timeline.is_empty()
    }

    /// Total entries across the anamnesis history and the timeline.
    pub fn entry_count(&self) -> usize {
        self.anamnesis_history.len() + self.timeline.len()
    }
}

/// An attachment paired with the URL it can actually be displayed from.
///
/// The URL is either the legacy absolute URL stored on the attachment or a
/// fresh time-limited signed URL — held in memory only, never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedAttachment {
    pub attachment: Attachment,
    pub url: String,
}
