use crate::models::{EntryKind, RecordEntry};

use super::types::RecordLanes;

/// Partition a container's entries into display lanes.
///
/// Pure function over the server-ordered entry list. All ordering is by
/// creation time descending via a stable sort, so entries sharing a
/// timestamp keep their server-returned relative order — there is no
/// secondary sort key, by contract.
pub fn partition_entries(mut entries: Vec<RecordEntry>) -> RecordLanes {
    entries.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    let image_entries: Vec<RecordEntry> = entries
        .iter()
        .filter(|e| e.has_image_attachment())
        .cloned()
        .collect();
    let document_entries: Vec<RecordEntry> = entries
        .iter()
        .filter(|e| e.has_document_attachment())
        .cloned()
        .collect();

    let (anamnesis_history, timeline): (Vec<_>, Vec<_>) = entries
        .into_iter()
        .partition(|e| e.kind == EntryKind::Anamnesis);

    // After the stable descending sort, the head of the anamnesis history is
    // the maximal-timestamp entry, earliest in server order among ties.
    let latest_anamnesis = anamnesis_history.first().cloned();

    RecordLanes {
        latest_anamnesis,
        anamnesis_history,
        timeline,
        image_entries,
        document_entries,
    }
}
