//! Prontuário aggregation — the read/write core of the client.
//!
//! Fetches a patient's record container and its typed entries, partitions
//! them into display lanes (current anamnesis, timeline, images,
//! documents), resolves attachment storage paths into signed URLs, and
//! appends new entries and files. Returns each concern in a single payload.

mod append;
mod fetch;
mod partition;
mod resolver;
mod types;

pub use append::{FileUpload, RecordAppender};
pub use fetch::MedicalRecordAggregator;
pub use partition::partition_entries;
pub use resolver::AttachmentResolver;
pub use types::{RecordLanes, ResolvedAttachment};

// ── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RecordError;
    use crate::gateway::{sample_attachment, MockBlobGateway, MockRecordGateway, RecordGateway};
    use crate::models::{DocumentKind, EntryKind};

    fn aggregator_with_container(patient: &str) -> (MedicalRecordAggregator<MockRecordGateway>, uuid::Uuid) {
        let gateway = MockRecordGateway::new();
        let container = gateway.register_container(patient);
        (MedicalRecordAggregator::new(gateway), container)
    }

    // ── Aggregation Tests ──────────────────────────────────────────────

    #[tokio::test]
    async fn unknown_patient_gets_empty_lanes_not_an_error() {
        let aggregator = MedicalRecordAggregator::new(MockRecordGateway::new());
        let lanes = aggregator.aggregate("nunca-cadastrado").await.unwrap();
        assert!(lanes.is_empty());
        assert_eq!(lanes.entry_count(), 0);
    }

    #[tokio::test]
    async fn empty_patient_id_is_rejected_before_any_call() {
        let aggregator = MedicalRecordAggregator::new(MockRecordGateway::new());
        let result = aggregator.aggregate("  ").await;
        assert!(matches!(result, Err(RecordError::Validation(_))));
    }

    #[tokio::test]
    async fn backend_outage_surfaces_as_fetch_error() {
        let (aggregator, _container) = aggregator_with_container("p1");
        aggregator.gateway().fail_everything();

        let result = aggregator.aggregate("p1").await;
        assert!(matches!(result, Err(RecordError::Fetch(_))));
    }

    #[tokio::test]
    async fn latest_anamnesis_and_timeline_split() {
        // entries [ANAMNESE t=10, ANAMNESE t=20, EVOLUCAO_VISITA t=15]
        let (aggregator, container) = aggregator_with_container("p1");
        let gateway = aggregator.gateway();
        gateway.seed_entry(container, EntryKind::Anamnesis, "primeira anamnese", 10);
        let latest = gateway.seed_entry(container, EntryKind::Anamnesis, "anamnese atualizada", 20);
        let visit = gateway.seed_entry(container, EntryKind::EvolutionVisit, "retorno", 15);

        let lanes = aggregator.aggregate("p1").await.unwrap();

        assert_eq!(lanes.latest_anamnesis.as_ref().unwrap().id, latest);
        assert_eq!(lanes.timeline.len(), 1, "timeline excludes anamnesis");
        assert_eq!(lanes.timeline[0].id, visit);
        assert_eq!(lanes.anamnesis_history.len(), 2);
        assert_eq!(lanes.anamnesis_history[0].id, latest, "history newest first");
    }

    #[tokio::test]
    async fn tied_anamnesis_timestamps_keep_server_order() {
        let (aggregator, container) = aggregator_with_container("p1");
        let gateway = aggregator.gateway();
        let first = gateway.seed_entry(container, EntryKind::Anamnesis, "chegou primeiro", 30);
        gateway.seed_entry(container, EntryKind::Anamnesis, "chegou depois", 30);

        let lanes = aggregator.aggregate("p1").await.unwrap();
        assert_eq!(
            lanes.latest_anamnesis.unwrap().id,
            first,
            "first in server order wins the tie"
        );
    }

    #[tokio::test]
    async fn timeline_sorted_descending_stable() {
        let (aggregator, container) = aggregator_with_container("p1");
        let gateway = aggregator.gateway();
        gateway.seed_entry(container, EntryKind::EvolutionVisit, "old", 10);
        let tied_a = gateway.seed_entry(container, EntryKind::Diagnosis, "tied a", 40);
        let tied_b = gateway.seed_entry(container, EntryKind::TreatmentPlan, "tied b", 40);
        gateway.seed_entry(container, EntryKind::GeneralObservation, "middle", 25);

        let lanes = aggregator.aggregate("p1").await.unwrap();
        let ids: Vec<_> = lanes.timeline.iter().map(|e| e.id).collect();
        assert_eq!(ids[0], tied_a);
        assert_eq!(ids[1], tied_b);
        for pair in lanes.timeline.windows(2) {
            assert!(pair[0].created_at >= pair[1].created_at);
        }
    }

    #[tokio::test]
    async fn attachment_kinds_split_image_and_document_lanes() {
        let (aggregator, container) = aggregator_with_container("p1");
        let gateway = aggregator.gateway();
        let with_photo = gateway.seed_entry_with_attachments(
            container,
            EntryKind::EvolutionVisit,
            "fotos iniciais",
            10,
            vec![sample_attachment("sorriso.png", "uploads/sorriso.png", DocumentKind::Photo)],
        );
        let with_certificate = gateway.seed_entry_with_attachments(
            container,
            EntryKind::GeneralObservation,
            "atestado",
            20,
            vec![sample_attachment(
                "atestado.pdf",
                "uploads/atestado.pdf",
                DocumentKind::Certificate,
            )],
        );
        let mixed = gateway.seed_entry_with_attachments(
            container,
            EntryKind::EvolutionVisit,
            "raio-x e receita",
            30,
            vec![
                sample_attachment("raio-x.png", "uploads/raio-x.png", DocumentKind::Radiograph),
                sample_attachment("receita.pdf", "uploads/receita.pdf", DocumentKind::Other),
            ],
        );
        gateway.seed_entry(container, EntryKind::EvolutionVisit, "sem arquivos", 40);

        let lanes = aggregator.aggregate("p1").await.unwrap();

        let image_ids: Vec<_> = lanes.image_entries.iter().map(|e| e.id).collect();
        assert_eq!(image_ids, vec![mixed, with_photo], "newest first");

        let document_ids: Vec<_> = lanes.document_entries.iter().map(|e| e.id).collect();
        assert_eq!(document_ids, vec![mixed, with_certificate]);
    }

    #[tokio::test]
    async fn container_without_entries_is_empty_but_present() {
        let (aggregator, _container) = aggregator_with_container("p1");
        let lanes = aggregator.aggregate("p1").await.unwrap();
        assert!(lanes.is_empty());
    }

    // ── Resolver Tests ─────────────────────────────────────────────────

    #[tokio::test]
    async fn absolute_urls_pass_through_without_gateway_call() {
        let resolver = AttachmentResolver::new(MockBlobGateway::new());
        let url = resolver.resolve("http://legado.example/foto.png").await.unwrap();
        assert_eq!(url, "http://legado.example/foto.png");
        assert_eq!(resolver.gateway().sign_calls(), 0, "pass-through must not exchange");
    }

    #[tokio::test]
    async fn storage_paths_are_exchanged() {
        let resolver = AttachmentResolver::new(MockBlobGateway::new());
        let url = resolver.resolve("uploads/foto.png").await.unwrap();
        assert!(url.starts_with("https://storage.example/signed/uploads/foto.png"));
        assert_eq!(resolver.gateway().sign_calls(), 1);
    }

    #[tokio::test]
    async fn one_failed_exchange_drops_only_that_attachment() {
        let blobs = MockBlobGateway::new();
        blobs.fail_path("uploads/corrompido.png");
        let resolver = AttachmentResolver::new(blobs);

        let attachments = vec![
            sample_attachment("a.png", "uploads/a.png", DocumentKind::Photo),
            sample_attachment("corrompido.png", "uploads/corrompido.png", DocumentKind::Photo),
            sample_attachment("c.png", "uploads/c.png", DocumentKind::Photo),
        ];

        let resolved = resolver.resolve_all(&attachments).await;
        assert_eq!(resolved.len(), 2, "exactly N-1 survive");
        assert!(resolved.iter().all(|r| r.attachment.filename != "corrompido.png"));
    }

    #[tokio::test]
    async fn each_resolve_all_issues_fresh_exchanges() {
        let resolver = AttachmentResolver::new(MockBlobGateway::new());
        let attachments = vec![sample_attachment("a.png", "uploads/a.png", DocumentKind::Photo)];

        resolver.resolve_all(&attachments).await;
        resolver.resolve_all(&attachments).await;
        assert_eq!(resolver.gateway().sign_calls(), 2, "no cross-call cache");
    }

    // ── Append Tests ───────────────────────────────────────────────────

    #[tokio::test]
    async fn blank_description_blocks_before_network() {
        let appender = RecordAppender::new(MockRecordGateway::new(), MockBlobGateway::new());
        let result = appender
            .append_entry(uuid::Uuid::new_v4(), EntryKind::EvolutionVisit, "   ")
            .await;
        assert!(matches!(result, Err(RecordError::Validation(_))));
        assert_eq!(appender.records().entry_count(), 0);
    }

    #[tokio::test]
    async fn read_after_write_visibility() {
        let records = MockRecordGateway::new();
        let container = records.register_container("p1");
        let appender = RecordAppender::new(records, MockBlobGateway::new());

        let created = appender
            .append_entry(container, EntryKind::EvolutionVisit, "limpeza realizada")
            .await
            .unwrap();

        let entries = appender.records().list_entries(container, None).await.unwrap();
        assert!(entries.iter().any(|e| e.id == created.id));
    }

    #[tokio::test]
    async fn attach_to_existing_entry() {
        let records = MockRecordGateway::new();
        let container = records.register_container("p1");
        let entry = records.seed_entry(container, EntryKind::EvolutionVisit, "consulta", 10);
        let appender = RecordAppender::new(records, MockBlobGateway::new());

        let updated = appender
            .attach_file(
                container,
                Some(entry),
                FileUpload {
                    filename: "sorriso.png".into(),
                    bytes: vec![0x89, 0x50, 0x4e, 0x47],
                    mime_type: Some("image/png".into()),
                    description: None,
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.id, entry);
        assert_eq!(updated.attachments.len(), 1);
        assert_eq!(updated.attachments[0].document_kind, DocumentKind::Photo);
        assert_eq!(updated.attachments[0].storage_path, "uploads/sorriso.png");
    }

    #[tokio::test]
    async fn attach_without_entry_creates_observation_holder() {
        let records = MockRecordGateway::new();
        let container = records.register_container("p1");
        let appender = RecordAppender::new(records, MockBlobGateway::new());

        let holder = appender
            .attach_file(
                container,
                None,
                FileUpload {
                    filename: "raio-x-lateral.png".into(),
                    bytes: vec![1, 2, 3],
                    mime_type: None,
                    description: Some("raio-x lateral".into()),
                },
            )
            .await
            .unwrap();

        assert_eq!(holder.kind, EntryKind::GeneralObservation);
        assert_eq!(holder.attachments.len(), 1);
        assert_eq!(holder.attachments[0].document_kind, DocumentKind::Radiograph);
    }

    #[tokio::test]
    async fn failed_attachment_compensates_fallback_entry() {
        let records = MockRecordGateway::new();
        let container = records.register_container("p1");
        records.fail_attachments();
        let appender = RecordAppender::new(records, MockBlobGateway::new());

        let result = appender
            .attach_file(
                container,
                None,
                FileUpload {
                    filename: "foto.png".into(),
                    bytes: vec![1],
                    mime_type: Some("image/png".into()),
                    description: None,
                },
            )
            .await;

        assert!(matches!(result, Err(RecordError::Fetch(_))));
        assert_eq!(
            appender.records().entry_count(),
            0,
            "orphaned fallback entry must be deleted"
        );
        assert_eq!(appender.records().deleted_entries().len(), 1);
    }

    #[tokio::test]
    async fn failed_attachment_keeps_caller_supplied_entry() {
        let records = MockRecordGateway::new();
        let container = records.register_container("p1");
        let entry = records.seed_entry(container, EntryKind::EvolutionVisit, "consulta", 10);
        records.fail_attachments();
        let appender = RecordAppender::new(records, MockBlobGateway::new());

        let result = appender
            .attach_file(
                container,
                Some(entry),
                FileUpload {
                    filename: "foto.png".into(),
                    bytes: vec![1],
                    mime_type: Some("image/png".into()),
                    description: None,
                },
            )
            .await;

        assert!(result.is_err());
        assert_eq!(appender.records().entry_count(), 1, "existing entry is not compensation's to delete");
        assert!(appender.records().deleted_entries().is_empty());
    }

    #[tokio::test]
    async fn upload_failure_creates_no_entry_at_all() {
        let records = MockRecordGateway::new();
        let container = records.register_container("p1");
        let blobs = MockBlobGateway::new();
        blobs.fail_uploads();
        let appender = RecordAppender::new(records, blobs);

        let result = appender
            .attach_file(
                container,
                None,
                FileUpload {
                    filename: "foto.png".into(),
                    bytes: vec![1],
                    mime_type: Some("image/png".into()),
                    description: None,
                },
            )
            .await;

        assert!(result.is_err());
        assert_eq!(appender.records().entry_count(), 0);
    }

    // ── Partition Unit Tests ───────────────────────────────────────────

    #[test]
    fn partition_of_nothing_is_default() {
        let lanes = partition_entries(vec![]);
        assert!(lanes.is_empty());
        assert!(lanes.image_entries.is_empty());
        assert!(lanes.document_entries.is_empty());
    }
}
