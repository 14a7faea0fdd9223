use crate::error::RecordError;
use crate::gateway::{GatewayError, RecordGateway};

use super::partition::partition_entries;
use super::types::RecordLanes;

/// Read-side entry point: patient identifier in, partitioned lanes out.
///
/// Pure read — both network calls are idempotent GETs and nothing is
/// mutated. A missing container is recovered into empty lanes here so
/// callers can treat "new patient" and "patient with history" uniformly;
/// only real fetch failures propagate.
pub struct MedicalRecordAggregator<G> {
    gateway: G,
}

impl<G: RecordGateway> MedicalRecordAggregator<G> {
    pub fn new(gateway: G) -> Self {
        Self { gateway }
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub async fn aggregate(&self, patient_id: &str) -> Result<RecordLanes, RecordError> {
        if patient_id.trim().is_empty() {
            return Err(RecordError::Validation("patient identifier is empty".into()));
        }

        let container = match self.gateway.container_for_patient(patient_id).await {
            Ok(container) => container,
            Err(GatewayError::NotFound(_)) => {
                tracing::debug!(patient_id, "no record container yet, returning empty lanes");
                return Ok(RecordLanes::default());
            }
            Err(err) => return Err(err.into()),
        };

        let entries = self.gateway.list_entries(container.id, None).await?;
        tracing::debug!(patient_id, entries = entries.len(), "aggregated record");
        Ok(partition_entries(entries))
    }
}
