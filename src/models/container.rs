use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The medical-record anchor object, one per patient ("prontuário").
///
/// Created implicitly by the backend on first patient registration;
/// this client only ever reads it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordContainer {
    pub id: Uuid,
    #[serde(rename = "paciente_id")]
    pub patient_id: String,
}
