//! Prontua — client for a clinic's medical-record ("prontuário") backend.
//!
//! The backend and the blob-storage service are external collaborators
//! reached over HTTP; this crate owns the typed model, the lane
//! aggregation, signed-URL attachment resolution, and the tab-session
//! state the record screen runs on.

pub mod config;
pub mod error;
pub mod gateway;
pub mod models;
pub mod record; // lane aggregation, attachment resolution, entry append
pub mod shell; // tab navigation + per-patient session cache

pub use error::RecordError;
pub use record::{
    AttachmentResolver, FileUpload, MedicalRecordAggregator, RecordAppender, RecordLanes,
    ResolvedAttachment,
};
pub use shell::{LoadRequest, Tab, TabShell};

use tracing_subscriber::EnvFilter;

/// Initialize tracing for binaries embedding this crate.
/// Safe to call more than once; later calls are no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .try_init();
}
