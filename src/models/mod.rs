//! Canonical data model for the prontuário client.
//!
//! Wire field names follow the backend's Portuguese JSON contract
//! (`descricao`, `nome_arquivo`, ...); Rust-side names stay in English.
//! Tag fields are closed enums, not strings — an unhandled variant is a
//! compile error, not a silent fall-through.

mod attachment;
mod container;
mod entry;
mod enums;

pub use attachment::{classify_document, Attachment, NewAttachment};
pub use container::RecordContainer;
pub use entry::{NewEntry, RecordEntry};
pub use enums::{DocumentKind, EntryKind, InvalidTag};
