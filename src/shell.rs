//! Tab-navigation shell for the prontuário screen.
//!
//! Single-threaded UI state machine: exactly one tab active at a time,
//! starting at SOBRE, no terminal state. Entering ANAMNESE or EVOLUCAO asks
//! for the patient's lanes to be loaded if they are not yet cached; the
//! shell itself does no I/O — it hands out `LoadRequest`s and the caller
//! runs them through the aggregator. Lanes stay cached per patient for the
//! shell's lifetime, so tab churn never refetches.
//!
//! Key properties:
//! - `apply` is the mount-guard: a response for a patient the user has
//!   navigated away from is ignored, not aborted
//! - switching tabs or patients never discards already-fetched lanes

use std::collections::HashMap;

use crate::record::RecordLanes;

// ═══════════════════════════════════════════════════════════
// Tabs
// ═══════════════════════════════════════════════════════════

/// The prontuário screen's tabs, named as the UI shows them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tab {
    Sobre,
    Anamnese,
    Evolucao,
    Financeiro,
    Imagens,
    Documentos,
}

impl Tab {
    /// Tabs that need the record lanes fetched on entry. IMAGENS and
    /// DOCUMENTOS only re-slice lanes already loaded by these two.
    pub fn requires_record(&self) -> bool {
        matches!(self, Tab::Anamnese | Tab::Evolucao)
    }
}

/// A pending fetch handed to the caller by `select`.
///
/// Tagged with the patient it was issued for; `apply` checks the tag
/// against the active patient before storing anything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadRequest {
    patient_id: String,
}

impl LoadRequest {
    pub fn patient_id(&self) -> &str {
        &self.patient_id
    }
}

// ═══════════════════════════════════════════════════════════
// TabShell
// ═══════════════════════════════════════════════════════════

/// Tab state machine plus per-patient lane cache.
pub struct TabShell {
    active: Tab,
    patient_id: Option<String>,
    loaded: HashMap<String, RecordLanes>,
}

impl TabShell {
    /// Fresh shell: SOBRE active, no patient, nothing loaded.
    pub fn new() -> Self {
        Self {
            active: Tab::Sobre,
            patient_id: None,
            loaded: HashMap::new(),
        }
    }

    pub fn active_tab(&self) -> Tab {
        self.active
    }

    pub fn patient_id(&self) -> Option<&str> {
        self.patient_id.as_deref()
    }

    /// Show another patient's record. Resets to SOBRE; caches for other
    /// patients are kept so coming back is free.
    pub fn set_patient(&mut self, patient_id: impl Into<String>) {
        self.patient_id = Some(patient_id.into());
        self.active = Tab::Sobre;
    }

    // ── Navigation ───────────────────────────────────────

    /// Activate a tab. Returns a `LoadRequest` when entering a
    /// record-backed tab whose lanes are not yet cached for the current
    /// patient; the caller resolves it through the aggregator and feeds
    /// the result back via `apply`.
    pub fn select(&mut self, tab: Tab) -> Option<LoadRequest> {
        self.active = tab;
        if !tab.requires_record() {
            return None;
        }
        let patient_id = self.patient_id.as_ref()?;
        if self.loaded.contains_key(patient_id) {
            return None;
        }
        Some(LoadRequest {
            patient_id: patient_id.clone(),
        })
    }

    /// Store fetched lanes. Returns false — and stores nothing — when the
    /// request's patient is no longer the active one (stale response after
    /// navigating away).
    pub fn apply(&mut self, request: &LoadRequest, lanes: RecordLanes) -> bool {
        if self.patient_id.as_deref() != Some(request.patient_id.as_str()) {
            tracing::debug!(
                requested = %request.patient_id,
                "ignoring stale record load for switched-away patient"
            );
            return false;
        }
        self.loaded.insert(request.patient_id.clone(), lanes);
        true
    }

    // ── Cache access ─────────────────────────────────────

    /// Lanes for the active patient, if loaded.
    pub fn lanes(&self) -> Option<&RecordLanes> {
        self.patient_id.as_ref().and_then(|id| self.loaded.get(id))
    }

    pub fn is_loaded(&self, patient_id: &str) -> bool {
        self.loaded.contains_key(patient_id)
    }

    /// Drop a patient's cached lanes so the next record-backed tab entry
    /// refetches — used after appending an entry or attachment.
    pub fn invalidate(&mut self, patient_id: &str) {
        self.loaded.remove(patient_id);
    }

    pub fn clear(&mut self) {
        self.loaded.clear();
    }
}

impl Default for TabShell {
    fn default() -> Self {
        Self::new()
    }
}

// ═══════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════
