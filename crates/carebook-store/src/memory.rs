//! In-memory implementation of `RecordStore`.
//!
//! Keeps the collection in a `BTreeMap` behind a `Mutex`. `load()` hands out
//! a copy, so mutations only become visible through `save()`, matching the
//! file store's semantics.

use std::sync::{Arc, Mutex};

use carebook_contracts::{
    error::{CarebookError, CarebookResult},
    patient::PatientMap,
};
use carebook_core::traits::RecordStore;

/// A patient store held entirely in memory.
///
/// Clones share the same underlying map.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    patients: Arc<Mutex<PatientMap>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing collection.
    pub fn with_patients(patients: PatientMap) -> Self {
        Self {
            patients: Arc::new(Mutex::new(patients)),
        }
    }
}

impl RecordStore for InMemoryStore {
    fn load(&self) -> CarebookResult<PatientMap> {
        let patients = self.patients.lock().map_err(|e| CarebookError::StateError {
            reason: format!("in-memory store lock poisoned: {e}"),
        })?;
        Ok(patients.clone())
    }

    fn save(&self, patients: &PatientMap) -> CarebookResult<()> {
        let mut stored = self.patients.lock().map_err(|e| CarebookError::StateError {
            reason: format!("in-memory store lock poisoned: {e}"),
        })?;
        *stored = patients.clone();
        Ok(())
    }
}
