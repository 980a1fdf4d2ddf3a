//! Shared application state handed to every handler.

use std::sync::Arc;

use tracing::info;

use carebook_contracts::error::CarebookResult;
use carebook_core::traits::{PayloadValidator, RecordStore};
use carebook_core::PatientService;
use carebook_premium::{ForestClassifier, PremiumAdapter};
use carebook_store::JsonFileStore;
use carebook_verify::PayloadVerifier;

use crate::config::ServiceConfig;

#[derive(Clone)]
pub struct AppState {
    pub patients: Arc<PatientService>,
    pub validator: Arc<dyn PayloadValidator>,
    pub premium: PremiumAdapter,
}

impl AppState {
    pub fn new(
        patients: Arc<PatientService>,
        validator: Arc<dyn PayloadValidator>,
        premium: PremiumAdapter,
    ) -> Self {
        Self {
            patients,
            validator,
            premium,
        }
    }

    /// Wire the file store, the schema verifier and the forest model named
    /// in `config`.
    ///
    /// The store is read once here so a missing or corrupt file stops
    /// startup instead of failing the first request.
    pub fn from_config(config: &ServiceConfig) -> CarebookResult<Self> {
        let store = JsonFileStore::new(config.store.path.clone());
        let existing = store.load()?;
        info!(
            path = %config.store.path.display(),
            patients = existing.len(),
            "patient store opened"
        );

        let validator: Arc<dyn PayloadValidator> = Arc::new(PayloadVerifier::new()?);
        let classifier = ForestClassifier::from_file(&config.model.path)?;

        let patients = PatientService::new(Box::new(store), Arc::clone(&validator));
        Ok(Self::new(
            Arc::new(patients),
            validator,
            PremiumAdapter::new(Arc::new(classifier)),
        ))
    }
}
