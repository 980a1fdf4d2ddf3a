//! Collaborator traits for the Carebook service.
//!
//! - `RecordStore`: durable home of the patient collection
//! - `PayloadValidator`: gate every inbound payload passes before use
//! - `Classifier`: opaque, pre-trained premium model
//!
//! `PatientService` and the prediction adapter depend only on these traits;
//! concrete implementations live in `carebook-store`, `carebook-verify` and
//! `carebook-premium`.

use serde_json::Value;

use carebook_contracts::{
    error::CarebookResult,
    patient::{NewPatient, Patient, PatientId, PatientMap, PatientUpdate},
    premium::{FeatureVector, PredictionInput},
};

/// Whole-collection persistence for patient records.
///
/// There is no per-record API: callers load everything, mutate in memory and
/// save everything back. Implementations must not cache between calls; the
/// backing medium is the only source of truth.
pub trait RecordStore: Send + Sync {
    /// Read the full collection.
    ///
    /// Fails with `CarebookError::Storage` if the backing medium is missing
    /// or its contents cannot be parsed.
    fn load(&self) -> CarebookResult<PatientMap>;

    /// Replace the full collection with `patients`.
    fn save(&self, patients: &PatientMap) -> CarebookResult<()>;
}

/// Validation of raw request payloads.
///
/// Every method reports all violations it finds in one
/// `CarebookError::Validation`, not just the first.
pub trait PayloadValidator: Send + Sync {
    /// Validate a create payload and convert it to a typed `NewPatient`.
    fn new_patient(&self, payload: &Value) -> CarebookResult<NewPatient>;

    /// Validate the fields present in an update payload.
    fn patient_update(&self, payload: &Value) -> CarebookResult<PatientUpdate>;

    /// Re-check a complete record, e.g. after an update was merged into it.
    fn patient(&self, id: &PatientId, patient: &Patient) -> CarebookResult<()>;

    /// Validate a prediction request body.
    fn prediction_input(&self, payload: &Value) -> CarebookResult<PredictionInput>;
}

/// A pre-trained classifier mapping a feature vector to a category label.
///
/// Implementations are loaded once at process start and shared read-only
/// across requests. The label is returned verbatim to the caller.
pub trait Classifier: Send + Sync {
    /// Predict the category for one feature vector.
    fn predict(&self, features: &FeatureVector) -> CarebookResult<String>;

    /// Identifier of the loaded model, used in logs.
    fn model_name(&self) -> &str;
}
