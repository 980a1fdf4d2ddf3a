//! Payload verifier for the Carebook service.
//!
//! `PayloadVerifier` implements the `PayloadValidator` trait from
//! `carebook-core`. Verification runs in up to three phases:
//!
//! 1. **Structural**: the raw JSON payload is validated against the
//!    matching document from `schemas` using the `jsonschema` crate.
//! 2. **Typed**: the payload is deserialized into its contract type.
//! 3. **Semantic**: rules from `rules` run on the typed value (intake
//!    forms only).
//!
//! Failures within a phase are all collected before returning, so the
//! client sees every offending field at once.

use jsonschema::error::ValidationErrorKind;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use carebook_contracts::{
    error::{CarebookError, CarebookResult},
    intake::{AcceptedIntake, IntakeForm},
    patient::{NewPatient, Patient, PatientId, PatientUpdate},
    premium::PredictionInput,
    validate::FieldViolation,
};
use carebook_core::{derive, traits::PayloadValidator};

use crate::{rules, schemas};

/// One compiled JSON Schema plus the name it is reported under.
struct CompiledSchema {
    name: &'static str,
    validator: jsonschema::Validator,
}

impl CompiledSchema {
    fn compile(name: &'static str, document: Value) -> CarebookResult<Self> {
        let validator =
            jsonschema::validator_for(&document).map_err(|e| CarebookError::Config {
                reason: format!("invalid JSON Schema '{name}': {e}"),
            })?;
        Ok(Self { name, validator })
    }

    /// Collect every structural violation of `payload`.
    fn violations(&self, payload: &Value) -> Vec<FieldViolation> {
        self.validator
            .iter_errors(payload)
            .map(|error| {
                let mut field = pointer_to_field(&error.instance_path.to_string());
                // A missing key is reported against its parent object.
                if let ValidationErrorKind::Required { property } = &error.kind {
                    if let Some(name) = property.as_str() {
                        if !field.is_empty() {
                            field.push('.');
                        }
                        field.push_str(name);
                    }
                }
                let violation = FieldViolation::new(field, error.to_string());
                warn!(schema = self.name, %violation, "structural validation failure");
                violation
            })
            .collect()
    }
}

/// The Carebook payload verifier.
///
/// Schemas are compiled once at construction; the verifier is then shared
/// read-only across requests.
pub struct PayloadVerifier {
    create: CompiledSchema,
    update: CompiledSchema,
    prediction: CompiledSchema,
    intake: CompiledSchema,
}

impl PayloadVerifier {
    /// Compile every payload schema.
    ///
    /// Returns `CarebookError::Config` if a bundled schema fails to compile.
    pub fn new() -> CarebookResult<Self> {
        Ok(Self {
            create: CompiledSchema::compile("patient-create", schemas::patient_create())?,
            update: CompiledSchema::compile("patient-update", schemas::patient_update())?,
            prediction: CompiledSchema::compile("prediction-input", schemas::prediction_input())?,
            intake: CompiledSchema::compile("intake-form", schemas::intake_form())?,
        })
    }

    /// Validate an intake form and normalize it.
    ///
    /// On success the name is upper-cased and the BMI attached.
    pub fn intake(&self, payload: &Value) -> CarebookResult<AcceptedIntake> {
        let mut form: IntakeForm = structural_then_typed(&self.intake, payload)?;

        let failures = rules::check_intake(&form);
        if !failures.is_empty() {
            for violation in &failures {
                warn!(schema = self.intake.name, %violation, "semantic rule failed");
            }
            return Err(CarebookError::Validation { failures });
        }

        form.name = form.name.to_uppercase();
        let bmi = derive::bmi(form.weight, form.height);
        debug!(name = %form.name, bmi, "intake form accepted");

        Ok(AcceptedIntake { form, bmi })
    }
}

impl PayloadValidator for PayloadVerifier {
    fn new_patient(&self, payload: &Value) -> CarebookResult<NewPatient> {
        let payload = with_canonical_id(payload);
        let new: NewPatient = structural_then_typed(&self.create, &payload)?;
        debug!(id = %new.id, "create payload accepted");
        Ok(new)
    }

    fn patient_update(&self, payload: &Value) -> CarebookResult<PatientUpdate> {
        structural_then_typed(&self.update, payload)
    }

    /// Re-run the create schema over a complete record, as if it were new.
    fn patient(&self, id: &PatientId, patient: &Patient) -> CarebookResult<()> {
        let record = NewPatient {
            id: id.clone(),
            patient: patient.clone(),
        };
        let payload = serde_json::to_value(&record).map_err(|e| CarebookError::StateError {
            reason: format!("failed to serialize patient '{id}': {e}"),
        })?;

        let failures = self.create.violations(&payload);
        if failures.is_empty() {
            Ok(())
        } else {
            Err(CarebookError::Validation { failures })
        }
    }

    fn prediction_input(&self, payload: &Value) -> CarebookResult<PredictionInput> {
        structural_then_typed(&self.prediction, payload)
    }
}

/// Phases 1 and 2: schema check, then deserialization into `T`.
fn structural_then_typed<T: DeserializeOwned>(
    schema: &CompiledSchema,
    payload: &Value,
) -> CarebookResult<T> {
    let failures = schema.violations(payload);
    if !failures.is_empty() {
        return Err(CarebookError::Validation { failures });
    }

    serde_json::from_value(with_whole_numbers(payload)).map_err(|e| {
        warn!(schema = schema.name, error = %e, "payload does not fit its contract type");
        CarebookError::invalid("", e.to_string())
    })
}

/// Keys whose schema type is `integer`. JSON Schema counts `31.0` as an
/// integer but serde will not read it into a `u32`.
const INTEGER_FIELDS: [&str; 1] = ["age"];

/// Rewrite whole-number floats under `INTEGER_FIELDS` as integers.
fn with_whole_numbers(payload: &Value) -> Value {
    let mut payload = payload.clone();
    if let Some(object) = payload.as_object_mut() {
        for key in INTEGER_FIELDS {
            let whole = object
                .get(key)
                .and_then(Value::as_f64)
                .filter(|v| v.fract() == 0.0 && *v >= 0.0 && *v <= u32::MAX as f64);
            if let Some(value) = whole {
                object.insert(key.to_string(), Value::from(value as u64));
            }
        }
    }
    payload
}

/// Accept the legacy `Id` key by renaming it to `id` when `id` is absent.
fn with_canonical_id(payload: &Value) -> Value {
    let mut payload = payload.clone();
    if let Some(object) = payload.as_object_mut() {
        if !object.contains_key("id") {
            if let Some(id) = object.remove("Id") {
                object.insert("id".to_string(), id);
            }
        }
    }
    payload
}

/// `"/address/pincode"` → `"address.pincode"`; the root pointer maps to `""`.
fn pointer_to_field(pointer: &str) -> String {
    pointer.trim_start_matches('/').replace('/', ".")
}

// ── Tests ─────────────────────────────────────────────────────────────────────
