//! Patient record types.
//!
//! `Patient` holds only the raw attributes that are persisted. Derived values
//! (BMI, weight verdict) live on `PatientView` and are computed fresh every
//! time a record is returned to a caller.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CarebookError;

/// Short unique identifier of a patient, e.g. `PatientId("P001")`.
///
/// Length limits are enforced by the validation layer, not by construction,
/// so that stored ids can always be read back and reported.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PatientId(pub String);

impl PatientId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PatientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

/// The persisted attributes of one patient.
///
/// Unknown keys are ignored on read, so stores written by older tooling that
/// embedded computed fields still load; those keys disappear on the next save.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    pub name: String,
    pub city: String,
    pub gender: Gender,
    /// Age in whole years.
    pub age: u32,
    /// Height in meters.
    pub height: f64,
    /// Weight in kilograms.
    pub weight: f64,
}

/// Body of a create request: the new id plus every raw attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPatient {
    #[serde(alias = "Id")]
    pub id: PatientId,
    #[serde(flatten)]
    pub patient: Patient,
}

/// Body of a partial update. Absent fields keep their stored value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatientUpdate {
    pub name: Option<String>,
    pub city: Option<String>,
    pub gender: Option<Gender>,
    pub age: Option<u32>,
    pub height: Option<f64>,
    pub weight: Option<f64>,
}

impl PatientUpdate {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// BMI-based weight-status category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    Underweight,
    Normal,
    Overweight,
    Obese,
    #[serde(rename = "Extremely Obese")]
    ExtremelyObese,
}

/// A patient as returned to callers: raw attributes plus derived fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientView {
    /// Present in list-shaped responses, where the id is not otherwise known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<PatientId>,
    #[serde(flatten)]
    pub patient: Patient,
    pub bmi: f64,
    pub verdict: Verdict,
}

/// The whole store, keyed by id in ascending order.
pub type PatientMap = BTreeMap<PatientId, Patient>;

/// Fields a patient listing can be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Age,
    Height,
    Weight,
    Bmi,
}

impl SortKey {
    pub const ALLOWED: [&'static str; 4] = ["age", "height", "weight", "bmi"];
}

impl FromStr for SortKey {
    type Err = CarebookError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "age" => Ok(Self::Age),
            "height" => Ok(Self::Height),
            "weight" => Ok(Self::Weight),
            "bmi" => Ok(Self::Bmi),
            other => Err(CarebookError::BadRequest {
                reason: format!(
                    "invalid sort_by '{other}', select one of {:?}",
                    Self::ALLOWED
                ),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Asc,
    Des,
}

impl FromStr for SortOrder {
    type Err = CarebookError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(Self::Asc),
            "des" => Ok(Self::Des),
            other => Err(CarebookError::BadRequest {
                reason: format!("invalid order '{other}', select \"asc\" or \"des\""),
            }),
        }
    }
}
