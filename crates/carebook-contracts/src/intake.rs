//! Patient intake forms collected on the client side.
//!
//! Richer than a stored `Patient`: contact numbers, allergies, an optional
//! address and a link to uploaded checkup files. Intake forms are checked by
//! the validation layer and never written to the patient store.

use std::collections::BTreeMap;

use std::fmt;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Address {
    pub city: String,
    /// Six-digit postal code, kept as text so leading zeros survive.
    /// Clients may send it as a JSON number.
    #[serde(deserialize_with = "pincode_text")]
    pub pincode: String,
    pub state: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntakeForm {
    pub name: String,
    pub email: String,
    /// Share link to uploaded checkup files, if the patient has any.
    #[serde(default)]
    pub file_drive: Option<String>,
    pub age: u32,
    pub weight: f64,
    pub height: f64,
    #[serde(default)]
    pub married: bool,
    #[serde(default)]
    pub allergies: Option<Vec<String>>,
    /// Labelled phone numbers, e.g. `{"phone1": "...", "emergency": "..."}`.
    pub contact_no: BTreeMap<String, String>,
    #[serde(default)]
    pub address: Option<Address>,
}

/// Read a pincode given either as a string or as a whole number.
fn pincode_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    struct PincodeVisitor;

    impl<'de> Visitor<'de> for PincodeVisitor {
        type Value = String;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a pincode as a string or a whole number")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<String, E> {
            u64::try_from(v)
                .map(|v| v.to_string())
                .map_err(|_| E::custom(format!("pincode {v} is negative")))
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<String, E> {
            if v.fract() == 0.0 && v >= 0.0 && v <= u64::MAX as f64 {
                Ok((v as u64).to_string())
            } else {
                Err(E::custom(format!("pincode {v} is not a whole number")))
            }
        }
    }

    deserializer.deserialize_any(PincodeVisitor)
}

/// An intake form that passed validation, normalized, with its BMI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcceptedIntake {
    pub form: IntakeForm,
    pub bmi: f64,
}
