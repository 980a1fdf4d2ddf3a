//! Validation failure types.
//!
//! Validators never stop at the first problem. Every offending field is
//! collected so the client can fix the whole payload in one round trip.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A single rejected field and the constraint it broke.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldViolation {
    /// Dotted path of the field, e.g. `"age"` or `"address.pincode"`.
    /// Empty for violations that concern the payload as a whole.
    pub field: String,
    /// Human-readable description of the broken constraint.
    pub constraint: String,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, constraint: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            constraint: constraint.into(),
        }
    }
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.field.is_empty() {
            write!(f, "{}", self.constraint)
        } else {
            write!(f, "{}: {}", self.field, self.constraint)
        }
    }
}
