//! JSON Schema documents for every inbound payload.
//!
//! The schemas carry the per-field constraints: required keys, JSON types,
//! enumerated values, string lengths and numeric bounds. Rules that need
//! more than one field, or knowledge outside the payload, live in `rules`.

use serde_json::{json, Value};

const GENDERS: [&str; 3] = ["male", "female", "other"];

const OCCUPATIONS: [&str; 7] = [
    "retired",
    "freelancer",
    "student",
    "government_job",
    "business_owner",
    "unemployed",
    "private_job",
];

fn patient_properties() -> Value {
    json!({
        "name":   { "type": "string", "maxLength": 50 },
        "city":   { "type": "string", "maxLength": 50 },
        "gender": { "enum": GENDERS },
        "age":    { "type": "integer", "exclusiveMinimum": 0, "exclusiveMaximum": 120 },
        "height": { "type": "number", "exclusiveMinimum": 0, "exclusiveMaximum": 5 },
        "weight": { "type": "number", "exclusiveMinimum": 0 }
    })
}

/// A complete new patient, id included.
pub fn patient_create() -> Value {
    let mut properties = patient_properties();
    properties["id"] = json!({ "type": "string", "minLength": 1, "maxLength": 5 });

    json!({
        "type": "object",
        "properties": properties,
        "required": ["id", "name", "city", "gender", "age", "height", "weight"]
    })
}

/// A partial update: the same field constraints, nothing required, and no
/// explicit nulls.
pub fn patient_update() -> Value {
    json!({
        "type": "object",
        "properties": patient_properties()
    })
}

pub fn prediction_input() -> Value {
    json!({
        "type": "object",
        "properties": {
            "age":        { "type": "integer", "exclusiveMinimum": 0, "exclusiveMaximum": 120 },
            "weight":     { "type": "number", "exclusiveMinimum": 0 },
            "height":     { "type": "number", "exclusiveMinimum": 0, "exclusiveMaximum": 2.5 },
            "income_lpa": { "type": "number", "exclusiveMinimum": 0 },
            "smoker":     { "type": "boolean" },
            "city":       { "type": "string", "maxLength": 15 },
            "occupation": { "enum": OCCUPATIONS }
        },
        "required": ["age", "weight", "height", "income_lpa", "smoker", "city", "occupation"]
    })
}

pub fn intake_form() -> Value {
    json!({
        "type": "object",
        "properties": {
            "name":       { "type": "string", "maxLength": 50 },
            "email":      { "type": "string" },
            "file_drive": { "type": ["string", "null"] },
            "age":        { "type": "integer", "exclusiveMinimum": 0, "exclusiveMaximum": 120 },
            "weight":     { "type": "number", "exclusiveMinimum": 0 },
            "height":     { "type": "number", "exclusiveMinimum": 0 },
            "married":    { "type": "boolean" },
            "allergies": {
                "type": ["array", "null"],
                "items": { "type": "string" },
                "maxItems": 5
            },
            "contact_no": {
                "type": "object",
                "additionalProperties": { "type": "string" }
            },
            "address": {
                "type": ["object", "null"],
                "properties": {
                    "city":    { "type": "string", "maxLength": 20 },
                    "pincode": {
                        "anyOf": [
                            { "type": "string", "pattern": "^[0-9]{6}$" },
                            { "type": "integer", "minimum": 100000, "maximum": 999999 }
                        ]
                    },
                    "state":   { "type": "string", "maxLength": 20 }
                },
                "required": ["city", "pincode", "state"]
            }
        },
        "required": ["name", "email", "age", "weight", "height", "contact_no"]
    })
}
