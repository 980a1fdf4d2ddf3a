//! # carebook-verify
//!
//! Payload validation for the Carebook service.
//!
//! This crate provides [`engine::PayloadVerifier`], which implements the
//! [`carebook_core::traits::PayloadValidator`] trait. Payloads are checked
//! in phases:
//!
//! 1. **Structural**: JSON Schema validation via the `jsonschema` crate
//!    (types, required keys, enums, lengths, numeric bounds).
//! 2. **Typed**: deserialization into the contract type.
//! 3. **Semantic**: rules that need typed values or several fields, such as
//!    the emergency-contact requirement on intake forms.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use carebook_verify::PayloadVerifier;
//!
//! let verifier = PayloadVerifier::new()?;
//! let new_patient = verifier.new_patient(&payload)?;
//! ```

pub mod engine;
pub mod rules;
pub mod schemas;

pub use engine::PayloadVerifier;
