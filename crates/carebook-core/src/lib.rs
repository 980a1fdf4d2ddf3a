//! # carebook-core
//!
//! The core of the Carebook patient service.
//!
//! This crate provides:
//! - The collaborator traits (`RecordStore`, `PayloadValidator`, `Classifier`)
//! - Pure derived-field functions (BMI, verdict, age group, lifestyle risk,
//!   city tier)
//! - `PatientService`, which runs every CRUD operation against a store
//!
//! ## Usage
//!
//! ```rust,ignore
//! use carebook_core::{PatientService, traits::{RecordStore, PayloadValidator}};
//!
//! let service = PatientService::new(Box::new(store), Arc::new(validator));
//! let view = service.get("P001")?;
//! ```

pub mod derive;
pub mod service;
pub mod traits;

pub use service::PatientService;
