//! # carebook-store
//!
//! Patient stores for the Carebook service.
//!
//! ## Overview
//!
//! Both stores implement [`RecordStore`](carebook_core::traits::RecordStore)
//! with whole-collection semantics: `load()` returns every record, `save()`
//! replaces every record.
//!
//! - [`JsonFileStore`] persists to one pretty-printed JSON object keyed by
//!   id. Only raw attributes are written; derived fields never reach disk.
//! - [`InMemoryStore`] keeps the map in process memory.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use carebook_store::JsonFileStore;
//! use carebook_core::traits::RecordStore;
//!
//! let store = JsonFileStore::new("patients.json");
//! let mut patients = store.load()?;
//! patients.remove(&PatientId::new("P003"));
//! store.save(&patients)?;
//! ```

pub mod file;
pub mod memory;

pub use file::JsonFileStore;
pub use memory::InMemoryStore;

// ── Tests ─────────────────────────────────────────────────────────────────────
