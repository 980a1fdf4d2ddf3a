//! # carebook-contracts
//!
//! Shared record types, request payloads, and errors for the Carebook
//! patient service.
//!
//! Every crate in the workspace imports from here. No business logic lives in
//! this crate, only data definitions, parsing of query values, and error
//! types.

pub mod error;
pub mod intake;
pub mod patient;
pub mod premium;
pub mod validate;
