//! # carebook-premium
//!
//! Insurance-premium prediction for the Carebook service.
//!
//! - [`adapter`] derives the fixed-order feature vector from a
//!   `PredictionInput` and hands it to a [`Classifier`](carebook_core::traits::Classifier).
//! - [`forest`] provides [`ForestClassifier`], which evaluates a pre-trained
//!   decision-forest artifact loaded once at process start.

pub mod adapter;
pub mod forest;

pub use adapter::PremiumAdapter;
pub use forest::ForestClassifier;
