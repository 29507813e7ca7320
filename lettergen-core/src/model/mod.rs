//! Top-level module for the letter-sequence model.
//!
//! This module provides a backoff n-gram model over characters, including:
//! - The alphabet and its boundary marker (`Alphabet`, `BOUNDARY`)
//! - Fixed-order context chains (`ContextChain`)
//! - The multi-order model and its prediction (`LanguageModel`)
//! - The exportable model state (`Snapshot`)
//! - Word synthesis under length constraints (`WordGenerator`)

/// Ordered set of characters known by a model.
pub mod alphabet;

/// Fixed-order context chain (`order >= 1`).
///
/// Maps contexts to per-character weights built from training counts.
pub mod chain;

/// Multi-order backoff model: training and next-character prediction.
pub mod language_model;

/// Exported alphabet and chains, used to rebuild a model without retraining.
pub mod snapshot;

/// Word and batch generation on top of a `LanguageModel`.
pub mod generator;

/// Generation limits (attempt cap, duplicate budget, word length cap).
pub mod generation_config;

/// Weighted random index selection.
///
/// This module is not exposed publicly.
mod sampling;
