//! N-gram letter-sequence generation library.
//!
//! This crate trains a character-level backoff n-gram model on a list of
//! words and samples it to synthesize new, pronounceable-looking words:
//! - Alphabet extraction and multi-order context chains
//! - Weighted random next-character prediction with backoff
//! - Word generation with length-constrained rejection sampling
//! - Exportable snapshots to rebuild a model without retraining
//!
//! ```no_run
//! use lettergen_core::WordGenerator;
//!
//! let mut generator = WordGenerator::trained(&["alton", "barton", "bolton"], 3, 0.0)?;
//! let word = generator.new_word(3, 8);
//! # Ok::<(), lettergen_core::Error>(())
//! ```

/// Core model, snapshot and generation logic.
pub mod model;

/// I/O utilities (corpus loading, path helpers).
pub mod io;

/// Crate error type.
pub mod error;

pub use error::{Error, Result};
pub use model::alphabet::{Alphabet, BOUNDARY};
pub use model::chain::ContextChain;
pub use model::generation_config::GenerationConfig;
pub use model::generator::WordGenerator;
pub use model::language_model::LanguageModel;
pub use model::snapshot::Snapshot;
