//! Error types shared by the whole crate.

use thiserror::Error;

/// Errors produced while training, configuring, or restoring a model.
///
/// Sampling itself never fails: prediction and generation fall back to
/// the boundary marker or an empty result instead of returning an error.
#[derive(Debug, Error)]
pub enum Error {
	#[error("order must be >= 1, got {0}")]
	InvalidOrder(usize),

	#[error("prior must be a finite value >= 0.0, got {0}")]
	InvalidPrior(f64),

	#[error("non-ASCII character {character:?} in training word {word:?}")]
	NonAsciiCharacter { word: String, character: char },

	#[error("training word {0:?} contains the reserved boundary marker")]
	ReservedCharacter(String),

	#[error("invalid snapshot: {0}")]
	InvalidSnapshot(String),

	#[error("invalid generation setting: {0}")]
	InvalidConfig(String),

	#[error("only {} of {requested} distinct words could be generated", .words.len())]
	InsufficientDistinctWords { requested: usize, words: Vec<String> },

	#[error("I/O error: {0}")]
	Io(#[from] std::io::Error),

	#[error("snapshot encoding error: {0}")]
	Codec(#[from] postcard::Error),
}

/// Convenience result alias.
pub type Result<T> = std::result::Result<T, Error>;
