use std::collections::HashSet;
use std::iter;
use std::path::Path;

use log::{debug, warn};

use crate::error::{Error, Result};
use crate::io;
use crate::model::alphabet::BOUNDARY;
use crate::model::generation_config::GenerationConfig;
use crate::model::language_model::LanguageModel;
use crate::model::snapshot::Snapshot;

/// High-level word synthesizer built on a `LanguageModel`.
///
/// # Responsibilities
/// - Train / restore the underlying model
/// - Generate single words under a length range (rejection sampling)
/// - Generate batches of words, optionally without repeats
#[derive(Clone, Debug, Default)]
pub struct WordGenerator {
	model: LanguageModel,
	config: GenerationConfig,
}

impl WordGenerator {
	/// Order used when the caller has no preference.
	pub const DEFAULT_ORDER: usize = 3;
	/// Prior used when the caller has no preference (no smoothing).
	pub const DEFAULT_PRIOR: f64 = 0.0;

	/// Creates an untrained generator.
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates an untrained generator with a fixed random seed.
	pub fn with_seed(seed: u64) -> Self {
		Self::from_model(LanguageModel::with_seed(seed))
	}

	/// Wraps an existing model with the default configuration.
	pub fn from_model(model: LanguageModel) -> Self {
		Self { model, config: GenerationConfig::default() }
	}

	/// Creates a generator trained on `corpus`.
	///
	/// # Errors
	/// Same as `LanguageModel::train`.
	pub fn trained<S: AsRef<str>>(corpus: &[S], order: usize, prior: f64) -> Result<Self> {
		Ok(Self::from_model(LanguageModel::trained(corpus, order, prior)?))
	}

	/// Creates a generator from an exported snapshot.
	///
	/// # Errors
	/// Returns `Error::InvalidSnapshot` if the snapshot is inconsistent.
	pub fn from_snapshot(snapshot: Snapshot) -> Result<Self> {
		Ok(Self::from_model(LanguageModel::from_snapshot(snapshot)?))
	}

	/// Creates a generator trained on a corpus file (one word per line).
	///
	/// # Errors
	/// Returns an error if the file cannot be read or training fails.
	pub fn from_corpus_file<P: AsRef<Path>>(path: P, order: usize, prior: f64) -> Result<Self> {
		let corpus = io::read_corpus(path)?;
		Self::trained(&corpus, order, prior)
	}

	/// Replaces the generation limits.
	pub fn with_config(mut self, config: GenerationConfig) -> Self {
		self.config = config;
		self
	}

	pub fn config(&self) -> &GenerationConfig {
		&self.config
	}

	pub fn config_mut(&mut self) -> &mut GenerationConfig {
		&mut self.config
	}

	/// Read-only access to the underlying model.
	pub fn model(&self) -> &LanguageModel {
		&self.model
	}

	/// Reseeds the underlying model's random generator.
	pub fn reseed(&mut self, seed: u64) {
		self.model.reseed(seed);
	}

	/// Retrains the underlying model from scratch.
	///
	/// See `DEFAULT_ORDER` and `DEFAULT_PRIOR` for the usual parameters.
	pub fn train<S: AsRef<str>>(&mut self, corpus: &[S], order: usize, prior: f64) -> Result<()> {
		self.model.train(corpus, order, prior)
	}

	pub fn is_trained(&self) -> bool {
		self.model.is_trained()
	}

	pub fn order(&self) -> usize {
		self.model.order()
	}

	/// Generates one word whose length is in `[min_length, max_length]`.
	///
	/// # Behavior
	/// - Each attempt starts from `order` boundary markers and appends
	///   predicted letters until the boundary marker is predicted.
	/// - An attempt that lands outside the range is thrown away and retried.
	/// - After `max_attempts` attempts the last candidate is returned as is,
	///   so the range is best effort: check the length if it must hold.
	///
	/// Returns an empty string if the generator is not trained.
	pub fn new_word(&mut self, min_length: usize, max_length: usize) -> String {
		self.new_word_with_attempts(min_length, max_length).0
	}

	/// `new_word`, also returning the number of attempts it took.
	fn new_word_with_attempts(&mut self, min_length: usize, max_length: usize) -> (String, usize) {
		if !self.is_trained() {
			return (String::new(), 0);
		}

		let max_attempts = self.config.max_attempts();
		let mut attempts = 0;
		loop {
			attempts += 1;
			let word = self.extend_word();
			if (min_length..=max_length).contains(&word.len()) {
				return (word, attempts);
			}
			if attempts >= max_attempts {
				debug!(
					"no word within [{}, {}] after {} attempts, keeping {:?}",
					min_length, max_length, attempts, word
				);
				return (word, attempts);
			}
		}
	}

	/// Runs one attempt: seed with boundary markers, extend until the model
	/// predicts the boundary marker, then strip the markers.
	fn extend_word(&mut self) -> String {
		let max_letters = self.config.max_word_length();
		let mut buffer: String = iter::repeat_n(BOUNDARY, self.model.order()).collect();
		let mut letters = 0;

		loop {
			let letter = self.model.predict_next(&buffer);
			if letter == BOUNDARY {
				break;
			}
			buffer.push(letter);
			letters += 1;
			if letters >= max_letters {
				warn!("word reached {} letters without an end marker, cutting it", max_letters);
				break;
			}
		}

		buffer.retain(|c| c != BOUNDARY);
		buffer
	}

	/// Generates `count` words with `new_word`.
	///
	/// # Parameters
	/// - `allow_repeats`: if `false`, a word already in the batch is discarded
	///   and generation retried.
	///
	/// Returns an empty vector if the generator is not trained.
	///
	/// # Errors
	/// Returns `Error::InsufficientDistinctWords` (holding the distinct words
	/// found so far) once more than `max_duplicates` duplicates were discarded.
	pub fn new_words(
		&mut self,
		count: usize,
		min_length: usize,
		max_length: usize,
		allow_repeats: bool,
	) -> Result<Vec<String>> {
		let mut words = Vec::with_capacity(count);
		if !self.is_trained() {
			return Ok(words);
		}

		let mut seen = HashSet::new();
		let mut discarded = 0;
		while words.len() < count {
			let word = self.new_word(min_length, max_length);
			if allow_repeats || seen.insert(word.clone()) {
				words.push(word);
				continue;
			}

			discarded += 1;
			if discarded > self.config.max_duplicates() {
				warn!(
					"gave up after {} duplicates with {} of {} distinct words",
					discarded,
					words.len(),
					count
				);
				return Err(Error::InsufficientDistinctWords { requested: count, words });
			}
		}

		Ok(words)
	}

	/// Exports the underlying model.
	pub fn export_data(&self) -> Snapshot {
		self.model.export_data()
	}
}
