use crate::error::{Error, Result};

/// Limits applied by `WordGenerator` while synthesizing words.
///
/// # Fields
/// - `max_attempts`: words generated per `new_word` call before giving up on
///   the length range and returning the last candidate (default 100).
/// - `max_duplicates`: duplicates `new_words` may discard before reporting
///   that not enough distinct words exist (default 1000).
/// - `max_word_length`: letters after which a single attempt is cut short,
///   so chains that never predict the boundary cannot spin forever (default 64).
///
/// # Invariants
/// - `max_attempts >= 1`
/// - `max_word_length >= 1`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenerationConfig {
	max_attempts: usize,
	max_duplicates: usize,
	max_word_length: usize,
}

impl Default for GenerationConfig {
	fn default() -> Self {
		Self {
			max_attempts: Self::DEFAULT_MAX_ATTEMPTS,
			max_duplicates: Self::DEFAULT_MAX_DUPLICATES,
			max_word_length: Self::DEFAULT_MAX_WORD_LENGTH,
		}
	}
}

impl GenerationConfig {
	pub const DEFAULT_MAX_ATTEMPTS: usize = 100;
	pub const DEFAULT_MAX_DUPLICATES: usize = 1000;
	pub const DEFAULT_MAX_WORD_LENGTH: usize = 64;

	pub fn max_attempts(&self) -> usize {
		self.max_attempts
	}

	pub fn max_duplicates(&self) -> usize {
		self.max_duplicates
	}

	pub fn max_word_length(&self) -> usize {
		self.max_word_length
	}

	/// Sets the number of attempts of `new_word`.
	///
	/// # Errors
	/// Returns an error if `max_attempts` is 0.
	pub fn set_max_attempts(&mut self, max_attempts: usize) -> Result<()> {
		if max_attempts == 0 {
			return Err(Error::InvalidConfig("max_attempts must be >= 1".to_owned()));
		}
		self.max_attempts = max_attempts;
		Ok(())
	}

	/// Sets how many duplicates `new_words` may discard. 0 fails on the first duplicate.
	pub fn set_max_duplicates(&mut self, max_duplicates: usize) {
		self.max_duplicates = max_duplicates;
	}

	/// Sets the hard cap on letters per attempt.
	///
	/// # Errors
	/// Returns an error if `max_word_length` is 0.
	pub fn set_max_word_length(&mut self, max_word_length: usize) -> Result<()> {
		if max_word_length == 0 {
			return Err(Error::InvalidConfig("max_word_length must be >= 1".to_owned()));
		}
		self.max_word_length = max_word_length;
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn defaults() {
		let config = GenerationConfig::default();
		assert_eq!(config.max_attempts(), 100);
		assert_eq!(config.max_duplicates(), 1000);
		assert_eq!(config.max_word_length(), 64);
	}

	#[test]
	fn zero_limits_are_rejected() {
		let mut config = GenerationConfig::default();
		assert!(config.set_max_attempts(0).is_err());
		assert!(config.set_max_word_length(0).is_err());
		assert_eq!(config, GenerationConfig::default());

		config.set_max_attempts(5).unwrap();
		config.set_max_duplicates(0);
		assert_eq!(config.max_attempts(), 5);
		assert_eq!(config.max_duplicates(), 0);
	}
}
