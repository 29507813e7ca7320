use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Reserved character marking the start and the end of a word.
///
/// Training words are padded with it, and the model predicts it to signal
/// that no further letter should be generated.
pub const BOUNDARY: char = '#';

/// Ordered set of the characters a model knows about.
///
/// # Invariants
/// - Always contains `BOUNDARY`
/// - Sorted ascending, without duplicates
/// - Only ASCII characters
///
/// The position of a character in the alphabet is the position of its
/// weight in every chain weight vector.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(transparent)]
pub struct Alphabet {
	letters: Vec<char>,
}

impl Default for Alphabet {
	/// Alphabet of an untrained model: only the boundary marker.
	fn default() -> Self {
		Self { letters: vec![BOUNDARY] }
	}
}

impl Alphabet {
	/// Builds the alphabet of a training corpus.
	///
	/// Every character is scanned in corpus order and appended the first
	/// time it is seen (the boundary marker is pre-seeded), then the whole
	/// set is sorted.
	pub fn from_corpus<S: AsRef<str>>(corpus: &[S]) -> Self {
		let mut letters = vec![BOUNDARY];
		for word in corpus {
			for c in word.as_ref().chars() {
				if !letters.contains(&c) {
					letters.push(c);
				}
			}
		}
		letters.sort_unstable();
		Self { letters }
	}

	/// Wraps raw letters without checking them. Use `validate` before
	/// trusting the result.
	pub(crate) fn from_letters(letters: Vec<char>) -> Self {
		Self { letters }
	}

	/// Checks the invariants of an alphabet coming from outside the crate.
	pub(crate) fn validate(&self) -> Result<()> {
		if !self.letters.contains(&BOUNDARY) {
			return Err(Error::InvalidSnapshot("alphabet has no boundary marker".to_owned()));
		}
		if let Some(c) = self.letters.iter().find(|c| !c.is_ascii()) {
			return Err(Error::InvalidSnapshot(format!("alphabet contains non-ASCII character {c:?}")));
		}
		if self.letters.windows(2).any(|pair| pair[0] >= pair[1]) {
			return Err(Error::InvalidSnapshot("alphabet is not sorted or has duplicates".to_owned()));
		}
		Ok(())
	}

	/// Returns the letters in alphabet order.
	pub fn letters(&self) -> &[char] {
		&self.letters
	}

	pub fn len(&self) -> usize {
		self.letters.len()
	}

	pub fn is_empty(&self) -> bool {
		self.letters.is_empty()
	}

	/// Returns the position of `c`, or `None` if it is not part of the alphabet.
	pub fn index_of(&self, c: char) -> Option<usize> {
		self.letters.binary_search(&c).ok()
	}

	/// Returns the character at `index`.
	pub fn get(&self, index: usize) -> Option<char> {
		self.letters.get(index).copied()
	}

	pub fn contains(&self, c: char) -> bool {
		self.index_of(c).is_some()
	}
}
