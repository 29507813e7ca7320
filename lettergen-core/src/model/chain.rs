use std::collections::HashMap;
use std::iter;

use serde::{Deserialize, Serialize};

use super::alphabet::{Alphabet, BOUNDARY};
use crate::error::{Error, Result};

/// Context chain of a fixed order `k`.
///
/// Maps every context of exactly `k` characters seen during training to a
/// weight vector holding one weight per alphabet character, in alphabet
/// order. A weight is the smoothing prior plus the number of times that
/// character followed the context.
///
/// # Invariants
/// - `order` is always >= 1
/// - Every key is exactly `order` characters long
/// - Every weight vector has the length of the alphabet it was built with
/// - Contexts never seen in training are absent (lookup miss, not a zero vector)
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ContextChain {
	/// Number of characters in every context key.
	order: usize,

	/// Context -> weight per alphabet character.
	/// Example (order 1, alphabet "#abc"): { "a" => [0.0, 0.0, 2.0, 1.0] }
	weights: HashMap<String, Vec<f64>>,
}

impl ContextChain {
	/// Creates a chain from raw weights, without checking them.
	///
	/// Meant for hosts that assemble snapshots themselves; a model only
	/// accepts it after `Snapshot::validate`.
	pub fn from_weights(order: usize, weights: HashMap<String, Vec<f64>>) -> Self {
		Self { order, weights }
	}

	/// Builds the chain of order `order` from a training corpus.
	///
	/// # Behavior
	/// - Pads each word with `order` boundary markers on the left and one on the right.
	/// - Every window of `order` characters records the character right after it.
	/// - Counts are turned into `prior + count` for every alphabet character.
	///
	/// # Notes
	/// - `alphabet` must have been built from the same corpus.
	pub(crate) fn build<S: AsRef<str>>(corpus: &[S], order: usize, alphabet: &Alphabet, prior: f64) -> Self {
		let mut observations: HashMap<String, Vec<usize>> = HashMap::new();

		for word in corpus {
			let padded: Vec<char> = iter::repeat_n(BOUNDARY, order)
				.chain(word.as_ref().chars())
				.chain(iter::once(BOUNDARY))
				.collect();

			// The padded word is always longer than `order`
			for i in 0..padded.len() - order {
				let key: String = padded[i..i + order].iter().collect();
				let counts = observations
					.entry(key)
					.or_insert_with(|| vec![0; alphabet.len()]);
				if let Some(index) = alphabet.index_of(padded[i + order]) {
					counts[index] += 1;
				}
			}
		}

		let weights = observations
			.into_iter()
			.map(|(key, counts)| {
				let weights = counts.into_iter().map(|count| prior + count as f64).collect();
				(key, weights)
			})
			.collect();

		Self { order, weights }
	}

	/// Returns the context length of this chain.
	pub fn order(&self) -> usize {
		self.order
	}

	/// Returns the weight vector of `context`, or `None` if the context was never observed.
	pub fn weights(&self, context: &str) -> Option<&[f64]> {
		self.weights.get(context).map(Vec::as_slice)
	}

	/// Iterates over every known context and its weights (arbitrary order).
	pub fn contexts(&self) -> impl Iterator<Item = (&str, &[f64])> {
		self.weights.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
	}

	/// Number of known contexts.
	pub fn len(&self) -> usize {
		self.weights.len()
	}

	pub fn is_empty(&self) -> bool {
		self.weights.is_empty()
	}

	/// Checks that this chain can be used as the chain of order `expected_order`
	/// over an alphabet of `alphabet_len` characters.
	pub(crate) fn validate(&self, expected_order: usize, alphabet_len: usize) -> Result<()> {
		if self.order != expected_order {
			return Err(Error::InvalidSnapshot(format!(
				"chain at position {} has order {}",
				expected_order - 1,
				self.order
			)));
		}

		for (key, weights) in &self.weights {
			if key.chars().count() != self.order {
				return Err(Error::InvalidSnapshot(format!(
					"context {key:?} does not have {} characters",
					self.order
				)));
			}
			if weights.len() != alphabet_len {
				return Err(Error::InvalidSnapshot(format!(
					"context {key:?} has {} weights, expected {alphabet_len}",
					weights.len()
				)));
			}
			if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
				return Err(Error::InvalidSnapshot(format!(
					"context {key:?} has a negative or non-finite weight"
				)));
			}
		}

		Ok(())
	}
}
