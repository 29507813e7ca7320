use std::path::Path;

use serde::{Deserialize, Serialize};

use super::alphabet::Alphabet;
use super::chain::ContextChain;
use crate::error::Result;

/// Exported state of a trained model: its alphabet and every chain.
///
/// The chain at position `i` has order `i + 1`; the model order is the
/// number of chains. A snapshot is an independent copy and never aliases
/// the model it was exported from.
///
/// Serializable with any serde format. `to_bytes` / `save` use `postcard`
/// for a compact binary form.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Snapshot {
	alphabet: Alphabet,
	chains: Vec<ContextChain>,
}

impl Snapshot {
	/// Assembles a snapshot from raw parts. Nothing is checked here;
	/// models call `validate` when they are built from it.
	pub fn new(alphabet: Vec<char>, chains: Vec<ContextChain>) -> Self {
		Self { alphabet: Alphabet::from_letters(alphabet), chains }
	}

	pub(crate) fn from_parts(alphabet: Alphabet, chains: Vec<ContextChain>) -> Self {
		Self { alphabet, chains }
	}

	pub(crate) fn into_parts(self) -> (Alphabet, Vec<ContextChain>) {
		(self.alphabet, self.chains)
	}

	pub fn alphabet(&self) -> &[char] {
		self.alphabet.letters()
	}

	pub fn chains(&self) -> &[ContextChain] {
		&self.chains
	}

	/// Order of the model this snapshot describes.
	pub fn order(&self) -> usize {
		self.chains.len()
	}

	/// Checks that the snapshot describes a consistent model.
	///
	/// # Errors
	/// Returns `Error::InvalidSnapshot` if the alphabet is unsorted, has
	/// duplicates, lacks the boundary marker, or if any chain has the
	/// wrong order, key length, weight count, or a negative weight.
	pub fn validate(&self) -> Result<()> {
		self.alphabet.validate()?;
		for (position, chain) in self.chains.iter().enumerate() {
			chain.validate(position + 1, self.alphabet.len())?;
		}
		Ok(())
	}

	/// Encodes the snapshot with `postcard`.
	pub fn to_bytes(&self) -> Result<Vec<u8>> {
		Ok(postcard::to_stdvec(self)?)
	}

	/// Decodes and validates a `postcard`-encoded snapshot.
	pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
		let snapshot: Snapshot = postcard::from_bytes(bytes)?;
		snapshot.validate()?;
		Ok(snapshot)
	}

	/// Writes the encoded snapshot to `path`.
	pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
		std::fs::write(path, self.to_bytes()?)?;
		Ok(())
	}

	/// Reads a snapshot previously written with `save`.
	pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
		let bytes = std::fs::read(path)?;
		Self::from_bytes(&bytes)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::collections::HashMap;

	use crate::error::Error;

	fn snapshot_of(corpus: &[&str], order: usize) -> Snapshot {
		let alphabet = Alphabet::from_corpus(corpus);
		let chains = (1..=order)
			.map(|k| ContextChain::build(corpus, k, &alphabet, 0.0))
			.collect();
		Snapshot::from_parts(alphabet, chains)
	}

	#[test]
	fn order_is_chain_count() {
		assert_eq!(snapshot_of(&["abc"], 3).order(), 3);
		assert_eq!(Snapshot::new(vec!['#'], Vec::new()).order(), 0);
	}

	#[test]
	fn bytes_round_trip() {
		let snapshot = snapshot_of(&["ab", "ac", "ad"], 2);
		let bytes = snapshot.to_bytes().unwrap();
		assert_eq!(Snapshot::from_bytes(&bytes).unwrap(), snapshot);
	}

	#[test]
	fn garbage_bytes_are_rejected() {
		assert!(matches!(Snapshot::from_bytes(&[0xff, 0xff, 0xff]), Err(Error::Codec(_))));
	}

	#[test]
	fn chains_out_of_order_are_rejected() {
		let built = snapshot_of(&["ab"], 2);
		let mut chains = built.chains().to_vec();
		chains.reverse();
		let snapshot = Snapshot::new(built.alphabet().to_vec(), chains);
		assert!(matches!(snapshot.validate(), Err(Error::InvalidSnapshot(_))));
	}

	#[test]
	fn weights_must_match_alphabet() {
		let chain = ContextChain::from_weights(1, HashMap::from([("a".to_owned(), vec![1.0])]));
		let snapshot = Snapshot::new(vec!['#', 'a'], vec![chain]);
		assert!(matches!(snapshot.validate(), Err(Error::InvalidSnapshot(_))));
	}
}
