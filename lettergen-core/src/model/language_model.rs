use log::debug;
use rand::SeedableRng;
use rand::rngs::StdRng;

use super::alphabet::{Alphabet, BOUNDARY};
use super::chain::ContextChain;
use super::sampling::select_index;
use super::snapshot::Snapshot;
use crate::error::{Error, Result};

/// Character-level backoff n-gram model.
///
/// Holds one `ContextChain` per order, from 1 up to `order`, and predicts
/// the next character of a word by trying the longest context first and
/// falling back to shorter ones.
///
/// # Responsibilities
/// - Build the alphabet and every chain from a training corpus
/// - Predict the next character given a context
/// - Export / restore its state through a `Snapshot`
///
/// # Invariants
/// - `is_trained()` <=> `chains` is non-empty
/// - `chains[i]` has order `i + 1`
/// - Every weight vector has the length of `alphabet`
///
/// Each model owns its random generator. Two models built with the same
/// seed from the same data produce the same draws.
#[derive(Clone, Debug)]
pub struct LanguageModel {
	/// Highest context length (0 when untrained)
	order: usize,

	/// Smoothing constant used for the last training, if trained from a corpus
	prior: Option<f64>,

	alphabet: Alphabet,

	/// One chain per order, lowest first
	chains: Vec<ContextChain>,

	rng: StdRng,
}

impl Default for LanguageModel {
	fn default() -> Self {
		Self::new()
	}
}

impl LanguageModel {
	/// Creates an untrained model seeded from OS entropy.
	pub fn new() -> Self {
		Self::with_rng(StdRng::from_os_rng())
	}

	/// Creates an untrained model with a fixed seed (reproducible sampling).
	pub fn with_seed(seed: u64) -> Self {
		Self::with_rng(StdRng::seed_from_u64(seed))
	}

	fn with_rng(rng: StdRng) -> Self {
		Self {
			order: 0,
			prior: None,
			alphabet: Alphabet::default(),
			chains: Vec::new(),
			rng,
		}
	}

	/// Creates a model and trains it right away.
	///
	/// # Errors
	/// Same as `train`.
	pub fn trained<S: AsRef<str>>(corpus: &[S], order: usize, prior: f64) -> Result<Self> {
		let mut model = Self::new();
		model.train(corpus, order, prior)?;
		Ok(model)
	}

	/// Restores a trained model from a snapshot. The order is the number of chains.
	///
	/// # Errors
	/// Returns `Error::InvalidSnapshot` if the snapshot is inconsistent.
	pub fn from_snapshot(snapshot: Snapshot) -> Result<Self> {
		Self::from_snapshot_with_rng(snapshot, StdRng::from_os_rng())
	}

	/// Same as `from_snapshot`, with a fixed seed.
	pub fn from_snapshot_with_seed(snapshot: Snapshot, seed: u64) -> Result<Self> {
		Self::from_snapshot_with_rng(snapshot, StdRng::seed_from_u64(seed))
	}

	fn from_snapshot_with_rng(snapshot: Snapshot, rng: StdRng) -> Result<Self> {
		snapshot.validate()?;
		let (alphabet, chains) = snapshot.into_parts();
		Ok(Self {
			order: chains.len(),
			prior: None,
			alphabet,
			chains,
			rng,
		})
	}

	/// Replaces the random generator with one seeded from `seed`.
	pub fn reseed(&mut self, seed: u64) {
		self.rng = StdRng::seed_from_u64(seed);
	}

	/// Trains the model from scratch.
	///
	/// # Parameters
	/// - `corpus`: training words
	/// - `order`: highest context length (>= 1)
	/// - `prior`: additive smoothing constant (>= 0.0)
	///
	/// # Behavior
	/// - Previous alphabet and chains are discarded (no incremental update).
	/// - Builds the alphabet, then one chain per order from 1 to `order`.
	/// - Deterministic: the same inputs always give the same chains.
	///
	/// # Errors
	/// - `Error::InvalidOrder` if `order == 0`
	/// - `Error::InvalidPrior` if `prior` is negative or not finite
	/// - `Error::NonAsciiCharacter` / `Error::ReservedCharacter` for unusable words
	///
	/// On error the model keeps its previous state.
	pub fn train<S: AsRef<str>>(&mut self, corpus: &[S], order: usize, prior: f64) -> Result<()> {
		if order == 0 {
			return Err(Error::InvalidOrder(order));
		}
		if !prior.is_finite() || prior < 0.0 {
			return Err(Error::InvalidPrior(prior));
		}
		for word in corpus {
			let word = word.as_ref();
			if let Some(character) = word.chars().find(|c| !c.is_ascii()) {
				return Err(Error::NonAsciiCharacter { word: word.to_owned(), character });
			}
			if word.contains(BOUNDARY) {
				return Err(Error::ReservedCharacter(word.to_owned()));
			}
		}

		self.alphabet = Alphabet::from_corpus(corpus);
		self.chains = (1..=order)
			.map(|k| ContextChain::build(corpus, k, &self.alphabet, prior))
			.collect();
		self.order = order;
		self.prior = Some(prior);

		debug!(
			"trained order {} model on {} words: {} letters, {} contexts",
			order,
			corpus.len(),
			self.alphabet.len(),
			self.chains.iter().map(ContextChain::len).sum::<usize>()
		);
		Ok(())
	}

	/// Returns `true` if the model holds at least one chain.
	pub fn is_trained(&self) -> bool {
		!self.chains.is_empty()
	}

	/// Returns the highest context length (0 if never trained).
	pub fn order(&self) -> usize {
		self.order
	}

	/// Returns the prior of the last training. `None` if untrained or
	/// restored from a snapshot (snapshots do not carry it).
	pub fn prior(&self) -> Option<f64> {
		self.prior
	}

	pub fn alphabet(&self) -> &Alphabet {
		&self.alphabet
	}

	/// Returns the chain of the given order, if any.
	pub fn chain(&self, order: usize) -> Option<&ContextChain> {
		order.checked_sub(1).and_then(|i| self.chains.get(i))
	}

	/// Predicts the character following `context`.
	///
	/// Tries orders from `order()` down to 1: the trailing characters of
	/// `context` are looked up in the chain of that order and the first
	/// known context is sampled by weight.
	///
	/// Returns `BOUNDARY` when no order matches (context too short, unknown
	/// at every order, or untrained model).
	pub fn predict_next(&mut self, context: &str) -> char {
		let hit = self
			.chains
			.iter()
			.rev()
			.find_map(|chain| chain.weights(trailing(context, chain.order())?));

		match hit {
			Some(weights) => {
				let index = select_index(weights, &mut self.rng);
				self.alphabet.get(index).unwrap_or(BOUNDARY)
			}
			None => BOUNDARY,
		}
	}

	/// Exports an independent copy of the alphabet and chains.
	pub fn export_data(&self) -> Snapshot {
		Snapshot::from_parts(self.alphabet.clone(), self.chains.clone())
	}
}

/// Returns the last `n` characters of `s`, or `None` if `s` is shorter.
fn trailing(s: &str, n: usize) -> Option<&str> {
	let count = s.chars().count();
	if n > count {
		return None;
	}
	let start = s
		.char_indices()
		.nth(count - n)
		.map_or(s.len(), |(i, _)| i);
	Some(&s[start..])
}

#[cfg(test)]
mod tests {
	use super::*;

	const TOWNS: [&str; 12] = [
		"abingdon", "accrington", "acton", "alston", "alton", "andover",
		"barton", "bolton", "boston", "bourne", "bruton", "burton",
	];

	#[test]
	fn untrained_model_predicts_boundary() {
		let mut model = LanguageModel::with_seed(0);
		assert!(!model.is_trained());
		assert_eq!(model.order(), 0);
		assert_eq!(model.predict_next("###"), BOUNDARY);
		assert_eq!(model.predict_next(""), BOUNDARY);
	}

	#[test]
	fn train_rejects_bad_parameters() {
		let mut model = LanguageModel::with_seed(0);
		assert!(matches!(model.train(&["ab"], 0, 0.0), Err(Error::InvalidOrder(0))));
		assert!(matches!(model.train(&["ab"], 1, -0.1), Err(Error::InvalidPrior(_))));
		assert!(matches!(model.train(&["ab"], 1, f64::NAN), Err(Error::InvalidPrior(_))));
		assert!(matches!(model.train(&["café"], 1, 0.0), Err(Error::NonAsciiCharacter { character: 'é', .. })));
		assert!(matches!(model.train(&["a#b"], 1, 0.0), Err(Error::ReservedCharacter(_))));
		assert!(!model.is_trained());
	}

	#[test]
	fn failed_training_keeps_previous_state() {
		let mut model = LanguageModel::with_seed(0);
		model.train(&["ab"], 2, 0.0).unwrap();
		let before = model.export_data();
		assert!(model.train(&["ab"], 0, 0.0).is_err());
		assert_eq!(model.export_data(), before);
		assert_eq!(model.order(), 2);
	}

	#[test]
	fn scenario_first_order_chain() {
		let mut model = LanguageModel::with_seed(0);
		model.train(&["ab", "ac", "ad"], 1, 0.0).unwrap();
		assert_eq!(model.alphabet().letters(), &['#', 'a', 'b', 'c', 'd']);
		let weights = model.chain(1).unwrap().weights("a").unwrap();
		assert_eq!(weights, &[0.0, 0.0, 1.0, 1.0, 1.0]);
		for _ in 0..200 {
			assert!(matches!(model.predict_next("a"), 'b' | 'c' | 'd'));
		}
	}

	#[test]
	fn retraining_replaces_everything() {
		let mut model = LanguageModel::with_seed(0);
		model.train(&["xyz"], 3, 1.0).unwrap();
		model.train(&["ab"], 1, 0.0).unwrap();
		assert_eq!(model.order(), 1);
		assert_eq!(model.prior(), Some(0.0));
		assert_eq!(model.alphabet().letters(), &['#', 'a', 'b']);
		assert!(model.chain(2).is_none());
	}

	#[test]
	fn training_is_deterministic() {
		let first = LanguageModel::trained(&TOWNS, 3, 0.01).unwrap();
		let second = LanguageModel::trained(&TOWNS, 3, 0.01).unwrap();
		assert_eq!(first.export_data(), second.export_data());
	}

	#[test]
	fn backoff_uses_shorter_contexts() {
		let mut model = LanguageModel::with_seed(7);
		model.train(&["ab"], 3, 0.0).unwrap();
		// "zzb" is unknown at orders 3 and 2, "b" is known at order 1
		assert_eq!(model.predict_next("zzb"), BOUNDARY);
		// "xa" is unknown at order 2, "a" always leads to 'b'
		assert_eq!(model.predict_next("xa"), 'b');
		// Too short for order 3 and 2, "#" is known at order 1
		assert_eq!(model.predict_next("#"), 'a');
	}

	#[test]
	fn unknown_context_predicts_boundary() {
		let mut model = LanguageModel::with_seed(7);
		model.train(&["ab"], 2, 0.0).unwrap();
		assert_eq!(model.predict_next("q"), BOUNDARY);
		assert_eq!(model.predict_next(""), BOUNDARY);
	}

	#[test]
	fn predictions_stay_in_alphabet() {
		let mut model = LanguageModel::with_seed(11);
		model.train(&TOWNS, 3, 0.05).unwrap();
		let contexts = ["###", "##a", "bou", "ton", "zzz", "n", ""];
		for context in contexts {
			for _ in 0..100 {
				let next = model.predict_next(context);
				assert!(model.alphabet().contains(next));
			}
		}
	}

	#[test]
	fn snapshot_restores_identical_model() {
		let mut original = LanguageModel::with_seed(3);
		original.train(&TOWNS, 3, 0.0).unwrap();
		let mut restored = LanguageModel::from_snapshot_with_seed(original.export_data(), 3).unwrap();

		assert_eq!(restored.order(), 3);
		assert_eq!(restored.prior(), None);
		assert_eq!(restored.export_data(), original.export_data());

		for context in ["###", "##b", "#bo", "rto"] {
			for _ in 0..20 {
				assert_eq!(original.predict_next(context), restored.predict_next(context));
			}
		}
	}

	#[test]
	fn export_is_independent_copy() {
		let mut model = LanguageModel::with_seed(0);
		model.train(&["ab"], 1, 0.0).unwrap();
		let snapshot = model.export_data();
		model.train(&["xyz"], 2, 0.0).unwrap();
		assert_eq!(snapshot.order(), 1);
		assert_eq!(snapshot.alphabet(), &['#', 'a', 'b']);
	}

	#[test]
	fn empty_snapshot_gives_untrained_model() {
		let model = LanguageModel::from_snapshot(Snapshot::new(vec!['#'], Vec::new())).unwrap();
		assert!(!model.is_trained());
		assert_eq!(model.order(), 0);
	}

	#[test]
	fn trailing_characters() {
		assert_eq!(trailing("abcd", 2), Some("cd"));
		assert_eq!(trailing("abcd", 4), Some("abcd"));
		assert_eq!(trailing("abcd", 5), None);
		assert_eq!(trailing("", 0), Some(""));
	}
}
