use rand::Rng;

/// Picks an index with probability proportional to its weight.
///
/// Draws a uniform value in `[0, total)` and returns the smallest index
/// whose cumulative weight strictly exceeds it.
///
/// Returns `0` when the total weight is zero (or the vector is empty),
/// instead of failing.
pub(crate) fn select_index<R: Rng + ?Sized>(weights: &[f64], rng: &mut R) -> usize {
	let total: f64 = weights.iter().sum();
	if !(total > 0.0 && total.is_finite()) {
		return 0;
	}

	let draw = rng.random_range(0.0..total);

	let mut cumulative = 0.0;
	for (index, weight) in weights.iter().enumerate() {
		cumulative += weight;
		if draw < cumulative {
			return index;
		}
	}

	// Rounding fallback: last index that can be drawn at all
	weights.iter().rposition(|w| *w > 0.0).unwrap_or(0)
}
