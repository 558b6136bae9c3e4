use super::bigram::BigramModel;
use super::config::ModelConfig;
use super::count_table::CountTable;
use super::perplexity::LanguageModel;
use crate::error::{checked_log2, ModelError, Result};

/// Trigram model conditioning on the two previous tokens.
///
/// Owns the bigram model that provides conditioning counts, the vocabulary
/// size, and the estimate for the opening pair of every sentence.
#[derive(Clone, Debug, Default)]
pub struct TrigramModel {
	table: CountTable<3>,
	bigram: BigramModel,
	num_words: usize,
	vocab_size: usize,
}

impl TrigramModel {
	pub fn new() -> Self {
		Self::default()
	}

	/// # Errors
	/// Returns an error if `config` is invalid.
	pub fn with_config(config: ModelConfig) -> Result<Self> {
		Ok(Self { bigram: BigramModel::with_config(config)?, ..Self::default() })
	}

	/// Counts adjacent triples, then trains the owned bigram on the same sentences.
	///
	/// # Returns
	/// The number of distinct triples.
	pub fn train<S: AsRef<str> + Sync>(&mut self, sentences: &[Vec<S>]) -> usize {
		self.table = CountTable::from_sentences(sentences, self.bigram.unigram().config());
		self.bigram.train(sentences);
		self.num_words = self.table.total();
		self.vocab_size = self.bigram.vocab_size();

		log::info!("trigram trained: {} distinct triples, {} triples", self.table.len(), self.num_words);
		self.table.len()
	}

	/// Smoothed conditional probability `P(triple[2] | triple[0], triple[1])`.
	///
	/// # Errors
	/// - `ModelError::MissingNGram` if the triple, or its conditioning pair in
	///   the bigram table, was never observed.
	/// - `ModelError::ZeroDenominator` if the denominator is zero.
	pub fn probability<S: AsRef<str>>(&self, triple: &[S; 3], smoothing: f64) -> Result<f64> {
		let count = self.table.count(triple).ok_or_else(|| ModelError::MissingNGram {
			order: 3,
			key: CountTable::key(triple).to_vec(),
		})?;
		let context = [triple[0].as_ref(), triple[1].as_ref()];
		let context_count = self.bigram.count(&context).ok_or_else(|| ModelError::MissingNGram {
			order: 2,
			key: CountTable::key(&context).to_vec(),
		})?;
		let denominator = context_count as f64 + smoothing * self.vocab_size as f64;
		if denominator == 0.0 {
			return Err(ModelError::ZeroDenominator(CountTable::key(triple).to_vec()));
		}
		Ok((count as f64 + smoothing) / denominator)
	}

	/// Count of `triple`, or `None` if it was never observed.
	pub fn count<S: AsRef<str>>(&self, triple: &[S; 3]) -> Option<usize> {
		self.table.count(triple)
	}

	pub fn contains<S: AsRef<str>>(&self, triple: &[S; 3]) -> bool {
		self.table.contains(triple)
	}

	pub fn table(&self) -> &CountTable<3> {
		&self.table
	}

	/// The bigram model owned by this trigram model.
	pub fn bigram(&self) -> &BigramModel {
		&self.bigram
	}

	/// Total number of triples counted.
	pub fn num_words(&self) -> usize {
		self.num_words
	}

	pub fn vocab_size(&self) -> usize {
		self.vocab_size
	}
}

impl LanguageModel for TrigramModel {
	type Params = f64;

	fn name(&self) -> &str {
		"trigram"
	}

	/// The opening pair has no trigram context and is scored by the owned
	/// bigram model. Every following triple contributes nothing when it, or
	/// its conditioning pair, is unseen.
	fn log_likelihood<S: AsRef<str>>(&self, sentence: &[S], smoothing: f64) -> Result<f64> {
		let mut total = 0.0;
		if let [first, second, ..] = sentence {
			let opening = [first.as_ref(), second.as_ref()];
			if self.bigram.contains(&opening) {
				total += checked_log2(self.bigram.probability(&opening, smoothing)?)?;
			}
		}

		for window in sentence.windows(3) {
			let triple = [window[0].as_ref(), window[1].as_ref(), window[2].as_ref()];
			if !self.table.contains(&triple) || !self.bigram.contains(&[triple[0], triple[1]]) {
				log::trace!("trigram: skipping {:?}", triple);
				continue;
			}
			total += checked_log2(self.probability(&triple, smoothing)?)?;
		}
		Ok(total)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn frequent() -> Vec<Vec<&'static str>> {
		vec![
			vec!["<START>", "a", "b", "<STOP>"],
			vec!["<START>", "a", "b", "<STOP>"],
			vec!["<START>", "a", "b", "<STOP>"],
			vec!["<START>", "a", "c", "<STOP>"],
		]
	}

	#[test]
	fn test_train_counts_triples() {
		let mut model = TrigramModel::new();
		assert_eq!(model.train(&frequent()), 4);
		assert_eq!(model.count(&["<START>", "a", "b"]), Some(3));
		assert_eq!(model.count(&["a", "c", "<STOP>"]), Some(1));
		assert_eq!(model.num_words(), 8);
		assert_eq!(model.vocab_size(), 4);
		assert_eq!(model.bigram().num_words(), 12);
	}

	#[test]
	fn test_probability() {
		let mut model = TrigramModel::new();
		model.train(&frequent());

		assert_eq!(model.probability(&["<START>", "a", "b"], 0.0), Ok(0.75));
		assert_eq!(model.probability(&["a", "b", "<STOP>"], 0.0), Ok(1.0));
		// (3 + 1) / (4 + 1 * 4)
		assert_eq!(model.probability(&["<START>", "a", "b"], 1.0), Ok(0.5));
		assert!(matches!(
			model.probability(&["b", "a", "c"], 0.0),
			Err(ModelError::MissingNGram { order: 3, .. })
		));
	}

	#[test]
	fn test_log_likelihood_bootstraps_with_bigram() {
		let mut model = TrigramModel::new();
		model.train(&frequent());

		// P(a | <START>) = 1, P(b | <START> a) = 3/4, P(<STOP> | a b) = 1
		let ll = model.log_likelihood(&["<START>", "a", "b", "<STOP>"], 0.0).unwrap();
		assert!((ll - 0.75f64.log2()).abs() < 1e-12);

		// Unknown opening pair and unseen triples contribute nothing
		assert_eq!(model.log_likelihood(&["x", "y", "z"], 0.0), Ok(0.0));
		assert_eq!(model.log_likelihood(&["<START>"], 0.0), Ok(0.0));
	}

	#[test]
	fn test_triples_ignore_the_unknown_word_policy() {
		let mut model = TrigramModel::new();
		model.train(&frequent());

		// (a, c, <STOP>) is scored although "c" was folded in the unigram table
		let ll = model.log_likelihood(&["<START>", "a", "c", "<STOP>"], 0.0).unwrap();
		let expected = 1.0f64.log2() + 0.25f64.log2() + 1.0f64.log2();
		assert!((ll - expected).abs() < 1e-12);
	}
}
