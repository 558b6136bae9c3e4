use super::config::ModelConfig;
use super::count_table::CountTable;
use super::perplexity::LanguageModel;
use super::unigram::UnigramModel;
use crate::error::{checked_log2, ModelError, Result};

/// Bigram model conditioning on the previous token.
///
/// Owns the unigram model providing its conditioning counts and vocabulary size.
/// Pair keys are raw tokens: a token folded into the unknown bucket of the
/// unigram table still keeps its own pairs here.
#[derive(Clone, Debug, Default)]
pub struct BigramModel {
	table: CountTable<2>,
	unigram: UnigramModel,
	num_words: usize,
	vocab_size: usize,
}

impl BigramModel {
	pub fn new() -> Self {
		Self::default()
	}

	/// # Errors
	/// Returns an error if `config` is invalid.
	pub fn with_config(config: ModelConfig) -> Result<Self> {
		Ok(Self { unigram: UnigramModel::with_config(config)?, ..Self::default() })
	}

	/// Counts adjacent pairs, then trains the owned unigram on the same sentences.
	///
	/// # Returns
	/// The number of distinct pairs.
	pub fn train<S: AsRef<str> + Sync>(&mut self, sentences: &[Vec<S>]) -> usize {
		self.table = CountTable::from_sentences(sentences, self.unigram.config());
		self.unigram.train(sentences);
		self.num_words = self.table.total();
		self.vocab_size = self.unigram.vocab_size();

		log::info!("bigram trained: {} distinct pairs, {} pairs", self.table.len(), self.num_words);
		self.table.len()
	}

	/// Smoothed conditional probability `P(pair[1] | pair[0])`.
	///
	/// The denominator is the unigram count of `pair[0]`, or the unknown bucket
	/// when `pair[0]` was folded, plus `smoothing * vocab_size`.
	///
	/// # Errors
	/// - `ModelError::MissingNGram` if `pair` is not in the table.
	/// - `ModelError::ZeroDenominator` if the denominator is zero.
	pub fn probability<S: AsRef<str>>(&self, pair: &[S; 2], smoothing: f64) -> Result<f64> {
		let count = self.table.count(pair).ok_or_else(|| ModelError::MissingNGram {
			order: 2,
			key: CountTable::key(pair).to_vec(),
		})?;
		let context = self
			.unigram
			.count(pair[0].as_ref())
			.unwrap_or_else(|| self.unigram.unknown_count());
		let denominator = context as f64 + smoothing * self.vocab_size as f64;
		if denominator == 0.0 {
			return Err(ModelError::ZeroDenominator(CountTable::key(pair).to_vec()));
		}
		Ok((count as f64 + smoothing) / denominator)
	}

	/// Count of `pair`, or `None` if it was never observed.
	pub fn count<S: AsRef<str>>(&self, pair: &[S; 2]) -> Option<usize> {
		self.table.count(pair)
	}

	pub fn contains<S: AsRef<str>>(&self, pair: &[S; 2]) -> bool {
		self.table.contains(pair)
	}

	pub fn table(&self) -> &CountTable<2> {
		&self.table
	}

	/// The unigram model owned by this bigram model.
	pub fn unigram(&self) -> &UnigramModel {
		&self.unigram
	}

	/// Total number of pairs counted.
	pub fn num_words(&self) -> usize {
		self.num_words
	}

	pub fn vocab_size(&self) -> usize {
		self.vocab_size
	}
}

impl LanguageModel for BigramModel {
	type Params = f64;

	fn name(&self) -> &str {
		"bigram"
	}

	/// Unseen pairs, and pairs with a token missing from the unigram table,
	/// contribute nothing.
	fn log_likelihood<S: AsRef<str>>(&self, sentence: &[S], smoothing: f64) -> Result<f64> {
		let mut total = 0.0;
		for window in sentence.windows(2) {
			let pair = [window[0].as_ref(), window[1].as_ref()];
			if !self.table.contains(&pair) || !self.unigram.contains(pair[0]) || !self.unigram.contains(pair[1]) {
				log::trace!("bigram: skipping {:?}", pair);
				continue;
			}
			total += checked_log2(self.probability(&pair, smoothing)?)?;
		}
		Ok(total)
	}
}
