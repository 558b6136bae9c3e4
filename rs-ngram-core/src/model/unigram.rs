use super::config::ModelConfig;
use super::count_table::CountTable;
use super::perplexity::LanguageModel;
use crate::error::{checked_log2, ModelError, Result};

/// Unigram model with an unknown-word policy.
///
/// After training, the table holds the start, stop and unknown markers plus
/// every token seen at least `min_count` times. All rarer tokens share the
/// unknown marker's bucket.
///
/// # Invariants (after `train`)
/// - `table.total() == num_words + count(start_marker)`
/// - `vocab_size == table.len() - 1`
#[derive(Clone, Debug, Default)]
pub struct UnigramModel {
	config: ModelConfig,
	table: CountTable<1>,
	num_words: usize,
	vocab_size: usize,
}

impl UnigramModel {
	/// Creates an untrained model with the default markers and threshold.
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates an untrained model with a custom configuration.
	///
	/// # Errors
	/// Returns an error if `config` is invalid.
	pub fn with_config(config: ModelConfig) -> Result<Self> {
		config.validate()?;
		Ok(Self { config, ..Self::default() })
	}

	/// Counts the tokens of `sentences` and applies the unknown-word policy.
	///
	/// # Behavior
	/// - Start and stop markers keep their exact counts, whatever they are.
	/// - Any other token seen fewer than `min_count` times, as well as literal
	///   occurrences of the unknown marker, is added to the unknown bucket.
	/// - Replaces whatever a previous call built.
	///
	/// # Returns
	/// The number of stored entries minus one, i.e. `vocab_size`.
	pub fn train<S: AsRef<str> + Sync>(&mut self, sentences: &[Vec<S>]) -> usize {
		let raw: CountTable<1> = CountTable::from_sentences(sentences, &self.config);
		let unknown = &self.config.unknown_marker;

		let mut table = CountTable::new();
		table.insert([self.config.start_marker.clone()], 0);
		table.insert([self.config.stop_marker.clone()], 0);
		table.insert([unknown.clone()], 0);

		let mut folded = 0usize;
		for ([token], count) in raw.iter() {
			if self.config.is_boundary(token) {
				table.insert([token.clone()], count);
			} else if token == unknown || count < self.config.min_count {
				table.add([unknown.clone()], count);
				folded += 1;
			} else {
				table.insert([token.clone()], count);
			}
		}

		let start_count = table.count(&[self.config.start_marker.as_str()]).unwrap_or(0);
		self.num_words = table.total() - start_count;
		self.vocab_size = table.len() - 1;
		self.table = table;

		log::debug!("unigram: {} rare token types folded into {}", folded, unknown);
		log::info!(
			"unigram trained: {} entries, {} words, vocab size {}",
			self.table.len(),
			self.num_words,
			self.vocab_size
		);
		self.vocab_size
	}

	/// Smoothed probability of `token`.
	///
	/// `(count + smoothing) / (num_words + smoothing * vocab_size)`, where
	/// `count` is the unknown bucket when `token` is not a key of the table.
	///
	/// # Errors
	/// `ModelError::ZeroDenominator` on an empty model without smoothing.
	pub fn probability(&self, token: &str, smoothing: f64) -> Result<f64> {
		let count = match self.table.count(&[token]) {
			Some(count) => count,
			None => self.unknown_count(),
		};
		let denominator = self.num_words as f64 + smoothing * self.vocab_size as f64;
		if denominator == 0.0 {
			return Err(ModelError::ZeroDenominator(vec![token.to_owned()]));
		}
		Ok((count as f64 + smoothing) / denominator)
	}

	/// Count of `token`, or `None` if it is not a key of the table.
	pub fn count(&self, token: &str) -> Option<usize> {
		self.table.count(&[token])
	}

	/// Returns true if `token` survived the unknown-word policy.
	pub fn contains(&self, token: &str) -> bool {
		self.table.contains(&[token])
	}

	/// Size of the unknown bucket.
	pub fn unknown_count(&self) -> usize {
		self.table.count(&[self.config.unknown_marker.as_str()]).unwrap_or(0)
	}

	pub fn table(&self) -> &CountTable<1> {
		&self.table
	}

	/// Number of tokens in the denominator (every count but the start marker's).
	pub fn num_words(&self) -> usize {
		self.num_words
	}

	pub fn vocab_size(&self) -> usize {
		self.vocab_size
	}

	pub fn config(&self) -> &ModelConfig {
		&self.config
	}
}

impl LanguageModel for UnigramModel {
	type Params = f64;

	fn name(&self) -> &str {
		"unigram"
	}

	fn log_likelihood<S: AsRef<str>>(&self, sentence: &[S], smoothing: f64) -> Result<f64> {
		let mut total = 0.0;
		for token in sentence.iter().skip(1) {
			total += checked_log2(self.probability(token.as_ref(), smoothing)?)?;
		}
		Ok(total)
	}
}
