use serde::{Deserialize, Serialize};

use super::bigram::BigramModel;
use super::config::ModelConfig;
use super::perplexity::LanguageModel;
use super::trigram::TrigramModel;
use super::unigram::UnigramModel;
use crate::error::{checked_log2, ModelError, Result};

/// Linear interpolation weights `(λ1, λ2, λ3)` for the unigram, bigram and
/// trigram estimates.
///
/// # Invariants
/// - `λ1 + λ2 + λ3 == 1.0`, compared exactly in that summation order
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
#[serde(try_from = "[f64; 3]", into = "[f64; 3]")]
pub struct InterpolationWeights {
	unigram: f64,
	bigram: f64,
	trigram: f64,
}

impl InterpolationWeights {
	/// # Errors
	/// Returns `ModelError::InvalidWeights` if the weights do not sum to 1.
	pub fn new(unigram: f64, bigram: f64, trigram: f64) -> Result<Self> {
		let sum = unigram + bigram + trigram;
		if sum != 1.0 {
			return Err(ModelError::InvalidWeights { l1: unigram, l2: bigram, l3: trigram, sum });
		}
		Ok(Self { unigram, bigram, trigram })
	}

	pub fn unigram(&self) -> f64 {
		self.unigram
	}

	pub fn bigram(&self) -> f64 {
		self.bigram
	}

	pub fn trigram(&self) -> f64 {
		self.trigram
	}

	/// Weighted sum of the three estimates.
	fn combine(&self, p_unigram: f64, p_bigram: f64, p_trigram: f64) -> f64 {
		self.unigram * p_unigram + self.bigram * p_bigram + self.trigram * p_trigram
	}
}

impl TryFrom<[f64; 3]> for InterpolationWeights {
	type Error = ModelError;

	fn try_from([unigram, bigram, trigram]: [f64; 3]) -> Result<Self> {
		Self::new(unigram, bigram, trigram)
	}
}

impl From<InterpolationWeights> for [f64; 3] {
	fn from(weights: InterpolationWeights) -> Self {
		[weights.unigram, weights.bigram, weights.trigram]
	}
}

/// What each order reported after training: the unigram vocabulary size and
/// the number of distinct pairs and triples.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TrainingSummary {
	pub unigrams: usize,
	pub bigrams: usize,
	pub trigrams: usize,
}

/// Linear interpolation of a unigram, a bigram and a trigram model.
///
/// The three models are independent: each re-counts the corpus and none of
/// them is the sub-model owned by another.
#[derive(Clone, Debug, Default)]
pub struct InterpolatedModel {
	unigram: UnigramModel,
	bigram: BigramModel,
	trigram: TrigramModel,
}

impl InterpolatedModel {
	pub fn new() -> Self {
		Self::default()
	}

	/// # Errors
	/// Returns an error if `config` is invalid.
	pub fn with_config(config: ModelConfig) -> Result<Self> {
		Ok(Self {
			unigram: UnigramModel::with_config(config.clone())?,
			bigram: BigramModel::with_config(config.clone())?,
			trigram: TrigramModel::with_config(config)?,
		})
	}

	/// Trains the three models from scratch on `sentences`.
	pub fn train<S: AsRef<str> + Sync>(&mut self, sentences: &[Vec<S>]) -> TrainingSummary {
		let summary = TrainingSummary {
			unigrams: self.unigram.train(sentences),
			bigrams: self.bigram.train(sentences),
			trigrams: self.trigram.train(sentences),
		};
		log::info!("interpolated model trained: {:?}", summary);
		summary
	}

	/// Perplexity of `sentences` under the weights `(l1, l2, l3)`.
	///
	/// # Errors
	/// `ModelError::InvalidWeights` is returned before any sentence is scored.
	pub fn interpolate<S: AsRef<str>>(&self, l1: f64, l2: f64, l3: f64, sentences: &[Vec<S>]) -> Result<f64> {
		let weights = InterpolationWeights::new(l1, l2, l3)?;
		self.perplexity(sentences, weights)
	}

	pub fn unigram(&self) -> &UnigramModel {
		&self.unigram
	}

	pub fn bigram(&self) -> &BigramModel {
		&self.bigram
	}

	pub fn trigram(&self) -> &TrigramModel {
		&self.trigram
	}
}

impl LanguageModel for InterpolatedModel {
	type Params = InterpolationWeights;

	fn name(&self) -> &str {
		"interpolated"
	}

	/// Sums `log2(λ1·P(w3) + λ2·P(w3 | w2) + λ3·P(w3 | w1 w2))` over the
	/// sentence, with unsmoothed estimates.
	///
	/// The first prediction has no trigram context: when the opening pair is
	/// seen, its bigram estimate fills both the bigram and the trigram slot, and
	/// the unigram slot is 0 if the second token was folded.
	/// A triple is skipped when it is unseen, its conditioning pair is unseen,
	/// or its last token is not in the unigram table.
	fn log_likelihood<S: AsRef<str>>(&self, sentence: &[S], weights: InterpolationWeights) -> Result<f64> {
		let mut total = 0.0;
		if let [first, second, ..] = sentence {
			let opening = [first.as_ref(), second.as_ref()];
			if self.bigram.contains(&opening) {
				let p_bigram = self.bigram.probability(&opening, 0.0)?;
				let p_unigram = if self.unigram.contains(opening[1]) {
					self.unigram.probability(opening[1], 0.0)?
				} else {
					0.0
				};
				total += checked_log2(weights.combine(p_unigram, p_bigram, p_bigram))?;
			}
		}

		for window in sentence.windows(3) {
			let [w1, w2, w3] = [window[0].as_ref(), window[1].as_ref(), window[2].as_ref()];
			if !self.trigram.contains(&[w1, w2, w3]) || !self.bigram.contains(&[w1, w2]) || !self.unigram.contains(w3) {
				log::trace!("interpolated: skipping {:?}", [w1, w2, w3]);
				continue;
			}
			let p_trigram = self.trigram.probability(&[w1, w2, w3], 0.0)?;
			let p_bigram = self.bigram.probability(&[w2, w3], 0.0)?;
			let p_unigram = self.unigram.probability(w3, 0.0)?;
			total += checked_log2(weights.combine(p_unigram, p_bigram, p_trigram))?;
		}
		Ok(total)
	}
}
