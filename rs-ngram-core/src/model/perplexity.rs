use crate::error::{ModelError, Result};

/// Common scoring interface of every model in the crate.
///
/// `Params` is what a caller picks per evaluation: the additive smoothing
/// constant for single-order models, the interpolation weights for
/// `InterpolatedModel`.
pub trait LanguageModel {
	type Params: Copy;

	/// Short human readable name ("unigram", "bigram", ...).
	fn name(&self) -> &str;

	/// Sum of the base-2 log-probabilities of `sentence`.
	///
	/// Index 0 is the start marker and is never predicted.
	fn log_likelihood<S: AsRef<str>>(&self, sentence: &[S], params: Self::Params) -> Result<f64>;

	/// Corpus perplexity of `sentences`.
	///
	/// See [`perplexity`].
	fn perplexity<S: AsRef<str>>(&self, sentences: &[Vec<S>], params: Self::Params) -> Result<f64> {
		perplexity(sentences, |sentence| self.log_likelihood(sentence, params))
	}
}

/// Number of scored tokens of a sentence: every token after the first.
pub fn scored_tokens<S>(sentence: &[S]) -> usize {
	sentence.len().saturating_sub(1)
}

/// Aggregates per-sentence log-likelihoods into `2^(-LL / M)`.
///
/// `M` is the number of scored tokens over the whole corpus, including the
/// positions a model skipped because their n-gram was unseen.
///
/// # Errors
/// - `ModelError::NoScoredTokens` if `M == 0`.
/// - Any error raised by `log_likelihood`, unchanged.
pub fn perplexity<S, F>(sentences: &[Vec<S>], mut log_likelihood: F) -> Result<f64>
where
	F: FnMut(&[S]) -> Result<f64>,
{
	let mut total = 0.0;
	let mut m = 0usize;
	for sentence in sentences {
		total += log_likelihood(sentence)?;
		m += scored_tokens(sentence);
	}
	if m == 0 {
		return Err(ModelError::NoScoredTokens);
	}
	let average = -total / m as f64;
	Ok(average.exp2())
}
