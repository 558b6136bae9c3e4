use thiserror::Error;

/// Errors raised while training or scoring an n-gram model.
///
/// Scoring a whole sentence never fails because an n-gram is unseen: the
/// `log_likelihood` loops skip those. The variants below surface when a caller
/// asks for something the tables cannot answer, or when the arithmetic
/// degenerates.
#[derive(Debug, Error, PartialEq)]
pub enum ModelError {
	/// `probability` was asked about an n-gram (or its conditioning context)
	/// that is not a key of the corresponding table.
	#[error("unseen {order}-gram {key:?}")]
	MissingNGram { order: usize, key: Vec<String> },

	/// A probability denominator evaluated to zero (empty model with no smoothing).
	#[error("zero denominator while estimating the probability of {0:?}")]
	ZeroDenominator(Vec<String>),

	/// A zero or negative value reached the logarithm.
	#[error("cannot take log2 of non-positive probability {0}")]
	NonPositiveProbability(f64),

	/// Interpolation weights must sum to exactly 1.
	#[error("interpolation weights must sum to 1, got {l1} + {l2} + {l3} = {sum}")]
	InvalidWeights { l1: f64, l2: f64, l3: f64, sum: f64 },

	/// The evaluation set has no token after the start marker of any sentence.
	#[error("no scored tokens in the evaluation set")]
	NoScoredTokens,

	#[error("invalid configuration: {0}")]
	InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;

/// Base-2 logarithm that refuses degenerate arguments instead of yielding
/// `-inf` or `NaN`.
pub(crate) fn checked_log2(probability: f64) -> Result<f64> {
	if probability > 0.0 {
		Ok(probability.log2())
	} else {
		Err(ModelError::NonPositiveProbability(probability))
	}
}
