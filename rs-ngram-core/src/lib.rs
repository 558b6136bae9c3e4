//! Statistical n-gram language models.
//!
//! This crate counts unigrams, bigrams and trigrams over tokenized sentences
//! and scores evaluation sentences by log-likelihood and perplexity:
//! - Unknown-word folding of rare tokens
//! - Additive smoothing for every single-order model
//! - Fixed-weight linear interpolation across orders
//! - Parallel counting with additive merging of partial tables
//!
//! A tokenized sentence is a sequence of tokens starting with the start marker
//! and ending with the stop marker (`<START>` and `<STOP>` by default).
//!
//! ```rust
//! use rs_ngram_core::model::bigram::BigramModel;
//! use rs_ngram_core::model::perplexity::LanguageModel;
//!
//! let sentences = vec![vec!["<START>", "hello", "<STOP>"]; 3];
//! let mut model = BigramModel::new();
//! model.train(&sentences);
//! let perplexity = model.perplexity(&sentences, 0.0).unwrap();
//! assert_eq!(perplexity, 1.0);
//! ```

/// N-gram models, interpolation and perplexity.
pub mod model;

/// Error type shared by every model.
pub mod error;

/// Corpus files: loading tokenized sentences, listing and splitting corpora.
pub mod io;

pub use error::{ModelError, Result};
pub use model::bigram::BigramModel;
pub use model::config::ModelConfig;
pub use model::interpolated::{InterpolatedModel, InterpolationWeights, TrainingSummary};
pub use model::perplexity::LanguageModel;
pub use model::trigram::TrigramModel;
pub use model::unigram::UnigramModel;
