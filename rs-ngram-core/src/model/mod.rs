//! N-gram language models and their evaluation.
//!
//! This module provides the counting and scoring engine, including:
//! - An order-parameterized frequency table (`CountTable`)
//! - Unigram, bigram and trigram models with additive smoothing
//! - A linearly interpolated model combining the three orders
//! - Corpus perplexity shared by every model (`LanguageModel`)

/// Training configuration (markers, rarity threshold, sharding).
pub mod config;

/// Frequency table keyed by fixed-size n-grams.
///
/// Handles sentence ingestion, count lookups and additive merging,
/// including sharded counting over worker threads.
pub mod count_table;

/// Unigram model and its unknown-word policy.
pub mod unigram;

/// Bigram model owning a unigram model.
pub mod bigram;

/// Trigram model owning a bigram model.
pub mod trigram;

/// Linear interpolation of the three orders and its weights.
pub mod interpolated;

/// `LanguageModel` trait and corpus perplexity.
pub mod perplexity;
