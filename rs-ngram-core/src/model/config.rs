use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

/// Default start-of-sentence marker.
pub const START_MARKER: &str = "<START>";
/// Default end-of-sentence marker.
pub const STOP_MARKER: &str = "<STOP>";
/// Default unknown-word marker.
pub const UNKNOWN_MARKER: &str = "<UNK>";

/// Training configuration shared by every model of the workspace.
///
/// # Responsibilities
/// - Name the three reserved symbols (start, stop, unknown)
/// - Hold the rarity threshold of the unknown-word policy
/// - Control how the corpus is sharded for parallel counting
///
/// # Invariants
/// - The three markers are non-empty and pairwise distinct
/// - `min_count >= 1`
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct ModelConfig {
	/// Marker expected at index 0 of every sentence.
	pub start_marker: String,

	/// Marker closing every sentence.
	pub stop_marker: String,

	/// Bucket receiving the counts of rare tokens.
	pub unknown_marker: String,

	/// Tokens seen fewer than `min_count` times are folded into `unknown_marker`.
	pub min_count: usize,

	/// Number of counting shards per CPU when the corpus is sharded.
	pub shards_per_cpu: usize,

	/// Below this many sentences per shard, counting stays on the calling thread.
	pub min_sentences_per_shard: usize,
}

impl Default for ModelConfig {
	fn default() -> Self {
		Self {
			start_marker: START_MARKER.to_owned(),
			stop_marker: STOP_MARKER.to_owned(),
			unknown_marker: UNKNOWN_MARKER.to_owned(),
			min_count: 3,
			shards_per_cpu: 8,
			min_sentences_per_shard: 1024,
		}
	}
}

impl ModelConfig {
	/// Checks the invariants listed on the type.
	///
	/// # Errors
	/// Returns `ModelError::InvalidConfig` describing the first violation found.
	pub fn validate(&self) -> Result<()> {
		let markers = [&self.start_marker, &self.stop_marker, &self.unknown_marker];
		if markers.iter().any(|m| m.is_empty()) {
			return Err(ModelError::InvalidConfig("markers cannot be empty".to_owned()));
		}
		if self.start_marker == self.stop_marker
			|| self.start_marker == self.unknown_marker
			|| self.stop_marker == self.unknown_marker
		{
			return Err(ModelError::InvalidConfig(format!(
				"markers must be distinct, got ({}, {}, {})",
				self.start_marker, self.stop_marker, self.unknown_marker
			)));
		}
		if self.min_count == 0 {
			return Err(ModelError::InvalidConfig("min_count must be >= 1".to_owned()));
		}
		Ok(())
	}

	/// Returns true for the start and stop markers, which the unknown-word
	/// policy never folds.
	pub fn is_boundary(&self, token: &str) -> bool {
		token == self.start_marker || token == self.stop_marker
	}

	/// Number of shards to split `sentences` sentences into.
	///
	/// Returns 1 when the corpus is too small to be worth a thread per shard.
	pub(crate) fn shard_count(&self, sentences: usize) -> usize {
		let per_shard = self.min_sentences_per_shard.max(1);
		let wanted = num_cpus::get() * self.shards_per_cpu.max(1);
		wanted.min(sentences / per_shard).max(1)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_default_is_valid() {
		let config = ModelConfig::default();
		assert!(config.validate().is_ok());
		assert!(config.is_boundary("<START>"));
		assert!(config.is_boundary("<STOP>"));
		assert!(!config.is_boundary("<UNK>"));
	}

	#[test]
	fn test_rejects_clashing_markers() {
		let config = ModelConfig { stop_marker: "<START>".to_owned(), ..Default::default() };
		assert!(matches!(config.validate(), Err(ModelError::InvalidConfig(_))));

		let config = ModelConfig { unknown_marker: String::new(), ..Default::default() };
		assert!(config.validate().is_err());

		let config = ModelConfig { min_count: 0, ..Default::default() };
		assert!(config.validate().is_err());
	}

	#[test]
	fn test_small_corpus_is_not_sharded() {
		let config = ModelConfig::default();
		assert_eq!(config.shard_count(0), 1);
		assert_eq!(config.shard_count(10), 1);

		let config = ModelConfig { min_sentences_per_shard: 1, shards_per_cpu: 1, ..Default::default() };
		assert_eq!(config.shard_count(1_000_000), num_cpus::get());
	}
}
