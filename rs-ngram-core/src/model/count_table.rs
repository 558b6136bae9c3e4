use std::collections::HashMap;
use std::sync::mpsc;
use std::thread;

use super::config::ModelConfig;

/// An n-gram key: `N` consecutive tokens compared and hashed structurally.
pub type NGram<const N: usize> = [String; N];

/// Frequency table of order `N` (1 = unigram, 2 = bigram, 3 = trigram).
///
/// A `CountTable` maps every n-gram observed inside a sentence to the number of
/// times it occurred. Windows never cross sentence boundaries.
///
/// # Responsibilities
/// - Accumulate occurrences while reading sentences
/// - Answer count lookups with borrowed tokens
/// - Merge with another table of the same order (parallel counting support)
///
/// # Invariants
/// - Every stored key has exactly `N` tokens (enforced by the type)
/// - Counts stored through `add_sentence` are strictly positive
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CountTable<const N: usize> {
	counts: HashMap<NGram<N>, usize>,
}

impl<const N: usize> CountTable<N> {
	/// Creates an empty table.
	pub fn new() -> Self {
		Self { counts: HashMap::new() }
	}

	/// Builds an owned key from borrowed tokens.
	pub fn key<S: AsRef<str>>(tokens: &[S; N]) -> NGram<N> {
		std::array::from_fn(|i| tokens[i].as_ref().to_owned())
	}

	/// Counts every window of `N` adjacent tokens of `sentence`.
	///
	/// Sentences shorter than `N` contribute nothing.
	pub fn add_sentence<S: AsRef<str>>(&mut self, sentence: &[S]) {
		if N == 0 || sentence.len() < N {
			return;
		}
		for window in sentence.windows(N) {
			let key: NGram<N> = std::array::from_fn(|i| window[i].as_ref().to_owned());
			*self.counts.entry(key).or_insert(0) += 1;
		}
	}

	/// Adds `occurrences` to the count of `key`.
	pub fn add(&mut self, key: NGram<N>, occurrences: usize) {
		*self.counts.entry(key).or_insert(0) += occurrences;
	}

	/// Sets the count of `key`, replacing any previous value.
	pub(crate) fn insert(&mut self, key: NGram<N>, count: usize) {
		self.counts.insert(key, count);
	}

	/// Returns the count of `key`, or `None` if it was never observed.
	pub fn count<S: AsRef<str>>(&self, key: &[S; N]) -> Option<usize> {
		self.counts.get(&Self::key(key)).copied()
	}

	/// Returns true if `key` is present in the table.
	pub fn contains<S: AsRef<str>>(&self, key: &[S; N]) -> bool {
		self.counts.contains_key(&Self::key(key))
	}

	/// Sum of all counts.
	pub fn total(&self) -> usize {
		self.counts.values().sum()
	}

	/// Number of distinct n-grams.
	pub fn len(&self) -> usize {
		self.counts.len()
	}

	pub fn is_empty(&self) -> bool {
		self.counts.is_empty()
	}

	/// Iterates over `(n-gram, count)` pairs in arbitrary order.
	pub fn iter(&self) -> impl Iterator<Item = (&NGram<N>, usize)> {
		self.counts.iter().map(|(k, v)| (k, *v))
	}

	/// Merges another table of the same order into this one.
	///
	/// Counts of matching keys are summed, missing keys are moved over.
	/// Counting is commutative and associative, so merge order does not matter.
	pub fn merge(&mut self, other: Self) {
		for (key, occurrences) in other.counts {
			self.add(key, occurrences);
		}
	}

	/// Counts every sentence of the corpus.
	///
	/// # Behavior
	/// - Splits the corpus into `ModelConfig::shard_count` chunks.
	/// - A single chunk is counted on the calling thread.
	/// - Otherwise spawns one scoped thread per chunk, each building a partial
	///   table, and merges the partial tables as they arrive over an MPSC channel.
	pub fn from_sentences<S>(sentences: &[Vec<S>], config: &ModelConfig) -> Self
	where
		S: AsRef<str> + Sync,
	{
		let shards = config.shard_count(sentences.len());
		if shards <= 1 {
			let mut table = Self::new();
			for sentence in sentences {
				table.add_sentence(sentence);
			}
			return table;
		}

		let chunk_size = sentences.len().div_ceil(shards);
		log::debug!(
			"counting {}-grams over {} sentences in {} shards",
			N,
			sentences.len(),
			sentences.len().div_ceil(chunk_size)
		);

		let mut table = Self::new();
		thread::scope(|scope| {
			let (tx, rx) = mpsc::channel();
			for chunk in sentences.chunks(chunk_size) {
				let tx = tx.clone();
				scope.spawn(move || {
					let mut partial = Self::new();
					for sentence in chunk {
						partial.add_sentence(sentence);
					}
					tx.send(partial).expect("receiver lives until every shard is merged");
				});
			}
			drop(tx);

			for partial in rx.iter() {
				table.merge(partial);
			}
		});
		table
	}
}
