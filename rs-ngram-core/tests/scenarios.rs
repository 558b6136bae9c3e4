use std::collections::HashMap;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use rs_ngram_core::{
	BigramModel, InterpolatedModel, InterpolationWeights, LanguageModel, ModelConfig, ModelError, TrigramModel,
	UnigramModel,
};

fn two_sentences() -> Vec<Vec<&'static str>> {
	vec![
		vec!["<START>", "a", "b", "<STOP>"],
		vec!["<START>", "a", "c", "<STOP>"],
	]
}

/// Skewed random corpus: low word ids are much more frequent than high ones.
fn random_corpus(seed: u64, sentences: usize) -> Vec<Vec<String>> {
	let mut rng = StdRng::seed_from_u64(seed);
	(0..sentences)
		.map(|_| {
			let length = rng.random_range(1..12usize);
			let mut sentence = vec!["<START>".to_owned()];
			for _ in 0..length {
				let id = rng.random_range(0..40usize) * rng.random_range(0..40usize) / 40;
				sentence.push(format!("w{}", id));
			}
			sentence.push("<STOP>".to_owned());
			sentence
		})
		.collect()
}

#[test]
fn test_two_sentence_unigram_table() {
	let mut model = UnigramModel::new();
	let stored = model.train(&two_sentences());

	// Every word is seen fewer than 3 times and lands in the unknown bucket
	assert_eq!(model.count("<START>"), Some(2));
	assert_eq!(model.count("<STOP>"), Some(2));
	assert_eq!(model.count("<UNK>"), Some(4));
	assert_eq!(model.count("a"), None);
	assert_eq!(model.table().len(), 3);
	assert_eq!(stored, 2);
	assert_eq!(model.vocab_size(), 2);
	assert_eq!(model.num_words(), 6);
}

#[test]
fn test_two_sentence_bigram_table() {
	let mut model = BigramModel::new();
	assert_eq!(model.train(&two_sentences()), 5);

	assert_eq!(model.count(&["<START>", "a"]), Some(2));
	assert_eq!(model.count(&["a", "b"]), Some(1));
	assert_eq!(model.count(&["b", "<STOP>"]), Some(1));
	assert_eq!(model.count(&["a", "c"]), Some(1));
	assert_eq!(model.count(&["c", "<STOP>"]), Some(1));

	// "b" keeps its own pairs although the unigram table folded it
	assert!(!model.unigram().contains("b"));
	// Every pair touches a folded token, so nothing is scored
	assert_eq!(model.log_likelihood(&two_sentences()[0], 0.0), Ok(0.0));
	assert_eq!(model.perplexity(&two_sentences(), 0.0), Ok(1.0));
}

#[test]
fn test_unigram_table_invariants() {
	let corpus = random_corpus(1, 300);
	let mut model = UnigramModel::new();
	model.train(&corpus);

	let start = model.count("<START>").unwrap();
	assert_eq!(start, corpus.len());
	assert_eq!(model.table().total(), model.num_words() + start);
	assert_eq!(model.vocab_size(), model.table().len() - 1);

	let mut raw: HashMap<&str, usize> = HashMap::new();
	for token in corpus.iter().flatten() {
		*raw.entry(token.as_str()).or_insert(0) += 1;
	}
	let mut folded = 0;
	for (token, count) in raw {
		if token == "<START>" || token == "<STOP>" {
			assert_eq!(model.count(token), Some(count));
		} else if count >= 3 {
			assert_eq!(model.count(token), Some(count), "{} should keep its key", token);
		} else {
			assert_eq!(model.count(token), None, "{} should be folded", token);
			folded += count;
		}
	}
	assert_eq!(model.unknown_count(), folded);
}

#[test]
fn test_probabilities_are_in_unit_interval() {
	let corpus = random_corpus(2, 200);
	let mut model = TrigramModel::new();
	model.train(&corpus);

	for smoothing in [0.0, 0.5, 1.0, 10.0] {
		for ([token], count) in model.bigram().unigram().table().iter() {
			if count == 0 && smoothing == 0.0 {
				continue;
			}
			let p = model.bigram().unigram().probability(token, smoothing).unwrap();
			assert!(p > 0.0 && p <= 1.0, "P({}) = {}", token, p);
		}
		for (pair, _) in model.bigram().table().iter() {
			let p = model.bigram().probability(pair, smoothing).unwrap();
			assert!(p > 0.0 && p <= 1.0, "P({:?}) = {}", pair, p);
		}
		for (triple, _) in model.table().iter() {
			let p = model.probability(triple, smoothing).unwrap();
			assert!(p > 0.0 && p <= 1.0, "P({:?}) = {}", triple, p);
		}
	}
}

#[test]
fn test_in_sample_perplexity_is_at_least_one() {
	let corpus = random_corpus(3, 250);

	let mut unigram = UnigramModel::new();
	unigram.train(&corpus);
	let mut bigram = BigramModel::new();
	bigram.train(&corpus);
	let mut trigram = TrigramModel::new();
	trigram.train(&corpus);
	let mut interpolated = InterpolatedModel::new();
	interpolated.train(&corpus);

	let perplexities = [
		unigram.perplexity(&corpus, 0.0).unwrap(),
		bigram.perplexity(&corpus, 0.0).unwrap(),
		trigram.perplexity(&corpus, 0.0).unwrap(),
		interpolated.interpolate(0.25, 0.25, 0.5, &corpus).unwrap(),
	];
	for perplexity in perplexities {
		assert!(perplexity.is_finite());
		assert!(perplexity >= 1.0);
	}
}

#[test]
fn test_unigram_perplexity_grows_with_smoothing() {
	let corpus = random_corpus(4, 50);
	let mut model = UnigramModel::new();
	model.train(&corpus);

	let mut previous = model.perplexity(&corpus, 0.0).unwrap();
	for smoothing in [0.01, 0.1, 0.5, 1.0, 2.0, 10.0, 100.0, 1000.0] {
		let perplexity = model.perplexity(&corpus, smoothing).unwrap();
		assert!(perplexity >= previous - 1e-9, "{} < {} at smoothing {}", perplexity, previous, smoothing);
		previous = perplexity;
	}
}

#[test]
fn test_invalid_weights_are_rejected_before_scoring() {
	let corpus = random_corpus(5, 20);
	let mut model = InterpolatedModel::new();
	model.train(&corpus);

	assert!(matches!(
		model.interpolate(0.5, 0.3, 0.1, &corpus),
		Err(ModelError::InvalidWeights { .. })
	));
	assert!(InterpolationWeights::new(0.5, 0.3, 0.1).is_err());
}

#[test]
fn test_interpolation_with_trigram_weight_only_on_seen_data() {
	let corpus = random_corpus(6, 100);
	let mut model = InterpolatedModel::new();
	model.train(&corpus);

	// λ3 = 1: every scored position uses the trigram estimate (the opening pair uses
	// the bigram estimate in the trigram slot), which never reaches zero
	let perplexity = model.interpolate(0.0, 0.0, 1.0, &corpus).unwrap();
	assert!(perplexity >= 1.0);
}

#[test]
fn test_sharded_training_matches_sequential() {
	let corpus = random_corpus(7, 400);

	let mut sequential = InterpolatedModel::new();
	let expected = sequential.train(&corpus);

	let config = ModelConfig { min_sentences_per_shard: 16, shards_per_cpu: 2, ..Default::default() };
	let mut sharded = InterpolatedModel::with_config(config).unwrap();
	assert_eq!(sharded.train(&corpus), expected);

	assert_eq!(sharded.trigram().table(), sequential.trigram().table());
	assert_eq!(sharded.unigram().table(), sequential.unigram().table());
	let weights = InterpolationWeights::new(0.25, 0.25, 0.5).unwrap();
	let a = sharded.perplexity(&corpus, weights).unwrap();
	let b = sequential.perplexity(&corpus, weights).unwrap();
	assert!((a - b).abs() < 1e-9);
}

#[test]
fn test_custom_markers() {
	let config = ModelConfig {
		start_marker: "<s>".to_owned(),
		stop_marker: "</s>".to_owned(),
		unknown_marker: "<unk>".to_owned(),
		..Default::default()
	};
	let sentences = vec![vec!["<s>", "x", "</s>"]; 3];
	let mut model = BigramModel::with_config(config).unwrap();
	model.train(&sentences);

	assert_eq!(model.unigram().count("<s>"), Some(3));
	assert_eq!(model.unigram().unknown_count(), 0);
	assert_eq!(model.perplexity(&sentences, 0.0), Ok(1.0));
}
