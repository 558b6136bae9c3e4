use rs_ngram_core::io::{read_sentences, split_corpus};
use rs_ngram_core::{BigramModel, InterpolatedModel, LanguageModel, ModelConfig, TrigramModel, UnigramModel};

/// Formats a perplexity, or the reason it could not be computed.
fn show(perplexity: rs_ngram_core::Result<f64>) -> String {
    match perplexity {
        Ok(value) => format!("{:>10.3}", value),
        Err(e) => format!("({})", e),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Markers, rarity threshold and sharding; defaults are <START>, <STOP>, <UNK> and 3
    let config = ModelConfig::default();

    // One whitespace-tokenized sentence per line; markers are added when missing
    let corpus = read_sentences("./data/train.txt", &config)?;
    log::info!("loaded {} sentences from ./data/train.txt", corpus.len());

    // Keep 80% for training and score the rest, with a fixed seed for reproducible numbers
    let (train, dev) = split_corpus(corpus, 0.8, 42);
    println!("{} training sentences, {} evaluation sentences", train.len(), dev.len());

    let mut unigram = UnigramModel::with_config(config.clone())?;
    let mut bigram = BigramModel::with_config(config.clone())?;
    let mut trigram = TrigramModel::with_config(config.clone())?;
    println!("unigram vocabulary: {}", unigram.train(&train));
    println!("distinct bigrams: {}", bigram.train(&train));
    println!("distinct trigrams: {}", trigram.train(&train));

    // In-sample perplexity grows with smoothing, held-out perplexity usually drops first
    for smoothing in [0.0, 0.1, 0.5, 1.0, 2.0] {
        println!(
            "smoothing {:>4}: unigram train {} dev {} | bigram dev {} | trigram dev {}",
            smoothing,
            show(unigram.perplexity(&train, smoothing)),
            show(unigram.perplexity(&dev, smoothing)),
            show(bigram.perplexity(&dev, smoothing)),
            show(trigram.perplexity(&dev, smoothing)),
        );
    }

    let mut interpolated = InterpolatedModel::with_config(config)?;
    interpolated.train(&train);

    // Weights must sum to exactly 1
    for (l1, l2, l3) in [(0.1, 0.3, 0.6), (0.2, 0.3, 0.5), (0.25, 0.25, 0.5), (0.5, 0.25, 0.25)] {
        println!(
            "lambdas ({}, {}, {}): train {} dev {}",
            l1,
            l2,
            l3,
            show(interpolated.interpolate(l1, l2, l3, &train)),
            show(interpolated.interpolate(l1, l2, l3, &dev)),
        );
    }

    // Weights not summing to 1 are refused before any scoring happens
    match interpolated.interpolate(0.5, 0.3, 0.1, &dev) {
        Ok(_) => println!("Should not happen"),
        Err(e) => println!("Rejected: {}", e),
    }

    Ok(())
}
