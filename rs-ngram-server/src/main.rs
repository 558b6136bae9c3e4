use std::sync::RwLock;

use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{get, post, put, web, App, HttpResponse, HttpServer, Responder};

use serde::{Deserialize, Serialize};
use rs_ngram_core::io::{get_filename, list_files, read_sentences, tokenize_line};
use rs_ngram_core::model::perplexity::scored_tokens;
use rs_ngram_core::{InterpolatedModel, InterpolationWeights, LanguageModel, ModelConfig, ModelError, TrainingSummary};

const DATA_FOLDER: &str = "./data";
const CORPUS_EXTENSION: &str = "txt";

/// Model scoring a `/v1/perplexity` request.
#[derive(Deserialize, Clone, Copy, Debug)]
#[serde(rename_all = "lowercase")]
enum Order {
	Unigram,
	Bigram,
	Trigram,
	Interpolated,
}

/// Body of the `/v1/perplexity` endpoint.
///
/// Sentences are given either already tokenized (`sentences`) or as raw
/// lines split on whitespace (`lines`); both lists are scored together.
#[derive(Deserialize)]
struct PerplexityRequest {
	model: Order,
	smoothing: Option<f64>,
	weights: Option<InterpolationWeights>,
	sentences: Option<Vec<Vec<String>>>,
	lines: Option<Vec<String>>,
}

#[derive(Serialize)]
struct PerplexityResponse {
	model: String,
	perplexity: f64,
	sentences: usize,
	scored_tokens: usize,
}

#[derive(Serialize)]
struct Stats {
	corpora: Vec<String>,
	sentences: usize,
	summary: TrainingSummary,
	unigram_words: usize,
	bigram_words: usize,
	trigram_words: usize,
	vocab_size: usize,
}

#[derive(Deserialize)]
struct CorpusQuery {
	names: Option<String>,
}

struct SharedData {
	config: ModelConfig,
	model: InterpolatedModel,
	corpora: Vec<String>,
	sentences: usize,
	summary: TrainingSummary,
}

impl PerplexityRequest {
	/// Collects every sentence of the request, tokenizing raw lines with the
	/// model's markers.
	fn collect_sentences(self, config: &ModelConfig) -> Vec<Vec<String>> {
		let mut sentences = self.sentences.unwrap_or_default();
		for line in self.lines.unwrap_or_default() {
			let sentence = tokenize_line(&line, config);
			if !sentence.is_empty() {
				sentences.push(sentence);
			}
		}
		sentences
	}
}

/// Scores `sentences` with the requested order.
fn score(model: &InterpolatedModel, order: Order, smoothing: f64, weights: Option<InterpolationWeights>, sentences: &[Vec<String>]) -> Result<(String, f64), ModelError> {
	match order {
		Order::Unigram => Ok((model.unigram().name().to_owned(), model.unigram().perplexity(sentences, smoothing)?)),
		Order::Bigram => Ok((model.bigram().name().to_owned(), model.bigram().perplexity(sentences, smoothing)?)),
		Order::Trigram => Ok((model.trigram().name().to_owned(), model.trigram().perplexity(sentences, smoothing)?)),
		Order::Interpolated => {
			let weights = match weights {
				Some(w) => w,
				None => InterpolationWeights::new(0.1, 0.3, 0.6)?,
			};
			Ok((model.name().to_owned(), model.perplexity(sentences, weights)?))
		}
	}
}

/// HTTP POST endpoint `/v1/perplexity`
///
/// Scores the posted sentences and returns the perplexity as JSON.
#[post("/v1/perplexity")]
async fn post_perplexity(data: web::Data<RwLock<SharedData>>, body: web::Json<PerplexityRequest>) -> impl Responder {
	let shared_data = match data.read() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};

	let request = body.into_inner();
	let order = request.model;
	let smoothing = request.smoothing.unwrap_or(0.0);
	let weights = request.weights;
	let sentences = request.collect_sentences(&shared_data.config);

	match score(&shared_data.model, order, smoothing, weights, &sentences) {
		Ok((model, perplexity)) => HttpResponse::Ok().json(PerplexityResponse {
			model,
			perplexity,
			sentences: sentences.len(),
			scored_tokens: sentences.iter().map(|s| scored_tokens(s.as_slice())).sum(),
		}),
		Err(e) => {
			log::warn!("scoring with {:?} failed: {}", order, e);
			HttpResponse::BadRequest().body(e.to_string())
		}
	}
}

/// HTTP GET endpoint `/v1/stats`
///
/// Describes the currently trained tables.
#[get("/v1/stats")]
async fn get_stats(data: web::Data<RwLock<SharedData>>) -> impl Responder {
	let shared_data = match data.read() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};
	let model = &shared_data.model;
	HttpResponse::Ok().json(Stats {
		corpora: shared_data.corpora.clone(),
		sentences: shared_data.sentences,
		summary: shared_data.summary,
		unigram_words: model.unigram().num_words(),
		bigram_words: model.bigram().num_words(),
		trigram_words: model.trigram().num_words(),
		vocab_size: model.unigram().vocab_size(),
	})
}

/// HTTP GET endpoint `/v1/corpora`
///
/// Lists the corpus files available for training.
#[get("/v1/corpora")]
async fn get_corpora() -> impl Responder {
	match list_files(DATA_FOLDER, CORPUS_EXTENSION) {
		Ok(files) => {
			let names: Vec<String> = files.iter().filter_map(|f| get_filename(f).ok()).collect();
			HttpResponse::Ok().body(names.join("\n"))
		}
		Err(_) => HttpResponse::InternalServerError().body("Failed to list corpora")
	}
}

/// HTTP PUT endpoint `/v1/train?names=a,b`
///
/// Trains a fresh model on the concatenation of the named corpora and
/// replaces the served one.
#[put("/v1/train")]
async fn put_train(data: web::Data<RwLock<SharedData>>, query: web::Query<CorpusQuery>) -> impl Responder {
	let query_names = match &query.names {
		Some(s) if !s.trim().is_empty() => s.trim(),
		_ => return HttpResponse::BadRequest().body("Missing or empty corpus name"),
	};

	let corpus_names: Vec<String> = query_names
		.split(',')
		.map(|s| s.trim())
		.filter(|s| !s.is_empty())
		.map(str::to_owned)
		.collect();

	let config = match data.read() {
		Ok(m) => m.config.clone(),
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};

	let mut sentences = Vec::new();
	for name in &corpus_names {
		let corpus_path = format!("{}/{}.{}", DATA_FOLDER, name, CORPUS_EXTENSION);
		match read_sentences(&corpus_path, &config) {
			Ok(mut s) => sentences.append(&mut s),
			Err(e) => return HttpResponse::InternalServerError().body(format!("Failed to read corpus {name}: {e}")),
		}
	}

	let mut model = match InterpolatedModel::with_config(config) {
		Ok(m) => m,
		Err(e) => return HttpResponse::InternalServerError().body(format!("Invalid configuration: {e}")),
	};
	let summary = model.train(&sentences);
	log::info!("trained on {:?}: {} sentences", corpus_names, sentences.len());

	let mut shared_data = match data.write() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};
	shared_data.model = model;
	shared_data.corpora = corpus_names;
	shared_data.sentences = sentences.len();
	shared_data.summary = summary;

	HttpResponse::Ok().json(summary)
}

/// Main entry point for the server.
///
/// Starts with an untrained model behind a `RwLock` (scoring only reads the
/// tables) and serves it with Actix-web.
///
/// # Notes
/// - The server binds to 127.0.0.1:5000.
/// - Corpora are read from `./data/<name>.txt`, one tokenized sentence per line.
/// - Log verbosity follows `RUST_LOG` (default `info`).
#[actix_web::main]
async fn main() -> std::io::Result<()> {
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

	let shared_data = SharedData {
		config: ModelConfig::default(),
		model: InterpolatedModel::new(),
		corpora: Vec::new(),
		sentences: 0,
		summary: TrainingSummary::default(),
	};
	let shared_model = web::Data::new(RwLock::new(shared_data));

	HttpServer::new(move || {
		App::new()
			.wrap(Logger::default())
			.wrap(Cors::permissive())
			.app_data(shared_model.clone())
			.service(post_perplexity)
			.service(get_stats)
			.service(get_corpora)
			.service(put_train)
	})
		.bind(("127.0.0.1", 5000))?
		.run()
		.await
}
