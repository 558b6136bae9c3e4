use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::{fs, io};

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::model::config::ModelConfig;

/// Splits a line on whitespace and wraps it with the boundary markers.
///
/// - Prepends `start_marker` if the line does not already start with it
/// - Appends `stop_marker` if the line does not already end with it
/// - Returns an empty sentence for a blank line
pub fn tokenize_line(line: &str, config: &ModelConfig) -> Vec<String> {
	let mut sentence: Vec<String> = line.split_whitespace().map(str::to_owned).collect();
	if sentence.is_empty() {
		return sentence;
	}
	if sentence.first() != Some(&config.start_marker) {
		sentence.insert(0, config.start_marker.clone());
	}
	if sentence.last() != Some(&config.stop_marker) {
		sentence.push(config.stop_marker.clone());
	}
	sentence
}

/// Reads a corpus file with one whitespace-tokenized sentence per line.
///
/// - Reads the entire file into memory
/// - Splits on `\n` / `\r\n`, skipping blank lines
pub fn read_sentences<P: AsRef<Path>>(filename: P, config: &ModelConfig) -> io::Result<Vec<Vec<String>>> {
	let mut contents = String::new();
	File::open(filename)?.read_to_string(&mut contents)?;
	Ok(contents
		.lines()
		.map(|line| tokenize_line(line, config))
		.filter(|sentence| !sentence.is_empty())
		.collect())
}

/// Shuffles `sentences` with a seeded RNG and splits them in two.
///
/// The first part holds `ratio` of the sentences (rounded down), the second
/// part the rest. The same seed always yields the same split.
pub fn split_corpus<T>(mut sentences: Vec<T>, ratio: f64, seed: u64) -> (Vec<T>, Vec<T>) {
	let mut rng = StdRng::seed_from_u64(seed);
	sentences.shuffle(&mut rng);
	let cut = ((sentences.len() as f64) * ratio.clamp(0.0, 1.0)) as usize;
	let rest = sentences.split_off(cut);
	(sentences, rest)
}

/// Extracts the base filename without extension.
///
/// Examples:
/// - `"./data/train.txt"` → `"train"`
/// - `"train.txt"` → `"train"`
pub fn get_filename<P: AsRef<Path>>(input_path: P) -> io::Result<String> {
	let stem = input_path
		.as_ref()
		.file_stem()
		.ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "Path has no filename"))?;

	Ok(stem.to_string_lossy().to_string())
}

/// Lists all files with a given extension in a directory.
///
/// Returns file names only (no paths), sorted.
pub fn list_files<P: AsRef<Path>>(dir: P, extension: &str) -> io::Result<Vec<String>> {
	let mut files = Vec::new();

	for entry in fs::read_dir(dir)? {
		let path = entry?.path();
		if path.is_file() && path.extension() == Some(std::ffi::OsStr::new(extension)) {
			if let Some(name) = path.file_name() {
				files.push(name.to_string_lossy().to_string());
			}
		}
	}

	files.sort();
	Ok(files)
}
