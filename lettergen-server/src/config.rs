//! Server configuration, loaded from a JSON file.
//!
//! Every field has a default, so a partial (or missing) file is fine.

use std::fs;
use std::path::{Path, PathBuf};

use lettergen_core::{GenerationConfig, WordGenerator};
use serde::{Deserialize, Serialize};

/// Environment variable holding the configuration file path.
pub const CONFIG_ENV: &str = "LETTERGEN_CONFIG";

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ServerConfig {
	#[serde(default = "default_host")]
	pub host: String,
	#[serde(default = "default_port")]
	pub port: u16,
	/// Folder holding the `.txt` training corpora
	#[serde(default = "default_data_dir")]
	pub data_dir: String,
	/// Corpus (file stem) trained at startup, if any
	#[serde(default)]
	pub corpus: Option<String>,
	/// Order used when a train request does not give one
	#[serde(default = "default_order")]
	pub order: usize,
	/// Prior used when a train request does not give one
	#[serde(default = "default_prior")]
	pub prior: f64,
	#[serde(default = "default_max_attempts")]
	pub max_attempts: usize,
	#[serde(default = "default_max_duplicates")]
	pub max_duplicates: usize,
	/// Largest `count` accepted by the batch endpoint
	#[serde(default = "default_max_batch")]
	pub max_batch: usize,
	/// Body limit for uploaded snapshots (bytes)
	#[serde(default = "default_max_payload_bytes")]
	pub max_payload_bytes: usize,
	#[serde(default)]
	pub cors_origins: Vec<String>,
}

fn default_host() -> String {
	"127.0.0.1".to_owned()
}

fn default_port() -> u16 {
	5000
}

fn default_data_dir() -> String {
	"./data".to_owned()
}

fn default_order() -> usize {
	WordGenerator::DEFAULT_ORDER
}

fn default_prior() -> f64 {
	WordGenerator::DEFAULT_PRIOR
}

fn default_max_attempts() -> usize {
	GenerationConfig::DEFAULT_MAX_ATTEMPTS
}

fn default_max_duplicates() -> usize {
	GenerationConfig::DEFAULT_MAX_DUPLICATES
}

fn default_max_batch() -> usize {
	1000
}

fn default_max_payload_bytes() -> usize {
	16 * 1024 * 1024
}

impl Default for ServerConfig {
	fn default() -> Self {
		Self {
			host: default_host(),
			port: default_port(),
			data_dir: default_data_dir(),
			corpus: None,
			order: default_order(),
			prior: default_prior(),
			max_attempts: default_max_attempts(),
			max_duplicates: default_max_duplicates(),
			max_batch: default_max_batch(),
			max_payload_bytes: default_max_payload_bytes(),
			cors_origins: Vec::new(),
		}
	}
}

impl ServerConfig {
	/// Generation limits for the shared generator.
	pub fn generation_config(&self) -> lettergen_core::Result<GenerationConfig> {
		let mut config = GenerationConfig::default();
		config.set_max_attempts(self.max_attempts)?;
		config.set_max_duplicates(self.max_duplicates);
		Ok(config)
	}

	/// Path of the corpus file named `name` in the data folder.
	pub fn corpus_path(&self, name: &str) -> PathBuf {
		lettergen_core::io::normalize_folder(&self.data_dir).join(format!("{name}.txt"))
	}
}

/// Configuration file path: `$LETTERGEN_CONFIG`, or `lettergen.json`.
pub fn config_path() -> PathBuf {
	std::env::var(CONFIG_ENV)
		.map(PathBuf::from)
		.unwrap_or_else(|_| PathBuf::from("lettergen.json"))
}

/// Loads the configuration (defaults if the file is missing or invalid).
pub fn load_config<P: AsRef<Path>>(path: P) -> ServerConfig {
	let path = path.as_ref();
	match fs::read_to_string(path) {
		Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
			log::warn!("invalid config {}: {}, using defaults", path.display(), e);
			ServerConfig::default()
		}),
		Err(_) => {
			log::info!("no config at {}, using defaults", path.display());
			ServerConfig::default()
		}
	}
}
