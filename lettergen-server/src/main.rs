use std::sync::Mutex;

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware, web};
use lettergen_core::WordGenerator;

use crate::config::{ServerConfig, config_path, load_config};
use crate::handlers::SharedData;

mod config;
mod handlers;

/// Builds the startup generator: trained on the configured corpus if any,
/// untrained otherwise (a later `PUT /v1/train` or `PUT /v1/snapshot` fills it).
fn initial_generator(config: &ServerConfig) -> std::io::Result<WordGenerator> {
	let generation_config = config
		.generation_config()
		.map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;

	let generator = match &config.corpus {
		Some(name) => {
			let path = config.corpus_path(name);
			match WordGenerator::from_corpus_file(&path, config.order, config.prior) {
				Ok(generator) => {
					log::info!("trained on {} (order {})", path.display(), config.order);
					generator
				}
				Err(e) => {
					log::warn!("could not train on {}: {}, starting untrained", path.display(), e);
					WordGenerator::new()
				}
			}
		}
		None => WordGenerator::new(),
	};

	Ok(generator.with_config(generation_config))
}

/// Main entry point for the server.
///
/// Loads the configuration, wraps the generator in a `Mutex` (sampling
/// mutates its random generator) and starts the Actix-web HTTP server.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

	let config = load_config(config_path());
	let shared_data = SharedData {
		generator: initial_generator(&config)?,
	};
	let shared_model = web::Data::new(Mutex::new(shared_data));
	let shared_config = web::Data::new(config.clone());

	log::info!("listening on {}:{}", config.host, config.port);
	HttpServer::new(move || {
		let cors = shared_config
			.cors_origins
			.iter()
			.fold(Cors::default().allow_any_method().allow_any_header(), |cors, origin| cors.allowed_origin(origin));

		App::new()
			.wrap(middleware::Logger::default())
			.wrap(cors)
			.app_data(web::JsonConfig::default().limit(shared_config.max_payload_bytes))
			.app_data(shared_model.clone())
			.app_data(shared_config.clone())
			.configure(handlers::configure)
	})
		.bind((config.host.as_str(), config.port))?
		.run()
		.await
}
