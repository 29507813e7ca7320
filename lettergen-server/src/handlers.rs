use std::sync::Mutex;

use actix_web::{HttpResponse, Responder, get, put, web};
use lettergen_core::io::list_files;
use lettergen_core::{Error, Snapshot, WordGenerator};
use serde::{Deserialize, Serialize};

use crate::config::ServerConfig;

/// Generator shared by every worker.
pub struct SharedData {
	pub generator: WordGenerator,
}

/// Query parameters for `/v1/generate`
#[derive(Deserialize)]
struct GenerateParams {
	min_length: Option<usize>,
	max_length: Option<usize>,
}

/// Query parameters for `/v1/generate_batch`
#[derive(Deserialize)]
struct BatchParams {
	count: Option<usize>,
	min_length: Option<usize>,
	max_length: Option<usize>,
	allow_repeats: Option<bool>,
}

/// Query parameters for `/v1/train`
#[derive(Deserialize)]
struct TrainParams {
	corpus: Option<String>,
	order: Option<usize>,
	prior: Option<f64>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
pub struct Status {
	pub trained: bool,
	pub order: usize,
	pub letters: usize,
}

const DEFAULT_MIN_LENGTH: usize = 3;
const DEFAULT_MAX_LENGTH: usize = 8;

/// Maps a core error to an HTTP response.
fn error_response(error: Error) -> HttpResponse {
	match error {
		Error::InvalidOrder(_)
		| Error::InvalidPrior(_)
		| Error::NonAsciiCharacter { .. }
		| Error::ReservedCharacter(_)
		| Error::InvalidSnapshot(_)
		| Error::InvalidConfig(_)
		| Error::Codec(_) => HttpResponse::BadRequest().body(error.to_string()),
		Error::Io(ref e) if e.kind() == std::io::ErrorKind::NotFound => HttpResponse::NotFound().body(error.to_string()),
		Error::InsufficientDistinctWords { .. } => HttpResponse::Conflict().body(error.to_string()),
		Error::Io(_) => HttpResponse::InternalServerError().body(error.to_string()),
	}
}

/// Corpus names are file stems inside the data folder, nothing else.
fn valid_corpus_name(name: &str) -> bool {
	!name.is_empty()
		&& name
			.chars()
			.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// HTTP GET endpoint `/v1/generate`
///
/// Returns one generated word as the response body (empty if untrained).
#[get("/v1/generate")]
async fn get_generated(data: web::Data<Mutex<SharedData>>, query: web::Query<GenerateParams>) -> impl Responder {
	let min_length = query.min_length.unwrap_or(DEFAULT_MIN_LENGTH);
	let max_length = query.max_length.unwrap_or(DEFAULT_MAX_LENGTH);

	let mut shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Generator lock failed"),
	};

	HttpResponse::Ok().body(shared_data.generator.new_word(min_length, max_length))
}

/// HTTP GET endpoint `/v1/generate_batch`
///
/// Returns generated words, one per line.
#[get("/v1/generate_batch")]
async fn get_generated_batch(
	data: web::Data<Mutex<SharedData>>,
	config: web::Data<ServerConfig>,
	query: web::Query<BatchParams>,
) -> impl Responder {
	let count = query.count.unwrap_or(10);
	if count > config.max_batch {
		return HttpResponse::BadRequest().body(format!("count must be <= {}", config.max_batch));
	}
	let min_length = query.min_length.unwrap_or(DEFAULT_MIN_LENGTH);
	let max_length = query.max_length.unwrap_or(DEFAULT_MAX_LENGTH);
	let allow_repeats = query.allow_repeats.unwrap_or(false);

	let mut shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Generator lock failed"),
	};

	match shared_data.generator.new_words(count, min_length, max_length, allow_repeats) {
		Ok(words) => HttpResponse::Ok().body(words.join("\n")),
		Err(e) => error_response(e),
	}
}

#[get("/v1/corpora")]
async fn get_corpora(config: web::Data<ServerConfig>) -> impl Responder {
	let folder = lettergen_core::io::normalize_folder(&config.data_dir);
	match list_files(&folder, "txt") {
		Ok(files) => HttpResponse::Ok().body(files.join("\n").replace(".txt", "")),
		Err(_) => HttpResponse::InternalServerError().body("Failed to list corpora"),
	}
}

#[get("/v1/status")]
async fn get_status(data: web::Data<Mutex<SharedData>>) -> impl Responder {
	let shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Generator lock failed"),
	};
	let generator = &shared_data.generator;
	HttpResponse::Ok().json(Status {
		trained: generator.is_trained(),
		order: generator.order(),
		letters: generator.model().alphabet().len(),
	})
}

/// HTTP PUT endpoint `/v1/train`
///
/// Retrains the shared generator on `<data_dir>/<corpus>.txt`.
#[put("/v1/train")]
async fn put_train(
	data: web::Data<Mutex<SharedData>>,
	config: web::Data<ServerConfig>,
	query: web::Query<TrainParams>,
) -> impl Responder {
	let corpus = match &query.corpus {
		Some(s) if valid_corpus_name(s.trim()) => s.trim(),
		_ => return HttpResponse::BadRequest().body("Missing or invalid corpus name"),
	};
	let order = query.order.unwrap_or(config.order);
	let prior = query.prior.unwrap_or(config.prior);

	let words = match lettergen_core::io::read_corpus(config.corpus_path(corpus)) {
		Ok(words) => words,
		Err(e) => return error_response(e.into()),
	};

	let mut shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Generator lock failed"),
	};

	match shared_data.generator.train(&words, order, prior) {
		Ok(()) => {
			log::info!("trained on {} ({} words, order {}, prior {})", corpus, words.len(), order, prior);
			HttpResponse::Ok().body("Model trained successfully")
		}
		Err(e) => error_response(e),
	}
}

#[get("/v1/snapshot")]
async fn get_snapshot(data: web::Data<Mutex<SharedData>>) -> impl Responder {
	let shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Generator lock failed"),
	};
	HttpResponse::Ok().json(shared_data.generator.export_data())
}

/// HTTP PUT endpoint `/v1/snapshot`
///
/// Replaces the shared model with the JSON snapshot in the body.
#[put("/v1/snapshot")]
async fn put_snapshot(data: web::Data<Mutex<SharedData>>, snapshot: web::Json<Snapshot>) -> impl Responder {
	let mut shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Generator lock failed"),
	};

	let config = shared_data.generator.config().clone();
	match WordGenerator::from_snapshot(snapshot.into_inner()) {
		Ok(generator) => {
			shared_data.generator = generator.with_config(config);
			log::info!("snapshot loaded (order {})", shared_data.generator.order());
			HttpResponse::Ok().body("Snapshot loaded successfully")
		}
		Err(e) => error_response(e),
	}
}

/// Registers every endpoint.
pub fn configure(cfg: &mut web::ServiceConfig) {
	cfg.service(get_generated)
		.service(get_generated_batch)
		.service(get_corpora)
		.service(get_status)
		.service(put_train)
		.service(get_snapshot)
		.service(put_snapshot);
}

#[cfg(test)]
mod tests {
	use super::*;
	use actix_web::{App, http::StatusCode, test};

	fn corpus_dir() -> String {
		format!("{}/../data", env!("CARGO_MANIFEST_DIR"))
	}

	fn app_data(generator: WordGenerator) -> (web::Data<Mutex<SharedData>>, web::Data<ServerConfig>) {
		let config = ServerConfig { data_dir: corpus_dir(), ..ServerConfig::default() };
		(web::Data::new(Mutex::new(SharedData { generator })), web::Data::new(config))
	}

	fn trained_generator() -> WordGenerator {
		let mut generator = WordGenerator::with_seed(1);
		generator.train(&["alton", "barton", "bolton", "boston", "burton"], 3, 0.0).unwrap();
		generator
	}

	#[actix_web::test]
	async fn untrained_generate_is_empty() {
		let (shared, config) = app_data(WordGenerator::with_seed(0));
		let app = test::init_service(App::new().app_data(shared).app_data(config).configure(configure)).await;

		let req = test::TestRequest::get().uri("/v1/generate").to_request();
		let body = test::call_and_read_body(&app, req).await;
		assert!(body.is_empty());
	}

	#[actix_web::test]
	async fn batch_returns_requested_count() {
		let (shared, config) = app_data(trained_generator());
		let app = test::init_service(App::new().app_data(shared).app_data(config).configure(configure)).await;

		let req = test::TestRequest::get()
			.uri("/v1/generate_batch?count=4&min_length=3&max_length=10&allow_repeats=true")
			.to_request();
		let body = test::call_and_read_body(&app, req).await;
		let text = String::from_utf8(body.to_vec()).unwrap();
		assert_eq!(text.lines().count(), 4);
	}

	#[actix_web::test]
	async fn oversized_batch_is_rejected() {
		let (shared, config) = app_data(trained_generator());
		let app = test::init_service(App::new().app_data(shared).app_data(config).configure(configure)).await;

		let req = test::TestRequest::get().uri("/v1/generate_batch?count=1000000").to_request();
		let resp = test::call_service(&app, req).await;
		assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
	}

	#[actix_web::test]
	async fn train_from_data_dir() {
		let (shared, config) = app_data(WordGenerator::with_seed(0));
		let app = test::init_service(App::new().app_data(shared).app_data(config).configure(configure)).await;

		let req = test::TestRequest::put().uri("/v1/train?corpus=towns&order=2").to_request();
		let resp = test::call_service(&app, req).await;
		assert_eq!(resp.status(), StatusCode::OK);

		let req = test::TestRequest::get().uri("/v1/status").to_request();
		let status: Status = test::call_and_read_body_json(&app, req).await;
		assert!(status.trained);
		assert_eq!(status.order, 2);
	}

	#[actix_web::test]
	async fn train_rejects_bad_requests() {
		let (shared, config) = app_data(WordGenerator::with_seed(0));
		let app = test::init_service(App::new().app_data(shared).app_data(config).configure(configure)).await;

		let req = test::TestRequest::put().uri("/v1/train?corpus=../secret").to_request();
		assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

		let req = test::TestRequest::put().uri("/v1/train?corpus=missing").to_request();
		assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

		let req = test::TestRequest::put().uri("/v1/train?corpus=towns&order=0").to_request();
		assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
	}

	#[actix_web::test]
	async fn snapshot_round_trip() {
		let source = trained_generator();
		let (shared, config) = app_data(WordGenerator::with_seed(0));
		let app = test::init_service(App::new().app_data(shared).app_data(config).configure(configure)).await;

		let req = test::TestRequest::put()
			.uri("/v1/snapshot")
			.set_json(source.export_data())
			.to_request();
		assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

		let req = test::TestRequest::get().uri("/v1/snapshot").to_request();
		let snapshot: Snapshot = test::call_and_read_body_json(&app, req).await;
		assert_eq!(snapshot, source.export_data());
	}

	#[actix_web::test]
	async fn invalid_snapshot_is_rejected() {
		let (shared, config) = app_data(WordGenerator::with_seed(0));
		let app = test::init_service(App::new().app_data(shared).app_data(config).configure(configure)).await;

		let req = test::TestRequest::put()
			.uri("/v1/snapshot")
			.set_json(Snapshot::new(vec!['b', 'a'], Vec::new()))
			.to_request();
		assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
	}
}
