use actix_cors::Cors;
use actix_web::{error, http::StatusCode, middleware, web, App, HttpResponse, HttpServer};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use tutoreal_match::config::{LoggingSettings, Settings};
use tutoreal_match::core::{FeedbackAnalyzer, FeedbackRepository, TutorMatcher};
use tutoreal_match::routes::{self, AppState};
use tutoreal_match::services::{CachedSubjectRepository, HttpTextClassifier, InMemoryCatalog, PostgresClient};

/// JSON error response for JSON payload errors
#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonError {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

impl std::fmt::Display for JsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

impl std::error::Error for JsonError {}

impl error::ResponseError for JsonError {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::BAD_REQUEST))
            .json(self)
    }
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(err: error::JsonPayloadError, req: &actix_web::HttpRequest) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    JsonError {
        error: "invalid_json".to_string(),
        message: format!("Invalid JSON: {}", err),
        status_code: 400,
    }
    .into()
}

/// Handle query payload errors
pub fn handle_query_payload_error(err: error::QueryPayloadError, req: &actix_web::HttpRequest) -> actix_web::Error {
    tracing::info!("Query error on {}: {}", req.path(), err);
    JsonError {
        error: "invalid_query".to_string(),
        message: format!("Invalid query: {}", err),
        status_code: 400,
    }
    .into()
}

fn init_logging(logging: &LoggingSettings) {
    // RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&logging.level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    if logging.format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.json().init();
    }
}

fn config_error(message: String) -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::Other, message)
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    // Load configuration
    let settings = Settings::load()
        .map_err(|e| config_error(format!("Configuration error: {}", e)))?;

    init_logging(&settings.logging);

    info!("Starting Tutoreal matching service...");

    let weights = settings.scoring.resolve_weights().map_err(|e| {
        error!("Failed to resolve scoring weights: {}", e);
        config_error(format!("Weights error: {}", e))
    })?;

    info!("Scoring weights: {:?}", weights);

    let cache_ttl = Duration::from_secs(settings.cache.ttl_secs.unwrap_or(300));
    let cache_size = settings.cache.max_entries.unwrap_or(1000);

    // Build the matcher over either the demo catalog or PostgreSQL
    let (matcher, feedback_store, postgres) = if settings.server.demo {
        let catalog = match &settings.server.demo_fixture {
            Some(path) => InMemoryCatalog::from_fixture_file(path).map_err(|e| {
                error!("Failed to load demo fixture: {}", e);
                config_error(format!("Demo fixture error: {}", e))
            })?,
            None => InMemoryCatalog::new(),
        };

        info!("Running in demo mode against the in-memory catalog");
        let catalog = Arc::new(catalog);
        let feedback_store: Arc<dyn FeedbackRepository> = catalog.clone();
        (TutorMatcher::from_catalog(catalog), feedback_store, None)
    } else {
        let postgres = Arc::new(
            PostgresClient::from_settings(
                &settings.database.url,
                settings.database.max_connections,
                settings.database.min_connections,
                settings.database.acquire_timeout_secs,
                settings.database.idle_timeout_secs,
            )
            .await
            .map_err(|e| {
                error!("Failed to connect to PostgreSQL: {}", e);
                config_error(format!("PostgreSQL connection error: {}", e))
            })?,
        );

        info!("PostgreSQL client initialized");

        let subjects = Arc::new(CachedSubjectRepository::new(
            PostgresClient::clone(&postgres),
            cache_size,
            cache_ttl,
        ));

        info!("Prerequisite cache initialized ({} entries, TTL {:?})", cache_size, cache_ttl);

        let matcher = TutorMatcher::new(postgres.clone(), postgres.clone(), subjects);
        let feedback_store: Arc<dyn FeedbackRepository> = postgres.clone();
        (matcher, feedback_store, Some(postgres))
    };

    let matcher = matcher.with_min_path_entries(settings.matching.min_path_entries);

    // Feedback analysis is optional
    let feedback = match &settings.classifier.endpoint {
        Some(endpoint) => {
            let classifier = HttpTextClassifier::new(
                endpoint.clone(),
                settings.classifier.api_key.clone(),
                Duration::from_secs(settings.classifier.timeout_secs),
            )
            .map_err(|e| config_error(format!("Classifier client error: {}", e)))?;

            info!("Feedback classifier configured at {}", endpoint);
            Some(Arc::new(
                FeedbackAnalyzer::new(Arc::new(classifier))
                    .with_issue_threshold(settings.classifier.issue_threshold),
            ))
        }
        None => {
            info!("No feedback classifier configured, feedback analysis disabled");
            None
        }
    };

    // Build application state
    let app_state = AppState {
        matcher: Arc::new(matcher),
        weights,
        feedback,
        feedback_store,
        postgres,
    };

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .app_data(web::QueryConfig::default().error_handler(handle_query_payload_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
