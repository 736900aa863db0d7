// Route exports
pub mod feedback;
pub mod tutors;

use actix_web::{web, HttpResponse};
use std::sync::Arc;

use crate::core::{FeedbackAnalyzer, FeedbackRepository, TutorMatcher};
use crate::models::{ErrorResponse, WeightConfig};
use crate::services::PostgresClient;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub matcher: Arc<TutorMatcher>,
    pub weights: WeightConfig,
    /// None when no classifier endpoint is configured
    pub feedback: Option<Arc<FeedbackAnalyzer>>,
    /// Stored feedback sentiments for breakdowns
    pub feedback_store: Arc<dyn FeedbackRepository>,
    /// None in demo mode
    pub postgres: Option<Arc<PostgresClient>>,
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(tutors::configure)
            .configure(feedback::configure),
    );
}

pub(crate) fn error_response(status: u16, error: &str, message: String) -> HttpResponse {
    let body = ErrorResponse {
        error: error.to_string(),
        message,
        status_code: status,
    };

    match status {
        400 => HttpResponse::BadRequest().json(body),
        404 => HttpResponse::NotFound().json(body),
        503 => HttpResponse::ServiceUnavailable().json(body),
        _ => HttpResponse::InternalServerError().json(body),
    }
}
