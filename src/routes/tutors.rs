use actix_web::{web, HttpResponse, Responder};
use tracing::Instrument;
use validator::Validate;

use crate::error::MatchError;
use crate::models::{
    HealthResponse, MatchOutcome, MatchTutorRequest, MatchTutorResponse, RankTutorsRequest,
    RankTutorsResponse, StudentPreferences,
};
use crate::routes::{error_response, AppState};

/// Configure tutor matching and ranking routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/match-tutor", web::get().to(match_tutor))
        .route("/tutors/rank", web::post().to(rank_tutors));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let healthy = match &state.postgres {
        Some(postgres) => postgres.health_check().await.unwrap_or(false),
        None => true,
    };

    let status = if healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Match a tutor and build the learning path
///
/// GET /api/v1/match-tutor?subject=Algebra&desired_date=15-06-2025&budget=50&language=English&learning_style=Visual
async fn match_tutor(
    state: web::Data<AppState>,
    req: web::Query<MatchTutorRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for match-tutor request: {:?}", errors);
        return error_response(400, "Validation failed", errors.to_string());
    }

    let match_id = uuid::Uuid::new_v4().to_string();
    let span = tracing::info_span!("match_tutor", match_id = %match_id, subject = %req.subject);

    let outcome = state
        .matcher
        .find_match(&req.to_query(), &state.weights)
        .instrument(span)
        .await;

    match outcome {
        Ok(MatchOutcome::Matched(result)) => HttpResponse::Ok().json(MatchTutorResponse {
            match_id,
            subject: req.subject.clone(),
            matched_tutor: result.matched_tutor,
            learning_path: result.learning_path,
        }),
        Ok(MatchOutcome::NotFound { subject }) => {
            tracing::info!("Match {}: no tutors teach {}", match_id, subject);
            error_response(
                404,
                "No tutors found",
                format!("No tutors found for subject: {}", subject),
            )
        }
        Err(e @ MatchError::InvalidDateFormat { .. }) => {
            error_response(400, "Invalid date format", e.to_string())
        }
        Err(e) => {
            tracing::error!("Match {} failed: {}", match_id, e);
            error_response(500, "Failed to match tutor", e.to_string())
        }
    }
}

/// Rank every tutor teaching a subject
///
/// POST /api/v1/tutors/rank
///
/// Request body:
/// ```json
/// {
///   "subject": "Algebra",
///   "budget": 40,
///   "language": "English",
///   "learningStyle": "Visual"
/// }
/// ```
///
/// A tutor counts as available if it has any slot from today onward.
async fn rank_tutors(
    state: web::Data<AppState>,
    req: web::Json<RankTutorsRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return error_response(400, "Validation failed", errors.to_string());
    }

    let preferences = StudentPreferences {
        budget: req.budget,
        preferred_language: req.language.clone(),
        learning_style: req.learning_style,
        desired_date: chrono::Local::now().date_naive(),
    };

    match state
        .matcher
        .rank_subject_tutors(&req.subject, &preferences, &state.weights)
        .await
    {
        Ok(tutors) => {
            tracing::info!("Ranked {} tutors for {}", tutors.len(), req.subject);
            HttpResponse::Ok().json(RankTutorsResponse {
                subject: req.subject.clone(),
                total_results: tutors.len(),
                tutors,
            })
        }
        Err(e) => {
            tracing::error!("Failed to rank tutors for {}: {}", req.subject, e);
            error_response(500, "Failed to rank tutors", e.to_string())
        }
    }
}
