use actix_web::{web, HttpResponse, Responder};
use validator::Validate;

use crate::core::sentiment_breakdown;
use crate::models::{AnalyzeFeedbackRequest, AnalyzeFeedbackResponse, TutorId};
use crate::routes::{error_response, AppState};

/// Configure feedback routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/feedback/analyze", web::post().to(analyze_feedback))
        .route(
            "/tutors/{tutor_id}/sentiment-breakdown",
            web::get().to(tutor_sentiment_breakdown),
        );
}

/// Sentiment counts across a tutor's session feedback and reviews
///
/// GET /api/v1/tutors/{tutor_id}/sentiment-breakdown
///
/// Responds with chart slices:
/// ```json
/// [{"value": 4, "name": "Positive"}, {"value": 1, "name": "Neutral"}, {"value": 0, "name": "Negative"}]
/// ```
async fn tutor_sentiment_breakdown(
    state: web::Data<AppState>,
    tutor_id: web::Path<TutorId>,
) -> impl Responder {
    let tutor_id = tutor_id.into_inner();

    match state.feedback_store.feedback_sentiments(tutor_id).await {
        Ok(labels) => {
            let breakdown = sentiment_breakdown(labels.iter().map(|label| label.as_deref()));
            tracing::info!("Sentiment breakdown for tutor {}: {:?}", tutor_id, breakdown);
            HttpResponse::Ok().json(breakdown.entries())
        }
        Err(e) => {
            tracing::error!("Failed to load feedback for tutor {}: {}", tutor_id, e);
            error_response(500, "Failed to load sentiment breakdown", e.to_string())
        }
    }
}

/// Analyze session feedback
///
/// POST /api/v1/feedback/analyze
///
/// Request body:
/// ```json
/// { "studentFeedback": "The tutor went too fast" }
/// ```
async fn analyze_feedback(
    state: web::Data<AppState>,
    req: web::Json<AnalyzeFeedbackRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return error_response(400, "Validation failed", errors.to_string());
    }

    let Some(analyzer) = &state.feedback else {
        return error_response(
            503,
            "Feedback analysis unavailable",
            "No text classifier is configured".to_string(),
        );
    };

    match analyzer.analyze(&req.student_feedback).await {
        Ok(analysis) => {
            tracing::info!(
                "Feedback analyzed: {:?}, {} issues",
                analysis.sentiment,
                analysis.issues.len()
            );
            HttpResponse::Ok().json(AnalyzeFeedbackResponse { analysis })
        }
        Err(e) => {
            tracing::error!("Feedback analysis failed: {}", e);
            error_response(500, "Failed to analyze feedback", e.to_string())
        }
    }
}
