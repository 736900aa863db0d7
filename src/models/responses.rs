use serde::{Deserialize, Serialize};
use crate::models::domain::{FeedbackAnalysis, LearningPathEntry, ScoredTutor};

/// Response for the match-tutor endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchTutorResponse {
    pub match_id: String,
    pub subject: String,
    pub matched_tutor: ScoredTutor,
    pub learning_path: Vec<LearningPathEntry>,
}

/// Response for the tutor ranking endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankTutorsResponse {
    pub subject: String,
    pub tutors: Vec<ScoredTutor>,
    pub total_results: usize,
}

/// Response for the feedback analysis endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeFeedbackResponse {
    #[serde(flatten)]
    pub analysis: FeedbackAnalysis,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
