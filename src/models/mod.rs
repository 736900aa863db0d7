// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    FeedbackAnalysis, IssueScore, LearningPathEntry, MatchOutcome, MatchQuery, MatchResult,
    ScoredTutor, SentimentBreakdown, SentimentCount, SentimentLabel, SentimentScore, StudentPreferences,
    TeachingStyle, TutorCandidate, TutorId, WeightConfig,
};
pub use requests::{AnalyzeFeedbackRequest, MatchTutorRequest, RankTutorsRequest};
pub use responses::{
    AnalyzeFeedbackResponse, ErrorResponse, HealthResponse, MatchTutorResponse, RankTutorsResponse,
};
