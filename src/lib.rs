//! Tutoreal Match - Tutor matching and learning-path service
//!
//! This library provides the matching core used by the Tutoreal tutoring
//! marketplace: it scores the tutors teaching a subject against a student's
//! preferences, picks the best one, and lays out a learning path of the
//! subject's prerequisites with the tutors available for each.

pub mod config;
pub mod core;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use core::{calculate_match_score, match_percentage, FeedbackAnalyzer, SubjectGraph, TutorMatcher};
pub use error::{ClassifierError, MatchError, RepositoryError, WeightsError};
pub use models::{
    LearningPathEntry, MatchOutcome, MatchQuery, MatchResult, ScoredTutor, StudentPreferences,
    TeachingStyle, TutorCandidate, WeightConfig,
};
