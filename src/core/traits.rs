//! Collaborator contracts consumed by the matching core.
//!
//! Implementations must be safe for concurrent reads: independent match
//! requests share one instance without coordination.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::error::{ClassifierError, RepositoryError};
use crate::models::{IssueScore, SentimentScore, TutorCandidate, TutorId};

/// Source of tutors offering a subject.
#[async_trait]
pub trait TutorRepository: Send + Sync {
    /// Tutors with at least one offering whose subject name equals `subject`
    /// exactly.
    ///
    /// Iteration order must be deterministic for a given data state; the
    /// matcher breaks score ties by this order.
    async fn tutors_for_subject(&self, subject: &str) -> Result<Vec<TutorCandidate>, RepositoryError>;
}

/// Answers slot availability questions at calendar-day granularity.
#[async_trait]
pub trait AvailabilityOracle: Send + Sync {
    /// True iff the tutor has at least one open slot dated exactly `date`.
    async fn has_availability(&self, tutor_id: TutorId, date: NaiveDate) -> Result<bool, RepositoryError>;

    /// True iff the tutor has at least one open slot dated `from` or later.
    async fn has_upcoming_availability(
        &self,
        tutor_id: TutorId,
        from: NaiveDate,
    ) -> Result<bool, RepositoryError>;
}

/// Prerequisite lookup over subjects.
#[async_trait]
pub trait SubjectRepository: Send + Sync {
    /// Name of the single direct prerequisite of `subject`, if any.
    async fn prerequisite_of(&self, subject: &str) -> Result<Option<String>, RepositoryError>;
}

/// Stored feedback sentiments for a tutor.
#[async_trait]
pub trait FeedbackRepository: Send + Sync {
    /// Raw sentiment labels from the tutor's session feedback and reviews.
    ///
    /// `None` marks an entry that was never classified.
    async fn feedback_sentiments(&self, tutor_id: TutorId) -> Result<Vec<Option<String>>, RepositoryError>;
}

/// Natural-language classifier for session feedback.
#[async_trait]
pub trait TextClassifier: Send + Sync {
    /// Name of this classifier for logging.
    fn name(&self) -> &str;

    async fn classify_sentiment(&self, text: &str) -> Result<SentimentScore, ClassifierError>;

    /// Candidate issues with confidences; callers apply their own threshold.
    async fn extract_issues(&self, text: &str) -> Result<Vec<IssueScore>, ClassifierError>;
}
