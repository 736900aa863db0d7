// Core algorithm exports
pub mod availability;
pub mod feedback;
pub mod matcher;
pub mod scoring;
pub mod subjects;
pub mod traits;
pub mod training;

pub use availability::{parse_desired_date, DESIRED_DATE_FORMAT};
pub use feedback::{generate_improvement_tip, sentiment_breakdown, FeedbackAnalyzer};
pub use matcher::{pad_learning_path, rank_tutors, TutorMatcher};
pub use scoring::{calculate_factors, calculate_match_score, match_percentage, price_factor, FactorBreakdown};
pub use subjects::SubjectGraph;
pub use traits::{AvailabilityOracle, FeedbackRepository, SubjectRepository, TextClassifier, TutorRepository};
pub use training::{fit_weights, TrainingExample, TrainingOptions};
