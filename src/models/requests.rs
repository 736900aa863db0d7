use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::domain::{MatchQuery, TeachingStyle};

/// Query parameters for the match-tutor endpoint
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct MatchTutorRequest {
    #[validate(length(min = 1))]
    pub subject: String,
    #[validate(length(min = 1))]
    pub desired_date: String,
    #[validate(range(min = 0.0))]
    pub budget: f64,
    #[validate(length(min = 1))]
    pub language: String,
    pub learning_style: TeachingStyle,
}

impl MatchTutorRequest {
    pub fn to_query(&self) -> MatchQuery {
        MatchQuery {
            subject: self.subject.clone(),
            desired_date: self.desired_date.clone(),
            budget: self.budget,
            language: self.language.clone(),
            learning_style: self.learning_style,
        }
    }
}

/// Request to rank every tutor of a subject (browsing view)
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RankTutorsRequest {
    #[validate(length(min = 1))]
    pub subject: String,
    #[validate(range(min = 0.0))]
    #[serde(default)]
    pub budget: f64,
    #[validate(length(min = 1))]
    pub language: String,
    #[serde(alias = "learning_style", rename = "learningStyle")]
    pub learning_style: TeachingStyle,
}

/// Request to analyze a piece of session feedback
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AnalyzeFeedbackRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "student_feedback", rename = "studentFeedback")]
    pub student_feedback: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_request_validation() {
        let request = MatchTutorRequest {
            subject: "Algebra".to_string(),
            desired_date: "15-06-2025".to_string(),
            budget: 50.0,
            language: "English".to_string(),
            learning_style: TeachingStyle::Visual,
        };
        assert!(request.validate().is_ok());

        let bad = MatchTutorRequest {
            budget: -1.0,
            subject: String::new(),
            ..request
        };
        let errors = bad.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("budget"));
        assert!(fields.contains_key("subject"));
    }

    #[test]
    fn test_rank_request_accepts_camel_case() {
        let request: RankTutorsRequest = serde_json::from_str(
            r#"{"subject": "Algebra", "budget": 30, "language": "English", "learningStyle": "Read/Write"}"#,
        )
        .unwrap();
        assert_eq!(request.learning_style, TeachingStyle::ReadWrite);
        assert_eq!(request.budget, 30.0);
    }
}
