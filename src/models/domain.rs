use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Opaque tutor identity as stored by the tutor repository
pub type TutorId = i64;

/// Teaching / learning style, shared by tutors and students
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TeachingStyle {
    #[serde(rename = "Read/Write")]
    ReadWrite,
    Auditory,
    Visual,
}

impl TeachingStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            TeachingStyle::ReadWrite => "Read/Write",
            TeachingStyle::Auditory => "Auditory",
            TeachingStyle::Visual => "Visual",
        }
    }
}

impl fmt::Display for TeachingStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TeachingStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Read/Write" => Ok(TeachingStyle::ReadWrite),
            "Auditory" => Ok(TeachingStyle::Auditory),
            "Visual" => Ok(TeachingStyle::Visual),
            other => Err(format!("unknown teaching style '{}'", other)),
        }
    }
}

/// Tutor record being evaluated for a match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TutorCandidate {
    #[serde(rename = "tutorId")]
    pub tutor_id: TutorId,
    pub name: String,
    #[serde(rename = "profilePicUrl", default)]
    pub profile_pic_url: Option<String>,
    /// Average star rating in [0, 5]; `None` means no ratings yet
    #[serde(rename = "averageStarRating", default)]
    pub average_rating: Option<f64>,
    /// Hourly price for the subject being matched
    pub price: f64,
    #[serde(rename = "preferredLanguage")]
    pub preferred_language: String,
    #[serde(rename = "teachingStyle")]
    pub teaching_style: TeachingStyle,
}

impl TutorCandidate {
    /// Describe the first broken data invariant, if any
    ///
    /// A present rating must be finite and within [0, 5]; the price must be
    /// finite and non-negative.
    pub fn invalid_reason(&self) -> Option<String> {
        if let Some(rating) = self.average_rating {
            if !rating.is_finite() || !(0.0..=5.0).contains(&rating) {
                return Some(format!(
                    "tutor {} has rating {} outside [0, 5]",
                    self.tutor_id, rating
                ));
            }
        }

        if !self.price.is_finite() || self.price < 0.0 {
            return Some(format!("tutor {} has invalid price {}", self.tutor_id, self.price));
        }

        None
    }
}

/// Student preferences for a single match request
#[derive(Debug, Clone, PartialEq)]
pub struct StudentPreferences {
    /// 0 means free tutoring only
    pub budget: f64,
    pub preferred_language: String,
    pub learning_style: TeachingStyle,
    pub desired_date: NaiveDate,
}

/// Caller input for a full match: subject plus raw preferences
///
/// `desired_date` is the caller-supplied string; it is normalized by the
/// matcher before any availability lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchQuery {
    pub subject: String,
    pub desired_date: String,
    pub budget: f64,
    pub language: String,
    pub learning_style: TeachingStyle,
}

/// Relative importance of each scoring factor
///
/// Field names on the wire follow the weight artifact produced by the offline
/// fitting job (`rating_weight`, `availability_weight`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightConfig {
    #[serde(rename = "rating_weight", alias = "rating")]
    pub rating: f64,
    #[serde(rename = "availability_weight", alias = "availability")]
    pub availability: f64,
    #[serde(rename = "price_weight", alias = "price")]
    pub price: f64,
    #[serde(rename = "language_weight", alias = "language")]
    pub language: f64,
    #[serde(rename = "learning_style_weight", alias = "learning_style")]
    pub learning_style: f64,
}

impl WeightConfig {
    pub fn sum(&self) -> f64 {
        self.rating + self.availability + self.price + self.language + self.learning_style
    }

    /// Name of the first weight that is negative or not finite, if any
    pub fn invalid_field(&self) -> Option<&'static str> {
        [
            ("rating_weight", self.rating),
            ("availability_weight", self.availability),
            ("price_weight", self.price),
            ("language_weight", self.language),
            ("learning_style_weight", self.learning_style),
        ]
        .into_iter()
        .find(|(_, value)| !value.is_finite() || *value < 0.0)
        .map(|(name, _)| name)
    }

    pub fn as_array(&self) -> [f64; 5] {
        [self.rating, self.availability, self.price, self.language, self.learning_style]
    }
}

impl Default for WeightConfig {
    fn default() -> Self {
        Self {
            rating: 0.35,
            availability: 0.25,
            price: 0.15,
            language: 0.15,
            learning_style: 0.10,
        }
    }
}

/// Tutor annotated with its computed score for one request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredTutor {
    #[serde(flatten)]
    pub tutor: TutorCandidate,
    pub score: f64,
    #[serde(rename = "matchPercentage")]
    pub match_percentage: u8,
    pub available: bool,
}

/// One subject of a learning path with its ranked tutors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearningPathEntry {
    #[serde(rename = "courseTitle")]
    pub subject: String,
    pub tutors: Vec<ScoredTutor>,
}

impl LearningPathEntry {
    pub fn new(subject: impl Into<String>, tutors: Vec<ScoredTutor>) -> Self {
        Self {
            subject: subject.into(),
            tutors,
        }
    }

    /// Empty filler entry used to pad a learning path for fixed-width display
    pub fn placeholder() -> Self {
        Self::new(String::new(), Vec::new())
    }

    pub fn is_placeholder(&self) -> bool {
        self.subject.is_empty()
    }
}

/// Result of a successful match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    #[serde(rename = "matchedTutor")]
    pub matched_tutor: ScoredTutor,
    #[serde(rename = "learningPath")]
    pub learning_path: Vec<LearningPathEntry>,
}

/// Outcome of a match request
#[derive(Debug, Clone, PartialEq)]
pub enum MatchOutcome {
    Matched(MatchResult),
    /// No tutor teaches the requested subject
    NotFound { subject: String },
}

impl MatchOutcome {
    pub fn matched(self) -> Option<MatchResult> {
        match self {
            MatchOutcome::Matched(result) => Some(result),
            MatchOutcome::NotFound { .. } => None,
        }
    }
}

/// Normalized feedback sentiment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SentimentLabel {
    Positive,
    Neutral,
    Negative,
}

impl SentimentLabel {
    /// Normalize a raw classifier label; anything unrecognized is Neutral
    pub fn normalize(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "positive" => SentimentLabel::Positive,
            "negative" => SentimentLabel::Negative,
            _ => SentimentLabel::Neutral,
        }
    }
}

/// Raw sentiment classification as returned by a classifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentScore {
    pub label: String,
    pub score: f64,
}

/// A detected feedback issue with the classifier's confidence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssueScore {
    pub issue: String,
    pub score: f64,
}

/// Analysis of one piece of session feedback
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackAnalysis {
    pub sentiment: SentimentLabel,
    pub issues: Vec<IssueScore>,
    #[serde(rename = "improvementTip")]
    pub improvement_tip: String,
}

/// Counts of normalized sentiments across many feedback entries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentBreakdown {
    #[serde(rename = "Positive")]
    pub positive: usize,
    #[serde(rename = "Neutral")]
    pub neutral: usize,
    #[serde(rename = "Negative")]
    pub negative: usize,
}

/// One chart slice of a sentiment breakdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentCount {
    pub value: usize,
    pub name: SentimentLabel,
}

impl SentimentBreakdown {
    /// Slices in Positive, Neutral, Negative order, including empty ones
    pub fn entries(&self) -> Vec<SentimentCount> {
        vec![
            SentimentCount { value: self.positive, name: SentimentLabel::Positive },
            SentimentCount { value: self.neutral, name: SentimentLabel::Neutral },
            SentimentCount { value: self.negative, name: SentimentLabel::Negative },
        ]
    }
}
