use std::sync::Arc;

use crate::core::traits::TextClassifier;
use crate::error::ClassifierError;
use crate::models::{FeedbackAnalysis, IssueScore, SentimentBreakdown, SentimentLabel};

/// Minimum classifier confidence for an issue to be reported
pub const DEFAULT_ISSUE_THRESHOLD: f64 = 0.3;

/// Returned when none of the detected issues has a known tip
pub const NO_IMPROVEMENT_TIP: &str = "No improvement suggestions available.";

/// Issue labels offered to the classifier, with the tip shown for each
pub const ISSUE_TIPS: [(&str, &str); 12] = [
    ("pacing", "Try slowing down and pausing for questions to ensure students keep up."),
    ("clarity", "Consider using simpler language and more examples to explain complex concepts."),
    ("engagement", "Incorporate more interactive elements and ask engaging questions during the session."),
    ("communication", "Focus on clear and concise communication to avoid misunderstandings."),
    ("knowledge", "Deepen your subject knowledge by reviewing additional resources before sessions."),
    ("explanation", "Break down complex ideas into smaller, manageable parts for better understanding."),
    ("friendliness", "Maintain a warm, approachable tone to make students feel comfortable."),
    ("organization", "Structure your session with clear objectives and transitions between topics."),
    ("tone", "Ensure your tone is supportive and positive to encourage student participation."),
    ("preparation", "Prepare well in advance with notes and relevant examples to guide the session."),
    ("responsiveness", "Be attentive and responsive to student questions throughout the session."),
    ("technical issues", "Double-check your technical setup and ensure a stable connection before starting."),
];

/// Candidate issue labels, in the order they are offered to a classifier
pub fn issue_labels() -> impl Iterator<Item = &'static str> {
    ISSUE_TIPS.iter().map(|(label, _)| *label)
}

/// Improvement tip for a single issue label
pub fn tip_for(issue: &str) -> Option<&'static str> {
    ISSUE_TIPS
        .iter()
        .find(|(label, _)| *label == issue)
        .map(|(_, tip)| *tip)
}

/// Combine the tips of every known issue, separated by spaces
pub fn generate_improvement_tip(issues: &[IssueScore]) -> String {
    let tips: Vec<&str> = issues.iter().filter_map(|issue| tip_for(&issue.issue)).collect();

    if tips.is_empty() {
        NO_IMPROVEMENT_TIP.to_string()
    } else {
        tips.join(" ")
    }
}

/// Count normalized sentiments; missing labels count as Neutral
pub fn sentiment_breakdown<'a, I>(labels: I) -> SentimentBreakdown
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    let mut breakdown = SentimentBreakdown::default();
    for label in labels {
        match SentimentLabel::normalize(label.unwrap_or("Neutral")) {
            SentimentLabel::Positive => breakdown.positive += 1,
            SentimentLabel::Neutral => breakdown.neutral += 1,
            SentimentLabel::Negative => breakdown.negative += 1,
        }
    }
    breakdown
}

/// Session feedback analysis over an injected text classifier
#[derive(Clone)]
pub struct FeedbackAnalyzer {
    classifier: Arc<dyn TextClassifier>,
    issue_threshold: f64,
}

impl FeedbackAnalyzer {
    pub fn new(classifier: Arc<dyn TextClassifier>) -> Self {
        Self {
            classifier,
            issue_threshold: DEFAULT_ISSUE_THRESHOLD,
        }
    }

    pub fn with_issue_threshold(mut self, threshold: f64) -> Self {
        self.issue_threshold = threshold;
        self
    }

    /// Classify sentiment, extract issues above the threshold and derive a tip
    pub async fn analyze(&self, text: &str) -> Result<FeedbackAnalysis, ClassifierError> {
        let sentiment = self.classifier.classify_sentiment(text).await?;
        let label = SentimentLabel::normalize(&sentiment.label);

        let issues: Vec<IssueScore> = self
            .classifier
            .extract_issues(text)
            .await?
            .into_iter()
            .filter(|issue| issue.score >= self.issue_threshold)
            .collect();

        tracing::debug!(
            "Feedback analyzed by {}: {:?} ({:.3}), {} issues",
            self.classifier.name(),
            label,
            sentiment.score,
            issues.len()
        );

        Ok(FeedbackAnalysis {
            sentiment: label,
            improvement_tip: generate_improvement_tip(&issues),
            issues,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SentimentScore;
    use async_trait::async_trait;

    struct StubClassifier {
        label: &'static str,
        issues: Vec<(&'static str, f64)>,
    }

    #[async_trait]
    impl TextClassifier for StubClassifier {
        fn name(&self) -> &str {
            "stub"
        }

        async fn classify_sentiment(&self, _text: &str) -> Result<SentimentScore, ClassifierError> {
            Ok(SentimentScore {
                label: self.label.to_string(),
                score: 0.99,
            })
        }

        async fn extract_issues(&self, _text: &str) -> Result<Vec<IssueScore>, ClassifierError> {
            Ok(self
                .issues
                .iter()
                .map(|(issue, score)| IssueScore {
                    issue: issue.to_string(),
                    score: *score,
                })
                .collect())
        }
    }

    fn issue(name: &str, score: f64) -> IssueScore {
        IssueScore {
            issue: name.to_string(),
            score,
        }
    }

    #[test]
    fn test_generate_improvement_tip_joins_known_tips() {
        let tip = generate_improvement_tip(&[issue("pacing", 0.75), issue("clarity", 0.65)]);
        assert_eq!(
            tip,
            "Try slowing down and pausing for questions to ensure students keep up. \
             Consider using simpler language and more examples to explain complex concepts."
        );
    }

    #[test]
    fn test_generate_improvement_tip_without_known_issues() {
        assert_eq!(generate_improvement_tip(&[]), NO_IMPROVEMENT_TIP);
        assert_eq!(generate_improvement_tip(&[issue("weather", 0.9)]), NO_IMPROVEMENT_TIP);
    }

    #[test]
    fn test_issue_labels_cover_all_tips() {
        assert_eq!(issue_labels().count(), 12);
        assert!(issue_labels().all(|label| tip_for(label).is_some()));
    }

    #[test]
    fn test_sentiment_breakdown() {
        let breakdown = sentiment_breakdown(vec![
            Some("POSITIVE"),
            Some("positive"),
            Some("Negative"),
            None,
            Some("unsure"),
        ]);
        assert_eq!(breakdown.positive, 2);
        assert_eq!(breakdown.negative, 1);
        assert_eq!(breakdown.neutral, 2);
    }

    #[tokio::test]
    async fn test_analyze_filters_issues_by_threshold() {
        let analyzer = FeedbackAnalyzer::new(Arc::new(StubClassifier {
            label: "NEGATIVE",
            issues: vec![("pacing", 0.8), ("tone", 0.29), ("clarity", 0.3)],
        }));

        let analysis = analyzer.analyze("Too fast and unclear").await.unwrap();

        assert_eq!(analysis.sentiment, SentimentLabel::Negative);
        let names: Vec<&str> = analysis.issues.iter().map(|i| i.issue.as_str()).collect();
        assert_eq!(names, vec!["pacing", "clarity"]);
        assert!(analysis.improvement_tip.starts_with("Try slowing down"));
    }

    #[tokio::test]
    async fn test_analyze_custom_threshold() {
        let analyzer = FeedbackAnalyzer::new(Arc::new(StubClassifier {
            label: "POSITIVE",
            issues: vec![("pacing", 0.5)],
        }))
        .with_issue_threshold(0.6);

        let analysis = analyzer.analyze("Great session").await.unwrap();
        assert_eq!(analysis.sentiment, SentimentLabel::Positive);
        assert!(analysis.issues.is_empty());
        assert_eq!(analysis.improvement_tip, NO_IMPROVEMENT_TIP);
    }
}
