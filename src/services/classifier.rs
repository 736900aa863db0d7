use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::core::feedback::issue_labels;
use crate::core::traits::TextClassifier;
use crate::error::ClassifierError;
use crate::models::{IssueScore, SentimentScore};

/// HTTP client for a hosted text classification service
///
/// Talks to two endpoints:
/// - `POST {base}/sentiment` with `{"text"}`, answering `{"label", "score"}`
/// - `POST {base}/zero-shot` with `{"text", "candidate_labels"}`, answering
///   `{"labels": [...], "scores": [...]}` in matching order
pub struct HttpTextClassifier {
    base_url: String,
    api_key: Option<String>,
    client: Client,
}

#[derive(Debug, Serialize)]
struct SentimentRequest<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct ZeroShotRequest<'a> {
    text: &'a str,
    candidate_labels: Vec<&'static str>,
}

#[derive(Debug, Deserialize)]
struct ZeroShotResponse {
    labels: Vec<String>,
    scores: Vec<f64>,
}

impl HttpTextClassifier {
    /// Create a new classifier client
    pub fn new(base_url: String, api_key: Option<String>, timeout: Duration) -> Result<Self, ClassifierError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            base_url,
            api_key,
            client,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }

    async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ClassifierError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned + Send,
    {
        let mut request = self.client.post(self.url(path)).json(body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_else(|_| "Unable to read body".to_string());
            tracing::error!("Classifier call {} failed: {} - {}", path, status, body);
            return Err(ClassifierError::Api(format!("{} returned {}", path, status)));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ClassifierError::InvalidResponse(format!("Failed to parse {} response: {}", path, e)))
    }
}

#[async_trait]
impl TextClassifier for HttpTextClassifier {
    fn name(&self) -> &str {
        "http"
    }

    async fn classify_sentiment(&self, text: &str) -> Result<SentimentScore, ClassifierError> {
        self.post("sentiment", &SentimentRequest { text }).await
    }

    async fn extract_issues(&self, text: &str) -> Result<Vec<IssueScore>, ClassifierError> {
        let request = ZeroShotRequest {
            text,
            candidate_labels: issue_labels().collect(),
        };
        let response: ZeroShotResponse = self.post("zero-shot", &request).await?;

        if response.labels.len() != response.scores.len() {
            return Err(ClassifierError::InvalidResponse(format!(
                "{} labels but {} scores",
                response.labels.len(),
                response.scores.len()
            )));
        }

        Ok(response
            .labels
            .into_iter()
            .zip(response.scores)
            .map(|(issue, score)| IssueScore { issue, score })
            .collect())
    }
}
