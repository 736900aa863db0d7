use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::{BTreeSet, HashMap};
use std::path::Path;

use crate::core::traits::{AvailabilityOracle, FeedbackRepository, SubjectRepository, TutorRepository};
use crate::error::RepositoryError;
use crate::models::{TeachingStyle, TutorCandidate, TutorId};

/// In-memory tutor, slot and subject catalog
///
/// Implements the repository contracts over plain maps. Used for the
/// demo mode of the service, tests and benchmarks. Tutors are returned in
/// insertion order, so tie-breaking is reproducible.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    offerings: HashMap<String, Vec<TutorCandidate>>,
    slots: HashMap<TutorId, BTreeSet<NaiveDate>>,
    prerequisites: HashMap<String, Option<String>>,
    sentiments: HashMap<TutorId, Vec<Option<String>>>,
    tutor_failure: Option<String>,
    subject_failure: Option<String>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a subject and its direct prerequisite
    pub fn add_subject(&mut self, name: &str, prerequisite: Option<&str>) -> &mut Self {
        self.prerequisites
            .insert(name.to_string(), prerequisite.map(str::to_string));
        self
    }

    /// Register a tutor offering for a subject; `tutor.price` is the price for that subject
    pub fn add_offering(&mut self, subject: &str, tutor: TutorCandidate) -> &mut Self {
        self.offerings.entry(subject.to_string()).or_default().push(tutor);
        self
    }

    /// Register an open slot for a tutor
    pub fn add_slot(&mut self, tutor_id: TutorId, date: NaiveDate) -> &mut Self {
        self.slots.entry(tutor_id).or_default().insert(date);
        self
    }

    /// Record one feedback sentiment label for a tutor; `None` is unclassified
    pub fn add_feedback(&mut self, tutor_id: TutorId, sentiment: Option<&str>) -> &mut Self {
        self.sentiments
            .entry(tutor_id)
            .or_default()
            .push(sentiment.map(str::to_string));
        self
    }

    /// Make every tutor, availability and feedback lookup fail with `message`
    pub fn fail_tutor_lookups(&mut self, message: &str) -> &mut Self {
        self.tutor_failure = Some(message.to_string());
        self
    }

    /// Make every prerequisite lookup fail with `message`
    pub fn fail_subject_lookups(&mut self, message: &str) -> &mut Self {
        self.subject_failure = Some(message.to_string());
        self
    }

    /// Build a catalog from a JSON fixture file
    pub fn from_fixture_file<P: AsRef<Path>>(path: P) -> Result<Self, RepositoryError> {
        let raw = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            RepositoryError::Unavailable(format!(
                "Failed to read fixture {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        Self::from_fixture_json(&raw)
    }

    /// Build a catalog from fixture JSON
    ///
    /// ```json
    /// {
    ///   "subjects": [{"name": "Algebra", "prerequisite": "Arithmetic"}],
    ///   "tutors": [{"tutorId": 1, "name": "Ada", "averageStarRating": 4.5,
    ///               "preferredLanguage": "English", "teachingStyle": "Visual",
    ///               "offerings": [{"subject": "Algebra", "price": 40.0}],
    ///               "slots": ["2025-06-15"],
    ///               "feedbackSentiments": ["Positive", null]}]
    /// }
    /// ```
    pub fn from_fixture_json(raw: &str) -> Result<Self, RepositoryError> {
        let fixture: CatalogFixture = serde_json::from_str(raw)
            .map_err(|e| RepositoryError::InvalidRow(format!("Invalid catalog fixture: {}", e)))?;

        let mut catalog = Self::new();
        for subject in &fixture.subjects {
            catalog.add_subject(&subject.name, subject.prerequisite.as_deref());
        }

        for tutor in fixture.tutors {
            for offering in &tutor.offerings {
                let candidate = TutorCandidate {
                    tutor_id: tutor.tutor_id,
                    name: tutor.name.clone(),
                    profile_pic_url: tutor.profile_pic_url.clone(),
                    average_rating: tutor.average_rating,
                    price: offering.price,
                    preferred_language: tutor.preferred_language.clone(),
                    teaching_style: tutor.teaching_style,
                };
                if let Some(reason) = candidate.invalid_reason() {
                    return Err(RepositoryError::InvalidRow(format!(
                        "Invalid catalog fixture offering for {}: {}",
                        offering.subject, reason
                    )));
                }
                catalog.add_offering(&offering.subject, candidate);
            }
            for date in &tutor.slots {
                catalog.add_slot(tutor.tutor_id, *date);
            }
            for sentiment in &tutor.feedback_sentiments {
                catalog.add_feedback(tutor.tutor_id, sentiment.as_deref());
            }
        }

        tracing::info!(
            "Loaded catalog fixture: {} subjects, {} offerings",
            catalog.prerequisites.len(),
            catalog.offerings.values().map(Vec::len).sum::<usize>()
        );

        Ok(catalog)
    }

    fn check_tutor_failure(&self) -> Result<(), RepositoryError> {
        match &self.tutor_failure {
            Some(message) => Err(RepositoryError::Unavailable(message.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl TutorRepository for InMemoryCatalog {
    async fn tutors_for_subject(&self, subject: &str) -> Result<Vec<TutorCandidate>, RepositoryError> {
        self.check_tutor_failure()?;
        Ok(self.offerings.get(subject).cloned().unwrap_or_default())
    }
}

#[async_trait]
impl AvailabilityOracle for InMemoryCatalog {
    async fn has_availability(&self, tutor_id: TutorId, date: NaiveDate) -> Result<bool, RepositoryError> {
        self.check_tutor_failure()?;
        Ok(self
            .slots
            .get(&tutor_id)
            .map(|dates| dates.contains(&date))
            .unwrap_or(false))
    }

    async fn has_upcoming_availability(
        &self,
        tutor_id: TutorId,
        from: NaiveDate,
    ) -> Result<bool, RepositoryError> {
        self.check_tutor_failure()?;
        Ok(self
            .slots
            .get(&tutor_id)
            .map(|dates| dates.range(from..).next().is_some())
            .unwrap_or(false))
    }
}

#[async_trait]
impl SubjectRepository for InMemoryCatalog {
    async fn prerequisite_of(&self, subject: &str) -> Result<Option<String>, RepositoryError> {
        if let Some(message) = &self.subject_failure {
            return Err(RepositoryError::Unavailable(message.clone()));
        }
        Ok(self.prerequisites.get(subject).cloned().flatten())
    }
}

#[async_trait]
impl FeedbackRepository for InMemoryCatalog {
    async fn feedback_sentiments(&self, tutor_id: TutorId) -> Result<Vec<Option<String>>, RepositoryError> {
        self.check_tutor_failure()?;
        Ok(self.sentiments.get(&tutor_id).cloned().unwrap_or_default())
    }
}

#[derive(Debug, Deserialize)]
struct CatalogFixture {
    #[serde(default)]
    subjects: Vec<SubjectFixture>,
    #[serde(default)]
    tutors: Vec<TutorFixture>,
}

#[derive(Debug, Deserialize)]
struct SubjectFixture {
    name: String,
    #[serde(default)]
    prerequisite: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TutorFixture {
    #[serde(rename = "tutorId")]
    tutor_id: TutorId,
    name: String,
    #[serde(rename = "profilePicUrl", default)]
    profile_pic_url: Option<String>,
    #[serde(rename = "averageStarRating", default)]
    average_rating: Option<f64>,
    #[serde(rename = "preferredLanguage")]
    preferred_language: String,
    #[serde(rename = "teachingStyle")]
    teaching_style: TeachingStyle,
    #[serde(default)]
    offerings: Vec<OfferingFixture>,
    #[serde(default)]
    slots: Vec<NaiveDate>,
    #[serde(rename = "feedbackSentiments", default)]
    feedback_sentiments: Vec<Option<String>>,
}

#[derive(Debug, Deserialize)]
struct OfferingFixture {
    subject: String,
    price: f64,
}
