use std::sync::Arc;

use crate::core::{
    availability::parse_desired_date,
    scoring::{calculate_match_score, match_percentage},
    subjects::SubjectGraph,
    traits::{AvailabilityOracle, SubjectRepository, TutorRepository},
};
use crate::error::MatchError;
use crate::models::{
    LearningPathEntry, MatchOutcome, MatchQuery, MatchResult, ScoredTutor, StudentPreferences,
    TutorCandidate, WeightConfig,
};

/// Default minimum number of learning path entries returned for display
pub const DEFAULT_MIN_PATH_ENTRIES: usize = 3;

/// Main matching orchestrator
///
/// # Pipeline Stages
/// 1. Candidate fetch for the requested subject
/// 2. Availability check and scoring of every candidate
/// 3. Primary tutor selection (highest score, first wins on ties)
/// 4. Prerequisite chain resolution
/// 5. Ranked, availability-filtered tutor lists per chain subject
///
/// The matcher holds no mutable state; one instance serves concurrent
/// requests as long as its collaborators allow concurrent reads.
#[derive(Clone)]
pub struct TutorMatcher {
    tutors: Arc<dyn TutorRepository>,
    availability: Arc<dyn AvailabilityOracle>,
    subjects: SubjectGraph,
    min_path_entries: usize,
}

impl TutorMatcher {
    pub fn new(
        tutors: Arc<dyn TutorRepository>,
        availability: Arc<dyn AvailabilityOracle>,
        subjects: Arc<dyn SubjectRepository>,
    ) -> Self {
        Self {
            tutors,
            availability,
            subjects: SubjectGraph::new(subjects),
            min_path_entries: DEFAULT_MIN_PATH_ENTRIES,
        }
    }

    /// Build a matcher over a single store implementing all three contracts
    pub fn from_catalog<C>(catalog: Arc<C>) -> Self
    where
        C: TutorRepository + AvailabilityOracle + SubjectRepository + 'static,
    {
        Self::new(catalog.clone(), catalog.clone(), catalog)
    }

    /// Set the padding target for learning paths; 0 disables padding
    pub fn with_min_path_entries(mut self, min_path_entries: usize) -> Self {
        self.min_path_entries = min_path_entries;
        self
    }

    pub fn subject_graph(&self) -> &SubjectGraph {
        &self.subjects
    }

    /// Find the best tutor for a subject plus a learning path of prerequisites
    ///
    /// # Arguments
    /// * `query` - Subject and raw student preferences (date as DD-MM-YYYY)
    /// * `weights` - Scoring weight configuration
    ///
    /// # Returns
    /// `MatchOutcome::NotFound` if no tutor teaches the subject, otherwise the
    /// primary match and its learning path. Any repository failure aborts the
    /// whole match.
    pub async fn find_match(
        &self,
        query: &MatchQuery,
        weights: &WeightConfig,
    ) -> Result<MatchOutcome, MatchError> {
        let preferences = StudentPreferences {
            budget: query.budget,
            preferred_language: query.language.clone(),
            learning_style: query.learning_style,
            desired_date: parse_desired_date(&query.desired_date)?,
        };

        // Stage 1: Candidate fetch
        let candidates = self.tutors.tutors_for_subject(&query.subject).await?;
        if candidates.is_empty() {
            tracing::info!("No tutors found teaching subject: {}", query.subject);
            return Ok(MatchOutcome::NotFound {
                subject: query.subject.clone(),
            });
        }

        let total_candidates = candidates.len();

        // Stage 2: Availability + scoring
        let mut best: Option<ScoredTutor> = None;
        for tutor in candidates {
            let available = self
                .availability
                .has_availability(tutor.tutor_id, preferences.desired_date)
                .await?;
            let scored = score_tutor(tutor, available, &preferences, weights);

            tracing::debug!(
                "Scored tutor {} for {}: {:.4} (available: {})",
                scored.tutor.tutor_id,
                query.subject,
                scored.score,
                available
            );

            // Stage 3: Strictly greater keeps the first candidate on ties
            let is_better = best.as_ref().map_or(true, |current| scored.score > current.score);
            if is_better {
                best = Some(scored);
            }
        }

        let Some(matched_tutor) = best else {
            return Ok(MatchOutcome::NotFound {
                subject: query.subject.clone(),
            });
        };

        // Stage 4 & 5: Learning path
        let learning_path = self
            .build_learning_path(&query.subject, &preferences, weights)
            .await?;

        tracing::info!(
            "Matched tutor {} for {} (score {:.4}, {} candidates, {} path entries)",
            matched_tutor.tutor.tutor_id,
            query.subject,
            matched_tutor.score,
            total_candidates,
            learning_path.len()
        );

        Ok(MatchOutcome::Matched(MatchResult {
            matched_tutor,
            learning_path,
        }))
    }

    /// Build the learning path for `subject`
    ///
    /// One entry per prerequisite (foundational first), each listing only the
    /// tutors available on the desired date, ranked by score. Without
    /// prerequisites the path is a single entry for `subject` with no tutors.
    /// The path is padded with placeholder entries up to the configured
    /// minimum.
    pub async fn build_learning_path(
        &self,
        subject: &str,
        preferences: &StudentPreferences,
        weights: &WeightConfig,
    ) -> Result<Vec<LearningPathEntry>, MatchError> {
        let chain = self.subjects.resolve_prerequisite_chain(subject).await?;

        let mut path = Vec::with_capacity(chain.len().max(self.min_path_entries));
        for prerequisite in chain {
            let mut available_tutors = Vec::new();
            for tutor in self.tutors.tutors_for_subject(&prerequisite).await? {
                if self
                    .availability
                    .has_availability(tutor.tutor_id, preferences.desired_date)
                    .await?
                {
                    available_tutors.push(score_tutor(tutor, true, preferences, weights));
                }
            }

            sort_by_score(&mut available_tutors);
            path.push(LearningPathEntry::new(prerequisite, available_tutors));
        }

        if path.is_empty() {
            path.push(LearningPathEntry::new(subject, Vec::new()));
        }

        pad_learning_path(&mut path, self.min_path_entries);
        Ok(path)
    }

    /// Rank every tutor of a subject for browsing
    ///
    /// A tutor counts as available when it has any open slot on or after
    /// `preferences.desired_date`. Unavailable tutors are kept; availability
    /// only contributes to their score.
    pub async fn rank_subject_tutors(
        &self,
        subject: &str,
        preferences: &StudentPreferences,
        weights: &WeightConfig,
    ) -> Result<Vec<ScoredTutor>, MatchError> {
        let candidates = self.tutors.tutors_for_subject(subject).await?;

        let mut ranked = Vec::with_capacity(candidates.len());
        for tutor in candidates {
            let available = self
                .availability
                .has_upcoming_availability(tutor.tutor_id, preferences.desired_date)
                .await?;
            ranked.push(score_tutor(tutor, available, preferences, weights));
        }

        sort_by_score(&mut ranked);

        tracing::debug!("Ranked {} tutors for {}", ranked.len(), subject);

        Ok(ranked)
    }
}

impl std::fmt::Debug for TutorMatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TutorMatcher")
            .field("min_path_entries", &self.min_path_entries)
            .finish_non_exhaustive()
    }
}

/// Rank a pre-fetched list of `(tutor, available)` pairs without path resolution
pub fn rank_tutors(
    tutors: Vec<(TutorCandidate, bool)>,
    preferences: &StudentPreferences,
    weights: &WeightConfig,
) -> Vec<ScoredTutor> {
    let mut ranked: Vec<ScoredTutor> = tutors
        .into_iter()
        .map(|(tutor, available)| score_tutor(tutor, available, preferences, weights))
        .collect();
    sort_by_score(&mut ranked);
    ranked
}

/// Append placeholder entries until `path` has at least `min_entries`
pub fn pad_learning_path(path: &mut Vec<LearningPathEntry>, min_entries: usize) {
    while path.len() < min_entries {
        path.push(LearningPathEntry::placeholder());
    }
}

fn score_tutor(
    tutor: TutorCandidate,
    available: bool,
    preferences: &StudentPreferences,
    weights: &WeightConfig,
) -> ScoredTutor {
    let score = calculate_match_score(
        &tutor,
        available,
        preferences.budget,
        &preferences.preferred_language,
        preferences.learning_style,
        weights,
    );

    ScoredTutor {
        tutor,
        score,
        match_percentage: match_percentage(score, weights),
        available,
    }
}

/// Sort by score descending; stable, so equal scores keep repository order
fn sort_by_score(tutors: &mut [ScoredTutor]) {
    tutors.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
}
