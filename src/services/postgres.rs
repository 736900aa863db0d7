use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};
use std::time::Duration;

use crate::core::traits::{AvailabilityOracle, FeedbackRepository, SubjectRepository, TutorRepository};
use crate::error::RepositoryError;
use crate::models::{TeachingStyle, TutorCandidate, TutorId};

/// PostgreSQL-backed tutor, slot and subject repository
///
/// Read-only: the matcher never writes. All queries go through a shared
/// connection pool, so one client serves concurrent match requests.
#[derive(Debug, Clone)]
pub struct PostgresClient {
    pool: PgPool,
}

impl PostgresClient {
    /// Create a new PostgreSQL client from a connection string
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
        acquire_timeout: Duration,
        idle_timeout: Duration,
    ) -> Result<Self, RepositoryError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(acquire_timeout)
            .idle_timeout(idle_timeout)
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        Ok(Self { pool })
    }

    /// Create a new PostgreSQL client from settings
    pub async fn from_settings(
        url: &str,
        max_connections: Option<u32>,
        min_connections: Option<u32>,
        acquire_timeout_secs: Option<u64>,
        idle_timeout_secs: Option<u64>,
    ) -> Result<Self, RepositoryError> {
        tracing::info!("Connecting to PostgreSQL");

        Self::new(
            url,
            max_connections.unwrap_or(10),
            min_connections.unwrap_or(1),
            Duration::from_secs(acquire_timeout_secs.unwrap_or(5)),
            Duration::from_secs(idle_timeout_secs.unwrap_or(600)),
        )
        .await
    }

    /// Wrap an existing pool
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Health check for the database connection
    pub async fn health_check(&self) -> Result<bool, RepositoryError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }
}

#[async_trait]
impl TutorRepository for PostgresClient {
    async fn tutors_for_subject(&self, subject: &str) -> Result<Vec<TutorCandidate>, RepositoryError> {
        // Ordered by tutor id so score ties resolve the same way on every call
        let query = r#"
            SELECT t.tutor_id::int8 AS tutor_id,
                   t.name,
                   t.profile_pic_url,
                   t.average_star_rating::float8 AS average_star_rating,
                   ts.price::float8 AS price,
                   t.preferred_language,
                   t.teaching_style
            FROM tutors t
            JOIN tutor_subjects ts ON t.tutor_id = ts.tutor_id
            JOIN subjects s ON ts.subject_id = s.subject_id
            WHERE s.subject_name = $1
            ORDER BY t.tutor_id, ts.subject_id
        "#;

        let rows = sqlx::query(query).bind(subject).fetch_all(&self.pool).await?;

        let tutors = rows
            .iter()
            .map(tutor_from_row)
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!("Subject {} is taught by {} tutors", subject, tutors.len());

        Ok(tutors)
    }
}

#[async_trait]
impl AvailabilityOracle for PostgresClient {
    async fn has_availability(&self, tutor_id: TutorId, date: NaiveDate) -> Result<bool, RepositoryError> {
        let query = r#"
            SELECT EXISTS (
                SELECT 1 FROM tutor_available_slots
                WHERE tutor_id = $1 AND available_date = $2
            )
        "#;

        let available: bool = sqlx::query_scalar(query)
            .bind(tutor_id)
            .bind(date)
            .fetch_one(&self.pool)
            .await?;

        Ok(available)
    }

    async fn has_upcoming_availability(
        &self,
        tutor_id: TutorId,
        from: NaiveDate,
    ) -> Result<bool, RepositoryError> {
        let query = r#"
            SELECT EXISTS (
                SELECT 1 FROM tutor_available_slots
                WHERE tutor_id = $1 AND available_date >= $2
            )
        "#;

        let available: bool = sqlx::query_scalar(query)
            .bind(tutor_id)
            .bind(from)
            .fetch_one(&self.pool)
            .await?;

        Ok(available)
    }
}

#[async_trait]
impl SubjectRepository for PostgresClient {
    async fn prerequisite_of(&self, subject: &str) -> Result<Option<String>, RepositoryError> {
        // A prerequisite id that no longer resolves reads as "no prerequisite"
        let query = r#"
            SELECT p.subject_name AS prerequisite
            FROM subjects s
            LEFT JOIN subjects p ON p.subject_id = s.prerequisite_id
            WHERE s.subject_name = $1
        "#;

        let row = sqlx::query(query)
            .bind(subject)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(row.try_get::<Option<String>, _>("prerequisite")?),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl FeedbackRepository for PostgresClient {
    async fn feedback_sentiments(&self, tutor_id: TutorId) -> Result<Vec<Option<String>>, RepositoryError> {
        let query = r#"
            SELECT sf.feedback_sentiment AS sentiment
            FROM session_feedback sf
            JOIN sessions s ON s.session_id = sf.session_id
            WHERE s.tutor_id = $1
            UNION ALL
            SELECT tr.sentiment AS sentiment
            FROM tutor_reviews tr
            WHERE tr.tutor_id = $1
        "#;

        let sentiments: Vec<Option<String>> = sqlx::query_scalar(query)
            .bind(tutor_id)
            .fetch_all(&self.pool)
            .await?;

        tracing::debug!("Loaded {} feedback sentiments for tutor {}", sentiments.len(), tutor_id);
        Ok(sentiments)
    }
}

fn tutor_from_row(row: &PgRow) -> Result<TutorCandidate, RepositoryError> {
    candidate_from_columns(TutorColumns {
        tutor_id: row.try_get("tutor_id")?,
        name: row.try_get("name")?,
        profile_pic_url: row.try_get("profile_pic_url")?,
        average_rating: row.try_get("average_star_rating")?,
        price: row.try_get("price")?,
        preferred_language: row.try_get("preferred_language")?,
        teaching_style: row.try_get("teaching_style")?,
    })
}

/// Raw column values of one tutor offering row
struct TutorColumns {
    tutor_id: TutorId,
    name: String,
    profile_pic_url: Option<String>,
    average_rating: Option<f64>,
    price: Option<f64>,
    preferred_language: Option<String>,
    teaching_style: String,
}

/// Validate raw columns into a candidate
///
/// A NULL price, an unknown teaching style, a rating outside [0, 5] or a
/// negative price make the row invalid.
fn candidate_from_columns(columns: TutorColumns) -> Result<TutorCandidate, RepositoryError> {
    let teaching_style = columns
        .teaching_style
        .parse::<TeachingStyle>()
        .map_err(RepositoryError::InvalidRow)?;

    let price = columns.price.ok_or_else(|| {
        RepositoryError::InvalidRow(format!("tutor {} has no price for the subject", columns.tutor_id))
    })?;

    let tutor = TutorCandidate {
        tutor_id: columns.tutor_id,
        name: columns.name,
        profile_pic_url: columns.profile_pic_url,
        average_rating: columns.average_rating,
        price,
        preferred_language: columns.preferred_language.unwrap_or_default(),
        teaching_style,
    };

    match tutor.invalid_reason() {
        Some(reason) => Err(RepositoryError::InvalidRow(reason)),
        None => Ok(tutor),
    }
}
