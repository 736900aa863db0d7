use async_trait::async_trait;
use std::time::Duration;

use crate::core::traits::SubjectRepository;
use crate::error::RepositoryError;

/// Caching decorator for prerequisite lookups
///
/// Subjects are static reference data, so answers (including "no
/// prerequisite") are cached in memory for `ttl`. Failed lookups are never
/// cached and propagate unchanged.
pub struct CachedSubjectRepository<R> {
    inner: R,
    cache: moka::future::Cache<String, Option<String>>,
}

impl<R: SubjectRepository> CachedSubjectRepository<R> {
    pub fn new(inner: R, max_entries: u64, ttl: Duration) -> Self {
        let cache = moka::future::CacheBuilder::new(max_entries)
            .time_to_live(ttl)
            .build();

        Self { inner, cache }
    }

    pub fn inner(&self) -> &R {
        &self.inner
    }

    /// Number of cached subjects
    pub async fn entry_count(&self) -> u64 {
        self.cache.run_pending_tasks().await;
        self.cache.entry_count()
    }

    /// Drop every cached answer
    pub fn invalidate_all(&self) {
        self.cache.invalidate_all();
    }
}

#[async_trait]
impl<R: SubjectRepository> SubjectRepository for CachedSubjectRepository<R> {
    async fn prerequisite_of(&self, subject: &str) -> Result<Option<String>, RepositoryError> {
        if let Some(cached) = self.cache.get(subject).await {
            tracing::trace!("Prerequisite cache hit: {}", subject);
            return Ok(cached);
        }

        let prerequisite = self.inner.prerequisite_of(subject).await?;
        self.cache
            .insert(subject.to_string(), prerequisite.clone())
            .await;

        tracing::trace!("Prerequisite cache set: {}", subject);
        Ok(prerequisite)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct CountingSubjects {
        calls: Arc<AtomicUsize>,
        fail: bool,
    }

    #[async_trait]
    impl SubjectRepository for CountingSubjects {
        async fn prerequisite_of(&self, subject: &str) -> Result<Option<String>, RepositoryError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(RepositoryError::Unavailable("down".to_string()));
            }
            Ok(match subject {
                "Algebra" => Some("Arithmetic".to_string()),
                _ => None,
            })
        }
    }

    fn cached(fail: bool) -> (CachedSubjectRepository<CountingSubjects>, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let repo = CachedSubjectRepository::new(
            CountingSubjects {
                calls: calls.clone(),
                fail,
            },
            100,
            Duration::from_secs(60),
        );
        (repo, calls)
    }

    #[tokio::test]
    async fn test_answers_are_cached() {
        let (repo, calls) = cached(false);

        assert_eq!(repo.prerequisite_of("Algebra").await.unwrap(), Some("Arithmetic".to_string()));
        assert_eq!(repo.prerequisite_of("Algebra").await.unwrap(), Some("Arithmetic".to_string()));
        assert_eq!(repo.prerequisite_of("Arithmetic").await.unwrap(), None);
        assert_eq!(repo.prerequisite_of("Arithmetic").await.unwrap(), None);

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(repo.entry_count().await, 2);
    }

    #[tokio::test]
    async fn test_errors_are_not_cached() {
        let (repo, calls) = cached(true);

        assert!(repo.prerequisite_of("Algebra").await.is_err());
        assert!(repo.prerequisite_of("Algebra").await.is_err());

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(repo.entry_count().await, 0);
    }

    #[tokio::test]
    async fn test_invalidate_all() {
        let (repo, calls) = cached(false);

        repo.prerequisite_of("Algebra").await.unwrap();
        repo.invalidate_all();
        repo.prerequisite_of("Algebra").await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
