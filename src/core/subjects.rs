use std::collections::{HashSet, VecDeque};
use std::sync::Arc;

use crate::core::traits::SubjectRepository;
use crate::error::MatchError;

/// Prerequisite chain resolution over a subject repository
///
/// Each subject has at most one direct prerequisite, so the prerequisite
/// relation forms chains. Traversal tracks visited subjects: a repeated
/// subject means the stored data is cyclic and resolution fails instead of
/// looping.
#[derive(Clone)]
pub struct SubjectGraph {
    subjects: Arc<dyn SubjectRepository>,
}

impl SubjectGraph {
    pub fn new(subjects: Arc<dyn SubjectRepository>) -> Self {
        Self { subjects }
    }

    /// Resolve the prerequisite chain of `subject`
    ///
    /// # Returns
    /// Subject names ordered from the most foundational prerequisite to the
    /// immediate prerequisite of `subject`. The subject itself is excluded;
    /// a subject without prerequisite yields an empty chain.
    ///
    /// # Errors
    /// `CyclicPrerequisite` naming the first repeated subject, or
    /// `Repository` if a lookup fails.
    pub async fn resolve_prerequisite_chain(&self, subject: &str) -> Result<Vec<String>, MatchError> {
        let mut chain = VecDeque::new();
        let mut visited = HashSet::new();
        visited.insert(subject.to_string());

        let mut current = subject.to_string();
        while let Some(prerequisite) = self.subjects.prerequisite_of(&current).await? {
            if !visited.insert(prerequisite.clone()) {
                tracing::warn!(
                    "Prerequisite cycle detected while resolving '{}' (repeated at '{}')",
                    subject,
                    prerequisite
                );
                return Err(MatchError::CyclicPrerequisite { subject: prerequisite });
            }

            chain.push_front(prerequisite.clone());
            current = prerequisite;
        }

        tracing::debug!("Resolved prerequisite chain for '{}': {:?}", subject, chain);

        Ok(chain.into())
    }
}

impl std::fmt::Debug for SubjectGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubjectGraph").finish_non_exhaustive()
    }
}
