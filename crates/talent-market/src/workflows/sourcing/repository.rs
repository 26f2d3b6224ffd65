use super::domain::{Candidate, Job, MatchScoreMap, SourcerNames};

/// Read access to marketplace records owned by the hosted data layer.
pub trait SourcingRepository: Send + Sync {
    fn jobs(&self) -> Result<Vec<Job>, RepositoryError>;
    fn candidates(&self) -> Result<Vec<Candidate>, RepositoryError>;
    fn sourcer_names(&self) -> Result<SourcerNames, RepositoryError>;
}

/// Source of cached AI match evaluations keyed by candidate.
pub trait MatchScoreStore: Send + Sync {
    fn load(&self) -> Result<MatchScoreMap, RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
