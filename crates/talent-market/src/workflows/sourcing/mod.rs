//! Sourcer performance tracking for the recruiting marketplace: the scoring
//! engine, its read-through caches, and the service and HTTP surface around it.

pub mod cache;
pub mod domain;
pub mod import;
pub mod performance;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use cache::{CachePolicy, ReadThroughCache};
pub use domain::{
    Candidate, CandidateId, Job, JobId, JobStatus, LeaderboardSort, MatchScore, MatchScoreMap,
    SourcerId, SourcerNames, SourcingSnapshot, TimeWindow, UnknownOption,
};
pub use import::{SnapshotImportError, SnapshotImporter};
pub use performance::{
    compute_leaderboard, Leaderboard, LeaderboardDefaults, LeaderboardEntry, LeaderboardQuery,
    LeaderboardSummary, PerformanceConfig, PerformanceEngine, PerformanceInput, ScoringPreset,
    SourcerPerformanceRecord,
};
pub use repository::{MatchScoreStore, RepositoryError, SourcingRepository};
pub use router::performance_router;
pub use service::{PerformanceServiceError, SourcerPerformanceService};
