use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use super::cache::{CachePolicy, ReadThroughCache};
use super::domain::{Job, MatchScoreMap, SourcerId, SourcerNames};
use super::performance::{
    compute_leaderboard, Leaderboard, LeaderboardDefaults, LeaderboardQuery, PerformanceInput,
};
use super::repository::{MatchScoreStore, RepositoryError, SourcingRepository};

/// Service feeding repository data and cached lookups into the performance engine.
pub struct SourcerPerformanceService<R, M> {
    repository: Arc<R>,
    match_scores: Arc<M>,
    defaults: LeaderboardDefaults,
    score_cache: ReadThroughCache<MatchScoreMap>,
    directory_cache: ReadThroughCache<SourcerDirectory>,
}

/// Sourcer display names plus the sourcer ids that were on the board when the
/// names were fetched. A job referencing any other sourcer forces a refresh.
#[derive(Debug, Default)]
struct SourcerDirectory {
    names: SourcerNames,
    known_ids: HashSet<SourcerId>,
}

impl<R, M> SourcerPerformanceService<R, M>
where
    R: SourcingRepository + 'static,
    M: MatchScoreStore + 'static,
{
    pub fn new(
        repository: Arc<R>,
        match_scores: Arc<M>,
        defaults: LeaderboardDefaults,
        policy: CachePolicy,
    ) -> Self {
        Self {
            repository,
            match_scores,
            defaults,
            score_cache: ReadThroughCache::new(policy),
            directory_cache: ReadThroughCache::new(policy),
        }
    }

    pub fn defaults(&self) -> LeaderboardDefaults {
        self.defaults
    }

    /// Recompute the leaderboard from the current repository contents.
    pub fn leaderboard(
        &self,
        query: &LeaderboardQuery,
        now: DateTime<Utc>,
    ) -> Result<Leaderboard, PerformanceServiceError> {
        let jobs = self.repository.jobs()?;
        let candidates = self.repository.candidates()?;
        let match_scores = self.match_scores(now);
        let directory = self.directory(&jobs, now);

        let input = PerformanceInput {
            jobs: &jobs,
            candidates: &candidates,
            match_scores: &match_scores,
            sourcer_names: &directory.names,
        };
        let leaderboard = compute_leaderboard(&input, query, self.defaults, now);

        debug!(
            jobs = jobs.len(),
            candidates = candidates.len(),
            match_scores = match_scores.len(),
            entries = leaderboard.entries.len(),
            window = leaderboard.window.key(),
            sort = leaderboard.sort_by.key(),
            preset = leaderboard.preset.key(),
            "computed sourcer leaderboard"
        );

        Ok(leaderboard)
    }

    pub fn invalidate_match_scores(&self) {
        self.score_cache.invalidate();
        debug!("match score cache invalidated");
    }

    pub fn invalidate_sourcer_names(&self) {
        self.directory_cache.invalidate();
        debug!("sourcer name cache invalidated");
    }

    // Match scores are optional signal: a failed load falls back to the last
    // good snapshot, then to no scores at all.
    fn match_scores(&self, now: DateTime<Utc>) -> Arc<MatchScoreMap> {
        match self.score_cache.get_or_load(now, || self.match_scores.load()) {
            Ok(scores) => scores,
            Err(err) => {
                warn!(error = %err, "match scores unavailable, ranking without them");
                self.score_cache.peek().unwrap_or_default()
            }
        }
    }

    fn directory(&self, jobs: &[Job], now: DateTime<Utc>) -> Arc<SourcerDirectory> {
        let observed: HashSet<&SourcerId> = jobs
            .iter()
            .filter_map(|job| job.sourcer_id.as_ref())
            .collect();

        let loaded = self.directory_cache.get_or_load_unless(
            now,
            |directory| observed.iter().all(|id| directory.known_ids.contains(*id)),
            || {
                let names = self.repository.sourcer_names()?;
                Ok::<_, RepositoryError>(SourcerDirectory {
                    names,
                    known_ids: observed.iter().map(|id| (*id).clone()).collect(),
                })
            },
        );

        match loaded {
            Ok(directory) => directory,
            Err(err) => {
                warn!(error = %err, "sourcer names unavailable, falling back to ids");
                self.directory_cache.peek().unwrap_or_default()
            }
        }
    }
}

/// Error surfaced by the performance service.
#[derive(Debug, thiserror::Error)]
pub enum PerformanceServiceError {
    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),
}
