//! Sourcer performance scoring and leaderboard ranking.
//!
//! Every function here is pure: the same jobs, candidates and match scores
//! always produce the same leaderboard, and nothing is cached between calls.

mod aggregate;
mod config;
mod leaderboard;
mod scoring;
mod summary;
pub mod views;
mod window;

pub use aggregate::{aggregate, CandidateIndex, RawAggregate};
pub use config::{PerformanceConfig, QualitySource, ScoringPreset, ScoringWeights};
pub use leaderboard::{filter_entries, rank, LeaderboardEntry, SourcerPerformanceRecord};
pub use scoring::{
    acceptance_rate, average_match_rating, composite, speed_score, DELIVERY_SLA_HOURS,
};
pub use summary::LeaderboardSummary;
pub use window::filter_by_window;

use super::domain::{
    Candidate, Job, LeaderboardSort, MatchScoreMap, SourcerNames, SourcingSnapshot, TimeWindow,
};
use chrono::{DateTime, Utc};
use views::{display_hours, LeaderboardEntryView, LeaderboardSummaryView, LeaderboardView};

/// Borrowed inputs for one computation pass. Any collection may be empty.
#[derive(Debug, Clone, Copy)]
pub struct PerformanceInput<'a> {
    pub jobs: &'a [Job],
    pub candidates: &'a [Candidate],
    pub match_scores: &'a MatchScoreMap,
    pub sourcer_names: &'a SourcerNames,
}

impl<'a> PerformanceInput<'a> {
    pub fn from_snapshot(snapshot: &'a SourcingSnapshot) -> Self {
        Self {
            jobs: &snapshot.jobs,
            candidates: &snapshot.candidates,
            match_scores: &snapshot.match_scores,
            sourcer_names: &snapshot.sourcer_names,
        }
    }
}

/// Window and preset applied when a query leaves them unspecified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeaderboardDefaults {
    pub preset: ScoringPreset,
    pub window: TimeWindow,
}

impl Default for LeaderboardDefaults {
    fn default() -> Self {
        Self {
            preset: ScoringPreset::default(),
            window: TimeWindow::ThirtyDays,
        }
    }
}

/// User-facing leaderboard selection: window, sort key, preset and search text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LeaderboardQuery {
    pub window: Option<TimeWindow>,
    pub sort_by: LeaderboardSort,
    pub preset: Option<ScoringPreset>,
    pub search: Option<String>,
}

/// Stateless evaluator applying one scoring configuration.
#[derive(Debug, Clone)]
pub struct PerformanceEngine {
    config: PerformanceConfig,
}

impl PerformanceEngine {
    pub fn new(config: PerformanceConfig) -> Self {
        Self { config }
    }

    pub fn from_preset(preset: ScoringPreset) -> Self {
        Self::new(PerformanceConfig::from_preset(preset))
    }

    pub fn config(&self) -> &PerformanceConfig {
        &self.config
    }

    /// Scores a single sourcer aggregate.
    pub fn score(
        &self,
        aggregate: &RawAggregate,
        match_scores: &MatchScoreMap,
        sourcer_names: &SourcerNames,
    ) -> SourcerPerformanceRecord {
        let avg_completion_hours = aggregate.avg_completion_hours();
        let speed = if aggregate.completed_jobs == 0 {
            0.0
        } else {
            speed_score(avg_completion_hours)
        };
        let acceptance = acceptance_rate(aggregate.total_candidates);
        let rating = average_match_rating(&aggregate.candidate_ids, match_scores);

        let quality = match self.config.quality_source {
            QualitySource::StaticAcceptance => f64::from(acceptance),
            QualitySource::MatchScores => rating.map(f64::from).unwrap_or(0.0),
        };

        SourcerPerformanceRecord {
            sourcer_id: aggregate.sourcer_id.clone(),
            sourcer_name: sourcer_names.get(&aggregate.sourcer_id).cloned(),
            total_jobs: aggregate.total_jobs,
            completed_jobs: aggregate.completed_jobs,
            claimed_jobs: aggregate.claimed_jobs,
            total_candidates: aggregate.total_candidates,
            avg_completion_hours,
            fastest_completion_hours: aggregate.fastest_completion_hours(),
            success_rate: aggregate.success_rate(),
            speed_score: speed,
            acceptance_rate: acceptance,
            avg_candidate_rating: rating,
            performance_score: composite(
                speed,
                quality,
                aggregate.completed_jobs,
                &self.config.weights,
            ),
        }
    }

    /// One record per sourcer active inside `window`, in first-seen order.
    pub fn records(
        &self,
        input: &PerformanceInput<'_>,
        window: TimeWindow,
        now: DateTime<Utc>,
    ) -> Vec<SourcerPerformanceRecord> {
        let jobs = filter_by_window(input.jobs, window, now);
        let candidates = CandidateIndex::new(input.candidates);

        aggregate(&jobs, &candidates)
            .iter()
            .map(|aggregate| self.score(aggregate, input.match_scores, input.sourcer_names))
            .collect()
    }

    pub fn leaderboard(
        &self,
        input: &PerformanceInput<'_>,
        window: TimeWindow,
        sort_by: LeaderboardSort,
        now: DateTime<Utc>,
    ) -> Leaderboard {
        let entries = rank(self.records(input, window, now), sort_by);
        let summary = LeaderboardSummary::from_entries(&entries);

        Leaderboard {
            preset: self.config.preset,
            window,
            sort_by,
            generated_at: now,
            entries,
            summary,
        }
    }
}

/// Resolves `query` against `defaults` and runs a full computation pass.
///
/// The summary always covers every ranked sourcer; search only narrows the
/// returned entries.
pub fn compute_leaderboard(
    input: &PerformanceInput<'_>,
    query: &LeaderboardQuery,
    defaults: LeaderboardDefaults,
    now: DateTime<Utc>,
) -> Leaderboard {
    let preset = query.preset.unwrap_or(defaults.preset);
    let window = query.window.unwrap_or(defaults.window);
    let leaderboard =
        PerformanceEngine::from_preset(preset).leaderboard(input, window, query.sort_by, now);

    match query.search.as_deref() {
        Some(search) => leaderboard.search(search),
        None => leaderboard,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Leaderboard {
    pub preset: ScoringPreset,
    pub window: TimeWindow,
    pub sort_by: LeaderboardSort,
    pub generated_at: DateTime<Utc>,
    pub entries: Vec<LeaderboardEntry>,
    pub summary: LeaderboardSummary,
}

impl Leaderboard {
    pub fn search(mut self, search: &str) -> Self {
        self.entries = filter_entries(self.entries, search);
        self
    }

    pub fn view(&self) -> LeaderboardView {
        let entries = self
            .entries
            .iter()
            .map(|entry| {
                let record = &entry.record;
                LeaderboardEntryView {
                    rank: entry.rank,
                    sourcer_id: record.sourcer_id.clone(),
                    sourcer_name: record.sourcer_name.clone(),
                    display_name: record.display_name().to_string(),
                    total_jobs: record.total_jobs,
                    completed_jobs: record.completed_jobs,
                    claimed_jobs: record.claimed_jobs,
                    total_candidates: record.total_candidates,
                    avg_completion_hours: display_hours(record.avg_completion_hours),
                    fastest_completion_hours: display_hours(record.fastest_completion_hours),
                    success_rate: record.success_rate,
                    speed_score: record.speed_score.round() as u32,
                    acceptance_rate: record.acceptance_rate,
                    avg_candidate_rating: record.avg_candidate_rating,
                    rating_label: record.rating_label(),
                    performance_score: record.performance_score,
                }
            })
            .collect();

        let summary = &self.summary;
        LeaderboardView {
            window: self.window,
            window_label: self.window.label(),
            sort_by: self.sort_by,
            preset: self.preset,
            preset_label: self.preset.label(),
            generated_at: self.generated_at,
            summary: LeaderboardSummaryView {
                active_sourcers: summary.active_sourcers,
                total_jobs: summary.total_jobs,
                completed_jobs: summary.completed_jobs,
                claimed_jobs: summary.claimed_jobs,
                total_candidates: summary.total_candidates,
                team_avg_completion_hours: display_hours(summary.team_avg_completion_hours),
                team_success_rate: summary.team_success_rate,
                rated_sourcers: summary.rated_sourcers,
                top_sourcer: summary.top_sourcer.clone(),
            },
            entries,
        }
    }
}
