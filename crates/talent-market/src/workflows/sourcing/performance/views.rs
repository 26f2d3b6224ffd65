use super::super::domain::{LeaderboardSort, SourcerId, TimeWindow};
use super::config::ScoringPreset;
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct LeaderboardEntryView {
    pub rank: usize,
    pub sourcer_id: SourcerId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sourcer_name: Option<String>,
    pub display_name: String,
    pub total_jobs: usize,
    pub completed_jobs: usize,
    pub claimed_jobs: usize,
    pub total_candidates: usize,
    pub avg_completion_hours: f64,
    pub fastest_completion_hours: f64,
    pub success_rate: u32,
    pub speed_score: u32,
    pub acceptance_rate: u32,
    pub avg_candidate_rating: Option<u32>,
    pub rating_label: String,
    pub performance_score: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct LeaderboardSummaryView {
    pub active_sourcers: usize,
    pub total_jobs: usize,
    pub completed_jobs: usize,
    pub claimed_jobs: usize,
    pub total_candidates: usize,
    pub team_avg_completion_hours: f64,
    pub team_success_rate: u32,
    pub rated_sourcers: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_sourcer: Option<SourcerId>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LeaderboardView {
    pub window: TimeWindow,
    pub window_label: &'static str,
    pub sort_by: LeaderboardSort,
    pub preset: ScoringPreset,
    pub preset_label: &'static str,
    pub generated_at: DateTime<Utc>,
    pub summary: LeaderboardSummaryView,
    pub entries: Vec<LeaderboardEntryView>,
}

/// Hours rounded to one decimal place for display.
pub(crate) fn display_hours(hours: f64) -> f64 {
    (hours * 10.0).round() / 10.0
}
