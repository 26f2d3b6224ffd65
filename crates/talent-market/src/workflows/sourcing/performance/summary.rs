use super::super::domain::SourcerId;
use super::leaderboard::LeaderboardEntry;

/// Team-wide totals shown above the leaderboard table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LeaderboardSummary {
    pub active_sourcers: usize,
    pub total_jobs: usize,
    pub completed_jobs: usize,
    pub claimed_jobs: usize,
    pub total_candidates: usize,
    pub team_avg_completion_hours: f64,
    pub team_success_rate: u32,
    pub rated_sourcers: usize,
    pub top_sourcer: Option<SourcerId>,
}

impl LeaderboardSummary {
    /// Totals over every ranked entry; `entries` must already be in rank order.
    pub fn from_entries(entries: &[LeaderboardEntry]) -> Self {
        let mut summary = Self {
            active_sourcers: entries.len(),
            top_sourcer: entries.first().map(|entry| entry.record.sourcer_id.clone()),
            ..Self::default()
        };

        let mut completion_hours_total = 0.0;
        for record in entries.iter().map(|entry| &entry.record) {
            summary.total_jobs += record.total_jobs;
            summary.completed_jobs += record.completed_jobs;
            summary.claimed_jobs += record.claimed_jobs;
            summary.total_candidates += record.total_candidates;
            completion_hours_total += record.avg_completion_hours * record.completed_jobs as f64;
            if record.avg_candidate_rating.is_some() {
                summary.rated_sourcers += 1;
            }
        }

        if summary.completed_jobs > 0 {
            summary.team_avg_completion_hours =
                completion_hours_total / summary.completed_jobs as f64;
        }
        if summary.total_jobs > 0 {
            summary.team_success_rate = ((summary.completed_jobs as f64
                / summary.total_jobs as f64)
                * 100.0)
                .round() as u32;
        }

        summary
    }
}
