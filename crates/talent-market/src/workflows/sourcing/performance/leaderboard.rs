use super::super::domain::{LeaderboardSort, SourcerId};
use std::cmp::Ordering;

/// Derived performance figures for one sourcer. Rebuilt on every pass.
#[derive(Debug, Clone, PartialEq)]
pub struct SourcerPerformanceRecord {
    pub sourcer_id: SourcerId,
    pub sourcer_name: Option<String>,
    pub total_jobs: usize,
    pub completed_jobs: usize,
    pub claimed_jobs: usize,
    pub total_candidates: usize,
    pub avg_completion_hours: f64,
    pub fastest_completion_hours: f64,
    pub success_rate: u32,
    pub speed_score: f64,
    pub acceptance_rate: u32,
    pub avg_candidate_rating: Option<u32>,
    pub performance_score: i64,
}

impl SourcerPerformanceRecord {
    pub fn display_name(&self) -> &str {
        self.sourcer_name.as_deref().unwrap_or(&self.sourcer_id.0)
    }

    /// Rating as shown on dashboards; unrated sourcers read "N/A", never 0.
    pub fn rating_label(&self) -> String {
        match self.avg_candidate_rating {
            Some(rating) => rating.to_string(),
            None => "N/A".to_string(),
        }
    }

    fn matches(&self, needle: &str) -> bool {
        self.sourcer_id.0.to_lowercase().contains(needle)
            || self
                .sourcer_name
                .as_deref()
                .map(|name| name.to_lowercase().contains(needle))
                .unwrap_or(false)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LeaderboardEntry {
    pub rank: usize,
    pub record: SourcerPerformanceRecord,
}

/// Sorts records by `sort_by` and assigns positional ranks starting at 1.
///
/// Ties keep their input order and still receive distinct ranks.
pub fn rank(
    mut records: Vec<SourcerPerformanceRecord>,
    sort_by: LeaderboardSort,
) -> Vec<LeaderboardEntry> {
    records.sort_by(|a, b| compare(a, b, sort_by));

    records
        .into_iter()
        .enumerate()
        .map(|(index, record)| LeaderboardEntry {
            rank: index + 1,
            record,
        })
        .collect()
}

fn compare(
    a: &SourcerPerformanceRecord,
    b: &SourcerPerformanceRecord,
    sort_by: LeaderboardSort,
) -> Ordering {
    match sort_by {
        LeaderboardSort::Performance => b.performance_score.cmp(&a.performance_score),
        LeaderboardSort::Speed => a.avg_completion_hours.total_cmp(&b.avg_completion_hours),
        LeaderboardSort::Rating => rating_key(b).cmp(&rating_key(a)),
        LeaderboardSort::Completed => b.completed_jobs.cmp(&a.completed_jobs),
    }
}

// Unrated sorts below every real rating.
fn rating_key(record: &SourcerPerformanceRecord) -> i64 {
    record.avg_candidate_rating.map(i64::from).unwrap_or(-1)
}

/// Keeps entries whose sourcer id or name contains `search`, case-insensitively.
/// Ranks are left untouched so filtered rows keep their global position.
pub fn filter_entries(entries: Vec<LeaderboardEntry>, search: &str) -> Vec<LeaderboardEntry> {
    let needle = search.trim().to_lowercase();
    if needle.is_empty() {
        return entries;
    }

    entries
        .into_iter()
        .filter(|entry| entry.record.matches(&needle))
        .collect()
}
