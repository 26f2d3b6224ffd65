use super::super::domain::{Job, TimeWindow};
use chrono::{DateTime, Utc};

/// Jobs whose last update falls inside `window`, measured back from `now`.
///
/// The cutoff is inclusive: a job updated exactly `N` days ago is kept.
pub fn filter_by_window(jobs: &[Job], window: TimeWindow, now: DateTime<Utc>) -> Vec<&Job> {
    match window.cutoff(now) {
        None => jobs.iter().collect(),
        Some(cutoff) => jobs.iter().filter(|job| job.updated_at >= cutoff).collect(),
    }
}
