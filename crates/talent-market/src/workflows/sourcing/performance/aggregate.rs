use super::super::domain::{Candidate, CandidateId, Job, JobId, JobStatus, SourcerId};
use std::collections::HashMap;

/// Candidates grouped by the job they were submitted against.
#[derive(Debug, Default)]
pub struct CandidateIndex<'a> {
    by_job: HashMap<&'a JobId, Vec<&'a Candidate>>,
}

impl<'a> CandidateIndex<'a> {
    pub fn new(candidates: &'a [Candidate]) -> Self {
        let mut by_job: HashMap<&'a JobId, Vec<&'a Candidate>> = HashMap::new();
        for candidate in candidates {
            by_job.entry(&candidate.job_id).or_default().push(candidate);
        }
        Self { by_job }
    }

    pub fn for_job(&self, job_id: &JobId) -> &[&'a Candidate] {
        self.by_job.get(job_id).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Per-sourcer counts and timings before any scoring is applied.
#[derive(Debug, Clone, PartialEq)]
pub struct RawAggregate {
    pub sourcer_id: SourcerId,
    pub total_jobs: usize,
    pub completed_jobs: usize,
    pub claimed_jobs: usize,
    pub total_candidates: usize,
    pub candidate_ids: Vec<CandidateId>,
    pub completion_hours: Vec<f64>,
}

impl RawAggregate {
    fn new(sourcer_id: SourcerId) -> Self {
        Self {
            sourcer_id,
            total_jobs: 0,
            completed_jobs: 0,
            claimed_jobs: 0,
            total_candidates: 0,
            candidate_ids: Vec::new(),
            completion_hours: Vec::new(),
        }
    }

    pub fn avg_completion_hours(&self) -> f64 {
        if self.completion_hours.is_empty() {
            return 0.0;
        }

        self.completion_hours.iter().sum::<f64>() / self.completion_hours.len() as f64
    }

    pub fn fastest_completion_hours(&self) -> f64 {
        self.completion_hours
            .iter()
            .copied()
            .min_by(f64::total_cmp)
            .unwrap_or(0.0)
    }

    /// Completed share of all jobs as a rounded percentage; 0 for an empty set.
    pub fn success_rate(&self) -> u32 {
        if self.total_jobs == 0 {
            return 0;
        }

        ((self.completed_jobs as f64 / self.total_jobs as f64) * 100.0).round() as u32
    }
}

/// Groups claimed jobs by sourcer. Unclaimed jobs never reach the leaderboard.
///
/// Sourcers are returned in the order they first appear in `jobs`.
pub fn aggregate(jobs: &[&Job], candidates: &CandidateIndex<'_>) -> Vec<RawAggregate> {
    let mut positions: HashMap<&SourcerId, usize> = HashMap::new();
    let mut aggregates: Vec<RawAggregate> = Vec::new();

    for job in jobs {
        let Some(sourcer_id) = job.sourcer_id.as_ref() else {
            continue;
        };

        let position = *positions.entry(sourcer_id).or_insert_with(|| {
            aggregates.push(RawAggregate::new(sourcer_id.clone()));
            aggregates.len() - 1
        });
        let entry = &mut aggregates[position];

        entry.total_jobs += 1;
        match job.status {
            JobStatus::Completed => entry.completed_jobs += 1,
            JobStatus::Claimed => entry.claimed_jobs += 1,
            JobStatus::Unclaimed => {}
        }

        if let Some(hours) = job.completion_hours() {
            entry.completion_hours.push(hours);
        }

        let submitted = candidates.for_job(&job.id);
        entry.total_candidates += submitted.len();
        entry
            .candidate_ids
            .extend(submitted.iter().map(|candidate| candidate.id.clone()));
    }

    aggregates
}
