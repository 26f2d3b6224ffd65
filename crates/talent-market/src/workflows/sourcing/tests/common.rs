use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::workflows::sourcing::cache::CachePolicy;
use crate::workflows::sourcing::domain::{
    Candidate, CandidateId, Job, JobId, JobStatus, MatchScore, MatchScoreMap, SourcerId,
    SourcerNames,
};
use crate::workflows::sourcing::performance::{LeaderboardDefaults, SourcerPerformanceRecord};
use crate::workflows::sourcing::repository::{
    MatchScoreStore, RepositoryError, SourcingRepository,
};
use crate::workflows::sourcing::service::SourcerPerformanceService;

pub(super) fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 10, 1, 12, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn sourcer(id: &str) -> SourcerId {
    SourcerId(id.to_string())
}

pub(super) fn hours(value: f64) -> Duration {
    Duration::milliseconds((value * 3_600_000.0).round() as i64)
}

pub(super) fn job_at(
    id: &str,
    sourcer_id: Option<&str>,
    status: JobStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
) -> Job {
    Job {
        id: JobId(id.to_string()),
        sourcer_id: sourcer_id.map(sourcer),
        status,
        created_at,
        updated_at,
        candidates_requested: 5,
        title: None,
        client_id: None,
    }
}

/// Completed job finished `completion_hours` after creation, one day before `now()`.
pub(super) fn completed_job(id: &str, sourcer_id: &str, completion_hours: f64) -> Job {
    let updated_at = now() - Duration::days(1);
    job_at(
        id,
        Some(sourcer_id),
        JobStatus::Completed,
        updated_at - hours(completion_hours),
        updated_at,
    )
}

pub(super) fn claimed_job(id: &str, sourcer_id: &str) -> Job {
    let updated_at = now() - Duration::days(2);
    job_at(
        id,
        Some(sourcer_id),
        JobStatus::Claimed,
        updated_at - Duration::hours(3),
        updated_at,
    )
}

pub(super) fn unclaimed_job(id: &str) -> Job {
    let created_at = now() - Duration::days(3);
    job_at(id, None, JobStatus::Unclaimed, created_at, created_at)
}

pub(super) fn candidates_for(job_id: &str, prefix: &str, count: usize) -> Vec<Candidate> {
    (0..count)
        .map(|index| Candidate {
            id: CandidateId(format!("{prefix}-{index}")),
            job_id: JobId(job_id.to_string()),
            submitted_at: now() - Duration::days(1),
        })
        .collect()
}

pub(super) fn scores(entries: &[(&str, Option<f64>)]) -> MatchScoreMap {
    entries
        .iter()
        .map(|(id, score)| {
            (
                CandidateId(id.to_string()),
                MatchScore {
                    score: *score,
                    reasoning: "cached evaluation".to_string(),
                },
            )
        })
        .collect()
}

pub(super) fn record(
    id: &str,
    avg_candidate_rating: Option<u32>,
    avg_completion_hours: f64,
    performance_score: i64,
    completed_jobs: usize,
) -> SourcerPerformanceRecord {
    SourcerPerformanceRecord {
        sourcer_id: sourcer(id),
        sourcer_name: None,
        total_jobs: completed_jobs,
        completed_jobs,
        claimed_jobs: 0,
        total_candidates: 0,
        avg_completion_hours,
        fastest_completion_hours: avg_completion_hours,
        success_rate: if completed_jobs > 0 { 100 } else { 0 },
        speed_score: 0.0,
        acceptance_rate: 0,
        avg_candidate_rating,
        performance_score,
    }
}

/// Sourcer S: two completed jobs (4h and 8h), ten candidates, two of them rated.
pub(super) fn scenario_jobs() -> Vec<Job> {
    vec![completed_job("job-1", "s", 4.0), completed_job("job-2", "s", 8.0)]
}

pub(super) fn scenario_candidates() -> Vec<Candidate> {
    let mut candidates = candidates_for("job-1", "c1", 5);
    candidates.extend(candidates_for("job-2", "c2", 5));
    candidates
}

pub(super) fn scenario_scores() -> MatchScoreMap {
    scores(&[("c1-0", Some(90.0)), ("c2-3", Some(70.0)), ("c2-4", Some(0.0))])
}

#[derive(Default)]
pub(super) struct MemoryRepository {
    pub(super) jobs: Mutex<Vec<Job>>,
    pub(super) candidates: Mutex<Vec<Candidate>>,
    pub(super) names: Mutex<SourcerNames>,
    pub(super) name_loads: AtomicUsize,
    pub(super) unavailable: AtomicBool,
}

impl MemoryRepository {
    pub(super) fn seeded(jobs: Vec<Job>, candidates: Vec<Candidate>) -> Self {
        let repository = Self::default();
        *repository.jobs.lock().expect("jobs lock") = jobs;
        *repository.candidates.lock().expect("candidates lock") = candidates;
        repository
    }

    pub(super) fn name(&self, id: &str, name: &str) {
        self.names
            .lock()
            .expect("names lock")
            .insert(sourcer(id), name.to_string());
    }

    fn check(&self) -> Result<(), RepositoryError> {
        if self.unavailable.load(Ordering::SeqCst) {
            Err(RepositoryError::Unavailable("connection refused".to_string()))
        } else {
            Ok(())
        }
    }
}

impl SourcingRepository for MemoryRepository {
    fn jobs(&self) -> Result<Vec<Job>, RepositoryError> {
        self.check()?;
        Ok(self.jobs.lock().expect("jobs lock").clone())
    }

    fn candidates(&self) -> Result<Vec<Candidate>, RepositoryError> {
        self.check()?;
        Ok(self.candidates.lock().expect("candidates lock").clone())
    }

    fn sourcer_names(&self) -> Result<SourcerNames, RepositoryError> {
        self.name_loads.fetch_add(1, Ordering::SeqCst);
        Ok(self.names.lock().expect("names lock").clone())
    }
}

#[derive(Default)]
pub(super) struct MemoryScores {
    pub(super) scores: Mutex<MatchScoreMap>,
    pub(super) loads: AtomicUsize,
    pub(super) unavailable: AtomicBool,
}

impl MemoryScores {
    pub(super) fn seeded(scores: MatchScoreMap) -> Self {
        let store = Self::default();
        *store.scores.lock().expect("scores lock") = scores;
        store
    }
}

impl MatchScoreStore for MemoryScores {
    fn load(&self) -> Result<MatchScoreMap, RepositoryError> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(RepositoryError::Unavailable("cache offline".to_string()));
        }
        Ok(self.scores.lock().expect("scores lock").clone())
    }
}

pub(super) type TestService = SourcerPerformanceService<MemoryRepository, MemoryScores>;

pub(super) fn service(
    repository: Arc<MemoryRepository>,
    scores: Arc<MemoryScores>,
    policy: CachePolicy,
) -> TestService {
    SourcerPerformanceService::new(
        repository,
        scores,
        LeaderboardDefaults {
            window: crate::workflows::sourcing::domain::TimeWindow::AllTime,
            ..LeaderboardDefaults::default()
        },
        policy,
    )
}

pub(super) async fn read_json_body(response: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
