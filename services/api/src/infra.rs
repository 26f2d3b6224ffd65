use chrono::{DateTime, Duration, Utc};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};
use talent_market::workflows::sourcing::import::parse_datetime;
use talent_market::workflows::sourcing::{
    Candidate, CandidateId, Job, JobId, JobStatus, LeaderboardDefaults, MatchScore,
    MatchScoreMap, MatchScoreStore, RepositoryError, SourcerId, SourcerNames,
    SourcingRepository, SourcingSnapshot,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) defaults: LeaderboardDefaults,
}

#[derive(Default, Clone)]
pub(crate) struct InMemorySourcingRepository {
    snapshot: Arc<Mutex<SourcingSnapshot>>,
}

impl InMemorySourcingRepository {
    pub(crate) fn new(snapshot: SourcingSnapshot) -> Self {
        Self {
            snapshot: Arc::new(Mutex::new(snapshot)),
        }
    }

    fn guard(&self) -> Result<MutexGuard<'_, SourcingSnapshot>, RepositoryError> {
        self.snapshot
            .lock()
            .map_err(|_| RepositoryError::Unavailable("repository mutex poisoned".to_string()))
    }
}

impl SourcingRepository for InMemorySourcingRepository {
    fn jobs(&self) -> Result<Vec<Job>, RepositoryError> {
        Ok(self.guard()?.jobs.clone())
    }

    fn candidates(&self) -> Result<Vec<Candidate>, RepositoryError> {
        Ok(self.guard()?.candidates.clone())
    }

    fn sourcer_names(&self) -> Result<SourcerNames, RepositoryError> {
        Ok(self.guard()?.sourcer_names.clone())
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryMatchScoreStore {
    scores: Arc<Mutex<MatchScoreMap>>,
}

impl InMemoryMatchScoreStore {
    pub(crate) fn new(scores: MatchScoreMap) -> Self {
        Self {
            scores: Arc::new(Mutex::new(scores)),
        }
    }

    pub(crate) fn record(&self, candidate: &str, score: MatchScore) -> Result<(), RepositoryError> {
        self.scores
            .lock()
            .map_err(|_| RepositoryError::Unavailable("match score mutex poisoned".to_string()))?
            .insert(CandidateId(candidate.to_string()), score);
        Ok(())
    }
}

impl MatchScoreStore for InMemoryMatchScoreStore {
    fn load(&self) -> Result<MatchScoreMap, RepositoryError> {
        self.scores
            .lock()
            .map(|scores| scores.clone())
            .map_err(|_| RepositoryError::Unavailable("match score mutex poisoned".to_string()))
    }
}

/// Splits a snapshot into the two stores the service reads from.
pub(crate) fn in_memory_stores(
    snapshot: SourcingSnapshot,
) -> (InMemorySourcingRepository, InMemoryMatchScoreStore) {
    let SourcingSnapshot {
        jobs,
        candidates,
        match_scores,
        sourcer_names,
    } = snapshot;

    let repository = InMemorySourcingRepository::new(SourcingSnapshot {
        jobs,
        candidates,
        match_scores: MatchScoreMap::new(),
        sourcer_names,
    });
    (repository, InMemoryMatchScoreStore::new(match_scores))
}

struct DemoSourcer {
    id: &'static str,
    name: &'static str,
    // (days before now, completion hours, candidates, match scores)
    jobs: &'static [(i64, f64, usize, &'static [Option<f64>])],
    claimed: usize,
}

const DEMO_SOURCERS: &[DemoSourcer] = &[
    DemoSourcer {
        id: "src-ana",
        name: "Ana Lindqvist",
        jobs: &[
            (1, 4.0, 5, &[Some(90.0), None, None, Some(70.0), Some(0.0)]),
            (3, 8.0, 5, &[None, Some(84.0), None, None, None]),
            (12, 6.5, 4, &[Some(77.0), None, None, None]),
        ],
        claimed: 1,
    },
    DemoSourcer {
        id: "src-kofi",
        name: "Kofi Mensah",
        jobs: &[
            (2, 2.5, 3, &[Some(62.0), Some(58.0), None]),
            (20, 3.0, 2, &[None, None]),
        ],
        claimed: 0,
    },
    DemoSourcer {
        id: "src-ines",
        name: "Ines Carvalho",
        jobs: &[(5, 19.0, 6, &[Some(95.0), Some(91.0), Some(88.0), None, None, None])],
        claimed: 2,
    },
    DemoSourcer {
        id: "src-tom",
        name: "Tomasz Wolski",
        jobs: &[(45, 30.0, 2, &[None, None])],
        claimed: 0,
    },
];

/// Deterministic marketplace activity relative to `now`, used by the demo
/// command and by non-production servers.
pub(crate) fn demo_snapshot(now: DateTime<Utc>) -> SourcingSnapshot {
    let mut snapshot = SourcingSnapshot::default();
    let mut job_counter = 0;

    for sourcer in DEMO_SOURCERS {
        let sourcer_id = SourcerId(sourcer.id.to_string());
        snapshot
            .sourcer_names
            .insert(sourcer_id.clone(), sourcer.name.to_string());

        for (days_ago, completion_hours, candidate_count, scores) in sourcer.jobs {
            job_counter += 1;
            let job_id = JobId(format!("job-{job_counter:03}"));
            let updated_at = now - Duration::days(*days_ago);
            let created_at =
                updated_at - Duration::minutes((completion_hours * 60.0).round() as i64);

            snapshot.jobs.push(Job {
                id: job_id.clone(),
                sourcer_id: Some(sourcer_id.clone()),
                status: JobStatus::Completed,
                created_at,
                updated_at,
                candidates_requested: *candidate_count as u32,
                title: Some(format!("Search #{job_counter}")),
                client_id: Some("client-demo".to_string()),
            });

            for index in 0..*candidate_count {
                let candidate_id = CandidateId(format!("{}-{index}", job_id.0));
                if let Some(score) = scores.get(index).copied().flatten() {
                    snapshot.match_scores.insert(
                        candidate_id.clone(),
                        MatchScore::new(score, "seeded evaluation"),
                    );
                }
                snapshot.candidates.push(Candidate {
                    id: candidate_id,
                    job_id: job_id.clone(),
                    submitted_at: created_at + Duration::minutes(30),
                });
            }
        }

        for _ in 0..sourcer.claimed {
            job_counter += 1;
            let claimed_at = now - Duration::hours(6);
            snapshot.jobs.push(Job {
                id: JobId(format!("job-{job_counter:03}")),
                sourcer_id: Some(sourcer_id.clone()),
                status: JobStatus::Claimed,
                created_at: claimed_at - Duration::hours(2),
                updated_at: claimed_at,
                candidates_requested: 3,
                title: Some(format!("Search #{job_counter}")),
                client_id: Some("client-demo".to_string()),
            });
        }
    }

    snapshot.jobs.push(Job {
        id: JobId("job-open".to_string()),
        sourcer_id: None,
        status: JobStatus::Unclaimed,
        created_at: now - Duration::hours(1),
        updated_at: now - Duration::hours(1),
        candidates_requested: 4,
        title: Some("Open search".to_string()),
        client_id: Some("client-demo".to_string()),
    });

    snapshot
}

pub(crate) fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, String> {
    parse_datetime(raw).ok_or_else(|| {
        format!("failed to parse '{raw}' as an RFC 3339 timestamp or YYYY-MM-DD date")
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 10, 1, 12, 0, 0)
            .single()
            .expect("valid timestamp")
    }

    #[test]
    fn demo_snapshot_is_deterministic() {
        assert_eq!(demo_snapshot(now()), demo_snapshot(now()));
    }

    #[test]
    fn demo_snapshot_covers_every_status() {
        let snapshot = demo_snapshot(now());

        for status in [JobStatus::Unclaimed, JobStatus::Claimed, JobStatus::Completed] {
            assert!(
                snapshot.jobs.iter().any(|job| job.status == status),
                "missing {} job",
                status.label()
            );
        }
        assert_eq!(snapshot.sourcer_names.len(), DEMO_SOURCERS.len());
        assert!(snapshot
            .candidates
            .iter()
            .all(|candidate| snapshot.jobs.iter().any(|job| job.id == candidate.job_id)));
    }

    #[test]
    fn in_memory_stores_split_scores_from_records() {
        let (repository, scores) = in_memory_stores(demo_snapshot(now()));

        assert!(!repository.jobs().expect("jobs").is_empty());
        let loaded = scores.load().expect("scores");
        assert!(loaded.contains_key(&CandidateId("job-001-0".to_string())));

        scores
            .record("job-001-1", MatchScore::new(66.0, "re-evaluated"))
            .expect("record score");
        assert_eq!(scores.load().expect("scores").len(), loaded.len() + 1);
    }

    #[test]
    fn parse_timestamp_reports_bad_input() {
        assert_eq!(parse_timestamp("2025-10-01").expect("date"), now() - Duration::hours(12));
        assert!(parse_timestamp("yesterday").is_err());
    }
}
