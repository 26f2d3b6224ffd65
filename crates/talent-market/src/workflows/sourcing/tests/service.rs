use super::common::*;
use crate::workflows::sourcing::cache::CachePolicy;
use crate::workflows::sourcing::domain::{LeaderboardSort, TimeWindow};
use crate::workflows::sourcing::performance::{LeaderboardQuery, ScoringPreset};
use crate::workflows::sourcing::service::PerformanceServiceError;
use chrono::Duration;
use std::sync::atomic::Ordering;
use std::sync::Arc;

type Fixture = (Arc<MemoryRepository>, Arc<MemoryScores>, TestService);

fn scenario_service(policy: CachePolicy) -> Fixture {
    let repository = Arc::new(MemoryRepository::seeded(
        scenario_jobs(),
        scenario_candidates(),
    ));
    let scores = Arc::new(MemoryScores::seeded(scenario_scores()));
    let service = service(Arc::clone(&repository), Arc::clone(&scores), policy);
    (repository, scores, service)
}

#[test]
fn leaderboard_applies_names_and_match_scores() {
    let (repository, _, service) = scenario_service(CachePolicy::Session);
    repository.name("s", "Sam Reyes");

    let board = service
        .leaderboard(&LeaderboardQuery::default(), now())
        .expect("leaderboard");

    assert_eq!(board.window, TimeWindow::AllTime);
    assert_eq!(board.preset, ScoringPreset::MatchQuality);
    let record = &board.entries[0].record;
    assert_eq!(record.display_name(), "Sam Reyes");
    assert_eq!(record.avg_candidate_rating, Some(80));
    assert_eq!(record.performance_score, 66);
}

#[test]
fn match_scores_load_once_per_session() {
    let (_, scores, service) = scenario_service(CachePolicy::Session);

    for sort_by in [LeaderboardSort::Performance, LeaderboardSort::Rating] {
        let query = LeaderboardQuery {
            sort_by,
            ..LeaderboardQuery::default()
        };
        service.leaderboard(&query, now()).expect("leaderboard");
    }

    assert_eq!(scores.loads.load(Ordering::SeqCst), 1);
}

#[test]
fn invalidation_picks_up_new_scores() {
    let (_, scores, service) = scenario_service(CachePolicy::Session);
    service
        .leaderboard(&LeaderboardQuery::default(), now())
        .expect("initial leaderboard");

    scores.scores.lock().expect("scores lock").clear();
    let stale = service
        .leaderboard(&LeaderboardQuery::default(), now())
        .expect("cached leaderboard");
    service.invalidate_match_scores();
    let refreshed = service
        .leaderboard(&LeaderboardQuery::default(), now())
        .expect("refreshed leaderboard");

    assert_eq!(stale.entries[0].record.avg_candidate_rating, Some(80));
    assert_eq!(refreshed.entries[0].record.avg_candidate_rating, None);
    assert_eq!(scores.loads.load(Ordering::SeqCst), 2);
}

#[test]
fn ttl_expiry_reloads_scores() {
    let (_, scores, service) = scenario_service(CachePolicy::Ttl(Duration::minutes(10)));

    service
        .leaderboard(&LeaderboardQuery::default(), now())
        .expect("first");
    service
        .leaderboard(&LeaderboardQuery::default(), now() + Duration::minutes(9))
        .expect("cached");
    service
        .leaderboard(&LeaderboardQuery::default(), now() + Duration::minutes(11))
        .expect("expired");

    assert_eq!(scores.loads.load(Ordering::SeqCst), 2);
}

#[test]
fn unavailable_scores_degrade_to_unrated() {
    let (_, scores, service) = scenario_service(CachePolicy::Session);
    scores.unavailable.store(true, Ordering::SeqCst);

    let board = service
        .leaderboard(&LeaderboardQuery::default(), now())
        .expect("leaderboard without scores");

    let record = &board.entries[0].record;
    assert_eq!(record.avg_candidate_rating, None);
    assert_eq!(record.rating_label(), "N/A");
    assert_eq!(record.performance_score, 34);
}

#[test]
fn failed_refresh_falls_back_to_last_scores() {
    let (_, scores, service) = scenario_service(CachePolicy::Ttl(Duration::minutes(1)));
    service
        .leaderboard(&LeaderboardQuery::default(), now())
        .expect("first");

    scores.unavailable.store(true, Ordering::SeqCst);
    let board = service
        .leaderboard(&LeaderboardQuery::default(), now() + Duration::minutes(5))
        .expect("degraded leaderboard");

    assert_eq!(board.entries[0].record.avg_candidate_rating, Some(80));
}

#[test]
fn unavailable_repository_is_an_error() {
    let (repository, _, service) = scenario_service(CachePolicy::Session);
    repository.unavailable.store(true, Ordering::SeqCst);

    match service.leaderboard(&LeaderboardQuery::default(), now()) {
        Err(PerformanceServiceError::Repository(err)) => {
            assert!(err.to_string().contains("connection refused"));
        }
        other => panic!("expected repository error, got {other:?}"),
    }
}

#[test]
fn unseen_sourcer_refreshes_names() {
    let (repository, _, service) = scenario_service(CachePolicy::Session);
    repository.name("s", "Sam Reyes");

    service
        .leaderboard(&LeaderboardQuery::default(), now())
        .expect("first");
    service
        .leaderboard(&LeaderboardQuery::default(), now())
        .expect("cached names");
    assert_eq!(repository.name_loads.load(Ordering::SeqCst), 1);

    repository
        .jobs
        .lock()
        .expect("jobs lock")
        .push(completed_job("job-3", "newcomer", 2.0));
    repository.name("newcomer", "Nia Park");
    let board = service
        .leaderboard(&LeaderboardQuery::default(), now())
        .expect("refreshed names");

    assert_eq!(repository.name_loads.load(Ordering::SeqCst), 2);
    let names: Vec<&str> = board
        .entries
        .iter()
        .map(|entry| entry.record.display_name())
        .collect();
    assert!(names.contains(&"Nia Park"));
    assert!(names.contains(&"Sam Reyes"));
}

#[test]
fn invalidated_names_are_reloaded() {
    let (repository, _, service) = scenario_service(CachePolicy::Session);
    service
        .leaderboard(&LeaderboardQuery::default(), now())
        .expect("first");

    repository.name("s", "Sam Reyes");
    service.invalidate_sourcer_names();
    let board = service
        .leaderboard(&LeaderboardQuery::default(), now())
        .expect("renamed");

    assert_eq!(board.entries[0].record.display_name(), "Sam Reyes");
    assert_eq!(repository.name_loads.load(Ordering::SeqCst), 2);
}

#[test]
fn query_preset_overrides_service_default() {
    let (_, _, service) = scenario_service(CachePolicy::Session);
    let query = LeaderboardQuery {
        preset: Some(ScoringPreset::Acceptance),
        ..LeaderboardQuery::default()
    };

    let board = service.leaderboard(&query, now()).expect("leaderboard");

    assert_eq!(board.preset, ScoringPreset::Acceptance);
    assert_eq!(board.entries[0].record.performance_score, 80);
}
