use crate::infra::{demo_snapshot, in_memory_stores};
use chrono::{DateTime, Utc};
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;
use talent_market::config::AppConfig;
use talent_market::error::AppError;
use talent_market::workflows::sourcing::{
    compute_leaderboard, CachePolicy, Leaderboard, LeaderboardDefaults, LeaderboardQuery,
    LeaderboardSort, MatchScore, PerformanceInput, PerformanceServiceError, ScoringPreset,
    SnapshotImporter, SourcerPerformanceService, TimeWindow,
};

#[derive(Args, Debug)]
pub(crate) struct LeaderboardArgs {
    /// Jobs CSV export (Job ID, Sourcer ID, Status, Created At, Updated At, ...)
    #[arg(long)]
    pub(crate) jobs_csv: PathBuf,
    /// Candidates CSV export (Candidate ID, Job ID, Submitted At)
    #[arg(long)]
    pub(crate) candidates_csv: Option<PathBuf>,
    /// Match score JSON keyed by candidate id
    #[arg(long)]
    pub(crate) match_scores: Option<PathBuf>,
    /// 7days, 30days, 90days or alltime (defaults to APP_LEADERBOARD_WINDOW)
    #[arg(long)]
    pub(crate) window: Option<TimeWindow>,
    /// performance, speed, rating or completed
    #[arg(long)]
    pub(crate) sort: Option<LeaderboardSort>,
    /// acceptance (a) or match_quality (b); defaults to APP_SCORING_PRESET
    #[arg(long)]
    pub(crate) preset: Option<ScoringPreset>,
    /// Only show sourcers whose id or name contains this text
    #[arg(long)]
    pub(crate) search: Option<String>,
    /// Evaluation instant (RFC 3339 or YYYY-MM-DD). Defaults to now.
    #[arg(long, value_parser = crate::infra::parse_timestamp)]
    pub(crate) now: Option<DateTime<Utc>>,
    /// Print the JSON view instead of a table
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Evaluation instant (RFC 3339 or YYYY-MM-DD). Defaults to now.
    #[arg(long, value_parser = crate::infra::parse_timestamp)]
    pub(crate) now: Option<DateTime<Utc>>,
    /// Time window for both preset runs
    #[arg(long)]
    pub(crate) window: Option<TimeWindow>,
}

pub(crate) fn run_leaderboard(args: LeaderboardArgs) -> Result<(), AppError> {
    let LeaderboardArgs {
        jobs_csv,
        candidates_csv,
        match_scores,
        window,
        sort,
        preset,
        search,
        now,
        json,
    } = args;

    let defaults = AppConfig::load()?.scoring.defaults();
    let snapshot = SnapshotImporter::from_paths(jobs_csv, candidates_csv, match_scores)?;
    let query = LeaderboardQuery {
        window,
        sort_by: sort.unwrap_or_default(),
        preset,
        search,
    };

    let leaderboard = compute_leaderboard(
        &PerformanceInput::from_snapshot(&snapshot),
        &query,
        defaults,
        now.unwrap_or_else(Utc::now),
    );

    if json {
        println!("{}", serde_json::to_string_pretty(&leaderboard.view())?);
    } else {
        print!("{}", render_leaderboard(&leaderboard));
    }

    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let now = args.now.unwrap_or_else(Utc::now);
    let defaults = LeaderboardDefaults {
        window: args.window.unwrap_or(TimeWindow::ThirtyDays),
        ..LeaderboardDefaults::default()
    };

    let (repository, scores) = in_memory_stores(demo_snapshot(now));
    let scores = Arc::new(scores);
    let service = SourcerPerformanceService::new(
        Arc::new(repository),
        Arc::clone(&scores),
        defaults,
        CachePolicy::Session,
    );

    println!("Sourcer performance demo");
    for preset in [ScoringPreset::MatchQuality, ScoringPreset::Acceptance] {
        let query = LeaderboardQuery {
            preset: Some(preset),
            ..LeaderboardQuery::default()
        };
        let leaderboard = service.leaderboard(&query, now)?;
        println!();
        print!("{}", render_leaderboard(&leaderboard));
    }

    let by_rating = LeaderboardQuery {
        sort_by: LeaderboardSort::Rating,
        search: Some("kofi".to_string()),
        ..LeaderboardQuery::default()
    };
    let before = service.leaderboard(&by_rating, now)?;

    scores
        .record(
            "job-006-0",
            MatchScore::new(90.0, "re-evaluated against updated brief"),
        )
        .map_err(PerformanceServiceError::from)?;
    let cached = service.leaderboard(&by_rating, now)?;
    service.invalidate_match_scores();
    let refreshed = service.leaderboard(&by_rating, now)?;

    println!("\nMatch score refresh (Kofi Mensah)");
    for (label, leaderboard) in [
        ("before re-evaluation", &before),
        ("cached after re-evaluation", &cached),
        ("after cache refresh", &refreshed),
    ] {
        let rating = leaderboard
            .entries
            .first()
            .map(|entry| entry.record.rating_label())
            .unwrap_or_else(|| "not ranked".to_string());
        println!("- {label}: rating {rating}");
    }

    Ok(())
}

pub(crate) fn render_leaderboard(leaderboard: &Leaderboard) -> String {
    let mut out = format!(
        "Sourcer leaderboard | {} | {} | sorted by {}\n",
        leaderboard.window.label(),
        leaderboard.preset.label(),
        leaderboard.sort_by.key()
    );

    if leaderboard.summary.active_sourcers == 0 {
        out.push_str("  No sourcer activity in this window\n");
    } else if leaderboard.entries.is_empty() {
        out.push_str("  No sourcers match the search\n");
    } else {
        out.push_str(&format!(
            "  {:>4}  {:<22} {:>4} {:>4} {:>7} {:>5} {:>6} {:>7} {:>7} {:>5} {:>6} {:>5}\n",
            "Rank",
            "Sourcer",
            "Jobs",
            "Done",
            "Claimed",
            "Cands",
            "Avg h",
            "Fastest",
            "Success",
            "Speed",
            "Rating",
            "Score"
        ));
        for entry in &leaderboard.entries {
            let record = &entry.record;
            out.push_str(&format!(
                "  {:>4}  {:<22} {:>4} {:>4} {:>7} {:>5} {:>6.1} {:>7.1} {:>6}% {:>5.0} {:>6} {:>5}\n",
                entry.rank,
                record.display_name(),
                record.total_jobs,
                record.completed_jobs,
                record.claimed_jobs,
                record.total_candidates,
                record.avg_completion_hours,
                record.fastest_completion_hours,
                record.success_rate,
                record.speed_score,
                record.rating_label(),
                record.performance_score
            ));
        }
    }

    let summary = &leaderboard.summary;
    out.push_str(&format!(
        "Team: {} active sourcers | {} of {} jobs completed ({}%) | {:.1} h avg completion | {} candidates | {} rated\n",
        summary.active_sourcers,
        summary.completed_jobs,
        summary.total_jobs,
        summary.team_success_rate,
        summary.team_avg_completion_hours,
        summary.total_candidates,
        summary.rated_sourcers
    ));
    if let Some(top) = leaderboard.entries.first() {
        out.push_str(&format!("Top performer: {}\n", top.record.display_name()));
    }

    out
}
