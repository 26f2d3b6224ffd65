use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;
use std::io::Cursor;
use std::sync::Arc;
use talent_market::error::AppError;
use talent_market::workflows::sourcing::performance::views::LeaderboardView;
use talent_market::workflows::sourcing::router::LeaderboardParams;
use talent_market::workflows::sourcing::{
    compute_leaderboard, performance_router, MatchScoreMap, MatchScoreStore, PerformanceInput,
    SnapshotImporter, SourcerNames, SourcerPerformanceService, SourcingRepository,
};

/// Raw data-layer exports plus leaderboard selectors.
#[derive(Debug, Deserialize)]
pub(crate) struct ImportLeaderboardRequest {
    pub(crate) jobs_csv: String,
    #[serde(default)]
    pub(crate) candidates_csv: Option<String>,
    #[serde(default)]
    pub(crate) match_scores: Option<MatchScoreMap>,
    #[serde(default)]
    pub(crate) sourcer_names: SourcerNames,
    #[serde(default)]
    pub(crate) window: Option<String>,
    #[serde(default, alias = "sort_by")]
    pub(crate) sort: Option<String>,
    #[serde(default)]
    pub(crate) preset: Option<String>,
    #[serde(default)]
    pub(crate) search: Option<String>,
    #[serde(default)]
    pub(crate) now: Option<DateTime<Utc>>,
}

pub(crate) fn with_sourcing_routes<R, M>(
    service: Arc<SourcerPerformanceService<R, M>>,
) -> axum::Router
where
    R: SourcingRepository + 'static,
    M: MatchScoreStore + 'static,
{
    performance_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/sourcers/leaderboard/import",
            axum::routing::post(import_leaderboard_endpoint),
        )
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn import_leaderboard_endpoint(
    Extension(state): Extension<AppState>,
    Json(payload): Json<ImportLeaderboardRequest>,
) -> Result<Json<LeaderboardView>, AppError> {
    let ImportLeaderboardRequest {
        jobs_csv,
        candidates_csv,
        match_scores,
        sourcer_names,
        window,
        sort,
        preset,
        search,
        now,
    } = payload;

    let query = LeaderboardParams {
        window,
        sort,
        preset,
        search,
    }
    .into_query()?;

    let mut snapshot = SnapshotImporter::from_readers(
        Cursor::new(jobs_csv.into_bytes()),
        candidates_csv.map(|csv| Cursor::new(csv.into_bytes())),
        None::<Cursor<Vec<u8>>>,
    )?;
    snapshot.match_scores = match_scores.unwrap_or_default();
    snapshot.sourcer_names = sourcer_names;

    let leaderboard = compute_leaderboard(
        &PerformanceInput::from_snapshot(&snapshot),
        &query,
        state.defaults,
        now.unwrap_or_else(Utc::now),
    );

    Ok(Json(leaderboard.view()))
}
