use std::str::FromStr;
use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;

use super::domain::{LeaderboardSort, SourcingSnapshot, TimeWindow, UnknownOption};
use super::performance::{
    compute_leaderboard, LeaderboardQuery, PerformanceInput, ScoringPreset,
};
use super::repository::{MatchScoreStore, SourcingRepository};
use super::service::SourcerPerformanceService;

/// Router builder exposing the leaderboard endpoints.
pub fn performance_router<R, M>(service: Arc<SourcerPerformanceService<R, M>>) -> Router
where
    R: SourcingRepository + 'static,
    M: MatchScoreStore + 'static,
{
    Router::new()
        .route(
            "/api/v1/sourcers/leaderboard",
            get(leaderboard_handler::<R, M>),
        )
        .route(
            "/api/v1/sourcers/leaderboard/compute",
            post(compute_handler::<R, M>),
        )
        .route(
            "/api/v1/sourcers/match-scores/refresh",
            post(refresh_match_scores_handler::<R, M>),
        )
        .with_state(service)
}

/// Raw query-string selectors; parsed by hand so bad values map to JSON errors.
#[derive(Debug, Default, Deserialize)]
pub struct LeaderboardParams {
    #[serde(default)]
    pub window: Option<String>,
    #[serde(default, alias = "sort_by")]
    pub sort: Option<String>,
    #[serde(default)]
    pub preset: Option<String>,
    #[serde(default)]
    pub search: Option<String>,
}

impl LeaderboardParams {
    pub fn into_query(self) -> Result<LeaderboardQuery, UnknownOption> {
        Ok(LeaderboardQuery {
            window: parse_optional::<TimeWindow>(self.window)?,
            sort_by: parse_optional::<LeaderboardSort>(self.sort)?.unwrap_or_default(),
            preset: parse_optional::<ScoringPreset>(self.preset)?,
            search: self.search.filter(|value| !value.trim().is_empty()),
        })
    }
}

fn parse_optional<T>(raw: Option<String>) -> Result<Option<T>, UnknownOption>
where
    T: FromStr<Err = UnknownOption>,
{
    raw.filter(|value| !value.trim().is_empty())
        .map(|value| value.parse())
        .transpose()
}

/// Inline snapshot plus selectors for a one-off computation.
///
/// Selectors are raw strings and go through the same parsing as the query
/// string, so both routes accept the same spellings.
#[derive(Debug, Deserialize)]
pub struct ComputeLeaderboardRequest {
    #[serde(flatten)]
    pub snapshot: SourcingSnapshot,
    #[serde(default)]
    pub window: Option<String>,
    #[serde(default, alias = "sort_by")]
    pub sort: Option<String>,
    #[serde(default)]
    pub preset: Option<String>,
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub now: Option<DateTime<Utc>>,
}

pub(crate) async fn leaderboard_handler<R, M>(
    State(service): State<Arc<SourcerPerformanceService<R, M>>>,
    Query(params): Query<LeaderboardParams>,
) -> Response
where
    R: SourcingRepository + 'static,
    M: MatchScoreStore + 'static,
{
    let query = match params.into_query() {
        Ok(query) => query,
        Err(error) => return bad_request(&error.to_string()),
    };

    match service.leaderboard(&query, Utc::now()) {
        Ok(leaderboard) => (StatusCode::OK, axum::Json(leaderboard.view())).into_response(),
        Err(error) => {
            let payload = json!({
                "error": error.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn compute_handler<R, M>(
    State(service): State<Arc<SourcerPerformanceService<R, M>>>,
    payload: Result<axum::Json<ComputeLeaderboardRequest>, JsonRejection>,
) -> Response
where
    R: SourcingRepository + 'static,
    M: MatchScoreStore + 'static,
{
    let axum::Json(ComputeLeaderboardRequest {
        snapshot,
        window,
        sort,
        preset,
        search,
        now,
    }) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return bad_request(&rejection.body_text()),
    };

    let params = LeaderboardParams {
        window,
        sort,
        preset,
        search,
    };
    let query = match params.into_query() {
        Ok(query) => query,
        Err(error) => return bad_request(&error.to_string()),
    };
    let input = PerformanceInput::from_snapshot(&snapshot);
    let leaderboard = compute_leaderboard(
        &input,
        &query,
        service.defaults(),
        now.unwrap_or_else(Utc::now),
    );

    (StatusCode::OK, axum::Json(leaderboard.view())).into_response()
}

pub(crate) async fn refresh_match_scores_handler<R, M>(
    State(service): State<Arc<SourcerPerformanceService<R, M>>>,
) -> StatusCode
where
    R: SourcingRepository + 'static,
    M: MatchScoreStore + 'static,
{
    service.invalidate_match_scores();
    StatusCode::NO_CONTENT
}

fn bad_request(message: &str) -> Response {
    let payload = json!({
        "error": message,
    });
    (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response()
}
