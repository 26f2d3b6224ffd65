use crate::cli::ServeArgs;
use crate::infra::{demo_snapshot, in_memory_stores, AppState};
use crate::routes::with_sourcing_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use chrono::Utc;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use talent_market::config::{AppConfig, AppEnvironment};
use talent_market::error::AppError;
use talent_market::telemetry;
use talent_market::workflows::sourcing::{SourcerPerformanceService, SourcingSnapshot};
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let defaults = config.scoring.defaults();
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        defaults,
    };

    let snapshot = match config.environment {
        AppEnvironment::Production => SourcingSnapshot::default(),
        AppEnvironment::Development | AppEnvironment::Test => demo_snapshot(Utc::now()),
    };
    let seeded_jobs = snapshot.jobs.len();
    let (repository, match_scores) = in_memory_stores(snapshot);
    let performance_service = Arc::new(SourcerPerformanceService::new(
        Arc::new(repository),
        Arc::new(match_scores),
        defaults,
        config.scoring.match_score_cache,
    ));

    let app = with_sourcing_routes(performance_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        preset = defaults.preset.key(),
        window = defaults.window.key(),
        match_score_cache = ?config.scoring.match_score_cache,
        seeded_jobs,
        "sourcer performance service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
