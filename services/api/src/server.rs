use crate::cli::ServeArgs;
use crate::infra::{build_service, AppState};
use crate::routes::with_orientation_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use rim_orientation::config::AppConfig;
use rim_orientation::error::AppError;
use rim_orientation::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
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
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let orientation_service = Arc::new(build_service(&config.catalog)?);
    info!(
        programs = orientation_service.programs().len(),
        match_count = orientation_service.match_count(),
        results = ?config.catalog.results_csv,
        "orientation catalogs loaded"
    );

    let app = with_orientation_routes(orientation_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "orientation service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
