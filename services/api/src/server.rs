use crate::cli::ServeArgs;
use crate::infra::{build_report_service, AppState};
use crate::routes::with_report_routes;
use aquasentra::auth::TokenAuthority;
use aquasentra::config::AppConfig;
use aquasentra::error::AppError;
use aquasentra::telemetry;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::{AtomicBool, Ordering};
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
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let (report_service, _) = build_report_service();
    let authority = Arc::new(TokenAuthority::from_config(&config.auth));

    let app = with_report_routes(report_service, authority)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "hazard reporting api ready");

    axum::serve(listener, app).await?;
    Ok(())
}
