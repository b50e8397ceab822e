use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryListingRepository, InMemoryNotifier};
use crate::routes::with_listing_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use closet_share::config::AppConfig;
use closet_share::error::AppError;
use closet_share::marketplace::listings::ListingReviewService;
use closet_share::telemetry;
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

    telemetry::init(&config.telemetry, config.environment)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let settings = config.moderation.review_settings();
    let review_service = Arc::new(ListingReviewService::new(
        Arc::new(InMemoryListingRepository::default()),
        Arc::new(InMemoryNotifier::default()),
        settings,
    ));

    let app = with_listing_routes(review_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        scheme = %config.moderation.scheme,
        enforce_checklist = config.moderation.enforce_moderator_checklist,
        "listing review service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
