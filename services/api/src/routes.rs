use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use closet_share::marketplace::listings::{
    listing_router, ListingNotifier, ListingRepository, ListingReviewService,
};
use closet_share::marketplace::messaging::{redact_pii, RedactedMessage};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Deserialize)]
pub(crate) struct RedactRequest {
    pub(crate) text: String,
}

pub(crate) fn with_listing_routes<R, N>(service: Arc<ListingReviewService<R, N>>) -> axum::Router
where
    R: ListingRepository + 'static,
    N: ListingNotifier + 'static,
{
    listing_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/messages/redact",
            axum::routing::post(redact_endpoint),
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

pub(crate) async fn redact_endpoint(Json(payload): Json<RedactRequest>) -> Json<RedactedMessage> {
    let redacted = redact_pii(&payload.text);
    if redacted.was_redacted() {
        info!(
            redactions = redacted.redactions.len(),
            "contact details removed from message"
        );
    }
    Json(redacted)
}
