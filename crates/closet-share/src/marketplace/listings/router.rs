use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{Listing, ListingContent, ListingId, ModeratorDecisionInput, OwnerId};
use super::repository::{ListingNotifier, ListingRepository, RepositoryError};
use super::scoring::ScoringScheme;
use super::service::{ListingReviewService, ReviewServiceError};
use super::workflow::TransitionError;

const DEFAULT_QUEUE_LIMIT: usize = 50;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreateListingRequest {
    pub(crate) owner_id: String,
    #[serde(flatten)]
    pub(crate) content: ListingContent,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct QueueQuery {
    pub(crate) limit: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct QualityQuery {
    pub(crate) scheme: Option<ScoringScheme>,
}

/// Router builder exposing listing drafting, submission, and moderation endpoints.
pub fn listing_router<R, N>(service: Arc<ListingReviewService<R, N>>) -> Router
where
    R: ListingRepository + 'static,
    N: ListingNotifier + 'static,
{
    Router::new()
        .route("/api/v1/listings", post(create_handler::<R, N>))
        .route("/api/v1/listings/quality", post(quality_handler::<R, N>))
        .route(
            "/api/v1/listings/:listing_id",
            get(fetch_handler::<R, N>).put(update_handler::<R, N>),
        )
        .route(
            "/api/v1/listings/:listing_id/submit",
            post(submit_handler::<R, N>),
        )
        .route(
            "/api/v1/listings/:listing_id/approve",
            post(approve_handler::<R, N>),
        )
        .route(
            "/api/v1/listings/:listing_id/reject",
            post(reject_handler::<R, N>),
        )
        .route(
            "/api/v1/listings/:listing_id/request-changes",
            post(request_changes_handler::<R, N>),
        )
        .route("/api/v1/moderation/queue", get(queue_handler::<R, N>))
        .with_state(service)
}

pub(crate) fn error_response(error: ReviewServiceError) -> Response {
    let status = match &error {
        ReviewServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        ReviewServiceError::Repository(RepositoryError::Conflict)
        | ReviewServiceError::Repository(RepositoryError::StaleVersion { .. })
        | ReviewServiceError::Transition(TransitionError::TerminalStatus(_))
        | ReviewServiceError::NotEditable(_) => StatusCode::CONFLICT,
        ReviewServiceError::Transition(_) => StatusCode::UNPROCESSABLE_ENTITY,
        ReviewServiceError::Repository(RepositoryError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    let payload = json!({ "error": error.to_string() });
    (status, axum::Json(payload)).into_response()
}

fn listing_response(status: StatusCode, listing: Listing) -> Response {
    (status, axum::Json(listing)).into_response()
}

pub(crate) async fn create_handler<R, N>(
    State(service): State<Arc<ListingReviewService<R, N>>>,
    axum::Json(request): axum::Json<CreateListingRequest>,
) -> Response
where
    R: ListingRepository + 'static,
    N: ListingNotifier + 'static,
{
    if request.owner_id.trim().is_empty() {
        let payload = json!({ "error": "ownerId is required" });
        return (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response();
    }

    match service.create_draft(OwnerId(request.owner_id), request.content) {
        Ok(listing) => listing_response(StatusCode::CREATED, listing),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn fetch_handler<R, N>(
    State(service): State<Arc<ListingReviewService<R, N>>>,
    Path(listing_id): Path<String>,
) -> Response
where
    R: ListingRepository + 'static,
    N: ListingNotifier + 'static,
{
    match service.get(&ListingId(listing_id)) {
        Ok(listing) => listing_response(StatusCode::OK, listing),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn update_handler<R, N>(
    State(service): State<Arc<ListingReviewService<R, N>>>,
    Path(listing_id): Path<String>,
    axum::Json(content): axum::Json<ListingContent>,
) -> Response
where
    R: ListingRepository + 'static,
    N: ListingNotifier + 'static,
{
    match service.update_content(&ListingId(listing_id), content) {
        Ok(listing) => listing_response(StatusCode::OK, listing),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn submit_handler<R, N>(
    State(service): State<Arc<ListingReviewService<R, N>>>,
    Path(listing_id): Path<String>,
) -> Response
where
    R: ListingRepository + 'static,
    N: ListingNotifier + 'static,
{
    match service.submit_for_review(&ListingId(listing_id)) {
        Ok(outcome) => (StatusCode::OK, axum::Json(outcome)).into_response(),
        Err(error) => error_response(error),
    }
}

fn decision_response(result: Result<Listing, ReviewServiceError>) -> Response {
    match result {
        Ok(listing) => (StatusCode::OK, axum::Json(listing.status_view())).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn approve_handler<R, N>(
    State(service): State<Arc<ListingReviewService<R, N>>>,
    Path(listing_id): Path<String>,
    axum::Json(input): axum::Json<ModeratorDecisionInput>,
) -> Response
where
    R: ListingRepository + 'static,
    N: ListingNotifier + 'static,
{
    decision_response(service.approve_listing(&ListingId(listing_id), input))
}

pub(crate) async fn reject_handler<R, N>(
    State(service): State<Arc<ListingReviewService<R, N>>>,
    Path(listing_id): Path<String>,
    axum::Json(input): axum::Json<ModeratorDecisionInput>,
) -> Response
where
    R: ListingRepository + 'static,
    N: ListingNotifier + 'static,
{
    decision_response(service.reject_listing(&ListingId(listing_id), input))
}

pub(crate) async fn request_changes_handler<R, N>(
    State(service): State<Arc<ListingReviewService<R, N>>>,
    Path(listing_id): Path<String>,
    axum::Json(input): axum::Json<ModeratorDecisionInput>,
) -> Response
where
    R: ListingRepository + 'static,
    N: ListingNotifier + 'static,
{
    decision_response(service.request_changes(&ListingId(listing_id), input))
}

pub(crate) async fn queue_handler<R, N>(
    State(service): State<Arc<ListingReviewService<R, N>>>,
    Query(query): Query<QueueQuery>,
) -> Response
where
    R: ListingRepository + 'static,
    N: ListingNotifier + 'static,
{
    let limit = query.limit.unwrap_or(DEFAULT_QUEUE_LIMIT);
    match service.moderation_queue(limit) {
        Ok(listings) => {
            let views: Vec<_> = listings.iter().map(Listing::status_view).collect();
            (StatusCode::OK, axum::Json(views)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn quality_handler<R, N>(
    State(service): State<Arc<ListingReviewService<R, N>>>,
    Query(query): Query<QualityQuery>,
    axum::Json(content): axum::Json<ListingContent>,
) -> Response
where
    R: ListingRepository + 'static,
    N: ListingNotifier + 'static,
{
    let report = service.preview_quality(&content, query.scheme);
    (StatusCode::OK, axum::Json(report)).into_response()
}
