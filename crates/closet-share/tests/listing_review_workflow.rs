//! End-to-end listing moderation through the public service facade and HTTP router.
//!
//! Listings are posted as JSON the way the lender app sends them, so these scenarios
//! also pin the wire shape of the listing document.

mod common {
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use closet_share::marketplace::listings::{
        Listing, ListingId, ListingNotice, ListingNotifier, ListingRepository,
        ListingReviewService, ListingStatus, NotifyError, OwnerId, RepositoryError,
        ReviewSettings,
    };
    use closet_share::marketplace::notifications::NotificationPreferences;
    use serde_json::{json, Value};

    pub(super) fn listing_json(photo_count: usize, description: &str, daily_rate: f64) -> Value {
        let photos: Vec<Value> = (0..photo_count)
            .map(|index| {
                let kind = ["front", "back", "detail", "other"][index.min(3)];
                json!({
                    "url": format!("https://img.closet.example/{index}.jpg"),
                    "type": kind,
                    "width": 1080,
                    "height": 1350
                })
            })
            .collect();

        json!({
            "ownerId": "owner-ada",
            "details": {
                "title": "Black velvet blazer",
                "description": description,
                "category": "outerwear",
                "brand": "Ganni",
                "size": "S",
                "color": "black",
                "condition": "excellent",
                "originalPrice": 240.0,
                "careInstructions": "Dry clean"
            },
            "photos": photos,
            "presentation": { "whiteBackground": true, "goodLighting": true },
            "pricing": { "dailyRate": daily_rate, "securityDeposit": 80.0 },
            "maintenance": { "dryCleaned": true },
            "safetyInfo": { "allergenFree": true }
        })
    }

    pub(super) const LONG_DESCRIPTION: &str = concat!(
        "Single-breasted velvet blazer with satin lapels and a nipped waist. ",
        "Worn twice to evening events, no pulls or shine on the pile."
    );

    #[derive(Default)]
    pub(super) struct MemoryRepository {
        records: Mutex<HashMap<ListingId, Listing>>,
    }

    impl ListingRepository for MemoryRepository {
        fn insert(&self, listing: Listing) -> Result<Listing, RepositoryError> {
            let mut guard = self.records.lock().expect("repository mutex poisoned");
            if guard.contains_key(&listing.id) {
                return Err(RepositoryError::Conflict);
            }
            guard.insert(listing.id.clone(), listing.clone());
            Ok(listing)
        }

        fn update(
            &self,
            mut listing: Listing,
            expected_version: u64,
        ) -> Result<Listing, RepositoryError> {
            let mut guard = self.records.lock().expect("repository mutex poisoned");
            let found = guard
                .get(&listing.id)
                .map(|current| current.version)
                .ok_or(RepositoryError::NotFound)?;
            if found != expected_version {
                return Err(RepositoryError::StaleVersion {
                    expected: expected_version,
                    found,
                });
            }
            listing.version = found + 1;
            guard.insert(listing.id.clone(), listing.clone());
            Ok(listing)
        }

        fn fetch(&self, id: &ListingId) -> Result<Option<Listing>, RepositoryError> {
            Ok(self
                .records
                .lock()
                .expect("repository mutex poisoned")
                .get(id)
                .cloned())
        }

        fn by_status(
            &self,
            status: ListingStatus,
            limit: usize,
        ) -> Result<Vec<Listing>, RepositoryError> {
            Ok(self
                .records
                .lock()
                .expect("repository mutex poisoned")
                .values()
                .filter(|listing| listing.status == status)
                .take(limit)
                .cloned()
                .collect())
        }
    }

    #[derive(Default)]
    pub(super) struct RecordingNotifier {
        notices: Mutex<Vec<ListingNotice>>,
    }

    impl RecordingNotifier {
        pub(super) fn templates(&self) -> Vec<String> {
            self.notices
                .lock()
                .expect("notifier mutex poisoned")
                .iter()
                .map(|notice| notice.template.clone())
                .collect()
        }
    }

    impl ListingNotifier for RecordingNotifier {
        fn preferences(&self, _owner: &OwnerId) -> Result<NotificationPreferences, NotifyError> {
            Ok(NotificationPreferences::default())
        }

        fn publish(&self, notice: ListingNotice) -> Result<(), NotifyError> {
            self.notices
                .lock()
                .expect("notifier mutex poisoned")
                .push(notice);
            Ok(())
        }
    }

    pub(super) fn build(
        settings: ReviewSettings,
    ) -> (
        Arc<ListingReviewService<MemoryRepository, RecordingNotifier>>,
        Arc<RecordingNotifier>,
    ) {
        let notifier = Arc::new(RecordingNotifier::default());
        let service = Arc::new(ListingReviewService::new(
            Arc::new(MemoryRepository::default()),
            notifier.clone(),
            settings,
        ));
        (service, notifier)
    }
}

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use closet_share::marketplace::listings::{
    listing_router, ListingId, ListingStatus, ReviewPolicy, ReviewSettings, ScoringScheme,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use common::*;

fn request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(&body).expect("serialize")))
        .expect("request")
}

async fn json_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("json payload")
}

fn complete_checklist() -> Value {
    json!({
        "photosMeetStandards": true,
        "descriptionAccurate": true,
        "pricingReasonable": true,
        "conditionVerified": true,
        "policyCompliant": true
    })
}

#[tokio::test]
async fn lender_fixes_listing_after_change_request_and_gets_published() {
    let (service, notifier) = build(ReviewSettings::default());
    let router = listing_router(service.clone());

    // 3 photos, short copy, and a daily rate above 15% of 240
    let response = router
        .clone()
        .oneshot(request(
            "POST",
            "/api/v1/listings",
            listing_json(3, "Velvet blazer", 40.0),
        ))
        .await
        .expect("create");
    assert_eq!(response.status(), StatusCode::CREATED);
    let id = json_body(response).await["id"]
        .as_str()
        .expect("listing id")
        .to_string();

    let response = router
        .clone()
        .oneshot(request("POST", &format!("/api/v1/listings/{id}/submit"), json!({})))
        .await
        .expect("submit");
    let outcome = json_body(response).await;
    assert_eq!(outcome["status"], "needs_changes");
    assert_eq!(outcome["checks"]["photoCount"]["passed"], false);
    assert_eq!(outcome["checks"]["descriptionQuality"]["passed"], false);
    assert_eq!(outcome["checks"]["pricingValidation"]["passed"], false);

    let mut fixed = listing_json(4, LONG_DESCRIPTION, 36.0);
    fixed
        .as_object_mut()
        .expect("object payload")
        .remove("ownerId");
    let response = router
        .clone()
        .oneshot(request("PUT", &format!("/api/v1/listings/{id}"), fixed))
        .await
        .expect("update");
    assert_eq!(response.status(), StatusCode::OK);

    let response = router
        .clone()
        .oneshot(request("POST", &format!("/api/v1/listings/{id}/submit"), json!({})))
        .await
        .expect("resubmit");
    let outcome = json_body(response).await;
    assert_eq!(outcome["status"], "in_review");

    let response = router
        .clone()
        .oneshot(request(
            "POST",
            &format!("/api/v1/listings/{id}/approve"),
            json!({
                "moderatorId": "mod-3",
                "notes": "Approved",
                "checklist": complete_checklist()
            }),
        ))
        .await
        .expect("approve");
    assert_eq!(response.status(), StatusCode::OK);

    let listing = service.get(&ListingId(id)).expect("listing stored");
    assert_eq!(listing.status, ListingStatus::Approved);
    assert!(listing.is_bookable());
    assert!(listing.published_at.is_some());
    assert_eq!(
        notifier.templates(),
        vec![
            "listing_needs_changes",
            "listing_in_review",
            "listing_approved"
        ]
    );
}

#[tokio::test]
async fn hardened_policy_blocks_unreviewed_approvals_and_terminal_resubmits() {
    let (service, _) = build(ReviewSettings {
        scheme: ScoringScheme::Weighted,
        policy: ReviewPolicy {
            allow_terminal_resubmission: false,
            enforce_moderator_checklist: true,
        },
        ..ReviewSettings::default()
    });
    let router = listing_router(service.clone());

    let response = router
        .clone()
        .oneshot(request(
            "POST",
            "/api/v1/listings",
            listing_json(4, LONG_DESCRIPTION, 20.0),
        ))
        .await
        .expect("create");
    let id = json_body(response).await["id"]
        .as_str()
        .expect("listing id")
        .to_string();

    let response = router
        .clone()
        .oneshot(request(
            "POST",
            &format!("/api/v1/listings/{id}/approve"),
            json!({ "notes": "ok", "checklist": { "photosMeetStandards": true } }),
        ))
        .await
        .expect("approve");
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let response = router
        .clone()
        .oneshot(request(
            "POST",
            &format!("/api/v1/listings/{id}/reject"),
            json!({ "notes": "Replica", "checklist": complete_checklist() }),
        ))
        .await
        .expect("reject");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["status"], "rejected");

    let response = router
        .oneshot(request("POST", &format!("/api/v1/listings/{id}/submit"), json!({})))
        .await
        .expect("resubmit");
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let listing = service.get(&ListingId(id)).expect("listing stored");
    assert_eq!(listing.status, ListingStatus::Rejected);
    assert!(listing.quality_score.is_none());
}
