use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::http::StatusCode;
use axum::response::Response;
use serde_json::Value;

use crate::marketplace::listings::domain::{
    Condition, Listing, ListingContent, ListingDetails, ListingId, ListingStatus,
    MaintenanceInfo, ModerationChecklist, ModeratorDecisionInput, OwnerId, Photo, PhotoKind,
    PhotoPresentation, Pricing, SafetyInfo,
};
use crate::marketplace::listings::repository::{
    ListingNotice, ListingNotifier, ListingRepository, NotifyError, RepositoryError,
};
use crate::marketplace::listings::{
    listing_router, ListingReviewService, ReviewPolicy, ReviewSettings,
};
use crate::marketplace::notifications::NotificationPreferences;

pub(super) const COMPLETE_DESCRIPTION: &str = concat!(
    "Emerald silk slip dress with adjustable straps and a bias cut that skims the body. ",
    "Fully lined, hits just below the knee, and packs without creasing for travel."
);

pub(super) fn photo(kind: PhotoKind) -> Photo {
    Photo {
        url: format!("https://img.closet.example/{kind:?}.jpg").to_lowercase(),
        kind,
        width: Some(1200),
        height: Some(1600),
        file_size_bytes: Some(2 * 1024 * 1024),
    }
}

pub(super) fn photos(count: usize) -> Vec<Photo> {
    const KINDS: [PhotoKind; 4] = [
        PhotoKind::Front,
        PhotoKind::Back,
        PhotoKind::Detail,
        PhotoKind::Other,
    ];
    (0..count).map(|i| photo(KINDS[i.min(3)])).collect()
}

/// Five photos, a 160-character description with every required field, like-new
/// condition, and a daily rate of 10 against a retail price of 100.
pub(super) fn complete_content() -> ListingContent {
    ListingContent {
        details: ListingDetails {
            title: Some("Emerald silk slip dress".to_string()),
            description: Some(COMPLETE_DESCRIPTION.to_string()),
            category: Some("dresses".to_string()),
            brand: Some("Reformation".to_string()),
            size: Some("M".to_string()),
            color: Some("green".to_string()),
            condition: Some(Condition::LikeNew),
            original_price: Some(100.0),
            care_instructions: Some("Dry clean only".to_string()),
            measurements: None,
        },
        photos: photos(5),
        presentation: PhotoPresentation {
            white_background: true,
            good_lighting: true,
            multiple_angles: true,
            well_pressed: true,
        },
        pricing: Pricing {
            daily_rate: Some(10.0),
            weekly_rate: Some(45.0),
            security_deposit: Some(50.0),
            ..Pricing::default()
        },
        maintenance: MaintenanceInfo {
            dry_cleaned: true,
            pressed: true,
            recently_cleaned: true,
        },
        safety_info: SafetyInfo {
            allergen_free: true,
            storage_method: Some("Garment bag, cedar closet".to_string()),
        },
    }
}

/// Two photos, a 20-character description, fair condition, and a daily rate of
/// 50 against a retail price of 100.
pub(super) fn weak_content() -> ListingContent {
    ListingContent {
        details: ListingDetails {
            title: Some("Dress".to_string()),
            description: Some("Pretty dress for you".to_string()),
            condition: Some(Condition::Fair),
            original_price: Some(100.0),
            ..ListingDetails::default()
        },
        photos: photos(2),
        pricing: Pricing {
            daily_rate: Some(50.0),
            ..Pricing::default()
        },
        ..ListingContent::default()
    }
}

pub(super) fn full_checklist() -> ModerationChecklist {
    ModerationChecklist {
        photos_meet_standards: true,
        description_accurate: true,
        pricing_reasonable: true,
        condition_verified: true,
        policy_compliant: true,
    }
}

pub(super) fn decision(notes: &str, checklist: ModerationChecklist) -> ModeratorDecisionInput {
    ModeratorDecisionInput {
        moderator_id: Some("mod-7".to_string()),
        notes: notes.to_string(),
        checklist,
    }
}

pub(super) fn owner() -> OwnerId {
    OwnerId("owner-1".to_string())
}

pub(super) fn strict_policy() -> ReviewPolicy {
    ReviewPolicy {
        allow_terminal_resubmission: false,
        enforce_moderator_checklist: true,
    }
}

pub(super) type MemoryService = ListingReviewService<MemoryRepository, MemoryNotifier>;

pub(super) fn build_service_with(
    settings: ReviewSettings,
) -> (MemoryService, Arc<MemoryRepository>, Arc<MemoryNotifier>) {
    let repository = Arc::new(MemoryRepository::default());
    let notifier = Arc::new(MemoryNotifier::default());
    let service = ListingReviewService::new(repository.clone(), notifier.clone(), settings);
    (service, repository, notifier)
}

pub(super) fn build_service() -> (MemoryService, Arc<MemoryRepository>, Arc<MemoryNotifier>) {
    build_service_with(ReviewSettings::default())
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) records: Arc<Mutex<HashMap<ListingId, Listing>>>,
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
        let current = guard.get(&listing.id).ok_or(RepositoryError::NotFound)?;
        if current.version != expected_version {
            return Err(RepositoryError::StaleVersion {
                expected: expected_version,
                found: current.version,
            });
        }
        listing.version = expected_version + 1;
        guard.insert(listing.id.clone(), listing.clone());
        Ok(listing)
    }

    fn fetch(&self, id: &ListingId) -> Result<Option<Listing>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn by_status(
        &self,
        status: ListingStatus,
        limit: usize,
    ) -> Result<Vec<Listing>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        let mut matching: Vec<Listing> = guard
            .values()
            .filter(|listing| listing.status == status)
            .cloned()
            .collect();
        matching.sort_by(|a, b| {
            a.updated_at
                .cmp(&b.updated_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        matching.truncate(limit);
        Ok(matching)
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryNotifier {
    pub(super) preferences: Arc<Mutex<NotificationPreferences>>,
    notices: Arc<Mutex<Vec<ListingNotice>>>,
}

impl MemoryNotifier {
    pub(super) fn notices(&self) -> Vec<ListingNotice> {
        self.notices.lock().expect("notifier mutex poisoned").clone()
    }

    pub(super) fn set_preferences(&self, preferences: NotificationPreferences) {
        *self.preferences.lock().expect("notifier mutex poisoned") = preferences;
    }
}

impl ListingNotifier for MemoryNotifier {
    fn preferences(&self, _owner: &OwnerId) -> Result<NotificationPreferences, NotifyError> {
        Ok(*self.preferences.lock().expect("notifier mutex poisoned"))
    }

    fn publish(&self, notice: ListingNotice) -> Result<(), NotifyError> {
        self.notices
            .lock()
            .expect("notifier mutex poisoned")
            .push(notice);
        Ok(())
    }
}

pub(super) struct OfflineNotifier;

impl ListingNotifier for OfflineNotifier {
    fn preferences(&self, _owner: &OwnerId) -> Result<NotificationPreferences, NotifyError> {
        Ok(NotificationPreferences::default())
    }

    fn publish(&self, _notice: ListingNotice) -> Result<(), NotifyError> {
        Err(NotifyError::Transport("smtp relay down".to_string()))
    }
}

/// Serves a fixed listing but loses every write race.
pub(super) struct StaleRepository {
    pub(super) listing: Listing,
}

impl ListingRepository for StaleRepository {
    fn insert(&self, listing: Listing) -> Result<Listing, RepositoryError> {
        Ok(listing)
    }

    fn update(&self, _listing: Listing, expected_version: u64) -> Result<Listing, RepositoryError> {
        Err(RepositoryError::StaleVersion {
            expected: expected_version,
            found: expected_version + 1,
        })
    }

    fn fetch(&self, _id: &ListingId) -> Result<Option<Listing>, RepositoryError> {
        Ok(Some(self.listing.clone()))
    }

    fn by_status(
        &self,
        _status: ListingStatus,
        _limit: usize,
    ) -> Result<Vec<Listing>, RepositoryError> {
        Ok(Vec::new())
    }
}

pub(super) struct UnavailableRepository;

impl ListingRepository for UnavailableRepository {
    fn insert(&self, _listing: Listing) -> Result<Listing, RepositoryError> {
        Err(RepositoryError::Unavailable("document store offline".to_string()))
    }

    fn update(&self, _listing: Listing, _expected: u64) -> Result<Listing, RepositoryError> {
        Err(RepositoryError::Unavailable("document store offline".to_string()))
    }

    fn fetch(&self, _id: &ListingId) -> Result<Option<Listing>, RepositoryError> {
        Err(RepositoryError::Unavailable("document store offline".to_string()))
    }

    fn by_status(
        &self,
        _status: ListingStatus,
        _limit: usize,
    ) -> Result<Vec<Listing>, RepositoryError> {
        Err(RepositoryError::Unavailable("document store offline".to_string()))
    }
}

pub(super) fn router_with_service(service: MemoryService) -> axum::Router {
    listing_router(Arc::new(service))
}

pub(super) fn assert_conflict_response(response: Response) {
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
