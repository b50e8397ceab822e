use closet_share::error::AppError;
use closet_share::marketplace::listings::{
    Listing, ListingContent, ListingId, ListingNotice, ListingNotifier, ListingRepository,
    ListingStatus, NotifyError, OwnerId, RepositoryError, ScoringScheme,
};
use closet_share::marketplace::notifications::NotificationPreferences;
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Process-local listing store with version checks on every write.
#[derive(Default, Clone)]
pub(crate) struct InMemoryListingRepository {
    records: Arc<Mutex<HashMap<ListingId, Listing>>>,
}

impl ListingRepository for InMemoryListingRepository {
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
        let found = match guard.get(&listing.id) {
            Some(current) => current.version,
            None => return Err(RepositoryError::NotFound),
        };
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
        matching.sort_by_key(|listing| listing.updated_at);
        matching.truncate(limit);
        Ok(matching)
    }
}

/// Records notices instead of delivering them; owners without stored preferences get defaults.
#[derive(Default, Clone)]
pub(crate) struct InMemoryNotifier {
    preferences: Arc<Mutex<HashMap<OwnerId, NotificationPreferences>>>,
    notices: Arc<Mutex<Vec<ListingNotice>>>,
}

impl InMemoryNotifier {
    pub(crate) fn notices(&self) -> Vec<ListingNotice> {
        self.notices.lock().expect("notifier mutex poisoned").clone()
    }

    pub(crate) fn set_preferences(&self, owner: OwnerId, preferences: NotificationPreferences) {
        self.preferences
            .lock()
            .expect("notifier mutex poisoned")
            .insert(owner, preferences);
    }
}

impl ListingNotifier for InMemoryNotifier {
    fn preferences(&self, owner: &OwnerId) -> Result<NotificationPreferences, NotifyError> {
        let guard = self.preferences.lock().expect("notifier mutex poisoned");
        Ok(guard.get(owner).copied().unwrap_or_default())
    }

    fn publish(&self, notice: ListingNotice) -> Result<(), NotifyError> {
        let mut guard = self.notices.lock().expect("notifier mutex poisoned");
        guard.push(notice);
        Ok(())
    }
}

pub(crate) fn parse_scheme(raw: &str) -> Result<ScoringScheme, String> {
    raw.parse::<ScoringScheme>().map_err(|err| err.to_string())
}

/// Load a listing document (the owner-editable content) from a JSON file.
pub(crate) fn read_listing_file(path: &Path) -> Result<ListingContent, AppError> {
    let raw = std::fs::read_to_string(path)?;
    let content = serde_json::from_str(&raw)?;
    Ok(content)
}
