use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::domain::{Listing, ListingId, ListingStatus, OwnerId};
use crate::marketplace::notifications::{
    NoticeCategory, NotificationChannel, NotificationPreferences,
};

/// Document-store abstraction so the review service can be exercised in isolation.
///
/// `update` is a compare-and-set on `Listing::version`: it fails with
/// `StaleVersion` when the stored version differs from `expected_version`, and on
/// success stores the record with the version bumped by one.
pub trait ListingRepository: Send + Sync {
    fn insert(&self, listing: Listing) -> Result<Listing, RepositoryError>;
    fn update(&self, listing: Listing, expected_version: u64) -> Result<Listing, RepositoryError>;
    fn fetch(&self, id: &ListingId) -> Result<Option<Listing>, RepositoryError>;
    fn by_status(
        &self,
        status: ListingStatus,
        limit: usize,
    ) -> Result<Vec<Listing>, RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record was modified concurrently (expected version {expected}, found {found})")]
    StaleVersion { expected: u64, found: u64 },
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Outbound hook towards the push/e-mail/SMS providers.
pub trait ListingNotifier: Send + Sync {
    fn preferences(&self, owner: &OwnerId) -> Result<NotificationPreferences, NotifyError>;
    fn publish(&self, notice: ListingNotice) -> Result<(), NotifyError>;
}

/// Owner-facing notice emitted after a moderation transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingNotice {
    pub template: String,
    pub listing_id: ListingId,
    pub owner_id: OwnerId,
    pub category: NoticeCategory,
    pub channels: Vec<NotificationChannel>,
    pub details: BTreeMap<String, String>,
}

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("notification transport unavailable: {0}")]
    Transport(String),
}
