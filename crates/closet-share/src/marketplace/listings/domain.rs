use chrono::{DateTime, Utc};
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};

use super::checks::AutomatedChecks;
use super::scoring::QualityReport;

/// Identifier wrapper for marketplace listings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ListingId(pub String);

/// Identifier of the lender who owns a listing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OwnerId(pub String);

/// Garment condition as declared by the lender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    New,
    LikeNew,
    Excellent,
    Good,
    Fair,
    #[serde(other)]
    Unrecognized,
}

/// Descriptive fields a lender fills in on the listing form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListingDetails {
    #[serde(deserialize_with = "lenient")]
    pub title: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub description: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub category: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub brand: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub size: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub color: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub condition: Option<Condition>,
    #[serde(deserialize_with = "lenient")]
    pub original_price: Option<f64>,
    #[serde(deserialize_with = "lenient")]
    pub care_instructions: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub measurements: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhotoKind {
    Front,
    Back,
    Detail,
    #[default]
    #[serde(other)]
    Other,
}

/// Uploaded photo reference. Dimension and size metadata come from the image host when known.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Photo {
    #[serde(default, deserialize_with = "lenient")]
    pub url: String,
    #[serde(rename = "type", default, deserialize_with = "lenient")]
    pub kind: PhotoKind,
    #[serde(default, deserialize_with = "lenient")]
    pub width: Option<u32>,
    #[serde(default, deserialize_with = "lenient")]
    pub height: Option<u32>,
    #[serde(default, deserialize_with = "lenient")]
    pub file_size_bytes: Option<u64>,
}

/// Presentation qualities the lender asserts about the photo set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PhotoPresentation {
    #[serde(deserialize_with = "lenient")]
    pub white_background: bool,
    #[serde(deserialize_with = "lenient")]
    pub good_lighting: bool,
    #[serde(deserialize_with = "lenient")]
    pub multiple_angles: bool,
    #[serde(deserialize_with = "lenient")]
    pub well_pressed: bool,
}

/// Rental pricing in the marketplace currency.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Pricing {
    #[serde(deserialize_with = "lenient")]
    pub daily_rate: Option<f64>,
    #[serde(deserialize_with = "lenient")]
    pub weekly_rate: Option<f64>,
    #[serde(deserialize_with = "lenient")]
    pub event_rate: Option<f64>,
    #[serde(deserialize_with = "lenient")]
    pub security_deposit: Option<f64>,
    #[serde(deserialize_with = "lenient")]
    pub cleaning_fee: Option<f64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MaintenanceInfo {
    #[serde(deserialize_with = "lenient")]
    pub dry_cleaned: bool,
    #[serde(deserialize_with = "lenient")]
    pub pressed: bool,
    #[serde(deserialize_with = "lenient")]
    pub recently_cleaned: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SafetyInfo {
    #[serde(deserialize_with = "lenient")]
    pub allergen_free: bool,
    #[serde(deserialize_with = "lenient")]
    pub storage_method: Option<String>,
}

/// Owner-editable listing content. Every section defaults when absent, null, or
/// malformed so scoring and checks can run against partial snapshots.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListingContent {
    #[serde(deserialize_with = "lenient")]
    pub details: ListingDetails,
    #[serde(deserialize_with = "lenient_items")]
    pub photos: Vec<Photo>,
    #[serde(deserialize_with = "lenient")]
    pub presentation: PhotoPresentation,
    #[serde(deserialize_with = "lenient")]
    pub pricing: Pricing,
    #[serde(deserialize_with = "lenient")]
    pub maintenance: MaintenanceInfo,
    #[serde(deserialize_with = "lenient")]
    pub safety_info: SafetyInfo,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Lenient<T> {
    Parsed(T),
    Malformed(IgnoredAny),
}

impl<T> Lenient<T> {
    fn into_option(self) -> Option<T> {
        match self {
            Lenient::Parsed(value) => Some(value),
            Lenient::Malformed(_) => None,
        }
    }
}

/// Null or wrongly typed values fall back to the field default.
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Lenient::<T>::deserialize(deserializer)?
        .into_option()
        .unwrap_or_default())
}

/// Like [`lenient`] for lists, dropping only the entries that fail to parse.
fn lenient_items<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    let items = Lenient::<Vec<Lenient<T>>>::deserialize(deserializer)?
        .into_option()
        .unwrap_or_default();
    Ok(items.into_iter().filter_map(Lenient::into_option).collect())
}

/// Moderation lifecycle of a listing. Only `Approved` listings are bookable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListingStatus {
    Draft,
    Submitted,
    InReview,
    NeedsChanges,
    Approved,
    Rejected,
}

impl ListingStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ListingStatus::Draft => "draft",
            ListingStatus::Submitted => "submitted",
            ListingStatus::InReview => "in_review",
            ListingStatus::NeedsChanges => "needs_changes",
            ListingStatus::Approved => "approved",
            ListingStatus::Rejected => "rejected",
        }
    }

    pub const fn is_terminal(self) -> bool {
        matches!(self, ListingStatus::Approved | ListingStatus::Rejected)
    }
}

/// The five items a moderator ticks before deciding on a listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ModerationChecklist {
    pub photos_meet_standards: bool,
    pub description_accurate: bool,
    pub pricing_reasonable: bool,
    pub condition_verified: bool,
    pub policy_compliant: bool,
}

impl ModerationChecklist {
    pub fn items(&self) -> [(&'static str, bool); 5] {
        [
            ("photosMeetStandards", self.photos_meet_standards),
            ("descriptionAccurate", self.description_accurate),
            ("pricingReasonable", self.pricing_reasonable),
            ("conditionVerified", self.condition_verified),
            ("policyCompliant", self.policy_compliant),
        ]
    }

    pub fn is_complete(&self) -> bool {
        self.items().iter().all(|(_, checked)| *checked)
    }

    pub fn unchecked(&self) -> Vec<&'static str> {
        self.items()
            .iter()
            .filter(|(_, checked)| !checked)
            .map(|(name, _)| *name)
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewDecision {
    Approved,
    Rejected,
    ChangesRequested,
}

/// Moderator-supplied payload for approve, reject, and request-changes actions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ModeratorDecisionInput {
    pub moderator_id: Option<String>,
    pub notes: String,
    pub checklist: ModerationChecklist,
}

/// Stored record of the latest human moderation decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModeratorReview {
    pub decision: ReviewDecision,
    pub moderator_id: Option<String>,
    pub notes: String,
    pub checklist: ModerationChecklist,
    pub reviewed_at: DateTime<Utc>,
}

/// Listing record as persisted by the repository.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub id: ListingId,
    pub owner_id: OwnerId,
    #[serde(flatten)]
    pub content: ListingContent,
    pub status: ListingStatus,
    #[serde(default)]
    pub automated_checks: Option<AutomatedChecks>,
    #[serde(default)]
    pub quality_score: Option<u8>,
    #[serde(default)]
    pub quality_report: Option<QualityReport>,
    #[serde(default)]
    pub moderator_review: Option<ModeratorReview>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub version: u64,
}

impl Listing {
    pub fn draft(
        id: ListingId,
        owner_id: OwnerId,
        content: ListingContent,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            owner_id,
            content,
            status: ListingStatus::Draft,
            automated_checks: None,
            quality_score: None,
            quality_report: None,
            moderator_review: None,
            created_at: now,
            updated_at: now,
            published_at: None,
            version: 0,
        }
    }

    pub fn is_bookable(&self) -> bool {
        self.status == ListingStatus::Approved
    }

    pub fn status_view(&self) -> ListingStatusView {
        ListingStatusView {
            listing_id: self.id.clone(),
            status: self.status.label(),
            bookable: self.is_bookable(),
            quality_score: self.quality_score,
            checks_passed: self
                .automated_checks
                .as_ref()
                .map(AutomatedChecks::all_passed),
            review_notes: self
                .moderator_review
                .as_ref()
                .map(|review| review.notes.clone()),
            version: self.version,
        }
    }
}

/// Compact listing view returned by the HTTP surface.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingStatusView {
    pub listing_id: ListingId,
    pub status: &'static str,
    pub bookable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality_score: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checks_passed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review_notes: Option<String>,
    pub version: u64,
}
