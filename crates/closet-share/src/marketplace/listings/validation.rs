use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::domain::{ListingDetails, Photo, Pricing};

/// Detail fields that must be filled in before a listing can pass review.
pub const REQUIRED_DETAIL_FIELDS: [&str; 6] =
    ["title", "category", "brand", "size", "color", "condition"];

const DEFAULT_MIN_PHOTOS: usize = 4;
const DEFAULT_MIN_DESCRIPTION_CHARS: usize = 100;
const DEFAULT_MAX_DAILY_RATE_RATIO_BPS: u32 = 1_500;
const DEFAULT_MIN_PHOTO_DIMENSION: u32 = 800;
const DEFAULT_MAX_PHOTO_BYTES: u64 = 10 * 1024 * 1024;

/// Fixed constraints backing the automated review battery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewRules {
    pub min_photos: usize,
    pub min_description_chars: usize,
    /// Highest daily rate allowed, in basis points of the original retail price.
    pub max_daily_rate_ratio_bps: u32,
    pub min_photo_dimension: u32,
    pub max_photo_bytes: u64,
}

impl Default for ReviewRules {
    fn default() -> Self {
        Self {
            min_photos: DEFAULT_MIN_PHOTOS,
            min_description_chars: DEFAULT_MIN_DESCRIPTION_CHARS,
            max_daily_rate_ratio_bps: DEFAULT_MAX_DAILY_RATE_RATIO_BPS,
            min_photo_dimension: DEFAULT_MIN_PHOTO_DIMENSION,
            max_photo_bytes: DEFAULT_MAX_PHOTO_BYTES,
        }
    }
}

/// Exact decimal form of a currency amount as written; `None` for negative,
/// non-finite, or out-of-range input.
pub fn to_amount(value: f64) -> Option<Decimal> {
    if value.is_sign_negative() {
        return None;
    }
    // f64 Display is the shortest string that round-trips, so 15.004 stays 15.004
    value.to_string().parse::<Decimal>().ok()
}

/// Evaluated pricing bound: `Ok(())` when the daily rate sits within the cap.
pub fn check_daily_rate(
    pricing: &Pricing,
    details: &ListingDetails,
    rules: &ReviewRules,
) -> Result<(), PricingIssue> {
    let original = details
        .original_price
        .and_then(to_amount)
        .filter(|amount| !amount.is_zero())
        .ok_or(PricingIssue::MissingOriginalPrice)?;
    let daily = pricing
        .daily_rate
        .and_then(to_amount)
        .ok_or(PricingIssue::MissingDailyRate)?;

    let ratio = Decimal::new(i64::from(rules.max_daily_rate_ratio_bps), 4);
    let max = original.checked_mul(ratio).unwrap_or(Decimal::MAX);
    if daily <= max {
        Ok(())
    } else {
        Err(PricingIssue::DailyRateTooHigh { daily, max })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PricingIssue {
    MissingOriginalPrice,
    MissingDailyRate,
    DailyRateTooHigh { daily: Decimal, max: Decimal },
}

pub(crate) fn filled(value: &Option<String>) -> bool {
    value
        .as_deref()
        .map(|text| !text.trim().is_empty())
        .unwrap_or(false)
}

/// Character count of the trimmed description, zero when absent.
pub fn description_length(details: &ListingDetails) -> usize {
    details
        .description
        .as_deref()
        .map(|text| text.trim().chars().count())
        .unwrap_or(0)
}

/// Required detail fields that are missing or blank, in declaration order.
pub fn missing_required_fields(details: &ListingDetails) -> Vec<&'static str> {
    REQUIRED_DETAIL_FIELDS
        .iter()
        .copied()
        .filter(|field| {
            let present = match *field {
                "title" => filled(&details.title),
                "category" => filled(&details.category),
                "brand" => filled(&details.brand),
                "size" => filled(&details.size),
                "color" => filled(&details.color),
                "condition" => details.condition.is_some(),
                _ => true,
            };
            !present
        })
        .collect()
}

/// Photos whose known dimensions fall below the minimum edge length.
pub fn undersized_photos<'a>(photos: &'a [Photo], rules: &ReviewRules) -> Vec<&'a Photo> {
    photos
        .iter()
        .filter(|photo| match (photo.width, photo.height) {
            (Some(width), Some(height)) => {
                width < rules.min_photo_dimension || height < rules.min_photo_dimension
            }
            (Some(edge), None) | (None, Some(edge)) => edge < rules.min_photo_dimension,
            (None, None) => false,
        })
        .collect()
}

/// Photos whose known file size is empty or above the upload limit.
pub fn oversized_photos<'a>(photos: &'a [Photo], rules: &ReviewRules) -> Vec<&'a Photo> {
    photos
        .iter()
        .filter(|photo| {
            photo
                .file_size_bytes
                .map(|bytes| bytes == 0 || bytes > rules.max_photo_bytes)
                .unwrap_or(false)
        })
        .collect()
}
