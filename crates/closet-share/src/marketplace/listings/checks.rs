use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use super::domain::{ListingContent, Photo};
use super::validation::{
    check_daily_rate, description_length, missing_required_fields, oversized_photos,
    undersized_photos, PricingIssue, ReviewRules,
};

/// Outcome of a single automated check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResult {
    pub passed: bool,
    pub message: String,
}

impl CheckResult {
    fn pass(message: impl Into<String>) -> Self {
        Self {
            passed: true,
            message: message.into(),
        }
    }

    fn fail(message: impl Into<String>) -> Self {
        Self {
            passed: false,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoQualityCheck {
    pub passed: bool,
    pub resolution: CheckResult,
    pub file_size: CheckResult,
    pub lighting: CheckResult,
    pub background: CheckResult,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DescriptionCheck {
    pub passed: bool,
    pub message: String,
    pub length: usize,
    pub missing_fields: Vec<String>,
}

/// Structured results of the submission-time rule battery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutomatedChecks {
    pub photo_count: CheckResult,
    pub photo_quality: PhotoQualityCheck,
    pub description_quality: DescriptionCheck,
    pub pricing_validation: CheckResult,
}

impl AutomatedChecks {
    pub fn all_passed(&self) -> bool {
        self.photo_count.passed
            && self.photo_quality.passed
            && self.description_quality.passed
            && self.pricing_validation.passed
    }

    /// Names of the failing checks, in battery order.
    pub fn failed_checks(&self) -> Vec<&'static str> {
        [
            ("photoCount", self.photo_count.passed),
            ("photoQuality", self.photo_quality.passed),
            ("descriptionQuality", self.description_quality.passed),
            ("pricingValidation", self.pricing_validation.passed),
        ]
        .into_iter()
        .filter(|(_, passed)| !passed)
        .map(|(name, _)| name)
        .collect()
    }
}

pub fn run_automated_checks(content: &ListingContent, rules: &ReviewRules) -> AutomatedChecks {
    AutomatedChecks {
        photo_count: check_photo_count(&content.photos, rules),
        photo_quality: check_photo_quality(&content.photos, rules),
        description_quality: check_description(content, rules),
        pricing_validation: check_pricing(content, rules),
    }
}

fn check_photo_count(photos: &[Photo], rules: &ReviewRules) -> CheckResult {
    if photos.len() >= rules.min_photos {
        CheckResult::pass(format!("{} photos provided", photos.len()))
    } else {
        CheckResult::fail(format!(
            "At least {} photos are required (front, back, detail and one more)",
            rules.min_photos
        ))
    }
}

fn check_photo_quality(photos: &[Photo], rules: &ReviewRules) -> PhotoQualityCheck {
    let undersized = undersized_photos(photos, rules);
    let resolution = if undersized.is_empty() {
        CheckResult::pass("All photos meet the minimum resolution")
    } else {
        CheckResult::fail(format!(
            "{} photo(s) below {}px on an edge",
            undersized.len(),
            rules.min_photo_dimension
        ))
    };

    let oversized = oversized_photos(photos, rules);
    let file_size = if oversized.is_empty() {
        CheckResult::pass("All photos are within the upload size limit")
    } else {
        CheckResult::fail(format!(
            "{} photo(s) are empty or larger than {} bytes",
            oversized.len(),
            rules.max_photo_bytes
        ))
    };

    let lighting = lighting_check_stub(photos);
    let background = background_check_stub(photos);

    PhotoQualityCheck {
        passed: resolution.passed && file_size.passed && lighting.passed && background.passed,
        resolution,
        file_size,
        lighting,
        background,
    }
}

/// Placeholder for image-content lighting analysis. Always passes until an analyzer exists.
fn lighting_check_stub(_photos: &[Photo]) -> CheckResult {
    CheckResult::pass("Lighting not analyzed")
}

/// Placeholder for image-content background analysis. Always passes until an analyzer exists.
fn background_check_stub(_photos: &[Photo]) -> CheckResult {
    CheckResult::pass("Background not analyzed")
}

fn check_description(content: &ListingContent, rules: &ReviewRules) -> DescriptionCheck {
    let length = description_length(&content.details);
    let missing_fields: Vec<String> = missing_required_fields(&content.details)
        .into_iter()
        .map(str::to_string)
        .collect();

    let long_enough = length >= rules.min_description_chars;
    let passed = long_enough && missing_fields.is_empty();

    let message = match (long_enough, missing_fields.is_empty()) {
        (true, true) => "Description is complete".to_string(),
        (false, true) => format!(
            "Description must be at least {} characters (found {length})",
            rules.min_description_chars
        ),
        (true, false) => format!("Missing required fields: {}", missing_fields.join(", ")),
        (false, false) => format!(
            "Description must be at least {} characters (found {length}); missing required fields: {}",
            rules.min_description_chars,
            missing_fields.join(", ")
        ),
    };

    DescriptionCheck {
        passed,
        message,
        length,
        missing_fields,
    }
}

fn check_pricing(content: &ListingContent, rules: &ReviewRules) -> CheckResult {
    match check_daily_rate(&content.pricing, &content.details, rules) {
        Ok(()) => CheckResult::pass("Daily rate is within the allowed share of retail price"),
        Err(PricingIssue::MissingOriginalPrice) => {
            CheckResult::fail("Original retail price is required to validate pricing")
        }
        Err(PricingIssue::MissingDailyRate) => CheckResult::fail("A daily rate is required"),
        Err(PricingIssue::DailyRateTooHigh { daily, max }) => CheckResult::fail(format!(
            "Daily rate {} exceeds the maximum of {} ({}% of retail price)",
            money(daily),
            money(max.round_dp_with_strategy(2, RoundingStrategy::ToZero)),
            rules.max_daily_rate_ratio_bps / 100
        )),
    }
}

/// Two decimal places, widened only when the amount carries sub-cent digits.
fn money(amount: Decimal) -> String {
    let amount = amount.normalize();
    if amount.scale() <= 2 {
        format!("{:.2}", amount)
    } else {
        amount.to_string()
    }
}
