use super::super::domain::{Condition, ListingContent};
use super::super::validation::{description_length, filled};
use super::weights::{MaintenanceWeights, SchemeWeights};
use super::ScoreBreakdown;

const MATERIAL_KEYWORDS: [&str; 18] = [
    "material", "fabric", "cotton", "silk", "wool", "linen", "polyester", "cashmere", "denim",
    "leather", "satin", "velvet", "viscose", "rayon", "nylon", "chiffon", "lace", "tulle",
];

pub(crate) fn score_content(content: &ListingContent, weights: &SchemeWeights) -> ScoreBreakdown {
    ScoreBreakdown {
        photos: score_photos(content, weights),
        description: score_description(content, weights),
        condition: score_condition(content.details.condition, weights),
        maintenance: score_maintenance(content, weights),
    }
}

fn bonus(flag: bool, points: u8) -> u8 {
    if flag {
        points
    } else {
        0
    }
}

fn score_photos(content: &ListingContent, weights: &SchemeWeights) -> u8 {
    let per_photo = content
        .photos
        .len()
        .saturating_mul(usize::from(weights.photo_points_each))
        .min(usize::from(weights.photo_count_cap)) as u8;

    let presentation = &content.presentation;
    let bonuses = bonus(presentation.white_background, weights.white_background)
        + bonus(presentation.good_lighting, weights.good_lighting)
        + bonus(presentation.multiple_angles, weights.multiple_angles)
        + bonus(presentation.well_pressed, weights.well_pressed);

    per_photo.saturating_add(bonuses).min(weights.photos_max)
}

pub(crate) fn mentions_material(description: &str) -> bool {
    let lowered = description.to_lowercase();
    MATERIAL_KEYWORDS
        .iter()
        .any(|keyword| lowered.contains(keyword))
}

fn score_description(content: &ListingContent, weights: &SchemeWeights) -> u8 {
    let details = &content.details;
    let length_points = (description_length(details) / weights.description_chars_per_point.max(1))
        .min(usize::from(weights.description_length_cap)) as u8;

    let size = filled(&details.size) || filled(&details.measurements);
    let material = details
        .description
        .as_deref()
        .map(mentions_material)
        .unwrap_or(false);
    let care = filled(&details.care_instructions);

    let bonuses = bonus(size, weights.size_info)
        + bonus(material, weights.material_info)
        + bonus(care, weights.care_info);

    length_points
        .saturating_add(bonuses)
        .min(weights.description_max)
}

fn score_condition(condition: Option<Condition>, weights: &SchemeWeights) -> u8 {
    let [new, like_new, excellent, good, fair] = weights.condition;
    let points = match condition {
        Some(Condition::New) => new,
        Some(Condition::LikeNew) => like_new,
        Some(Condition::Excellent) => excellent,
        Some(Condition::Good) => good,
        Some(Condition::Fair) | Some(Condition::Unrecognized) | None => fair,
    };
    points.min(weights.condition_max)
}

fn score_maintenance(content: &ListingContent, weights: &SchemeWeights) -> u8 {
    let points = match weights.maintenance {
        MaintenanceWeights::Care {
            dry_cleaned,
            pressed,
            recently_cleaned,
        } => {
            let maintenance = &content.maintenance;
            bonus(maintenance.dry_cleaned, dry_cleaned)
                + bonus(maintenance.pressed, pressed)
                + bonus(maintenance.recently_cleaned, recently_cleaned)
        }
        MaintenanceWeights::Safety {
            allergen_free,
            storage_declared,
        } => {
            let safety = &content.safety_info;
            bonus(safety.allergen_free, allergen_free)
                + bonus(filled(&safety.storage_method), storage_declared)
        }
    };
    points.min(weights.maintenance_max)
}

/// Suggestions for every category under its threshold, in category order.
pub(crate) fn improvements(
    breakdown: &ScoreBreakdown,
    content: &ListingContent,
    min_photos: usize,
    weights: &SchemeWeights,
) -> Vec<String> {
    let thresholds = weights.thresholds;
    let mut suggestions = Vec::new();

    if breakdown.photos < thresholds.photos {
        if content.photos.len() < min_photos {
            suggestions.push(format!(
                "Add at least {min_photos} photos showing the front, back and details"
            ));
        } else {
            suggestions.push(
                "Retake photos on a white background with good lighting and a pressed garment"
                    .to_string(),
            );
        }
    }

    if breakdown.description < thresholds.description {
        suggestions
            .push("Expand the description with size, material and care details".to_string());
    }

    if breakdown.condition < thresholds.condition {
        suggestions.push("Describe any visible wear so renters know what to expect".to_string());
    }

    if breakdown.maintenance < thresholds.maintenance {
        let hint = match weights.maintenance {
            MaintenanceWeights::Care { .. } => {
                "Dry-clean and press the item before it ships to renters"
            }
            MaintenanceWeights::Safety { .. } => {
                "Declare whether the item is allergen-free and how it is stored"
            }
        };
        suggestions.push(hint.to_string());
    }

    suggestions
}
