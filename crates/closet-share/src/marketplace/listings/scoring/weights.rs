use super::ScoringScheme;

/// Per-scheme point allocation. Every category is capped at its `*_max`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SchemeWeights {
    pub photo_points_each: u8,
    pub photo_count_cap: u8,
    pub white_background: u8,
    pub good_lighting: u8,
    pub multiple_angles: u8,
    pub well_pressed: u8,
    pub photos_max: u8,

    pub description_chars_per_point: usize,
    pub description_length_cap: u8,
    pub size_info: u8,
    pub material_info: u8,
    pub care_info: u8,
    pub description_max: u8,

    /// new, like_new, excellent, good, fair (also used for unknown conditions)
    pub condition: [u8; 5],
    pub condition_max: u8,

    pub maintenance: MaintenanceWeights,
    pub maintenance_max: u8,

    pub thresholds: ImprovementThresholds,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MaintenanceWeights {
    Care {
        dry_cleaned: u8,
        pressed: u8,
        recently_cleaned: u8,
    },
    Safety {
        allergen_free: u8,
        storage_declared: u8,
    },
}

/// Category scores below these values produce an improvement suggestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ImprovementThresholds {
    pub photos: u8,
    pub description: u8,
    pub condition: u8,
    pub maintenance: u8,
}

impl SchemeWeights {
    pub(crate) fn for_scheme(scheme: ScoringScheme) -> Self {
        match scheme {
            ScoringScheme::Balanced => Self {
                photo_points_each: 2,
                photo_count_cap: 10,
                white_background: 4,
                good_lighting: 4,
                multiple_angles: 4,
                well_pressed: 3,
                photos_max: 25,
                description_chars_per_point: 20,
                description_length_cap: 10,
                size_info: 5,
                material_info: 5,
                care_info: 5,
                description_max: 25,
                condition: [25, 22, 18, 14, 8],
                condition_max: 25,
                maintenance: MaintenanceWeights::Care {
                    dry_cleaned: 9,
                    pressed: 8,
                    recently_cleaned: 8,
                },
                maintenance_max: 25,
                thresholds: ImprovementThresholds {
                    photos: 20,
                    description: 20,
                    condition: 15,
                    maintenance: 15,
                },
            },
            ScoringScheme::Weighted => Self {
                photo_points_each: 2,
                photo_count_cap: 20,
                white_background: 5,
                good_lighting: 5,
                multiple_angles: 5,
                well_pressed: 5,
                photos_max: 40,
                description_chars_per_point: 20,
                description_length_cap: 15,
                size_info: 5,
                material_info: 5,
                care_info: 5,
                description_max: 30,
                condition: [20, 18, 15, 12, 8],
                condition_max: 20,
                maintenance: MaintenanceWeights::Safety {
                    allergen_free: 5,
                    storage_declared: 5,
                },
                maintenance_max: 10,
                thresholds: ImprovementThresholds {
                    photos: 30,
                    description: 20,
                    condition: 12,
                    maintenance: 5,
                },
            },
        }
    }

    pub(crate) fn total_max(&self) -> u16 {
        u16::from(self.photos_max)
            + u16::from(self.description_max)
            + u16::from(self.condition_max)
            + u16::from(self.maintenance_max)
    }
}
