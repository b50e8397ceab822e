//! Listing quality scoring.
//!
//! Two point allocations exist: `Balanced` splits 100 points evenly across
//! photos, description, condition, and care; `Weighted` leans on photos and
//! swaps care for safety declarations. Both are selectable at the call site.

mod rules;
mod weights;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::domain::ListingContent;
use super::validation::ReviewRules;
use weights::SchemeWeights;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringScheme {
    /// 25 / 25 / 25 / 25 across photos, description, condition, care.
    #[default]
    Balanced,
    /// 40 / 30 / 20 / 10 across photos, description, condition, safety.
    Weighted,
}

impl ScoringScheme {
    pub const fn label(self) -> &'static str {
        match self {
            ScoringScheme::Balanced => "balanced",
            ScoringScheme::Weighted => "weighted",
        }
    }
}

impl fmt::Display for ScoringScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown scoring scheme '{0}' (expected 'balanced' or 'weighted')")]
pub struct UnknownScoringScheme(pub String);

impl FromStr for ScoringScheme {
    type Err = UnknownScoringScheme;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "balanced" | "25/25/25/25" => Ok(Self::Balanced),
            "weighted" | "40/30/20/10" => Ok(Self::Weighted),
            other => Err(UnknownScoringScheme(other.to_string())),
        }
    }
}

/// Points earned per category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub photos: u8,
    pub description: u8,
    pub condition: u8,
    pub maintenance: u8,
}

impl ScoreBreakdown {
    pub fn total(&self) -> u16 {
        u16::from(self.photos)
            + u16::from(self.description)
            + u16::from(self.condition)
            + u16::from(self.maintenance)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityReport {
    pub total_score: u8,
    pub breakdown: ScoreBreakdown,
    pub improvements: Vec<String>,
    pub scheme: ScoringScheme,
}

/// Stateless scorer for a single scheme.
#[derive(Debug, Clone)]
pub struct QualityScorer {
    scheme: ScoringScheme,
    weights: SchemeWeights,
    min_photos: usize,
}

impl QualityScorer {
    pub fn new(scheme: ScoringScheme) -> Self {
        Self::with_rules(scheme, &ReviewRules::default())
    }

    pub fn with_rules(scheme: ScoringScheme, rules: &ReviewRules) -> Self {
        Self {
            scheme,
            weights: SchemeWeights::for_scheme(scheme),
            min_photos: rules.min_photos,
        }
    }

    pub fn scheme(&self) -> ScoringScheme {
        self.scheme
    }

    pub fn score(&self, content: &ListingContent) -> QualityReport {
        let breakdown = rules::score_content(content, &self.weights);
        let improvements =
            rules::improvements(&breakdown, content, self.min_photos, &self.weights);
        let total_score = breakdown.total().min(self.weights.total_max()).min(100) as u8;

        QualityReport {
            total_score,
            breakdown,
            improvements,
            scheme: self.scheme,
        }
    }
}
