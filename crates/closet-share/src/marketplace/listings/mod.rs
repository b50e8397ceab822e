//! Listing quality scoring, automated submission checks, and the moderation workflow.
//!
//! A listing starts as an owner-editable `draft`. Submission runs the automated
//! battery and the quality scorer, routing to `in_review` or `needs_changes`;
//! moderators then approve, reject, or send it back. Only approved listings are
//! bookable.

pub mod checks;
pub mod domain;
pub mod repository;
pub mod router;
pub mod scoring;
pub mod service;
pub mod validation;
pub mod workflow;

#[cfg(test)]
mod tests;

pub use checks::{
    run_automated_checks, AutomatedChecks, CheckResult, DescriptionCheck, PhotoQualityCheck,
};
pub use domain::{
    Condition, Listing, ListingContent, ListingDetails, ListingId, ListingStatus,
    ListingStatusView, MaintenanceInfo, ModerationChecklist, ModeratorDecisionInput,
    ModeratorReview, OwnerId, Photo, PhotoKind, PhotoPresentation, Pricing, ReviewDecision,
    SafetyInfo,
};
pub use repository::{
    ListingNotice, ListingNotifier, ListingRepository, NotifyError, RepositoryError,
};
pub use router::listing_router;
pub use scoring::{QualityReport, QualityScorer, ScoreBreakdown, ScoringScheme};
pub use service::{ListingReviewService, ReviewServiceError, ReviewSettings, SubmissionOutcome};
pub use validation::ReviewRules;
pub use workflow::{ReviewAction, ReviewPolicy, TransitionError};
