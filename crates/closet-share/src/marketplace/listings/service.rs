use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::checks::{run_automated_checks, AutomatedChecks};
use super::domain::{
    Listing, ListingContent, ListingId, ListingStatus, ModeratorDecisionInput, ModeratorReview,
    OwnerId, ReviewDecision,
};
use super::repository::{
    ListingNotice, ListingNotifier, ListingRepository, NotifyError, RepositoryError,
};
use super::scoring::{QualityReport, QualityScorer, ScoringScheme};
use super::validation::ReviewRules;
use super::workflow::{validate_decision, ReviewAction, ReviewPolicy, TransitionError};
use crate::marketplace::notifications::{fan_out, NoticeCategory};

/// Knobs for the review pipeline: scoring scheme, guard policy, and check limits.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewSettings {
    pub scheme: ScoringScheme,
    pub policy: ReviewPolicy,
    pub rules: ReviewRules,
}

/// Result of an automated submission pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionOutcome {
    pub listing_id: ListingId,
    pub status: ListingStatus,
    pub checks: AutomatedChecks,
    pub quality_score: u8,
    pub improvements: Vec<String>,
}

/// Service composing the automated checks, quality scorer, repository, and notifier.
pub struct ListingReviewService<R, N> {
    repository: Arc<R>,
    notifier: Arc<N>,
    scorer: Arc<QualityScorer>,
    rules: ReviewRules,
    policy: ReviewPolicy,
}

static LISTING_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_listing_id() -> ListingId {
    let id = LISTING_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ListingId(format!("lst-{id:06}"))
}

impl<R, N> ListingReviewService<R, N>
where
    R: ListingRepository + 'static,
    N: ListingNotifier + 'static,
{
    pub fn new(repository: Arc<R>, notifier: Arc<N>, settings: ReviewSettings) -> Self {
        let scorer = Arc::new(QualityScorer::with_rules(settings.scheme, &settings.rules));
        Self {
            repository,
            notifier,
            scorer,
            rules: settings.rules,
            policy: settings.policy,
        }
    }

    pub fn policy(&self) -> &ReviewPolicy {
        &self.policy
    }

    /// Store a new listing in `draft`.
    pub fn create_draft(
        &self,
        owner_id: OwnerId,
        content: ListingContent,
    ) -> Result<Listing, ReviewServiceError> {
        let listing = Listing::draft(next_listing_id(), owner_id, content, Utc::now());
        let stored = self.repository.insert(listing)?;
        info!(listing_id = %stored.id.0, owner_id = %stored.owner_id.0, "listing draft created");
        Ok(stored)
    }

    /// Replace the owner-editable content of a draft or a listing awaiting changes.
    pub fn update_content(
        &self,
        listing_id: &ListingId,
        content: ListingContent,
    ) -> Result<Listing, ReviewServiceError> {
        let mut listing = self.load(listing_id)?;
        if !listing.status.is_editable() {
            return Err(ReviewServiceError::NotEditable(listing.status));
        }

        let expected = listing.version;
        listing.content = content;
        listing.updated_at = Utc::now();
        Ok(self.repository.update(listing, expected)?)
    }

    /// Run the automated battery, rescore, and route to `in_review` or `needs_changes`.
    pub fn submit_for_review(
        &self,
        listing_id: &ListingId,
    ) -> Result<SubmissionOutcome, ReviewServiceError> {
        let mut listing = self.load(listing_id)?;

        let checks = run_automated_checks(&listing.content, &self.rules);
        let report = self.scorer.score(&listing.content);
        let action = ReviewAction::Submit {
            checks_passed: checks.all_passed(),
        };

        let status = listing
            .status
            .transition(action, &self.policy)
            .map_err(|err| {
                warn!(listing_id = %listing_id.0, %err, "submission refused");
                err
            })?;

        let expected = listing.version;
        listing.status = status;
        listing.automated_checks = Some(checks.clone());
        listing.quality_score = Some(report.total_score);
        listing.quality_report = Some(report.clone());
        listing.updated_at = Utc::now();

        let stored = self.repository.update(listing, expected)?;
        info!(
            listing_id = %stored.id.0,
            status = stored.status.label(),
            quality_score = report.total_score,
            failed_checks = ?checks.failed_checks(),
            "listing submitted for review"
        );
        self.notify(&stored);

        Ok(SubmissionOutcome {
            listing_id: stored.id,
            status,
            checks,
            quality_score: report.total_score,
            improvements: report.improvements,
        })
    }

    pub fn approve_listing(
        &self,
        listing_id: &ListingId,
        input: ModeratorDecisionInput,
    ) -> Result<Listing, ReviewServiceError> {
        self.decide(listing_id, ReviewDecision::Approved, input)
    }

    pub fn reject_listing(
        &self,
        listing_id: &ListingId,
        input: ModeratorDecisionInput,
    ) -> Result<Listing, ReviewServiceError> {
        self.decide(listing_id, ReviewDecision::Rejected, input)
    }

    pub fn request_changes(
        &self,
        listing_id: &ListingId,
        input: ModeratorDecisionInput,
    ) -> Result<Listing, ReviewServiceError> {
        self.decide(listing_id, ReviewDecision::ChangesRequested, input)
    }

    pub fn get(&self, listing_id: &ListingId) -> Result<Listing, ReviewServiceError> {
        self.load(listing_id)
    }

    /// Listings waiting on a moderator, oldest first.
    pub fn moderation_queue(&self, limit: usize) -> Result<Vec<Listing>, ReviewServiceError> {
        let mut queue = self.repository.by_status(ListingStatus::InReview, limit)?;
        queue.sort_by(|a, b| {
            a.updated_at
                .cmp(&b.updated_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(queue)
    }

    /// Score arbitrary content without touching the store.
    pub fn preview_quality(
        &self,
        content: &ListingContent,
        scheme: Option<ScoringScheme>,
    ) -> QualityReport {
        match scheme {
            Some(scheme) if scheme != self.scorer.scheme() => {
                QualityScorer::with_rules(scheme, &self.rules).score(content)
            }
            _ => self.scorer.score(content),
        }
    }

    fn load(&self, listing_id: &ListingId) -> Result<Listing, ReviewServiceError> {
        let listing = self
            .repository
            .fetch(listing_id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(listing)
    }

    fn decide(
        &self,
        listing_id: &ListingId,
        decision: ReviewDecision,
        input: ModeratorDecisionInput,
    ) -> Result<Listing, ReviewServiceError> {
        let action = ReviewAction::from(decision);
        validate_decision(action, &input, &self.policy).map_err(|err| {
            warn!(
                listing_id = %listing_id.0,
                action = action.label(),
                %err,
                "moderator input refused"
            );
            err
        })?;

        let mut listing = self.load(listing_id)?;
        let previous = listing.status;
        let status = listing.status.transition(action, &self.policy)?;
        let now = Utc::now();

        let expected = listing.version;
        listing.status = status;
        listing.moderator_review = Some(ModeratorReview {
            decision,
            moderator_id: input.moderator_id,
            notes: input.notes,
            checklist: input.checklist,
            reviewed_at: now,
        });
        if decision == ReviewDecision::Approved {
            listing.published_at = Some(now);
        }
        listing.updated_at = now;

        let stored = self.repository.update(listing, expected)?;
        info!(
            listing_id = %stored.id.0,
            from = previous.label(),
            to = stored.status.label(),
            "moderation decision recorded"
        );
        self.notify(&stored);
        Ok(stored)
    }

    /// Owner notices are best-effort: the transition is already stored, so a
    /// delivery failure is logged rather than reported to the caller.
    fn notify(&self, listing: &Listing) {
        if let Err(err) = self.publish_notice(listing) {
            warn!(listing_id = %listing.id.0, %err, "owner notice not delivered");
        }
    }

    fn publish_notice(&self, listing: &Listing) -> Result<(), NotifyError> {
        let template = match listing.status {
            ListingStatus::InReview => "listing_in_review",
            ListingStatus::NeedsChanges => "listing_needs_changes",
            ListingStatus::Approved => "listing_approved",
            ListingStatus::Rejected => "listing_rejected",
            ListingStatus::Draft | ListingStatus::Submitted => return Ok(()),
        };

        let preferences = self.notifier.preferences(&listing.owner_id)?;
        let channels = fan_out(&preferences, NoticeCategory::ListingUpdates);

        let mut details = BTreeMap::new();
        details.insert("status".to_string(), listing.status.label().to_string());
        if let Some(score) = listing.quality_score {
            details.insert("qualityScore".to_string(), score.to_string());
        }
        if let Some(review) = &listing.moderator_review {
            if !review.notes.is_empty() {
                details.insert("notes".to_string(), review.notes.clone());
            }
        }

        self.notifier.publish(ListingNotice {
            template: template.to_string(),
            listing_id: listing.id.clone(),
            owner_id: listing.owner_id.clone(),
            category: NoticeCategory::ListingUpdates,
            channels,
            details,
        })
    }
}

/// Error raised by the listing review service.
#[derive(Debug, thiserror::Error)]
pub enum ReviewServiceError {
    #[error(transparent)]
    Transition(#[from] TransitionError),
    #[error("listing is {} and can no longer be edited", .0.label())]
    NotEditable(ListingStatus),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
