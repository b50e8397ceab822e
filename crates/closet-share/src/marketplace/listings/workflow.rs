use serde::{Deserialize, Serialize};

use super::domain::{ListingStatus, ModeratorDecisionInput, ReviewDecision};

/// Operations that move a listing through moderation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewAction {
    Submit { checks_passed: bool },
    Approve,
    Reject,
    RequestChanges,
}

impl ReviewAction {
    pub const fn label(self) -> &'static str {
        match self {
            ReviewAction::Submit { .. } => "submit",
            ReviewAction::Approve => "approve",
            ReviewAction::Reject => "reject",
            ReviewAction::RequestChanges => "request_changes",
        }
    }

    pub const fn decision(self) -> Option<ReviewDecision> {
        match self {
            ReviewAction::Submit { .. } => None,
            ReviewAction::Approve => Some(ReviewDecision::Approved),
            ReviewAction::Reject => Some(ReviewDecision::Rejected),
            ReviewAction::RequestChanges => Some(ReviewDecision::ChangesRequested),
        }
    }
}

impl From<ReviewDecision> for ReviewAction {
    fn from(decision: ReviewDecision) -> Self {
        match decision {
            ReviewDecision::Approved => ReviewAction::Approve,
            ReviewDecision::Rejected => ReviewAction::Reject,
            ReviewDecision::ChangesRequested => ReviewAction::RequestChanges,
        }
    }
}

/// Guards layered on top of the base transition table.
///
/// Both default to off: terminal listings are refused on resubmission, but the
/// moderator checklist is trusted as supplied by the moderation UI.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewPolicy {
    /// Permit `submit` on `approved`/`rejected` listings (last write wins).
    pub allow_terminal_resubmission: bool,
    /// Require a complete checklist for approvals and notes for every decision.
    pub enforce_moderator_checklist: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    #[error("listing is {} and cannot be resubmitted", .0.label())]
    TerminalStatus(ListingStatus),
    #[error("moderator checklist incomplete: {}", .0.join(", "))]
    IncompleteChecklist(Vec<&'static str>),
    #[error("moderator notes are required")]
    MissingNotes,
}

impl ListingStatus {
    /// Next status for `action`, or the reason the move is refused.
    ///
    /// Moderator decisions apply from any status, matching manual override.
    pub fn transition(
        self,
        action: ReviewAction,
        policy: &ReviewPolicy,
    ) -> Result<ListingStatus, TransitionError> {
        match action {
            ReviewAction::Submit { checks_passed } => {
                if self.is_terminal() && !policy.allow_terminal_resubmission {
                    return Err(TransitionError::TerminalStatus(self));
                }
                Ok(if checks_passed {
                    ListingStatus::InReview
                } else {
                    ListingStatus::NeedsChanges
                })
            }
            ReviewAction::Approve => Ok(ListingStatus::Approved),
            ReviewAction::Reject => Ok(ListingStatus::Rejected),
            ReviewAction::RequestChanges => Ok(ListingStatus::NeedsChanges),
        }
    }

    /// Whether the owner may still edit listing content.
    pub const fn is_editable(self) -> bool {
        matches!(self, ListingStatus::Draft | ListingStatus::NeedsChanges)
    }
}

/// Checks moderator input against the policy before a decision is written.
pub fn validate_decision(
    action: ReviewAction,
    input: &ModeratorDecisionInput,
    policy: &ReviewPolicy,
) -> Result<(), TransitionError> {
    if !policy.enforce_moderator_checklist || action.decision().is_none() {
        return Ok(());
    }

    if action == ReviewAction::Approve && !input.checklist.is_complete() {
        return Err(TransitionError::IncompleteChecklist(
            input.checklist.unchecked(),
        ));
    }

    if input.notes.trim().is_empty() {
        return Err(TransitionError::MissingNotes);
    }

    Ok(())
}
