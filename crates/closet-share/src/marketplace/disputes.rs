//! Rental dispute lifecycle.
//!
//! A renter or lender opens a dispute against a booking (usually with a damage
//! report attached); support moves it through review to a resolution.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::listings::ListingId;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DisputeId(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisputeStatus {
    Open,
    UnderReview,
    Escalated,
    Resolved,
    Closed,
}

impl DisputeStatus {
    pub const fn label(self) -> &'static str {
        match self {
            DisputeStatus::Open => "open",
            DisputeStatus::UnderReview => "under_review",
            DisputeStatus::Escalated => "escalated",
            DisputeStatus::Resolved => "resolved",
            DisputeStatus::Closed => "closed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisputeReason {
    Damage,
    LateReturn,
    NotAsDescribed,
    Cleaning,
    Other,
}

/// Evidence filed alongside a damage dispute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DamageReport {
    pub description: String,
    #[serde(default)]
    pub photo_urls: Vec<String>,
    #[serde(default)]
    pub estimated_repair_cost: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum DisputeResolution {
    RefundRenter,
    ChargeDeposit { amount: Decimal },
    NoAction,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DisputeAction {
    StartReview,
    Escalate,
    Resolve(DisputeResolution),
    Close,
}

impl DisputeAction {
    fn label(&self) -> &'static str {
        match self {
            DisputeAction::StartReview => "start_review",
            DisputeAction::Escalate => "escalate",
            DisputeAction::Resolve(_) => "resolve",
            DisputeAction::Close => "close",
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DisputeTransitionError {
    #[error("cannot {action} a dispute that is {}", .from.label())]
    InvalidTransition {
        from: DisputeStatus,
        action: &'static str,
    },
    #[error("deposit charge must be a positive amount no larger than the deposit held")]
    InvalidCharge,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisputeEvent {
    pub from: DisputeStatus,
    pub to: DisputeStatus,
    pub at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dispute {
    pub id: DisputeId,
    pub booking_id: String,
    pub listing_id: ListingId,
    pub reason: DisputeReason,
    pub damage_report: Option<DamageReport>,
    pub deposit_held: Decimal,
    pub status: DisputeStatus,
    pub resolution: Option<DisputeResolution>,
    pub opened_at: DateTime<Utc>,
    pub history: Vec<DisputeEvent>,
}

impl Dispute {
    pub fn open(
        id: DisputeId,
        booking_id: impl Into<String>,
        listing_id: ListingId,
        reason: DisputeReason,
        damage_report: Option<DamageReport>,
        deposit_held: Decimal,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            booking_id: booking_id.into(),
            listing_id,
            reason,
            damage_report,
            deposit_held,
            status: DisputeStatus::Open,
            resolution: None,
            opened_at: now,
            history: Vec::new(),
        }
    }

    /// Apply `action`, recording the move in `history`.
    pub fn apply(
        &mut self,
        action: DisputeAction,
        at: DateTime<Utc>,
    ) -> Result<DisputeStatus, DisputeTransitionError> {
        use DisputeStatus::*;

        let next = match (self.status, &action) {
            (Open, DisputeAction::StartReview) => UnderReview,
            (Open | UnderReview, DisputeAction::Escalate) => Escalated,
            (UnderReview | Escalated, DisputeAction::Resolve(resolution)) => {
                if let DisputeResolution::ChargeDeposit { amount } = resolution {
                    let positive = amount.is_sign_positive() && !amount.is_zero();
                    if !positive || *amount > self.deposit_held {
                        return Err(DisputeTransitionError::InvalidCharge);
                    }
                }
                Resolved
            }
            (Resolved, DisputeAction::Close) => Closed,
            (from, action) => {
                return Err(DisputeTransitionError::InvalidTransition {
                    from,
                    action: action.label(),
                })
            }
        };

        if let DisputeAction::Resolve(resolution) = action {
            self.resolution = Some(resolution);
        }
        self.history.push(DisputeEvent {
            from: self.status,
            to: next,
            at,
        });
        self.status = next;
        Ok(next)
    }
}
