//! Ledger error model.
//!
//! Every variant is a caller precondition violation. The engine computes on
//! whatever snapshot it is given and never retries anything.

use splitledger_core::{DomainError, Money, ParticipantId, Percentage};
use thiserror::Error;

pub type LedgerResult<T> = Result<T, LedgerError>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// Splits do not add up to the expense amount.
    #[error("split amounts total {actual} but the expense amount is {expected}")]
    InputInconsistency { expected: Money, actual: Money },

    /// Percentage shares do not add up to 100%.
    ///
    /// `remaining` is positive when part of the expense is still unassigned
    /// and negative when the shares overshoot.
    #[error("split percentages must total 100.00% ({remaining} remaining)")]
    PercentageMismatch { remaining: Percentage },

    /// Nothing to split between (zero participants or an empty share list).
    #[error("cannot split an expense between zero participants")]
    DegenerateInput,

    /// An expense amount that is zero or negative.
    #[error("expense amount must be positive, got {0}")]
    NonPositiveAmount(Money),

    /// A payer or split references an id outside the group roster.
    #[error("participant {0} is not part of the group")]
    UnknownParticipant(ParticipantId),

    /// The same participant id appears twice in a roster.
    #[error("participant {0} appears more than once in the group")]
    DuplicateParticipant(ParticipantId),

    #[error(transparent)]
    Domain(#[from] DomainError),
}
