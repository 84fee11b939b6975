//! Share validation performed before splits are persisted.
//!
//! `calculate_split_amounts` trusts custom amounts and forces percentage
//! splits to the total, so these checks are what keep a stored expense
//! consistent.

use splitledger_core::{Money, Percentage};

use crate::error::{LedgerError, LedgerResult};
use crate::expense::Split;
use crate::split::{CustomShare, PercentageShare};

/// Custom amounts must add up to the expense total, to the cent.
pub fn validate_custom_shares(total: Money, shares: &[CustomShare]) -> LedgerResult<()> {
    let actual: Money = shares.iter().map(|share| share.amount).sum();
    if actual != total {
        return Err(LedgerError::InputInconsistency {
            expected: total,
            actual,
        });
    }
    Ok(())
}

/// Percentage shares must add up to exactly 100%.
pub fn validate_percentage_shares(shares: &[PercentageShare]) -> LedgerResult<()> {
    let assigned: Percentage = shares.iter().map(|share| share.percentage).sum();
    let remaining =
        Percentage::from_basis_points(Percentage::FULL.basis_points() - assigned.basis_points());
    if remaining != Percentage::ZERO {
        return Err(LedgerError::PercentageMismatch { remaining });
    }
    Ok(())
}

pub(crate) fn check_split_sum(amount: Money, splits: &[Split]) -> LedgerResult<()> {
    let actual: Money = splits.iter().map(|split| split.amount).sum();
    if actual != amount {
        return Err(LedgerError::InputInconsistency {
            expected: amount,
            actual,
        });
    }
    Ok(())
}
