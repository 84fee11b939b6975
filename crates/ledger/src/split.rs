//! Split calculation: how an expense amount is shared at creation time.

use serde::{Deserialize, Serialize};

use splitledger_core::{Money, ParticipantId, Percentage};

use crate::error::{LedgerError, LedgerResult};
use crate::expense::Split;
use crate::validation::{check_split_sum, validate_custom_shares, validate_percentage_shares};

/// A participant's fixed amount under [`SplitPolicy::Custom`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomShare {
    pub participant_id: ParticipantId,
    pub amount: Money,
}

/// A participant's share under [`SplitPolicy::Percentage`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PercentageShare {
    pub participant_id: ParticipantId,
    pub percentage: Percentage,
}

/// How an expense amount is divided between participants.
///
/// On the wire this is `{"splitType": "...", "customSplits": [...]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "splitType", content = "customSplits", rename_all = "lowercase")]
pub enum SplitPolicy {
    /// Cent-floored equal shares; the first participant absorbs the remainder.
    #[default]
    Equal,
    /// Amounts taken verbatim; they are not checked against the total here.
    Custom(Vec<CustomShare>),
    /// Rounded percentage shares; the first share absorbs the rounding difference.
    Percentage(Vec<PercentageShare>),
}

/// Computes each participant's owed share of `amount`.
///
/// `participant_ids` is only consulted by [`SplitPolicy::Equal`]; its order
/// decides who absorbs the rounding remainder. For `Equal` and `Percentage`
/// the result sums to `amount` exactly. For `Custom` it is the caller's job to
/// check the total (see [`split_expense`]).
///
/// `amount` is expected to be positive and is not checked here.
pub fn calculate_split_amounts(
    amount: Money,
    participant_ids: &[ParticipantId],
    policy: &SplitPolicy,
) -> LedgerResult<Vec<Split>> {
    let splits = match policy {
        SplitPolicy::Equal => equal_splits(amount, participant_ids)?,
        SplitPolicy::Custom(shares) => custom_splits(amount, shares)?,
        SplitPolicy::Percentage(shares) => percentage_splits(amount, shares)?,
    };

    tracing::debug!(
        amount = %amount,
        policy = policy.name(),
        splits = splits.len(),
        "calculated split amounts"
    );

    Ok(splits)
}

/// Validates the amount and the policy's shares, calculates the splits and
/// checks that they add up to `amount`. This is the entry point for creating
/// or updating an expense.
pub fn split_expense(
    amount: Money,
    participant_ids: &[ParticipantId],
    policy: &SplitPolicy,
) -> LedgerResult<Vec<Split>> {
    if !amount.is_positive() {
        return Err(LedgerError::NonPositiveAmount(amount));
    }

    match policy {
        SplitPolicy::Equal => {}
        SplitPolicy::Custom(shares) => validate_custom_shares(amount, shares)?,
        SplitPolicy::Percentage(shares) => validate_percentage_shares(shares)?,
    }

    let splits = calculate_split_amounts(amount, participant_ids, policy)?;
    check_split_sum(amount, &splits)?;
    Ok(splits)
}

impl SplitPolicy {
    pub fn name(&self) -> &'static str {
        match self {
            SplitPolicy::Equal => "equal",
            SplitPolicy::Custom(_) => "custom",
            SplitPolicy::Percentage(_) => "percentage",
        }
    }
}

fn equal_splits(amount: Money, participant_ids: &[ParticipantId]) -> LedgerResult<Vec<Split>> {
    let Some((first, rest)) = participant_ids.split_first() else {
        return Err(LedgerError::DegenerateInput);
    };

    let count = i64::try_from(participant_ids.len())
        .map_err(|_| LedgerError::DegenerateInput)?;
    let base = Money::from_cents(amount.cents() / count);
    let remainder = amount - Money::from_cents(base.cents() * count);
    let percentage = Percentage::equal_part(participant_ids.len())?;

    let mut splits = Vec::with_capacity(participant_ids.len());
    splits.push(Split {
        participant_id: *first,
        amount: base + remainder,
        percentage,
    });
    splits.extend(rest.iter().map(|participant_id| Split {
        participant_id: *participant_id,
        amount: base,
        percentage,
    }));
    Ok(splits)
}

fn custom_splits(amount: Money, shares: &[CustomShare]) -> LedgerResult<Vec<Split>> {
    if shares.is_empty() {
        return Err(LedgerError::DegenerateInput);
    }

    shares
        .iter()
        .map(|share| -> LedgerResult<Split> {
            Ok(Split {
                participant_id: share.participant_id,
                amount: share.amount,
                percentage: Percentage::of(share.amount, amount)?,
            })
        })
        .collect()
}

fn percentage_splits(amount: Money, shares: &[PercentageShare]) -> LedgerResult<Vec<Split>> {
    if shares.is_empty() {
        return Err(LedgerError::DegenerateInput);
    }

    let mut splits = shares
        .iter()
        .map(|share| -> LedgerResult<Split> {
            Ok(Split {
                participant_id: share.participant_id,
                amount: share.percentage.apply_to(amount)?,
                percentage: share.percentage,
            })
        })
        .collect::<LedgerResult<Vec<_>>>()?;

    let allocated: Money = splits.iter().map(|split| split.amount).sum();
    let diff = amount - allocated;
    if let Some(first) = splits.first_mut() {
        first.amount += diff;
    }
    Ok(splits)
}
