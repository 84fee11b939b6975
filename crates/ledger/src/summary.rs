//! Spending summary for a group.

use std::cmp::Reverse;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use splitledger_core::{Money, ParticipantId};

use crate::error::LedgerResult;
use crate::expense::{Expense, ExpenseCategory};
use crate::participant::Participant;

/// How much one participant has paid for the group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contribution {
    pub id: ParticipantId,
    pub name: String,
    pub color: String,
    pub amount: Money,
    /// Whole-number share of the group's total spend.
    pub percentage: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupSummary {
    pub total_spent: Money,
    pub total_expenses: usize,
    pub average_expense: Money,
    pub category_breakdown: BTreeMap<ExpenseCategory, Money>,
    /// Largest contributor first; ties by ascending id.
    pub participant_contributions: Vec<Contribution>,
}

pub fn summarize_group(expenses: &[Expense], participants: &[Participant]) -> LedgerResult<GroupSummary> {
    let total_spent: Money = expenses.iter().map(|e| e.amount).sum();
    let total_expenses = expenses.len();
    let average_expense = match i64::try_from(total_expenses) {
        Ok(0) | Err(_) => Money::ZERO,
        Ok(count) => total_spent.mul_div_round(1, count)?,
    };

    let mut category_breakdown = BTreeMap::new();
    for expense in expenses {
        *category_breakdown.entry(expense.category).or_insert(Money::ZERO) += expense.amount;
    }

    let mut participant_contributions: Vec<Contribution> = participants
        .iter()
        .map(|participant| {
            let amount: Money = expenses
                .iter()
                .filter(|e| e.payer_id == participant.id)
                .map(|e| e.amount)
                .sum();
            Contribution {
                id: participant.id,
                name: participant.name.clone(),
                color: participant.color.clone(),
                amount,
                percentage: whole_percent(amount, total_spent),
            }
        })
        .collect();
    participant_contributions.sort_by_key(|c| (Reverse(c.amount), c.id));

    Ok(GroupSummary {
        total_spent,
        total_expenses,
        average_expense,
        category_breakdown,
        participant_contributions,
    })
}

fn whole_percent(part: Money, whole: Money) -> u32 {
    if !whole.is_positive() || part.is_negative() {
        return 0;
    }
    let part = i128::from(part.cents());
    let whole = i128::from(whole.cents());
    u32::try_from((part * 200 + whole) / (whole * 2)).unwrap_or(u32::MAX)
}
