use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use splitledger_core::{Entity, ExpenseId, GroupId, Money, ParticipantId, Percentage};

use crate::error::{LedgerError, LedgerResult};

/// Expense category (closed set).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpenseCategory {
    Food,
    Transport,
    Entertainment,
    Utilities,
    Shopping,
    Healthcare,
    Travel,
    Education,
    #[default]
    Other,
}

/// One participant's owed share of an expense.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Split {
    pub participant_id: ParticipantId,
    /// Debit owed by the participant for this expense.
    pub amount: Money,
    /// Informational share of the expense; `amount` is authoritative.
    pub percentage: Percentage,
}

/// Persisted form of a [`Split`]: the split plus the expense it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseSplit {
    pub expense_id: ExpenseId,
    #[serde(flatten)]
    pub split: Split,
}

/// A shared purchase, as composed by the ledger store (expense + its splits).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: ExpenseId,
    pub group_id: GroupId,
    pub amount: Money,
    pub payer_id: ParticipantId,
    #[serde(default)]
    pub description: String,
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub category: ExpenseCategory,
    #[serde(default)]
    pub splits: Vec<Split>,
}

impl Expense {
    /// Sum of all split amounts.
    pub fn split_total(&self) -> Money {
        self.splits.iter().map(|split| split.amount).sum()
    }

    /// Checks that the splits add up to the expense amount, to the cent.
    pub fn check_split_total(&self) -> LedgerResult<()> {
        let actual = self.split_total();
        if actual != self.amount {
            return Err(LedgerError::InputInconsistency {
                expected: self.amount,
                actual,
            });
        }
        Ok(())
    }

    /// Splits in their persisted record form.
    pub fn split_records(&self) -> Vec<ExpenseSplit> {
        self.splits
            .iter()
            .map(|split| ExpenseSplit {
                expense_id: self.id,
                split: split.clone(),
            })
            .collect()
    }
}

impl Entity for Expense {
    type Id = ExpenseId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
