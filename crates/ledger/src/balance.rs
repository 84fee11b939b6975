//! Net balances across a group's expense history.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use splitledger_core::{ExpenseId, Money, ParticipantId};

use crate::expense::Expense;
use crate::participant::{Participant, Roster};

/// Signed balance per participant: positive is owed money, negative owes money.
pub type BalanceMap = BTreeMap<ParticipantId, Money>;

/// Which side of an expense referenced an unknown participant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferenceRole {
    Payer,
    Split,
}

/// A payer or split id that was not in the roster and was left out of the balances.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnresolvedReference {
    pub expense_id: ExpenseId,
    pub participant_id: ParticipantId,
    pub role: ReferenceRole,
    pub amount: Money,
}

/// Result of [`calculate_group_balances`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupBalances {
    balances: BalanceMap,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    unresolved: Vec<UnresolvedReference>,
}

impl GroupBalances {
    pub fn balances(&self) -> &BalanceMap {
        &self.balances
    }

    pub fn into_balances(self) -> BalanceMap {
        self.balances
    }

    pub fn get(&self, id: &ParticipantId) -> Option<Money> {
        self.balances.get(id).copied()
    }

    /// References skipped because their participant is not in the roster.
    pub fn unresolved(&self) -> &[UnresolvedReference] {
        &self.unresolved
    }

    /// Sum of all balances; zero for a consistent history.
    pub fn total(&self) -> Money {
        self.balances.values().sum()
    }
}

/// Computes every participant's net balance over `expenses`.
///
/// Each payer is credited with the expense amount and each split participant
/// is debited their share. Participants with no expenses still appear, at
/// zero. Expenses may come in any order: the result only depends on the
/// multiset of expenses.
///
/// Payer or split ids missing from `participants` are skipped, logged at
/// `warn`, and reported through [`GroupBalances::unresolved`]; the same
/// policy [`calculate_settlements`](crate::calculate_settlements) applies.
pub fn calculate_group_balances(expenses: &[Expense], participants: &[Participant]) -> GroupBalances {
    let roster = Roster::index(participants);
    let mut balances: BalanceMap = roster.iter().map(|p| (p.id, Money::ZERO)).collect();
    let mut unresolved = Vec::new();

    for expense in expenses {
        post(
            &mut balances,
            &mut unresolved,
            expense.id,
            expense.payer_id,
            ReferenceRole::Payer,
            expense.amount,
        );
        for split in &expense.splits {
            post(
                &mut balances,
                &mut unresolved,
                expense.id,
                split.participant_id,
                ReferenceRole::Split,
                -split.amount,
            );
        }
    }

    tracing::debug!(
        expenses = expenses.len(),
        participants = balances.len(),
        unresolved = unresolved.len(),
        "calculated group balances"
    );

    GroupBalances {
        balances,
        unresolved,
    }
}

fn post(
    balances: &mut BalanceMap,
    unresolved: &mut Vec<UnresolvedReference>,
    expense_id: ExpenseId,
    participant_id: ParticipantId,
    role: ReferenceRole,
    delta: Money,
) {
    match balances.get_mut(&participant_id) {
        Some(balance) => *balance += delta,
        None => {
            tracing::warn!(
                %expense_id,
                %participant_id,
                ?role,
                "skipping reference to participant outside the group"
            );
            unresolved.push(UnresolvedReference {
                expense_id,
                participant_id,
                role,
                amount: delta.abs(),
            });
        }
    }
}
