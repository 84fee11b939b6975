//! Balance & settlement engine for shared group expenses.
//!
//! Pure domain logic only: no IO, no HTTP, no persistence concerns. A ledger
//! store hands in a fully materialized snapshot of a group (participants and
//! expenses with their splits) and gets fully materialized results back.
//!
//! The three calculations are consumed in order:
//!
//! 1. [`calculate_split_amounts`] turns an expense amount and a [`SplitPolicy`]
//!    into per-participant [`Split`]s when the expense is created or updated.
//! 2. [`calculate_group_balances`] nets a group's whole expense history into a
//!    signed balance per participant.
//! 3. [`calculate_settlements`] turns those balances into directed payments
//!    that bring every balance back to zero.

pub mod balance;
pub mod error;
pub mod expense;
pub mod participant;
pub mod settlement;
pub mod split;
pub mod summary;
pub mod validation;

pub use balance::{
    BalanceMap, GroupBalances, ReferenceRole, UnresolvedReference, calculate_group_balances,
};
pub use error::{LedgerError, LedgerResult};
pub use expense::{Expense, ExpenseCategory, ExpenseSplit, Split};
pub use participant::{Participant, Roster};
pub use settlement::{SETTLED_TOLERANCE, Settlement, apply_settlements, calculate_settlements};
pub use split::{CustomShare, PercentageShare, SplitPolicy, calculate_split_amounts, split_expense};
pub use summary::{Contribution, GroupSummary, summarize_group};
pub use validation::{validate_custom_shares, validate_percentage_shares};

pub use splitledger_core::{ExpenseId, GroupId, Money, ParticipantId, Percentage};
