//! `splitledger` command line: runs the ledger engine over a group snapshot.
//!
//! Stands in for the API layer: it reads already-materialized records
//! (participants plus expenses with their splits) from a JSON file and prints
//! the engine's results as JSON on stdout.

pub mod commands;
pub mod snapshot;

pub use commands::{SettlementReport, balances, settle, split, summary};
pub use snapshot::{GroupSnapshot, SplitRequest};
