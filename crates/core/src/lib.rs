//! `splitledger-core`: domain primitives shared by the ledger engine.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod entity;
pub mod error;
pub mod id;
pub mod money;
pub mod percentage;

pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{ExpenseId, GroupId, ParticipantId};
pub use money::Money;
pub use percentage::Percentage;
