use std::fs;
use std::path::Path;

use anyhow::Context;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use splitledger_core::{GroupId, Money, ParticipantId};
use splitledger_ledger::{Expense, LedgerResult, Participant, Roster, SplitPolicy};

/// A group as handed over by the ledger store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupSnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<GroupId>,
    pub participants: Vec<Participant>,
    #[serde(default)]
    pub expenses: Vec<Expense>,
}

impl GroupSnapshot {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        read_json(path)
    }

    pub fn from_json(raw: &str) -> anyhow::Result<Self> {
        serde_json::from_str(raw).context("invalid group snapshot")
    }

    /// Caller-side checks the engine does not perform: unique participant ids,
    /// known payers and split participants, splits summing to each amount.
    pub fn validate(&self) -> LedgerResult<()> {
        let roster = Roster::new(&self.participants)?;
        for expense in &self.expenses {
            roster.check_expense(expense)?;
            expense.check_split_total()?;
        }
        Ok(())
    }
}

/// Input of the `split` command, shaped like an expense create/update payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SplitRequest {
    pub amount: Money,
    #[serde(default)]
    pub participant_ids: Vec<ParticipantId>,
    #[serde(default)]
    pub policy: SplitPolicy,
}

impl SplitRequest {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        read_json(path)
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("failed to parse {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use splitledger_ledger::LedgerError;
    use uuid::Uuid;

    fn pid(n: u128) -> ParticipantId {
        ParticipantId::from_uuid(Uuid::from_u128(n))
    }

    fn snapshot_json(payer: ParticipantId, second_split: &str) -> String {
        format!(
            r##"{{
                "participants": [
                    {{ "id": "{a}", "name": "Ana", "color": "#8B5CF6", "isOwner": true }},
                    {{ "id": "{b}", "name": "Ben", "color": "#EC4899" }}
                ],
                "expenses": [{{
                    "id": "{e}",
                    "groupId": "{g}",
                    "amount": 20,
                    "payerId": "{payer}",
                    "date": "2024-05-01T12:00:00Z",
                    "splits": [
                        {{ "participantId": "{a}", "amount": 10, "percentage": 50 }},
                        {{ "participantId": "{b}", "amount": {second_split}, "percentage": 50 }}
                    ]
                }}]
            }}"##,
            a = pid(1),
            b = pid(2),
            e = Uuid::from_u128(10),
            g = Uuid::from_u128(20),
        )
    }

    #[test]
    fn parses_and_validates_a_consistent_snapshot() {
        let snapshot = GroupSnapshot::from_json(&snapshot_json(pid(1), "10")).unwrap();
        assert_eq!(snapshot.participants.len(), 2);
        assert!(snapshot.participants[0].is_owner);
        assert!(snapshot.validate().is_ok());
    }

    #[test]
    fn validate_flags_unknown_payer() {
        let snapshot = GroupSnapshot::from_json(&snapshot_json(pid(7), "10")).unwrap();
        assert_eq!(snapshot.validate(), Err(LedgerError::UnknownParticipant(pid(7))));
    }

    #[test]
    fn validate_flags_split_total_mismatch() {
        let snapshot = GroupSnapshot::from_json(&snapshot_json(pid(1), "9.99")).unwrap();
        assert!(matches!(
            snapshot.validate(),
            Err(LedgerError::InputInconsistency { .. })
        ));
    }

    #[test]
    fn split_request_defaults_to_equal() {
        let request: SplitRequest =
            serde_json::from_str(&format!(r#"{{ "amount": 100, "participantIds": ["{}"] }}"#, pid(1)))
                .unwrap();
        assert_eq!(request.policy, SplitPolicy::Equal);
        assert_eq!(request.amount, Money::from_cents(100_00));
    }

    #[test]
    fn malformed_snapshot_reports_context() {
        let err = GroupSnapshot::from_json("{ \"participants\": 3 }").unwrap_err();
        assert!(err.to_string().contains("invalid group snapshot"));
    }
}
