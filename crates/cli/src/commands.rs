use anyhow::Context;
use serde::Serialize;

use splitledger_ledger::{
    BalanceMap, GroupBalances, GroupSummary, Settlement, Split, calculate_group_balances,
    calculate_settlements, split_expense, summarize_group,
};

use crate::snapshot::{GroupSnapshot, SplitRequest};

/// Output of the `settle` command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SettlementReport {
    pub balances: BalanceMap,
    pub settlements: Vec<Settlement>,
}

pub fn split(request: &SplitRequest) -> anyhow::Result<Vec<Split>> {
    split_expense(request.amount, &request.participant_ids, &request.policy)
        .with_context(|| format!("cannot split {} ({})", request.amount, request.policy.name()))
}

pub fn balances(snapshot: &GroupSnapshot, strict: bool) -> anyhow::Result<GroupBalances> {
    check(snapshot, strict)?;
    Ok(calculate_group_balances(&snapshot.expenses, &snapshot.participants))
}

pub fn settle(snapshot: &GroupSnapshot, strict: bool) -> anyhow::Result<SettlementReport> {
    let balances = balances(snapshot, strict)?.into_balances();
    let settlements = calculate_settlements(&balances, &snapshot.participants);
    tracing::info!(settlements = settlements.len(), "settlement plan ready");
    Ok(SettlementReport {
        balances,
        settlements,
    })
}

pub fn summary(snapshot: &GroupSnapshot, strict: bool) -> anyhow::Result<GroupSummary> {
    check(snapshot, strict)?;
    Ok(summarize_group(&snapshot.expenses, &snapshot.participants)?)
}

fn check(snapshot: &GroupSnapshot, strict: bool) -> anyhow::Result<()> {
    if strict {
        snapshot.validate().context("snapshot failed validation")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use splitledger_core::{Money, ParticipantId};
    use splitledger_ledger::SplitPolicy;
    use uuid::Uuid;

    fn pid(n: u128) -> ParticipantId {
        ParticipantId::from_uuid(Uuid::from_u128(n))
    }

    fn snapshot() -> GroupSnapshot {
        let raw = format!(
            r##"{{
                "participants": [
                    {{ "id": "{a}", "name": "Ana", "color": "#8B5CF6" }},
                    {{ "id": "{b}", "name": "Ben", "color": "#EC4899" }},
                    {{ "id": "{c}", "name": "Cam", "color": "#F59E0B" }}
                ],
                "expenses": [
                    {{
                        "id": "{e1}", "groupId": "{g}", "amount": 80, "payerId": "{c}",
                        "date": "2024-05-01T12:00:00Z", "category": "travel",
                        "splits": [
                            {{ "participantId": "{c}", "amount": 0, "percentage": 0 }},
                            {{ "participantId": "{a}", "amount": 0, "percentage": 0 }},
                            {{ "participantId": "{b}", "amount": 80, "percentage": 100 }}
                        ]
                    }},
                    {{
                        "id": "{e2}", "groupId": "{g}", "amount": 100, "payerId": "{a}",
                        "date": "2024-05-02T12:00:00Z",
                        "splits": [{{ "participantId": "{c}", "amount": 100, "percentage": 100 }}]
                    }}
                ]
            }}"##,
            a = pid(1),
            b = pid(2),
            c = pid(3),
            e1 = Uuid::from_u128(11),
            e2 = Uuid::from_u128(12),
            g = Uuid::from_u128(20),
        );
        GroupSnapshot::from_json(&raw).unwrap()
    }

    #[test]
    fn settle_reports_balances_and_payments() {
        let report = settle(&snapshot(), true).unwrap();

        assert_eq!(report.balances[&pid(1)], Money::from_cents(100_00));
        assert_eq!(report.balances[&pid(2)], Money::from_cents(-80_00));
        assert_eq!(report.balances[&pid(3)], Money::from_cents(-20_00));
        assert_eq!(
            report.settlements,
            vec![
                Settlement { from: pid(2), to: pid(1), amount: Money::from_cents(80_00) },
                Settlement { from: pid(3), to: pid(1), amount: Money::from_cents(20_00) },
            ]
        );
    }

    #[test]
    fn strict_mode_rejects_inconsistent_snapshots() {
        let mut snapshot = snapshot();
        snapshot.expenses[0].amount = Money::from_cents(81_00);

        assert!(settle(&snapshot, true).is_err());
        // Lenient mode still computes.
        assert!(settle(&snapshot, false).is_ok());
    }

    #[test]
    fn summary_breaks_down_categories() {
        let summary = summary(&snapshot(), false).unwrap();
        assert_eq!(summary.total_spent, Money::from_cents(180_00));
        assert_eq!(summary.category_breakdown.len(), 2);
    }

    #[test]
    fn split_command_checks_totals() {
        let request = SplitRequest {
            amount: Money::from_cents(100_00),
            participant_ids: vec![pid(1), pid(2), pid(3)],
            policy: SplitPolicy::Equal,
        };
        let splits = split(&request).unwrap();
        assert_eq!(splits[0].amount, Money::from_cents(33_34));

        let empty = SplitRequest {
            participant_ids: Vec::new(),
            ..request
        };
        assert!(split(&empty).is_err());
    }
}
