//! Greedy largest-first debt netting.

use std::cmp::Reverse;

use serde::{Deserialize, Serialize};

use splitledger_core::{Money, ParticipantId};

use crate::balance::BalanceMap;
use crate::participant::{Participant, Roster};

/// Balances within this distance of zero count as settled.
pub const SETTLED_TOLERANCE: Money = Money::CENT;

/// A directed payment: `from` pays `amount` to `to`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement {
    pub from: ParticipantId,
    pub to: ParticipantId,
    pub amount: Money,
}

/// An open creditor or debtor position; `amount` is always positive.
#[derive(Debug, Clone, Copy)]
struct Position {
    id: ParticipantId,
    amount: Money,
}

/// Computes the payments that bring every balance back to zero.
///
/// Creditors (balance above [`SETTLED_TOLERANCE`]) and debtors (below minus
/// the tolerance) are each ordered by amount, largest first, with ties broken
/// by ascending participant id. The largest remaining debtor then pays the
/// largest remaining creditor as much as both can absorb, until one side runs
/// out. A match of no more than [`SETTLED_TOLERANCE`] is not emitted as a
/// payment but still reduces both sides. For a balance map that sums to zero
/// this emits at most `n - 1` payments for `n` unsettled participants.
///
/// Balance entries whose id is not in `participants` are skipped and logged
/// at `warn`.
pub fn calculate_settlements(balances: &BalanceMap, participants: &[Participant]) -> Vec<Settlement> {
    let roster = Roster::index(participants);
    let mut creditors = Vec::new();
    let mut debtors = Vec::new();

    for (&id, &balance) in balances {
        if !roster.contains(&id) {
            tracing::warn!(participant_id = %id, %balance, "skipping balance of participant outside the group");
            continue;
        }
        if balance > SETTLED_TOLERANCE {
            creditors.push(Position { id, amount: balance });
        } else if balance < -SETTLED_TOLERANCE {
            debtors.push(Position { id, amount: balance.abs() });
        }
    }

    largest_first(&mut creditors);
    largest_first(&mut debtors);

    let mut settlements = Vec::with_capacity(creditors.len() + debtors.len());
    let (mut c, mut d) = (0, 0);
    let mut credit_left = remaining(&creditors, c);
    let mut debt_left = remaining(&debtors, d);

    while c < creditors.len() && d < debtors.len() {
        let amount = credit_left.min(debt_left);
        if amount > SETTLED_TOLERANCE {
            settlements.push(Settlement {
                from: debtors[d].id,
                to: creditors[c].id,
                amount,
            });
        }

        credit_left -= amount;
        debt_left -= amount;

        if credit_left.is_zero() {
            c += 1;
            credit_left = remaining(&creditors, c);
        }
        if debt_left.is_zero() {
            d += 1;
            debt_left = remaining(&debtors, d);
        }
    }

    tracing::debug!(
        creditors = creditors.len(),
        debtors = debtors.len(),
        settlements = settlements.len(),
        "calculated settlements"
    );

    settlements
}

/// Applies `settlements` to `balances`: each payment raises the payer's
/// balance and lowers the payee's by its amount.
pub fn apply_settlements(balances: &BalanceMap, settlements: &[Settlement]) -> BalanceMap {
    let mut after = balances.clone();
    for settlement in settlements {
        *after.entry(settlement.from).or_default() += settlement.amount;
        *after.entry(settlement.to).or_default() -= settlement.amount;
    }
    after
}

fn largest_first(positions: &mut [Position]) {
    positions.sort_by_key(|p| (Reverse(p.amount), p.id));
}

fn remaining(positions: &[Position], index: usize) -> Money {
    positions.get(index).map(|p| p.amount).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use uuid::Uuid;

    fn pid(n: u128) -> ParticipantId {
        ParticipantId::from_uuid(Uuid::from_u128(n))
    }

    fn roster(n: u128) -> Vec<Participant> {
        (1..=n)
            .map(|i| Participant::new(pid(i), format!("P{i}"), "#10B981"))
            .collect()
    }

    fn balances(entries: &[(u128, i64)]) -> BalanceMap {
        entries
            .iter()
            .map(|(id, cents)| (pid(*id), Money::from_cents(*cents)))
            .collect()
    }

    fn settlement(from: u128, to: u128, cents: i64) -> Settlement {
        Settlement {
            from: pid(from),
            to: pid(to),
            amount: Money::from_cents(cents),
        }
    }

    #[test]
    fn one_debtor_pays_two_creditors_largest_first() {
        // A = 1, B = 2, C = 3
        let map = balances(&[(1, 50_00), (2, 30_00), (3, -80_00)]);

        let plan = calculate_settlements(&map, &roster(3));
        assert_eq!(plan, vec![settlement(3, 1, 50_00), settlement(3, 2, 30_00)]);
    }

    #[test]
    fn equal_amounts_pair_by_ascending_id() {
        let map = balances(&[(4, -25_00), (2, 25_00), (3, -25_00), (1, 25_00)]);

        let plan = calculate_settlements(&map, &roster(4));
        assert_eq!(plan, vec![settlement(3, 1, 25_00), settlement(4, 2, 25_00)]);
    }

    #[test]
    fn tie_break_does_not_depend_on_roster_order() {
        let map = balances(&[(1, 25_00), (2, 25_00), (3, -25_00), (4, -25_00)]);
        let mut reversed = roster(4);
        reversed.reverse();

        assert_eq!(
            calculate_settlements(&map, &roster(4)),
            calculate_settlements(&map, &reversed)
        );
    }

    #[test]
    fn one_cent_balances_count_as_settled() {
        let map = balances(&[(1, 1), (2, -1), (3, 0)]);
        assert!(calculate_settlements(&map, &roster(3)).is_empty());
    }

    #[test]
    fn one_cent_matches_are_absorbed_without_a_payment() {
        let map = balances(&[(1, 3), (2, 3), (3, -4), (4, -2)]);

        let plan = calculate_settlements(&map, &roster(4));
        assert_eq!(plan, vec![settlement(3, 1, 3), settlement(4, 2, 2)]);

        let after = apply_settlements(&map, &plan);
        assert_eq!(after[&pid(2)], Money::CENT);
        assert_eq!(after[&pid(3)], -Money::CENT);
    }

    #[test]
    fn partial_payments_chain_across_debtors() {
        let map = balances(&[(1, 70_00), (2, 10_00), (3, -45_00), (4, -35_00)]);

        let plan = calculate_settlements(&map, &roster(4));
        assert_eq!(
            plan,
            vec![
                settlement(3, 1, 45_00),
                settlement(4, 1, 25_00),
                settlement(4, 2, 10_00),
            ]
        );
        assert!(apply_settlements(&map, &plan).values().all(|b| b.is_zero()));
    }

    #[test]
    fn balances_outside_the_group_are_skipped() {
        // Same skip-with-warning policy as the balance aggregator.
        let map = balances(&[(1, 40_00), (2, -40_00), (9, -10_00)]);

        let plan = calculate_settlements(&map, &roster(2));
        assert_eq!(plan, vec![settlement(2, 1, 40_00)]);
    }

    #[test]
    fn nothing_to_settle_without_debtors() {
        let map = balances(&[(1, 40_00), (2, 0)]);
        assert!(calculate_settlements(&map, &roster(2)).is_empty());
    }

    fn zero_sum_map(values: Vec<i64>) -> BalanceMap {
        let closing = -values.iter().sum::<i64>();
        values
            .into_iter()
            .chain(std::iter::once(closing))
            .enumerate()
            .map(|(i, cents)| (pid(i as u128 + 1), Money::from_cents(cents)))
            .collect()
    }

    /// Zero-sum balance maps in whole multiples of two cents, so no match
    /// can ever shrink to a single cent.
    fn even_zero_sum_balances() -> impl Strategy<Value = BalanceMap> {
        prop::collection::vec(-100_000i64..100_000, 1..8)
            .prop_map(|halves| zero_sum_map(halves.into_iter().map(|h| h * 2).collect()))
    }

    /// Zero-sum balance maps with arbitrary cents, dust included.
    fn zero_sum_balances() -> impl Strategy<Value = BalanceMap> {
        prop::collection::vec(-200_000i64..200_000, 1..8).prop_map(zero_sum_map)
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 512,
            ..ProptestConfig::default()
        })]

        /// Property: applying the plan brings every balance to zero.
        #[test]
        fn settlements_net_every_balance(map in even_zero_sum_balances()) {
            let participants = roster(map.len() as u128);
            let plan = calculate_settlements(&map, &participants);

            let after = apply_settlements(&map, &plan);
            prop_assert!(after.values().all(|b| b.is_zero()), "left over: {:?}", after);

            let credit: Money = map.values().filter(|b| b.is_positive()).sum();
            prop_assert_eq!(plan.iter().map(|s| s.amount).sum::<Money>(), credit);
            prop_assert!(plan.iter().all(|s| s.amount.is_positive() && s.from != s.to));
        }

        /// Property: at most n - 1 payments for n participants with a balance.
        #[test]
        fn settlement_count_is_bounded(map in zero_sum_balances()) {
            let participants = roster(map.len() as u128);
            let plan = calculate_settlements(&map, &participants);

            let open = map.values().filter(|b| !b.is_zero()).count();
            prop_assert!(plan.len() <= open.saturating_sub(1));
        }

        /// Property: no payment is ever a single cent or less.
        #[test]
        fn settlements_skip_one_cent_payments(map in zero_sum_balances()) {
            let participants = roster(map.len() as u128);
            let plan = calculate_settlements(&map, &participants);

            prop_assert!(plan.iter().all(|s| s.amount > SETTLED_TOLERANCE && s.from != s.to));
            let after = apply_settlements(&map, &plan);
            prop_assert_eq!(after.values().sum::<Money>(), Money::ZERO);
        }
    }
}
