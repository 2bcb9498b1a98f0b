//! Split allocation: how much each participant owes.
//!
//! Both functions are pure: they read the bill, never mutate it, and build a
//! fresh result on every call.
//!
//! ## Rounding
//!
//! Each per-item share is rounded half-up to the cent when it is computed,
//! and a participant total is the sum of those rounded shares. The totals can
//! therefore drift from [`bill_total`] by up to one cent per item (three
//! people sharing `10.00` each owe `3.33`, summing to `9.99`). This is the
//! accepted policy: every line a participant sees adds up to their total.

use serde::Serialize;

use crate::{Allocation, Bill, BillItem, Money, Participant};

/// One participant's share of one item.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SummaryLine {
    pub item_name: String,
    pub amount: Money,
    pub is_shared: bool,
}

/// What a participant owes and why.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ParticipantSummary {
    pub participant: Participant,
    /// Lines in bill item order.
    pub assigned_items: Vec<SummaryLine>,
    pub total_amount: Money,
}

/// Computes one summary per participant, in participant order.
///
/// - A shared item is divided among all participants.
/// - An assigned item is divided among its assignees only; everyone else
///   gets no line for it.
///
/// A bill without participants yields no summaries.
#[must_use]
pub fn compute_summaries(bill: &Bill) -> Vec<ParticipantSummary> {
    let head_count = u32::try_from(bill.participants().len()).unwrap_or(u32::MAX);

    bill.participants()
        .iter()
        .map(|participant| {
            let assigned_items: Vec<SummaryLine> = bill
                .items()
                .iter()
                .filter_map(|item| {
                    share_of(item, participant, head_count).map(|amount| SummaryLine {
                        item_name: item.name().to_string(),
                        amount,
                        is_shared: item.is_shared(),
                    })
                })
                .collect();
            let total_amount = assigned_items.iter().map(|line| line.amount).sum();

            ParticipantSummary {
                participant: participant.clone(),
                assigned_items,
                total_amount,
            }
        })
        .collect()
}

/// Raw sum of item totals, independent of the per-participant rounding.
#[must_use]
pub fn bill_total(items: &[BillItem]) -> Money {
    items.iter().map(BillItem::total).sum()
}

fn share_of(item: &BillItem, participant: &Participant, head_count: u32) -> Option<Money> {
    match item.allocation() {
        // head_count == 0 cannot reach here from compute_summaries, but a
        // zero divisor still means "skip".
        Allocation::Shared => item.total().split_even(head_count),
        Allocation::Assigned(assignees) if assignees.contains(&participant.id) => {
            let parts = u32::try_from(assignees.len()).unwrap_or(u32::MAX);
            item.total().split_even(parts)
        }
        Allocation::Assigned(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::ItemInput;

    fn bill() -> Bill {
        Bill::new(Some("Lunch"), NaiveDate::from_ymd_opt(2026, 5, 1).unwrap())
    }

    #[test]
    fn no_participants_no_summaries() {
        let mut bill = bill();
        bill.add_item(ItemInput::new("Rice", Money::new(10_000)))
            .unwrap();
        assert!(compute_summaries(&bill).is_empty());
        assert_eq!(bill_total(bill.items()), Money::new(10_000));
    }

    #[test]
    fn shared_then_assigned() {
        let mut bill = bill();
        let a = bill.add_participant("A", None).unwrap();
        bill.add_participant("B", None).unwrap();
        bill.add_item(ItemInput::new("Platter", Money::new(10_000)))
            .unwrap();

        let summaries = compute_summaries(&bill);
        assert_eq!(summaries[0].total_amount, Money::new(5_000));
        assert_eq!(summaries[1].total_amount, Money::new(5_000));

        let drinks = bill
            .add_item(ItemInput::new("Drinks", Money::new(3_000)))
            .unwrap();
        bill.toggle_assignment(drinks, a).unwrap();

        let summaries = compute_summaries(&bill);
        assert_eq!(summaries[0].total_amount, Money::new(8_000));
        assert_eq!(summaries[1].total_amount, Money::new(5_000));
        assert_eq!(
            summaries[0].assigned_items,
            vec![
                SummaryLine {
                    item_name: "Platter".to_string(),
                    amount: Money::new(5_000),
                    is_shared: true,
                },
                SummaryLine {
                    item_name: "Drinks".to_string(),
                    amount: Money::new(3_000),
                    is_shared: false,
                },
            ]
        );
        assert_eq!(summaries[1].assigned_items.len(), 1);
    }

    #[test]
    fn thirds_round_per_share() {
        let mut bill = bill();
        for name in ["A", "B", "C"] {
            bill.add_participant(name, None).unwrap();
        }
        bill.add_item(ItemInput::new("Cake", Money::new(1_000)))
            .unwrap();

        let summaries = compute_summaries(&bill);
        assert!(
            summaries
                .iter()
                .all(|s| s.total_amount == Money::new(333))
        );
        let summed: Money = summaries.iter().map(|s| s.total_amount).sum();
        assert_eq!(summed, Money::new(999));
        assert_eq!(bill_total(bill.items()), Money::new(1_000));
    }

    #[test]
    fn total_is_sum_of_rounded_shares() {
        let mut bill = bill();
        for name in ["A", "B", "C"] {
            bill.add_participant(name, None).unwrap();
        }
        // 0.05 / 3 = 0.0166.. -> 0.02 per share; twice -> 0.04, while the
        // unrounded sum 0.0333.. would round to 0.03.
        bill.add_item(ItemInput::new("Mint", Money::new(5))).unwrap();
        bill.add_item(ItemInput::new("Gum", Money::new(5))).unwrap();

        for summary in compute_summaries(&bill) {
            assert_eq!(summary.total_amount, Money::new(4));
        }
    }
}
