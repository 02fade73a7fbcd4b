//! Billing engine: pure bill-splitting and payment-reconciliation rules.
//!
//! Everything here is arithmetic over already-loaded rows; callers persist
//! the results. The data layer never computes derived values itself.

use crate::models::{Bill, Member, Payment};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashSet;
use uuid::Uuid;

/// Compute the per-person share of a bill.
///
/// Returns `total_cost / active_member_count` rounded to two decimal
/// places, or zero when there are no active members. Called on bill
/// creation and on total-cost edits, always with the active member count
/// at the moment of the call.
pub fn compute_share(total_cost: Decimal, active_member_count: i64) -> Decimal {
    if active_member_count > 0 {
        (total_cost / Decimal::from(active_member_count)).round_dp(2)
    } else {
        Decimal::ZERO
    }
}

/// Result of classifying a single payment against a bill's share.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaymentClassification {
    pub is_settled: bool,
    pub surplus: Decimal,
}

/// Classify a payment against the bill's per-person share.
///
/// A payment settles the share when `amount_paid >= share`; the surplus is
/// the overpaid portion, never negative. With a zero share any non-negative
/// payment is settled and the whole amount is surplus.
pub fn classify_payment(amount_paid: Decimal, share: Decimal) -> PaymentClassification {
    PaymentClassification {
        is_settled: amount_paid >= share,
        surplus: (amount_paid - share).max(Decimal::ZERO),
    }
}

/// Active members that have not settled the bill.
///
/// A member counts as paid only if at least one single payment by that
/// member meets or exceeds the share. Multiple partial payments are not
/// summed. Result order is insignificant.
pub fn unpaid_members(
    share: Decimal,
    active_members: Vec<Member>,
    payments: &[Payment],
) -> Vec<Member> {
    let paid_member_ids: HashSet<Uuid> = payments
        .iter()
        .filter(|p| p.amount >= share)
        .map(|p| p.member_id)
        .collect();

    active_members
        .into_iter()
        .filter(|m| !paid_member_ids.contains(&m.id))
        .collect()
}

/// Aggregated view of the current billing period for the dashboard.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSummary {
    pub current_period: String,
    pub has_current_bill: bool,
    pub active_members: i64,
    pub cost_per_person: Decimal,
    pub total_billed: Decimal,
    pub total_paid: Decimal,
    /// May be negative when payments exceed the bill in aggregate.
    pub total_unpaid: Decimal,
    pub unpaid_member_count: i64,
}

/// Summarize the given period. `bill_payments` must be the payments
/// recorded against `bill`; it is ignored when there is no bill.
pub fn summarize(
    period: &str,
    bill: Option<&Bill>,
    bill_payments: &[Payment],
    active_members: Vec<Member>,
) -> DashboardSummary {
    let active_count = active_members.len() as i64;

    match bill {
        Some(bill) => {
            let total_paid: Decimal = bill_payments.iter().map(|p| p.amount).sum();
            let unpaid_count =
                unpaid_members(bill.per_person_share, active_members, bill_payments).len() as i64;

            DashboardSummary {
                current_period: period.to_string(),
                has_current_bill: true,
                active_members: active_count,
                cost_per_person: bill.per_person_share,
                total_billed: bill.total_cost,
                total_paid,
                total_unpaid: bill.total_cost - total_paid,
                unpaid_member_count: unpaid_count,
            }
        }
        None => DashboardSummary {
            current_period: period.to_string(),
            has_current_bill: false,
            active_members: active_count,
            cost_per_person: Decimal::ZERO,
            total_billed: Decimal::ZERO,
            total_paid: Decimal::ZERO,
            total_unpaid: Decimal::ZERO,
            unpaid_member_count: 0,
        },
    }
}
