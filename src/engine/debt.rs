// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Debt payoff ledger.
//!
//! Only `total_amount` and the payment log are authoritative; every progress
//! figure is recomputed from them on demand.

use crate::error::{EngineError, EngineResult};
use crate::models::{DebtItem, Payment};
use chrono::{Months, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DebtProgress {
    pub paid_amount: i64,
    /// May go negative when the debt was overpaid.
    pub remaining: i64,
    pub progress_pct: Decimal,
    pub is_paid_off: bool,
    /// Zero or negative once every installment has been made.
    pub remaining_tenor: i64,
}

pub fn compute_debt_progress(debt: &DebtItem) -> DebtProgress {
    let paid_amount: i64 = debt.payments.iter().map(|p| p.amount).sum();
    let remaining = debt.total_amount - paid_amount;
    let progress_pct = if debt.total_amount > 0 {
        crate::utils::percent_of(paid_amount, debt.total_amount).min(Decimal::ONE_HUNDRED)
    } else {
        Decimal::ZERO
    };
    DebtProgress {
        paid_amount,
        remaining,
        progress_pct,
        is_paid_off: remaining <= 0,
        remaining_tenor: debt.tenor - debt.payments.len() as i64,
    }
}

/// Record a payment. Overpayment is accepted and simply drives `remaining`
/// below zero.
pub fn append_payment(debt: &DebtItem, amount: i64, date: NaiveDate) -> EngineResult<DebtItem> {
    if amount <= 0 {
        tracing::debug!(debt = debt.id, amount, "payment rejected");
        return Err(EngineError::InvalidAmount(amount));
    }
    let mut next = debt.clone();
    next.payments.push(Payment { date, amount });
    Ok(next)
}

/// Longest tenor accepted when rebuilding a history, fifty years of installments.
pub const MAX_TENOR_MONTHS: i64 = 600;

/// Partial-state onboarding input: a debt that is already being paid down.
#[derive(Debug, Clone)]
pub struct PartialDebt {
    pub name: String,
    pub source: String,
    pub remaining_amount: i64,
    pub remaining_tenor: i64,
    pub monthly_installment: i64,
    pub total_tenor: i64,
    pub due_date: u32,
}

/// Rebuild the payment history of a debt that is part-way through its tenor.
///
/// One installment-sized payment is synthesized per elapsed month, the newest
/// dated one month before `now` and the oldest `payments_made` months before it,
/// so the derived remaining equals `remaining_amount` exactly.
pub fn reconstruct_from_partial_state(
    id: i64,
    partial: &PartialDebt,
    now: NaiveDate,
) -> EngineResult<DebtItem> {
    if partial.monthly_installment < 0 {
        return Err(EngineError::InvalidAmount(partial.monthly_installment));
    }
    if partial.remaining_amount < 0 {
        return Err(EngineError::InvalidAmount(partial.remaining_amount));
    }
    for tenor in [partial.total_tenor, partial.remaining_tenor] {
        if !(0..=MAX_TENOR_MONTHS).contains(&tenor) {
            return Err(EngineError::InvalidTenor(tenor));
        }
    }
    let payments_made = (partial.total_tenor - partial.remaining_tenor).max(0);
    let total_amount = payments_made
        .checked_mul(partial.monthly_installment)
        .and_then(|paid| paid.checked_add(partial.remaining_amount))
        .ok_or(EngineError::InvalidAmount(partial.monthly_installment))?;

    let payments = (1..=payments_made)
        .rev()
        .map(|back| Payment {
            date: months_before(now, back),
            amount: partial.monthly_installment,
        })
        .collect::<Vec<_>>();
    tracing::debug!(
        name = %partial.name,
        payments_made,
        total_amount,
        "reconstructed debt history"
    );

    Ok(DebtItem {
        id,
        name: partial.name.clone(),
        source: partial.source.clone(),
        total_amount,
        monthly_installment: partial.monthly_installment,
        tenor: partial.total_tenor,
        due_date: partial.due_date,
        payments,
    })
}

fn months_before(now: NaiveDate, back: i64) -> NaiveDate {
    u32::try_from(back)
        .ok()
        .and_then(|m| now.checked_sub_months(Months::new(m)))
        .unwrap_or(NaiveDate::MIN)
}

/// Sum of payments across all debts dated inside `[start, end]`.
pub fn installments_paid_in(debts: &[DebtItem], start: NaiveDate, end: NaiveDate) -> i64 {
    debts
        .iter()
        .flat_map(|d| d.payments.iter())
        .filter(|p| p.date >= start && p.date <= end)
        .map(|p| p.amount)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn debt(total: i64, payments: &[i64]) -> DebtItem {
        let d = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        DebtItem {
            id: 1,
            name: "KPR".into(),
            source: "Bank".into(),
            total_amount: total,
            monthly_installment: 100,
            tenor: 12,
            due_date: 10,
            payments: payments.iter().map(|a| Payment { date: d, amount: *a }).collect(),
        }
    }

    #[test]
    fn zero_total_reports_zero_progress() {
        let p = compute_debt_progress(&debt(0, &[]));
        assert_eq!(p.progress_pct, Decimal::ZERO);
        assert!(p.is_paid_off);
    }

    #[test]
    fn overpayment_keeps_negative_remainder() {
        let p = compute_debt_progress(&debt(1_000, &[600, 600]));
        assert_eq!(p.remaining, -200);
        assert_eq!(p.progress_pct, Decimal::ONE_HUNDRED);
        assert!(p.is_paid_off);
        assert_eq!(p.remaining_tenor, 10);
    }

    #[test]
    fn append_rejects_non_positive() {
        let d = debt(1_000, &[]);
        let today = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        assert_eq!(append_payment(&d, 0, today), Err(EngineError::InvalidAmount(0)));
        assert_eq!(append_payment(&d, -5, today), Err(EngineError::InvalidAmount(-5)));
        assert!(d.payments.is_empty());
    }

    #[test]
    fn remaining_tenor_larger_than_total_synthesizes_nothing() {
        let partial = PartialDebt {
            name: "Motor".into(),
            source: "Leasing".into(),
            remaining_amount: 3_000,
            remaining_tenor: 15,
            monthly_installment: 200,
            total_tenor: 12,
            due_date: 5,
        };
        let now = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let d = reconstruct_from_partial_state(9, &partial, now).unwrap();
        assert!(d.payments.is_empty());
        assert_eq!(d.total_amount, 3_000);
    }

    fn partial(total_tenor: i64, remaining_tenor: i64, installment: i64) -> PartialDebt {
        PartialDebt {
            name: "KTA".into(),
            source: "Bank".into(),
            remaining_amount: 0,
            remaining_tenor,
            monthly_installment: installment,
            total_tenor,
            due_date: 1,
        }
    }

    #[test]
    fn reconstruct_rejects_out_of_range_tenors() {
        let now = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        assert_eq!(
            reconstruct_from_partial_state(1, &partial(-1, 0, 100), now),
            Err(EngineError::InvalidTenor(-1))
        );
        assert_eq!(
            reconstruct_from_partial_state(1, &partial(12, -3, 100), now),
            Err(EngineError::InvalidTenor(-3))
        );
        assert_eq!(
            reconstruct_from_partial_state(1, &partial(i64::MAX, 0, 2), now),
            Err(EngineError::InvalidTenor(i64::MAX))
        );
        let longest = reconstruct_from_partial_state(1, &partial(MAX_TENOR_MONTHS, 0, 1), now).unwrap();
        assert_eq!(longest.payments.len(), 600);
    }

    #[test]
    fn reconstruct_rejects_overflowing_total() {
        let now = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        assert_eq!(
            reconstruct_from_partial_state(1, &partial(600, 0, i64::MAX / 2), now),
            Err(EngineError::InvalidAmount(i64::MAX / 2))
        );
    }
}
