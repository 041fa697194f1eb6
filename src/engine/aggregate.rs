// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::engine::debt::installments_paid_in;
use crate::engine::health::HealthInputs;
use crate::engine::reconcile::section_totals;
use crate::engine::savings::{emergency_fund_balance, emergency_fund_target};
use crate::engine::targets::resolve_target;
use crate::error::EngineResult;
use crate::models::{Household, MonthlyTarget, Section, Transaction, TxKind};
use crate::utils::{month_bounds, parse_amount, percent_of, previous_month};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

/// Income, spending and savings over one date window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowTotals {
    pub total_income: i64,
    /// Expenses excluding savings transfers.
    pub total_expense: i64,
    pub total_savings: i64,
    /// `income - expense - savings`, negative when overspent.
    pub leftover: i64,
}

impl WindowTotals {
    pub fn net_cash_flow(&self) -> i64 {
        self.total_income - self.total_expense
    }
}

/// Partition transactions dated inside `[start, end]`. An expense whose category
/// equals `savings_category` counts as savings, not spending.
pub fn summarize_window(
    transactions: &[Transaction],
    start: NaiveDate,
    end: NaiveDate,
    savings_category: &str,
) -> WindowTotals {
    let mut totals = WindowTotals::default();
    for tx in transactions.iter().filter(|t| t.date >= start && t.date <= end) {
        match tx.kind {
            TxKind::Income => totals.total_income += tx.amount,
            TxKind::Expense if tx.category == savings_category => totals.total_savings += tx.amount,
            TxKind::Expense => totals.total_expense += tx.amount,
        }
    }
    totals.leftover = totals.total_income - totals.total_expense - totals.total_savings;
    totals
}

/// Month-over-month change in percent; zero when there is nothing to compare to.
pub fn percentage_change(current: i64, previous: i64) -> Decimal {
    if previous == 0 {
        return Decimal::ZERO;
    }
    (Decimal::from(current - previous) * Decimal::ONE_HUNDRED / Decimal::from(previous.abs()))
        .round_dp(2)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SliceKind {
    Expense,
    Savings,
    Leftover,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationSlice {
    pub kind: SliceKind,
    pub amount: i64,
    /// Share of income.
    pub pct: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Allocation {
    pub slices: Vec<AllocationSlice>,
    pub is_overspent: bool,
    pub overspending_amount: i64,
}

/// Split income into spending, savings and what is left. When spending plus
/// savings exceed income no leftover slice is produced and the excess is
/// reported as overspending.
pub fn allocation_breakdown(totals: &WindowTotals) -> Allocation {
    let income = totals.total_income;
    let allocated = totals.total_expense + totals.total_savings;
    let is_overspent = allocated > income;
    let slice = |kind, amount| AllocationSlice {
        kind,
        amount,
        pct: percent_of(amount, income),
    };
    let mut slices = vec![
        slice(SliceKind::Expense, totals.total_expense),
        slice(SliceKind::Savings, totals.total_savings),
    ];
    let leftover = income - allocated;
    if !is_overspent && leftover > 0 {
        slices.push(slice(SliceKind::Leftover, leftover));
    }
    Allocation {
        slices,
        is_overspent,
        overspending_amount: if is_overspent { allocated - income } else { 0 },
    }
}

/// Planned values for the four headline metrics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetHeadline {
    pub source_month: String,
    pub is_provisional: bool,
    pub income: i64,
    /// Debt installments plus the four spending groups.
    pub expense: i64,
    pub savings: i64,
    pub leftover: i64,
    pub emergency_fund: i64,
}

pub fn target_headline(target: &MonthlyTarget) -> (i64, i64, i64) {
    let sum = |section: Section| -> i64 {
        target
            .items(section)
            .iter()
            .map(|i| parse_amount(&i.amount))
            .sum()
    };
    let income = sum(Section::Pendapatan);
    let expense = sum(Section::CicilanUtang) + Section::SPENDING.into_iter().map(sum).sum::<i64>();
    let savings = sum(Section::Tabungan);
    (income, expense, savings)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeadlineProgress {
    pub income_pct: Decimal,
    pub expense_pct: Decimal,
    pub leftover_pct: Decimal,
    pub emergency_fund_pct: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlySummary {
    pub month_year: String,
    pub current: WindowTotals,
    pub previous: WindowTotals,
    pub income_change_pct: Decimal,
    pub expense_change_pct: Decimal,
    pub savings_change_pct: Decimal,
    pub leftover_change_pct: Decimal,
    /// Debt payments recorded in the debt ledgers during the month.
    pub debt_installments: i64,
    pub emergency_fund_balance: i64,
    pub target: Option<TargetHeadline>,
    pub target_progress: Option<HeadlineProgress>,
    pub allocation: Allocation,
    /// Realized amount per section when actuals were saved for this month.
    pub actual_sections: BTreeMap<Section, i64>,
}

impl MonthlySummary {
    pub fn health_inputs(&self) -> HealthInputs {
        HealthInputs {
            total_income: self.current.total_income,
            debt_installments: self.debt_installments,
            total_savings: self.current.total_savings,
            net_cash_flow: self.current.net_cash_flow(),
        }
    }
}

/// Everything the month dashboard shows, computed for an explicit `month`.
pub fn aggregate_month(
    household: &Household,
    month: &str,
    savings_category: &str,
) -> EngineResult<MonthlySummary> {
    let (start, end) = month_bounds(month)?;
    let prev = previous_month(month)?;
    let (prev_start, prev_end) = month_bounds(&prev)?;

    let current = summarize_window(&household.transactions, start, end, savings_category);
    let previous = summarize_window(&household.transactions, prev_start, prev_end, savings_category);
    let debt_installments = installments_paid_in(&household.debts, start, end);
    let emergency_fund = emergency_fund_balance(&household.goals);

    let target = resolve_target(month, &household.targets).map(|resolved| {
        let (income, expense, savings) = target_headline(&resolved.target);
        TargetHeadline {
            source_month: resolved.source_month,
            is_provisional: resolved.is_provisional,
            income,
            expense,
            savings,
            leftover: income - expense - savings,
            emergency_fund: emergency_fund_target(&household.goals),
        }
    });
    let target_progress = target.as_ref().map(|t| HeadlineProgress {
        income_pct: percent_of(current.total_income, t.income),
        expense_pct: percent_of(current.total_expense, t.expense),
        leftover_pct: percent_of(current.leftover, t.leftover),
        emergency_fund_pct: percent_of(emergency_fund, t.emergency_fund),
    });

    let actual_sections: BTreeMap<Section, i64> = household
        .reports
        .get(month)
        .map(|report| {
            Section::ALL
                .into_iter()
                .map(|s| (s, section_totals(&report.target, &report.actuals, s).1))
                .collect()
        })
        .unwrap_or_default();

    tracing::debug!(
        month,
        income = current.total_income,
        expense = current.total_expense,
        savings = current.total_savings,
        "aggregated month"
    );

    Ok(MonthlySummary {
        month_year: month.to_string(),
        income_change_pct: percentage_change(current.total_income, previous.total_income),
        expense_change_pct: percentage_change(current.total_expense, previous.total_expense),
        savings_change_pct: percentage_change(current.total_savings, previous.total_savings),
        leftover_change_pct: percentage_change(current.leftover, previous.leftover),
        allocation: allocation_breakdown(&current),
        current,
        previous,
        debt_installments,
        emergency_fund_balance: emergency_fund,
        target,
        target_progress,
        actual_sections,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentage_change_uses_absolute_previous() {
        assert_eq!(percentage_change(150, 100), Decimal::from(50));
        assert_eq!(percentage_change(-50, -100), Decimal::from(50));
        assert_eq!(percentage_change(10, 0), Decimal::ZERO);
    }

    #[test]
    fn leftover_slice_only_when_positive() {
        let even = WindowTotals {
            total_income: 100,
            total_expense: 60,
            total_savings: 40,
            leftover: 0,
        };
        let a = allocation_breakdown(&even);
        assert!(!a.is_overspent);
        assert_eq!(a.slices.len(), 2);
        assert_eq!(a.overspending_amount, 0);
    }
}
