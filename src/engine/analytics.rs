// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{Transaction, TxKind};
use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthTrend {
    /// Zero-based calendar month (0 = January).
    pub month: u32,
    pub income: i64,
    pub expense: i64,
    pub net_cash_flow: i64,
}

/// Income and expense per calendar month of `year`, always twelve entries.
pub fn yearly_trend(transactions: &[Transaction], year: i32) -> Vec<MonthTrend> {
    let mut series: Vec<MonthTrend> = (0..12)
        .map(|month| MonthTrend {
            month,
            ..Default::default()
        })
        .collect();
    for tx in transactions.iter().filter(|t| t.date.year() == year) {
        let slot = &mut series[tx.date.month0() as usize];
        match tx.kind {
            TxKind::Income => slot.income += tx.amount,
            TxKind::Expense => slot.expense += tx.amount,
        }
    }
    for slot in series.iter_mut() {
        slot.net_cash_flow = slot.income - slot.expense;
    }
    series
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTotal {
    pub category: String,
    pub amount: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodAnalysis {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub total_income: i64,
    pub total_expense: i64,
    pub leftover: i64,
    pub top_income: Option<Transaction>,
    pub top_expense: Option<Transaction>,
    pub income_by_category: Vec<CategoryTotal>,
    pub expense_by_category: Vec<CategoryTotal>,
}

/// Highlights for transactions dated inside `[start, end]`. The largest income
/// and expense keep the first one seen on ties; category totals are sorted by
/// amount, largest first, with ties by category name.
pub fn analyze_period(transactions: &[Transaction], start: NaiveDate, end: NaiveDate) -> PeriodAnalysis {
    let mut total_income = 0;
    let mut total_expense = 0;
    let mut top_income: Option<&Transaction> = None;
    let mut top_expense: Option<&Transaction> = None;
    let mut income_cats: HashMap<&str, i64> = HashMap::new();
    let mut expense_cats: HashMap<&str, i64> = HashMap::new();

    for tx in transactions.iter().filter(|t| t.date >= start && t.date <= end) {
        let (total, top, cats) = match tx.kind {
            TxKind::Income => (&mut total_income, &mut top_income, &mut income_cats),
            TxKind::Expense => (&mut total_expense, &mut top_expense, &mut expense_cats),
        };
        *total += tx.amount;
        if top.is_none_or(|best| tx.amount > best.amount) {
            *top = Some(tx);
        }
        *cats.entry(tx.category.as_str()).or_insert(0) += tx.amount;
    }

    PeriodAnalysis {
        start,
        end,
        total_income,
        total_expense,
        leftover: total_income - total_expense,
        top_income: top_income.cloned(),
        top_expense: top_expense.cloned(),
        income_by_category: sorted_categories(income_cats),
        expense_by_category: sorted_categories(expense_cats),
    }
}

fn sorted_categories(map: HashMap<&str, i64>) -> Vec<CategoryTotal> {
    let mut items: Vec<CategoryTotal> = map
        .into_iter()
        .map(|(category, amount)| CategoryTotal {
            category: category.to_string(),
            amount,
        })
        .collect();
    items.sort_by(|a, b| b.amount.cmp(&a.amount).then_with(|| a.category.cmp(&b.category)));
    items
}
