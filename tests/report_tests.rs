// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use dompet::commands::reports;
use dompet::engine::aggregate::{aggregate_month, allocation_breakdown, summarize_window, SliceKind, WindowTotals};
use dompet::engine::analytics::{analyze_period, yearly_trend};
use dompet::engine::health::{classify_health, HealthInputs, HealthStatus};
use dompet::error::EngineError;
use dompet::models::{
    Contribution, DebtItem, Household, MonthlyTarget, Payment, SavingsGoal, TargetLineItem,
    Transaction, TxKind,
};
use dompet::{cli, db};
use rust_decimal::Decimal;
use rusqlite::Connection;
use std::str::FromStr;

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn tx(date: NaiveDate, kind: TxKind, amount: i64, category: &str) -> Transaction {
    Transaction {
        id: 0,
        date,
        description: category.to_string(),
        amount,
        kind,
        category: category.to_string(),
        account_id: None,
    }
}

fn item(id: &str, amount: &str) -> TargetLineItem {
    TargetLineItem {
        id: id.into(),
        name: id.into(),
        amount: amount.into(),
    }
}

fn household() -> Household {
    let mut h = Household {
        transactions: vec![
            tx(day(2024, 2, 1), TxKind::Income, 8_000_000, "Gaji"),
            tx(day(2024, 2, 10), TxKind::Expense, 4_000_000, "Makan"),
            tx(day(2024, 2, 20), TxKind::Expense, 1_000_000, "Tabungan"),
            tx(day(2024, 3, 1), TxKind::Income, 10_000_000, "Gaji"),
            tx(day(2024, 3, 5), TxKind::Expense, 2_000_000, "Makan"),
            tx(day(2024, 3, 9), TxKind::Expense, 1_000_000, "Listrik"),
            tx(day(2024, 3, 31), TxKind::Expense, 1_500_000, "Tabungan"),
            tx(day(2024, 4, 1), TxKind::Income, 99_000_000, "Bonus"),
        ],
        debts: vec![DebtItem {
            id: 1,
            name: "Motor".into(),
            source: "Adira".into(),
            total_amount: 12_000_000,
            monthly_installment: 1_000_000,
            tenor: 12,
            due_date: 5,
            payments: vec![
                Payment {
                    date: day(2024, 2, 5),
                    amount: 1_000_000,
                },
                Payment {
                    date: day(2024, 3, 5),
                    amount: 1_000_000,
                },
            ],
        }],
        goals: vec![SavingsGoal {
            id: 1,
            name: "Dana Darurat".into(),
            source: "BCA".into(),
            target_amount: 6_000_000,
            deadline: day(2025, 1, 1),
            contributions: vec![Contribution {
                date: day(2024, 1, 1),
                amount: 3_000_000,
            }],
            is_emergency_fund: true,
        }],
        ..Default::default()
    };
    h.targets.insert(
        "2024-01".into(),
        MonthlyTarget {
            pendapatan: vec![item("gaji", "10000000")],
            cicilan_utang: vec![item("motor", "1000000")],
            kebutuhan: vec![item("belanja", "2000000")],
            tabungan: vec![item("darurat", "1000000")],
            ..Default::default()
        },
    );
    h
}

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

#[test]
fn savings_transfers_are_not_spending() {
    let totals = summarize_window(&household().transactions, day(2024, 3, 1), day(2024, 3, 31), "Tabungan");
    assert_eq!(totals.total_income, 10_000_000);
    assert_eq!(totals.total_expense, 3_000_000);
    assert_eq!(totals.total_savings, 1_500_000);
    assert_eq!(totals.leftover, 5_500_000);
    assert_eq!(totals.net_cash_flow(), 7_000_000);
}

#[test]
fn month_summary_compares_with_previous_month_and_target() {
    let summary = aggregate_month(&household(), "2024-03", "Tabungan").unwrap();
    assert_eq!(summary.previous.total_income, 8_000_000);
    assert_eq!(summary.income_change_pct, dec("25"));
    assert_eq!(summary.expense_change_pct, dec("-25"));
    assert_eq!(summary.savings_change_pct, dec("50"));
    assert_eq!(summary.leftover_change_pct, dec("83.33"));
    assert_eq!(summary.debt_installments, 1_000_000);
    assert_eq!(summary.emergency_fund_balance, 3_000_000);

    let target = summary.target.as_ref().unwrap();
    assert!(target.is_provisional);
    assert_eq!(target.source_month, "2024-01");
    assert_eq!(target.expense, 3_000_000);
    assert_eq!(target.leftover, 6_000_000);
    assert_eq!(target.emergency_fund, 6_000_000);

    let progress = summary.target_progress.as_ref().unwrap();
    assert_eq!(progress.income_pct, dec("100"));
    assert_eq!(progress.leftover_pct, dec("91.67"));
    assert_eq!(progress.emergency_fund_pct, dec("50"));

    let health = classify_health(&summary.health_inputs());
    assert_eq!(health.status, HealthStatus::Sehat);
    assert_eq!(health.debt_ratio, dec("10"));
    assert_eq!(health.savings_ratio, dec("15"));
}

#[test]
fn month_summary_without_target_or_history() {
    let summary = aggregate_month(&Household::default(), "2024-03", "Tabungan").unwrap();
    assert!(summary.target.is_none());
    assert!(summary.target_progress.is_none());
    assert_eq!(summary.income_change_pct, Decimal::ZERO);
    assert!(summary.actual_sections.is_empty());
    assert_eq!(
        aggregate_month(&Household::default(), "March", "Tabungan").unwrap_err(),
        EngineError::InvalidMonth("March".into())
    );
}

#[test]
fn overspending_drops_the_leftover_slice() {
    let totals = WindowTotals {
        total_income: 5_000_000,
        total_expense: 3_000_000,
        total_savings: 2_500_000,
        leftover: -500_000,
    };
    let allocation = allocation_breakdown(&totals);
    assert!(allocation.is_overspent);
    assert_eq!(allocation.overspending_amount, 500_000);
    assert_eq!(allocation.slices.len(), 2);
    assert!(allocation.slices.iter().all(|s| s.kind != SliceKind::Leftover));
    assert_eq!(allocation.slices[0].pct, dec("60"));
    assert_eq!(allocation.slices[1].pct, dec("50"));
}

#[test]
fn leftover_slice_when_under_budget() {
    let totals = WindowTotals {
        total_income: 4_000_000,
        total_expense: 2_000_000,
        total_savings: 1_000_000,
        leftover: 1_000_000,
    };
    let allocation = allocation_breakdown(&totals);
    assert!(!allocation.is_overspent);
    assert_eq!(allocation.slices[2].kind, SliceKind::Leftover);
    assert_eq!(allocation.slices[2].amount, 1_000_000);
    assert_eq!(allocation.slices[2].pct, dec("25"));
}

fn inputs(income: i64, debt: i64, savings: i64, ncf: i64) -> HealthInputs {
    HealthInputs {
        total_income: income,
        debt_installments: debt,
        total_savings: savings,
        net_cash_flow: ncf,
    }
}

#[test]
fn health_thresholds() {
    let status = |i: HealthInputs| classify_health(&i).status;
    assert_eq!(status(inputs(10_000_000, 3_400_000, 1_000_000, 1)), HealthStatus::Sehat);
    assert_eq!(status(inputs(10_000_000, 3_600_000, 1_000_000, 1)), HealthStatus::CukupSehat);
    assert_eq!(status(inputs(10_000_000, 3_500_000, 1_000_000, 1)), HealthStatus::CukupSehat);
    assert_eq!(status(inputs(10_000_000, 0, 990_000, 1)), HealthStatus::CukupSehat);
    // 34.9999% debt and 9.9999% savings display as 35.00 and 10.00
    assert_eq!(status(inputs(1_000_000, 349_999, 100_000, 1)), HealthStatus::Sehat);
    assert_eq!(status(inputs(1_000_000, 0, 99_999, 1)), HealthStatus::CukupSehat);
    assert_eq!(status(inputs(10_000_000, 0, 1_000_000, 0)), HealthStatus::PerluPerhatian);
    assert_eq!(status(inputs(0, 0, 0, -5)), HealthStatus::DataTidakCukup);

    let report = classify_health(&inputs(0, 0, 0, 0));
    assert_eq!(report.debt_ratio, Decimal::ZERO);
    assert!(!report.explanation.is_empty());
    assert!(!report.recommendation.is_empty());
    assert_eq!(report.status.label(), "Data Tidak Cukup");
}

#[test]
fn yearly_trend_has_twelve_months() {
    let trend = yearly_trend(&household().transactions, 2024);
    assert_eq!(trend.len(), 12);
    assert_eq!(trend[0].income, 0);
    assert_eq!(trend[1].month, 1);
    assert_eq!(trend[1].expense, 5_000_000);
    assert_eq!(trend[2].net_cash_flow, 5_500_000);
    assert_eq!(trend[3].income, 99_000_000);
    assert!(yearly_trend(&household().transactions, 2023).iter().all(|m| m.income == 0));
}

#[test]
fn period_analysis_ranks_categories() {
    let mut txs = household().transactions;
    txs.push(tx(day(2024, 3, 20), TxKind::Expense, 2_000_000, "Sewa"));
    let analysis = analyze_period(&txs, day(2024, 3, 1), day(2024, 3, 31));
    assert_eq!(analysis.total_income, 10_000_000);
    assert_eq!(analysis.total_expense, 6_500_000);
    assert_eq!(analysis.leftover, 3_500_000);
    // ties keep the earlier transaction
    assert_eq!(analysis.top_expense.as_ref().unwrap().category, "Makan");
    let cats: Vec<&str> = analysis
        .expense_by_category
        .iter()
        .map(|c| c.category.as_str())
        .collect();
    assert_eq!(cats, vec!["Makan", "Sewa", "Tabungan", "Listrik"]);

    let empty = analyze_period(&txs, day(2030, 1, 1), day(2030, 1, 31));
    assert!(empty.top_income.is_none());
    assert!(empty.expense_by_category.is_empty());
}

fn run(conn: &Connection, args: &[&str]) -> anyhow::Result<()> {
    let matches = cli::build_cli().get_matches_from(args);
    if let Some(("report", m)) = matches.subcommand() {
        reports::handle(conn, m)
    } else {
        panic!("no report subcommand");
    }
}

#[test]
fn report_commands_run_against_the_database() {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    for t in household().transactions {
        db::insert_transaction(&conn, &t).unwrap();
    }
    run(&conn, &["dompet", "report", "month", "--month", "2024-03"]).unwrap();
    run(&conn, &["dompet", "report", "month", "--month", "2024-03", "--json"]).unwrap();
    run(&conn, &["dompet", "report", "year", "--year", "2024", "--jsonl"]).unwrap();
    run(&conn, &["dompet", "report", "period", "--year", "2024"]).unwrap();
    assert!(run(&conn, &["dompet", "report", "period", "--year", "2024", "--month", "2024-03"]).is_err());
    assert!(run(&conn, &["dompet", "report", "month", "--month", "2024-3"]).is_err());
}
