// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::today;
use crate::db;
use crate::engine::aggregate::{aggregate_month, MonthlySummary, SliceKind, TargetHeadline};
use crate::engine::analytics::{analyze_period, yearly_trend, CategoryTotal};
use crate::engine::health::{classify_health, HealthReport};
use crate::utils::{fmt_amount, maybe_print_json, month_bounds, month_key, parse_month, pretty_table, savings_category, year_bounds};
use anyhow::{anyhow, Result};
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Serialize;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("month", sub)) => month(conn, sub)?,
        Some(("year", sub)) => year(conn, sub)?,
        Some(("period", sub)) => period(conn, sub)?,
        _ => {}
    }
    Ok(())
}

#[derive(Serialize)]
struct MonthReport {
    #[serde(flatten)]
    summary: MonthlySummary,
    health: HealthReport,
}

fn change(pct: Decimal) -> String {
    if pct > Decimal::ZERO {
        format!("+{}%", pct)
    } else {
        format!("{}%", pct)
    }
}

fn month(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let month = parse_month(sub.get_one::<String>("month").unwrap())?;
    let household = db::load_household(conn)?;
    let summary = aggregate_month(&household, &month, &savings_category(conn)?)?;
    let health = classify_health(&summary.health_inputs());
    let report = MonthReport { summary, health };
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &report)? {
        return Ok(());
    }

    let s = &report.summary;
    let planned = |f: fn(&TargetHeadline) -> i64| {
        s.target.as_ref().map(f).map(fmt_amount).unwrap_or_else(|| "-".into())
    };
    let rows = vec![
        vec![
            "Income".to_string(),
            fmt_amount(s.current.total_income),
            planned(|t| t.income),
            change(s.income_change_pct),
        ],
        vec![
            "Expense".to_string(),
            fmt_amount(s.current.total_expense),
            planned(|t| t.expense),
            change(s.expense_change_pct),
        ],
        vec![
            "Savings".to_string(),
            fmt_amount(s.current.total_savings),
            planned(|t| t.savings),
            change(s.savings_change_pct),
        ],
        vec![
            "Leftover".to_string(),
            fmt_amount(s.current.leftover),
            planned(|t| t.leftover),
            change(s.leftover_change_pct),
        ],
        vec![
            "Emergency fund".to_string(),
            fmt_amount(s.emergency_fund_balance),
            planned(|t| t.emergency_fund),
            String::new(),
        ],
        vec![
            "Debt installments".to_string(),
            fmt_amount(s.debt_installments),
            String::new(),
            String::new(),
        ],
    ];
    println!("{}", pretty_table(&["Metric", "Actual", "Target", "vs last month"], rows));
    if let Some(t) = &s.target {
        if t.is_provisional {
            println!("Target copied from {} (not saved for {} yet)", t.source_month, s.month_year);
        }
    }

    let slices = s
        .allocation
        .slices
        .iter()
        .map(|slice| {
            let name = match slice.kind {
                SliceKind::Expense => "Expense",
                SliceKind::Savings => "Savings",
                SliceKind::Leftover => "Leftover",
            };
            vec![name.to_string(), fmt_amount(slice.amount), format!("{}%", slice.pct)]
        })
        .collect();
    println!("{}", pretty_table(&["Allocation", "Amount", "Share"], slices));
    if s.allocation.is_overspent {
        println!("Overspent by {}", fmt_amount(s.allocation.overspending_amount));
    }

    let h = &report.health;
    println!(
        "Health: {} (debt {}%, savings {}%)\n{}\n{}",
        h.status.label(),
        h.debt_ratio,
        h.savings_ratio,
        h.explanation,
        h.recommendation
    );
    Ok(())
}

fn year(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let year = *sub.get_one::<i32>("year").unwrap();
    let txs = db::load_transactions(conn)?;
    let trend = yearly_trend(&txs, year);
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &trend)? {
        return Ok(());
    }
    let rows = trend
        .iter()
        .map(|m| {
            vec![
                format!("{}-{:02}", year, m.month + 1),
                fmt_amount(m.income),
                fmt_amount(m.expense),
                fmt_amount(m.net_cash_flow),
            ]
        })
        .collect();
    println!("{}", pretty_table(&["Month", "Income", "Expense", "Net"], rows));
    Ok(())
}

fn category_rows(items: &[CategoryTotal]) -> Vec<Vec<String>> {
    items
        .iter()
        .map(|c| vec![c.category.clone(), fmt_amount(c.amount)])
        .collect()
}

fn period(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let (start, end) = match (sub.get_one::<String>("month"), sub.get_one::<i32>("year")) {
        (Some(_), Some(_)) => return Err(anyhow!("Use either --month or --year, not both")),
        (Some(m), None) => month_bounds(&parse_month(m)?)?,
        (None, Some(y)) => year_bounds(*y).ok_or_else(|| anyhow!("Invalid year {}", y))?,
        (None, None) => month_bounds(&month_key(today()))?,
    };
    let txs = db::load_transactions(conn)?;
    let analysis = analyze_period(&txs, start, end);
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &analysis)? {
        return Ok(());
    }

    println!("{} .. {}", analysis.start, analysis.end);
    println!(
        "{}",
        pretty_table(
            &["Income", "Expense", "Leftover"],
            vec![vec![
                fmt_amount(analysis.total_income),
                fmt_amount(analysis.total_expense),
                fmt_amount(analysis.leftover),
            ]],
        )
    );
    if let Some(t) = &analysis.top_income {
        println!("Largest income: {} {} ({})", t.date, fmt_amount(t.amount), t.description);
    }
    if let Some(t) = &analysis.top_expense {
        println!("Largest expense: {} {} ({})", t.date, fmt_amount(t.amount), t.description);
    }
    println!(
        "{}",
        pretty_table(&["Income category", "Amount"], category_rows(&analysis.income_by_category))
    );
    println!(
        "{}",
        pretty_table(&["Expense category", "Amount"], category_rows(&analysis.expense_by_category))
    );
    Ok(())
}
