// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::date_or_today;
use crate::db;
use crate::engine::debt::{
    append_payment, compute_debt_progress, reconstruct_from_partial_state, DebtProgress, PartialDebt,
    MAX_TENOR_MONTHS,
};
use crate::error::EngineError;
use crate::models::{DebtItem, Transaction, TxKind};
use crate::utils::{debt_category, fmt_amount, id_for_account, maybe_print_json, parse_amount, pretty_table};
use anyhow::{anyhow, Result};
use rusqlite::Connection;
use serde::Serialize;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("onboard", sub)) => onboard(conn, sub)?,
        Some(("pay", sub)) => pay(conn, sub)?,
        Some(("list", sub)) => list(conn, sub, false)?,
        Some(("history", sub)) => list(conn, sub, true)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let total = parse_amount(sub.get_one::<String>("total").unwrap());
    if total <= 0 {
        return Err(anyhow!("Total amount must be greater than zero"));
    }
    let tenor = *sub.get_one::<i64>("tenor").unwrap();
    if !(0..=MAX_TENOR_MONTHS).contains(&tenor) {
        return Err(EngineError::InvalidTenor(tenor).into());
    }
    let debt = DebtItem {
        id: 0,
        name: sub.get_one::<String>("name").unwrap().trim().to_string(),
        source: sub.get_one::<String>("source").unwrap().trim().to_string(),
        total_amount: total,
        monthly_installment: parse_amount(sub.get_one::<String>("installment").unwrap()),
        tenor,
        due_date: *sub.get_one::<u32>("due-day").unwrap(),
        payments: Vec::new(),
    };
    let id = db::insert_debt(conn, &debt)?;
    tracing::info!(id, name = %debt.name, "debt added");
    println!("Added debt #{} '{}' ({})", id, debt.name, fmt_amount(total));
    Ok(())
}

fn onboard(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let now = date_or_today(sub, "today")?;
    let partial = PartialDebt {
        name: sub.get_one::<String>("name").unwrap().trim().to_string(),
        source: sub.get_one::<String>("source").unwrap().trim().to_string(),
        remaining_amount: parse_amount(sub.get_one::<String>("remaining").unwrap()),
        remaining_tenor: *sub.get_one::<i64>("remaining-tenor").unwrap(),
        monthly_installment: parse_amount(sub.get_one::<String>("installment").unwrap()),
        total_tenor: *sub.get_one::<i64>("tenor").unwrap(),
        due_date: *sub.get_one::<u32>("due-day").unwrap(),
    };
    let debt = reconstruct_from_partial_state(0, &partial, now)?;
    let id = db::insert_debt(conn, &debt)?;
    tracing::info!(id, payments = debt.payments.len(), "debt onboarded");
    println!(
        "Added debt #{} '{}': total {}, {} earlier installments reconstructed",
        id,
        debt.name,
        fmt_amount(debt.total_amount),
        debt.payments.len()
    );
    Ok(())
}

fn pay(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let amount = parse_amount(sub.get_one::<String>("amount").unwrap());
    let date = date_or_today(sub, "date")?;
    let debt = db::debt_by_id(conn, id)?;

    let updated = append_payment(&debt, amount, date)?;
    let account_id = match sub.get_one::<String>("account") {
        Some(acct) => Some(id_for_account(conn, acct.trim())?),
        None => None,
    };

    let db_tx = conn.unchecked_transaction()?;
    if let Some(payment) = updated.payments.last() {
        db::insert_payment(&db_tx, id, payment)?;
    }
    if account_id.is_some() {
        let tx = Transaction {
            id: 0,
            date,
            description: format!("Cicilan {}", updated.name),
            amount,
            kind: TxKind::Expense,
            category: debt_category(&db_tx)?,
            account_id,
        };
        db::insert_transaction(&db_tx, &tx)?;
    }
    db_tx.commit()?;
    let progress = compute_debt_progress(&updated);
    tracing::info!(id, amount, remaining = progress.remaining, "debt payment recorded");
    println!(
        "Paid {} on '{}'; remaining {}{}",
        fmt_amount(amount),
        updated.name,
        fmt_amount(progress.remaining.max(0)),
        if progress.is_paid_off { " (paid off)" } else { "" }
    );
    Ok(())
}

#[derive(Serialize)]
struct DebtView<'a> {
    #[serde(flatten)]
    debt: &'a DebtItem,
    progress: DebtProgress,
}

fn list(conn: &Connection, sub: &clap::ArgMatches, paid_off: bool) -> Result<()> {
    let debts = db::load_debts(conn)?;
    let views: Vec<DebtView> = debts
        .iter()
        .map(|debt| DebtView {
            debt,
            progress: compute_debt_progress(debt),
        })
        .filter(|v| v.progress.is_paid_off == paid_off)
        .collect();
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &views)? {
        return Ok(());
    }
    let rows = views
        .iter()
        .map(|v| {
            let tenor = if v.progress.remaining_tenor <= 0 {
                "done".to_string()
            } else {
                format!("{} mo", v.progress.remaining_tenor)
            };
            vec![
                v.debt.id.to_string(),
                v.debt.name.clone(),
                v.debt.source.clone(),
                fmt_amount(v.debt.total_amount),
                fmt_amount(v.progress.paid_amount),
                // Overpaid debts show zero rather than a negative remainder.
                fmt_amount(v.progress.remaining.max(0)),
                format!("{}%", v.progress.progress_pct),
                tenor,
                v.debt.due_date.to_string(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &["ID", "Name", "Source", "Total", "Paid", "Remaining", "Progress", "Tenor Left", "Due Day"],
            rows
        )
    );
    Ok(())
}
