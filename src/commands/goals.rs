// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::{date_or_today, today};
use crate::db;
use crate::engine::savings::{append_contribution, compute_savings_progress, SavingsProgress};
use crate::error::EngineError;
use crate::models::{Contribution, SavingsGoal, Transaction, TxKind};
use crate::utils::{fmt_amount, id_for_account, maybe_print_json, parse_amount, parse_date, pretty_table, savings_category};
use anyhow::{anyhow, Result};
use rusqlite::Connection;
use serde::Serialize;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("deposit", sub)) => contribute(conn, sub, 1)?,
        Some(("withdraw", sub)) => contribute(conn, sub, -1)?,
        Some(("list", sub)) => list(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let target = parse_amount(sub.get_one::<String>("target").unwrap());
    if target <= 0 {
        return Err(anyhow!("Target amount must be greater than zero"));
    }
    let initial = sub
        .get_one::<String>("initial")
        .map(|s| parse_amount(s))
        .unwrap_or(0);
    let goal = SavingsGoal {
        id: 0,
        name: sub.get_one::<String>("name").unwrap().trim().to_string(),
        source: sub.get_one::<String>("source").unwrap().trim().to_string(),
        target_amount: target,
        deadline: parse_date(sub.get_one::<String>("deadline").unwrap())?,
        contributions: if initial > 0 {
            vec![Contribution {
                date: today(),
                amount: initial,
            }]
        } else {
            Vec::new()
        },
        is_emergency_fund: sub.get_flag("emergency"),
    };
    let id = db::insert_goal(conn, &goal)?;
    tracing::info!(id, name = %goal.name, "goal added");
    println!(
        "Added goal #{} '{}' (target {}, by {})",
        id,
        goal.name,
        fmt_amount(target),
        goal.deadline
    );
    Ok(())
}

fn contribute(conn: &Connection, sub: &clap::ArgMatches, sign: i64) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let raw = parse_amount(sub.get_one::<String>("amount").unwrap());
    if raw <= 0 {
        return Err(EngineError::InvalidAmount(raw).into());
    }
    let date = date_or_today(sub, "date")?;
    let goal = db::goal_by_id(conn, id)?;
    if !goal.is_emergency_fund && goal.current_amount() >= goal.target_amount {
        return Err(anyhow!("Goal '{}' is already achieved and closed", goal.name));
    }

    let updated = append_contribution(&goal, sign * raw, date)?;
    // withdraw has no --account
    let account = if sign > 0 { sub.get_one::<String>("account") } else { None };
    let account_id = match account {
        Some(acct) => Some(id_for_account(conn, acct.trim())?),
        None => None,
    };

    let db_tx = conn.unchecked_transaction()?;
    if let Some(c) = updated.contributions.last() {
        db::insert_contribution(&db_tx, id, c)?;
    }
    if account_id.is_some() {
        let tx = Transaction {
            id: 0,
            date,
            description: format!("Tabungan {}", updated.name),
            amount: raw,
            kind: TxKind::Expense,
            category: savings_category(&db_tx)?,
            account_id,
        };
        db::insert_transaction(&db_tx, &tx)?;
    }
    db_tx.commit()?;
    tracing::info!(id, amount = sign * raw, "goal contribution recorded");
    println!(
        "{} {} {} '{}'; balance {}",
        if sign > 0 { "Deposited" } else { "Withdrew" },
        fmt_amount(raw),
        if sign > 0 { "into" } else { "from" },
        updated.name,
        fmt_amount(updated.current_amount())
    );
    Ok(())
}

#[derive(Serialize)]
struct GoalView<'a> {
    #[serde(flatten)]
    goal: &'a SavingsGoal,
    progress: SavingsProgress,
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let now = date_or_today(sub, "today")?;
    let goals = db::load_goals(conn)?;
    let views: Vec<GoalView> = goals
        .iter()
        .map(|goal| GoalView {
            goal,
            progress: compute_savings_progress(goal, now),
        })
        .collect();
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &views)? {
        return Ok(());
    }
    let rows = views
        .iter()
        .map(|v| {
            let name = if v.goal.is_emergency_fund {
                format!("{} (dana darurat)", v.goal.name)
            } else {
                v.goal.name.clone()
            };
            vec![
                v.goal.id.to_string(),
                name,
                fmt_amount(v.progress.current_amount),
                fmt_amount(v.goal.target_amount),
                format!("{}%", v.progress.progress_pct),
                v.goal.deadline.to_string(),
                v.progress.days_remaining.to_string(),
                fmt_amount(v.progress.daily_target),
                if v.progress.is_achieved { "achieved" } else { "active" }.to_string(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &["ID", "Goal", "Saved", "Target", "Progress", "Deadline", "Days Left", "Per Day", "Status"],
            rows
        )
    );
    Ok(())
}
