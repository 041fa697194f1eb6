// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db;
use crate::engine::aggregate::target_headline;
use crate::engine::targets::{resolve_target, save_target, ResolvedTarget};
use crate::models::{ArchivedMonthlyTarget, MonthlyTarget, Section, TargetLineItem};
use crate::utils::{fmt_amount, maybe_print_json, parse_amount, parse_month, pretty_table};
use anyhow::{anyhow, Result};
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("set-item", sub)) => set_item(conn, sub)?,
        Some(("rm-item", sub)) => rm_item(conn, sub)?,
        Some(("show", sub)) => show(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        _ => {}
    }
    Ok(())
}

/// The target to edit for `month`: its saved entry, else the provisional copy
/// of the latest earlier month, else an empty plan.
fn editable_target(conn: &Connection, month: &str) -> Result<MonthlyTarget> {
    let archive = db::load_targets(conn)?;
    Ok(resolve_target(month, &archive)
        .map(|r| r.target)
        .unwrap_or_default())
}

fn persist(conn: &Connection, month: &str, target: MonthlyTarget) -> Result<()> {
    let archive = db::load_targets(conn)?;
    let next = save_target(&archive, month, target)?;
    if let Some(saved) = next.get(month) {
        db::save_target(conn, month, saved)?;
    }
    tracing::info!(month, "target saved");
    Ok(())
}

fn next_item_id(target: &MonthlyTarget, section: Section) -> String {
    let mut n = target.items(section).len() + 1;
    loop {
        let candidate = format!("{}-{}", section.key(), n);
        if target.find_item(&candidate).is_none() {
            return candidate;
        }
        n += 1;
    }
}

fn set_item(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let month = parse_month(sub.get_one::<String>("month").unwrap())?;
    let section_raw = sub.get_one::<String>("section").unwrap();
    let section = Section::parse(section_raw)
        .ok_or_else(|| anyhow!("Unknown section '{}'", section_raw.trim()))?;
    let name = sub.get_one::<String>("name").unwrap().trim().to_string();
    let amount = parse_amount(sub.get_one::<String>("amount").unwrap()).to_string();

    let mut target = editable_target(conn, &month)?;
    let id = match sub.get_one::<String>("id").map(|s| s.trim().to_string()) {
        Some(id) => id,
        None => next_item_id(&target, section),
    };
    // An existing id is replaced in place, even when it moves to another section.
    for sec in Section::ALL {
        target.items_mut(sec).retain(|i| i.id != id);
    }
    target.items_mut(section).push(TargetLineItem {
        id: id.clone(),
        name: name.clone(),
        amount: amount.clone(),
    });
    persist(conn, &month, target)?;
    println!("Target {} / {}: {} = {} (id {})", month, section.label(), name, amount, id);
    Ok(())
}

fn rm_item(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let month = parse_month(sub.get_one::<String>("month").unwrap())?;
    let id = sub.get_one::<String>("id").unwrap().trim();
    let mut target = editable_target(conn, &month)?;
    if target.find_item(id).is_none() {
        return Err(anyhow!("Line item '{}' not found in the {} target", id, month));
    }
    for sec in Section::ALL {
        target.items_mut(sec).retain(|i| i.id != id);
    }
    persist(conn, &month, target)?;
    println!("Removed line item {} from {}", id, month);
    Ok(())
}

pub fn target_rows(target: &MonthlyTarget) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    for section in Section::ALL {
        let mut subtotal = 0;
        for item in target.items(section) {
            let amount = parse_amount(&item.amount);
            subtotal += amount;
            rows.push(vec![
                section.label().to_string(),
                item.id.clone(),
                item.name.clone(),
                fmt_amount(amount),
            ]);
        }
        rows.push(vec![
            section.label().to_string(),
            String::new(),
            "Subtotal".to_string(),
            fmt_amount(subtotal),
        ]);
    }
    rows
}

fn show(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let month = parse_month(sub.get_one::<String>("month").unwrap())?;
    let archive = db::load_targets(conn)?;
    let resolved: Option<ResolvedTarget> = resolve_target(&month, &archive);
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &resolved)? {
        return Ok(());
    }
    match resolved {
        None => println!("No target for {} yet; budgeting has not started this month.", month),
        Some(r) => {
            if r.is_provisional {
                println!(
                    "Provisional target for {} (copied from {}, not saved yet)",
                    month, r.source_month
                );
            } else {
                println!("Target for {}", month);
            }
            println!(
                "{}",
                pretty_table(&["Section", "ID", "Item", "Amount"], target_rows(&r.target))
            );
        }
    }
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let archive = db::load_targets(conn)?;
    let rows: Vec<Vec<String>> = archive
        .iter()
        .rev()
        .map(|(month, target)| {
            let (income, expense, savings) = target_headline(target);
            vec![
                month.clone(),
                fmt_amount(income),
                fmt_amount(expense),
                fmt_amount(savings),
            ]
        })
        .collect();
    let entries: Vec<ArchivedMonthlyTarget> = archive
        .iter()
        .map(|(month, target)| ArchivedMonthlyTarget {
            month_year: month.clone(),
            target: target.clone(),
        })
        .collect();
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &entries)? {
        println!(
            "{}",
            pretty_table(&["Month", "Income", "Expense", "Savings"], rows)
        );
    }
    Ok(())
}
