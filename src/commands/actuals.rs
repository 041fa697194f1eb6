// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db;
use crate::engine::reconcile::{reconcile, Reconciliation};
use crate::engine::targets::record_actuals;
use crate::models::Polarity;
use crate::utils::{fmt_amount, maybe_print_json, parse_amount, parse_month, pretty_table};
use anyhow::{anyhow, Result};
use rusqlite::Connection;
use std::collections::BTreeMap;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("set", sub)) => set(conn, sub)?,
        Some(("report", sub)) => report(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn set(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let month = parse_month(sub.get_one::<String>("month").unwrap())?;
    let item = sub.get_one::<String>("item").unwrap().trim().to_string();
    let amount = parse_amount(sub.get_one::<String>("amount").unwrap()).to_string();

    let mut reports = db::load_reports(conn)?;
    let report = match reports.remove(&month) {
        // Keep the snapshot taken when the month's actuals were first saved.
        Some(mut existing) => {
            existing.actuals.insert(item.clone(), amount.clone());
            existing
        }
        None => {
            let targets = db::load_targets(conn)?;
            let mut actuals = BTreeMap::new();
            actuals.insert(item.clone(), amount.clone());
            let (report, _) = record_actuals(&month, &targets, &reports, actuals)?;
            report
        }
    };
    if report.target.find_item(&item).is_none() {
        return Err(anyhow!("Line item '{}' is not part of the {} target", item, month));
    }
    db::save_report(conn, &report)?;
    tracing::info!(month = %month, item = %item, "actual recorded");
    println!("Actual {} / {} = {}", month, item, amount);
    Ok(())
}

pub fn reconciliation_rows(rec: &Reconciliation) -> Vec<Vec<String>> {
    let mark = |ok: bool| (if ok { "yes" } else { "no" }).to_string();
    let mut rows = Vec::new();
    for section in &rec.sections {
        for line in &section.lines {
            rows.push(vec![
                section.section.label().to_string(),
                line.name.clone(),
                fmt_amount(line.target),
                fmt_amount(line.actual),
                fmt_amount(line.difference),
                mark(line.is_achieved),
            ]);
        }
        let rule = match section.polarity {
            Polarity::Higher => "Total (>= target)",
            Polarity::Lower => "Total (<= target)",
        };
        rows.push(vec![
            section.section.label().to_string(),
            rule.to_string(),
            fmt_amount(section.target),
            fmt_amount(section.actual),
            fmt_amount(section.difference),
            mark(section.is_achieved),
        ]);
    }
    rows
}

fn report(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let month = parse_month(sub.get_one::<String>("month").unwrap())?;
    let reports = db::load_reports(conn)?;
    let saved = reports
        .get(&month)
        .ok_or_else(|| anyhow!("No actuals saved for {}", month))?;
    let rec = reconcile(saved);
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &rec)? {
        println!(
            "{}",
            pretty_table(
                &["Section", "Item", "Target", "Actual", "Difference", "Achieved"],
                reconciliation_rows(&rec),
            )
        );
        println!(
            "{}: {}",
            month,
            if rec.is_achieved {
                "all targets achieved"
            } else {
                "some targets missed"
            }
        );
    }
    Ok(())
}
