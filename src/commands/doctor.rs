// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db;
use crate::engine::debt::compute_debt_progress;
use crate::models::Household;
use crate::utils::{fmt_amount, pretty_table};
use anyhow::Result;
use rusqlite::Connection;

/// One `(issue, detail)` row per inconsistency found in stored records.
pub fn find_issues(household: &Household) -> Vec<Vec<String>> {
    let mut rows = Vec::new();

    // 1) Debts paid beyond their total
    for debt in &household.debts {
        let progress = compute_debt_progress(debt);
        if progress.remaining < 0 {
            rows.push(vec![
                "debt_overpaid".into(),
                format!("#{} {} by {}", debt.id, debt.name, fmt_amount(-progress.remaining)),
            ]);
        }
    }

    // 2) Goals whose contributions sum below zero
    for goal in &household.goals {
        let balance = goal.current_amount();
        if balance < 0 {
            rows.push(vec![
                "goal_negative_balance".into(),
                format!("#{} {} at -{}", goal.id, goal.name, fmt_amount(-balance)),
            ]);
        }
    }

    // 3) Actuals recorded against ids missing from the month's snapshot
    for (month, report) in &household.reports {
        for id in report.actuals.keys() {
            if report.target.find_item(id).is_none() {
                rows.push(vec!["actual_unknown_item".into(), format!("{} {}", month, id)]);
            }
        }
        // 4) Actuals for a month that never had its own target saved
        if !household.targets.contains_key(month) {
            rows.push(vec!["actual_without_target".into(), month.clone()]);
        }
    }
    rows
}

pub fn handle(conn: &Connection) -> Result<()> {
    let household = db::load_household(conn)?;
    let rows = find_issues(&household);
    tracing::debug!(issues = rows.len(), "doctor finished");
    if rows.is_empty() {
        println!("doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}
