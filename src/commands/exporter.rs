// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db::{load_accounts, load_transactions};
use anyhow::{Result, anyhow};
use rusqlite::Connection;
use serde_json::json;
use std::collections::HashMap;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => export_transactions(conn, sub),
        _ => Ok(()),
    }
}

fn export_transactions(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub.get_one::<String>("format").unwrap().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap();
    if fmt != "csv" && fmt != "json" {
        return Err(anyhow!("Unknown format: {} (use csv|json)", fmt));
    }

    let accounts: HashMap<i64, String> = load_accounts(conn)?
        .into_iter()
        .map(|a| (a.id, a.name))
        .collect();
    let mut txs = load_transactions(conn)?;
    txs.sort_by(|a, b| a.date.cmp(&b.date).then(a.id.cmp(&b.id)));
    let account_name = |id: Option<i64>| -> String {
        id.and_then(|id| accounts.get(&id).cloned()).unwrap_or_default()
    };

    if fmt == "csv" {
        let mut wtr = csv::Writer::from_path(out)?;
        wtr.write_record(["date", "description", "amount", "type", "category", "account"])?;
        for t in &txs {
            wtr.write_record([
                t.date.to_string(),
                t.description.clone(),
                t.amount.to_string(),
                t.kind.as_str().to_string(),
                t.category.clone(),
                account_name(t.account_id),
            ])?;
        }
        wtr.flush()?;
    } else {
        let items: Vec<_> = txs
            .iter()
            .map(|t| {
                json!({
                    "id": t.id, "date": t.date, "description": t.description, "amount": t.amount,
                    "type": t.kind.as_str(), "category": t.category, "account": account_name(t.account_id)
                })
            })
            .collect();
        std::fs::write(out, serde_json::to_string_pretty(&items)?)?;
    }
    tracing::info!(count = txs.len(), out = %out, "exported transactions");
    println!("Exported {} transactions to {}", txs.len(), out);
    Ok(())
}
