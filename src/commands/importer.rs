// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db::insert_transaction;
use crate::models::{Transaction, TxKind};
use crate::utils::{id_for_account, parse_amount, parse_date};
use anyhow::{Context, Result, anyhow};
use csv::ReaderBuilder;
use rusqlite::Connection;
use std::collections::{HashMap, hash_map::Entry};

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => import_transactions(conn, sub),
        _ => Ok(()),
    }
}

/// Columns: `date,description,amount,type,category[,account]`. The whole file
/// is imported in one database transaction, so a bad row leaves nothing behind.
fn import_transactions(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let path = sub.get_one::<String>("path").unwrap().trim();
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Open CSV {}", path))?;

    let tx = conn.transaction()?;
    let mut account_cache: HashMap<String, i64> = HashMap::new();
    let mut count = 0usize;

    for (line, result) in rdr.records().enumerate() {
        let rec = result?;
        let row = line + 2;
        let date_raw = rec.get(0).context("date missing")?.trim().to_string();
        let description = rec.get(1).context("description missing")?.trim().to_string();
        let amount_raw = rec.get(2).context("amount missing")?.trim().to_string();
        let kind_raw = rec.get(3).context("type missing")?.trim().to_string();
        let category = rec.get(4).context("category missing")?.trim().to_string();
        let account = rec.get(5).map(|s| s.trim()).filter(|s| !s.is_empty());

        let date = parse_date(&date_raw)
            .with_context(|| format!("Row {}: invalid date '{}'", row, date_raw))?;
        let kind = TxKind::parse(&kind_raw)
            .ok_or_else(|| anyhow!("Row {}: invalid type '{}'", row, kind_raw))?;
        let amount = parse_amount(&amount_raw);
        if amount <= 0 {
            return Err(anyhow!("Row {}: invalid amount '{}'", row, amount_raw));
        }
        if category.is_empty() {
            return Err(anyhow!("Row {}: category is empty", row));
        }

        let account_id = match account {
            None => None,
            Some(name) => Some(match account_cache.entry(name.to_string()) {
                Entry::Occupied(entry) => *entry.get(),
                Entry::Vacant(entry) => {
                    let fetched = id_for_account(&tx, name)
                        .with_context(|| format!("Row {}: unknown account", row))?;
                    *entry.insert(fetched)
                }
            }),
        };

        insert_transaction(
            &tx,
            &Transaction {
                id: 0,
                date,
                description: if description.is_empty() {
                    category.clone()
                } else {
                    description
                },
                amount,
                kind,
                category,
                account_id,
            },
        )?;
        count += 1;
    }
    tx.commit()?;
    tracing::info!(count, path, "imported transactions");
    println!("Imported {} transactions from {}", count, path);
    Ok(())
}
