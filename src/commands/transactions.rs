// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db::{delete_transaction, insert_transaction, load_transactions, replace_transaction, transaction_by_id};
use crate::models::{Transaction, TxKind};
use crate::utils::{fmt_amount, id_for_account, maybe_print_json, parse_amount, parse_date, parse_month, pretty_table};
use anyhow::{anyhow, Result};
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("edit", sub)) => edit(conn, sub)?,
        Some(("rm", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            delete_transaction(conn, id)?;
            tracing::info!(id, "transaction removed");
            println!("Removed transaction #{}", id);
        }
        Some(("list", sub)) => list(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn parse_kind(raw: &str) -> Result<TxKind> {
    TxKind::parse(raw).ok_or_else(|| anyhow!("Invalid type '{}' (use income|expense)", raw.trim()))
}

/// Amount from a free-text field; transactions must be strictly positive.
fn positive_amount(raw: &str) -> Result<i64> {
    let amount = parse_amount(raw);
    if amount <= 0 {
        return Err(anyhow!("Invalid amount '{}': must be greater than zero", raw.trim()));
    }
    Ok(amount)
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let date = parse_date(sub.get_one::<String>("date").unwrap())?;
    let kind = parse_kind(sub.get_one::<String>("type").unwrap())?;
    let amount = positive_amount(sub.get_one::<String>("amount").unwrap())?;
    let category = sub.get_one::<String>("category").unwrap().trim().to_string();
    let description = sub
        .get_one::<String>("description")
        .map(|s| s.trim().to_string())
        .unwrap_or_else(|| category.clone());
    let account_id = match sub.get_one::<String>("account") {
        Some(name) => Some(id_for_account(conn, name.trim())?),
        None => None,
    };

    let tx = Transaction {
        id: 0,
        date,
        description,
        amount,
        kind,
        category,
        account_id,
    };
    let db_tx = conn.unchecked_transaction()?;
    let id = insert_transaction(&db_tx, &tx)?;
    db_tx.commit()?;
    tracing::info!(id, kind = kind.as_str(), amount, "transaction recorded");
    println!(
        "Recorded #{} {} {} on {} ({})",
        id,
        kind.as_str(),
        fmt_amount(amount),
        date,
        tx.category
    );
    Ok(())
}

fn edit(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let mut tx = transaction_by_id(conn, id)?;
    if let Some(d) = sub.get_one::<String>("date") {
        tx.date = parse_date(d)?;
    }
    if let Some(t) = sub.get_one::<String>("type") {
        tx.kind = parse_kind(t)?;
    }
    if let Some(a) = sub.get_one::<String>("amount") {
        tx.amount = positive_amount(a)?;
    }
    if let Some(c) = sub.get_one::<String>("category") {
        tx.category = c.trim().to_string();
    }
    if let Some(d) = sub.get_one::<String>("description") {
        tx.description = d.trim().to_string();
    }
    if let Some(a) = sub.get_one::<String>("account") {
        tx.account_id = Some(id_for_account(conn, a.trim())?);
    }
    replace_transaction(conn, &tx)?;
    tracing::info!(id, "transaction replaced");
    println!("Updated transaction #{}", id);
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let data = query_rows(conn, sub)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|t| {
                vec![
                    t.id.to_string(),
                    t.date.to_string(),
                    t.kind.as_str().to_string(),
                    fmt_amount(t.amount),
                    t.category.clone(),
                    t.description.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["ID", "Date", "Type", "Amount", "Category", "Description"], rows)
        );
    }
    Ok(())
}

/// Newest first, filtered by the optional `--month`, `--category` and `--limit`.
pub fn query_rows(conn: &Connection, sub: &clap::ArgMatches) -> Result<Vec<Transaction>> {
    let month = match sub.get_one::<String>("month") {
        Some(m) => Some(parse_month(m)?),
        None => None,
    };
    let category = sub.get_one::<String>("category").map(|s| s.trim().to_string());
    let mut data: Vec<Transaction> = load_transactions(conn)?
        .into_iter()
        .filter(|t| month.as_ref().is_none_or(|m| crate::utils::month_key(t.date) == *m))
        .filter(|t| category.as_ref().is_none_or(|c| t.category.eq_ignore_ascii_case(c)))
        .collect();
    data.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));
    if let Some(limit) = sub.get_one::<usize>("limit") {
        data.truncate(*limit);
    }
    Ok(data)
}
