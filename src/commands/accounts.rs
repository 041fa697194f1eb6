// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db::load_accounts;
use crate::models::AccountKind;
use crate::utils::{fmt_amount, maybe_print_json, parse_amount, pretty_table};
use anyhow::{anyhow, Result};
use rusqlite::{params, Connection};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = sub.get_one::<String>("name").unwrap().trim();
            let typ_raw = sub.get_one::<String>("type").unwrap();
            let kind = AccountKind::parse(typ_raw)
                .ok_or_else(|| anyhow!("Invalid account type '{}' (use Bank|E-Wallet)", typ_raw))?;
            let balance = sub
                .get_one::<String>("balance")
                .map(|s| parse_amount(s))
                .unwrap_or(0);
            conn.execute(
                "INSERT INTO accounts(name, type, balance) VALUES (?1, ?2, ?3)",
                params![name, kind.as_str(), balance],
            )?;
            tracing::info!(account = name, "account added");
            println!("Added account '{}' ({}, {})", name, kind.as_str(), fmt_amount(balance));
        }
        Some(("list", sub)) => {
            let accounts = load_accounts(conn)?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &accounts)? {
                let data = accounts
                    .iter()
                    .map(|a| vec![a.name.clone(), a.kind.as_str().to_string(), fmt_amount(a.balance)])
                    .collect();
                println!("{}", pretty_table(&["Name", "Type", "Balance"], data));
            }
        }
        _ => {}
    }
    Ok(())
}
