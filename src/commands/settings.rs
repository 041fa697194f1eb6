// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::{get_setting, set_setting, DEFAULT_DEBT_CATEGORY, DEFAULT_SAVINGS_CATEGORY};
use anyhow::{anyhow, Result};
use rusqlite::Connection;

/// Known keys and their defaults.
const KEYS: [(&str, &str); 2] = [
    ("savings_category", DEFAULT_SAVINGS_CATEGORY),
    ("debt_category", DEFAULT_DEBT_CATEGORY),
];

fn default_for(key: &str) -> Result<&'static str> {
    KEYS.iter()
        .find(|(k, _)| *k == key)
        .map(|(_, v)| *v)
        .ok_or_else(|| anyhow!("Unknown setting '{}' (use savings_category|debt_category)", key))
}

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("get", sub)) => {
            let key = sub.get_one::<String>("KEY").unwrap().trim();
            let fallback = default_for(key)?;
            let value = get_setting(conn, key)?.unwrap_or_else(|| fallback.to_string());
            println!("{} = {}", key, value);
        }
        Some(("set", sub)) => {
            let key = sub.get_one::<String>("KEY").unwrap().trim();
            let value = sub.get_one::<String>("VALUE").unwrap().trim();
            default_for(key)?;
            if value.is_empty() {
                return Err(anyhow!("Value for '{}' must not be empty", key));
            }
            set_setting(conn, key, value)?;
            tracing::info!(key, value, "setting updated");
            println!("{} = {}", key, value);
        }
        _ => {}
    }
    Ok(())
}
