// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::{EngineError, EngineResult};
use anyhow::{Context, Result};
use chrono::{Datelike, Months, NaiveDate};
use comfy_table::{presets::UTF8_FULL, Cell, Table};
use rusqlite::{params, Connection, OptionalExtension};
use rust_decimal::Decimal;

pub const DEFAULT_SAVINGS_CATEGORY: &str = "Tabungan";
pub const DEFAULT_DEBT_CATEGORY: &str = "Cicilan Utang";

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s))
}

pub fn parse_month(s: &str) -> Result<String> {
    let s = s.trim();
    month_start(s)?;
    Ok(s.to_string())
}

/// `YYYY-MM` key for the month containing `date`.
pub fn month_key(date: NaiveDate) -> String {
    format!("{:04}-{:02}", date.year(), date.month())
}

/// First day of a `YYYY-MM` month. Only the zero-padded form is accepted so that
/// string ordering of keys matches calendar ordering.
pub fn month_start(month: &str) -> EngineResult<NaiveDate> {
    let invalid = || EngineError::InvalidMonth(month.to_string());
    let (y, m) = month.split_once('-').ok_or_else(invalid)?;
    if y.len() != 4 || m.len() != 2 {
        return Err(invalid());
    }
    let y: i32 = y.parse().map_err(|_| invalid())?;
    let m: u32 = m.parse().map_err(|_| invalid())?;
    NaiveDate::from_ymd_opt(y, m, 1).ok_or_else(invalid)
}

/// Last day of a `YYYY-MM` month.
pub fn month_end(month: &str) -> EngineResult<NaiveDate> {
    month_start(month)?
        .checked_add_months(Months::new(1))
        .and_then(|d| d.pred_opt())
        .ok_or_else(|| EngineError::InvalidMonth(month.to_string()))
}

/// Inclusive first and last day of a `YYYY-MM` month.
pub fn month_bounds(month: &str) -> EngineResult<(NaiveDate, NaiveDate)> {
    Ok((month_start(month)?, month_end(month)?))
}

pub fn previous_month(month: &str) -> EngineResult<String> {
    let start = month_start(month)?;
    start
        .checked_sub_months(Months::new(1))
        .map(month_key)
        .ok_or_else(|| EngineError::InvalidMonth(month.to_string()))
}

/// Inclusive first and last day of a calendar year.
pub fn year_bounds(year: i32) -> Option<(NaiveDate, NaiveDate)> {
    Some((
        NaiveDate::from_ymd_opt(year, 1, 1)?,
        NaiveDate::from_ymd_opt(year, 12, 31)?,
    ))
}

/// Parse a free-text amount field: every non-digit is dropped and an empty
/// result is zero. Values beyond `i64::MAX` saturate.
pub fn parse_amount(s: &str) -> i64 {
    s.chars()
        .filter_map(|c| c.to_digit(10))
        .fold(0i64, |acc, d| acc.saturating_mul(10).saturating_add(d as i64))
}

/// `part / whole * 100`, rounded to two decimals; zero when `whole` is not positive.
pub fn percent_of(part: i64, whole: i64) -> Decimal {
    if whole <= 0 {
        return Decimal::ZERO;
    }
    (Decimal::from(part) * Decimal::ONE_HUNDRED / Decimal::from(whole)).round_dp(2)
}

/// Whole units with `.` thousands separators, e.g. `-1.250.000`.
pub fn fmt_amount(v: i64) -> String {
    let digits = v.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    if v < 0 {
        format!("-{}", out)
    } else {
        out
    }
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        // If v is an array, stream each element; else stream single line
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}

pub fn id_for_account(conn: &Connection, name: &str) -> Result<i64> {
    let mut stmt = conn.prepare("SELECT id FROM accounts WHERE name=?1")?;
    let id: i64 = stmt
        .query_row(params![name], |r| r.get(0))
        .with_context(|| format!("Account '{}' not found", name))?;
    Ok(id)
}

pub fn get_setting(conn: &Connection, key: &str) -> Result<Option<String>> {
    let v: Option<String> = conn
        .query_row("SELECT value FROM settings WHERE key=?1", params![key], |r| {
            r.get(0)
        })
        .optional()?;
    Ok(v)
}

pub fn set_setting(conn: &Connection, key: &str, value: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO settings(key, value) VALUES(?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        params![key, value],
    )?;
    Ok(())
}

/// Category tag that marks an expense transaction as a savings transfer.
pub fn savings_category(conn: &Connection) -> Result<String> {
    Ok(get_setting(conn, "savings_category")?
        .unwrap_or_else(|| DEFAULT_SAVINGS_CATEGORY.to_string()))
}

/// Category tag used for expense transactions that pay a debt installment.
pub fn debt_category(conn: &Connection) -> Result<String> {
    Ok(get_setting(conn, "debt_category")?.unwrap_or_else(|| DEFAULT_DEBT_CATEGORY.to_string()))
}
