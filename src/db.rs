// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{
    Account, AccountKind, ActualArchive, ArchivedActualReport, Contribution, DebtItem, Household,
    MonthlyTarget, Payment, SavingsGoal, TargetArchive, Transaction, TxKind,
};
use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::{params, Connection, OptionalExtension};
use std::fs;
use std::path::PathBuf;

static APP: Lazy<(&str, &str, &str)> = Lazy::new(|| ("id.dompet", "Dompet", "dompet"));

/// Location of the database: `DOMPET_DB` if set, else the platform data dir.
pub fn db_path() -> Result<PathBuf> {
    if let Some(p) = std::env::var_os("DOMPET_DB").filter(|p| !p.is_empty()) {
        return Ok(PathBuf::from(p));
    }
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.join("dompet.sqlite"))
}

pub fn open_or_init() -> Result<Connection> {
    let path = db_path()?;
    let conn =
        Connection::open(&path).with_context(|| format!("Open DB at {}", path.display()))?;
    init_schema(&conn)?;
    tracing::debug!(path = %path.display(), "database ready");
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
    PRAGMA foreign_keys = ON;

    CREATE TABLE IF NOT EXISTS settings(
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS accounts(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE,
        type TEXT NOT NULL,
        balance INTEGER NOT NULL DEFAULT 0,
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    );

    CREATE TABLE IF NOT EXISTS transactions(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        date TEXT NOT NULL,
        description TEXT NOT NULL,
        amount INTEGER NOT NULL CHECK(amount > 0),
        type TEXT NOT NULL CHECK(type IN ('INCOME','EXPENSE')),
        category TEXT NOT NULL,
        account_id INTEGER,
        created_at TEXT NOT NULL DEFAULT (datetime('now')),
        FOREIGN KEY(account_id) REFERENCES accounts(id) ON DELETE SET NULL
    );
    CREATE INDEX IF NOT EXISTS idx_transactions_date ON transactions(date);

    -- one target per month; body is the JSON MonthlyTarget
    CREATE TABLE IF NOT EXISTS targets(
        month_year TEXT PRIMARY KEY,
        body TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS actual_reports(
        month_year TEXT PRIMARY KEY,
        target TEXT NOT NULL,
        actuals TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS debts(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        source TEXT NOT NULL,
        total_amount INTEGER NOT NULL,
        monthly_installment INTEGER NOT NULL,
        tenor INTEGER NOT NULL,
        due_date INTEGER NOT NULL CHECK(due_date BETWEEN 1 AND 31)
    );

    CREATE TABLE IF NOT EXISTS debt_payments(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        debt_id INTEGER NOT NULL,
        date TEXT NOT NULL,
        amount INTEGER NOT NULL,
        FOREIGN KEY(debt_id) REFERENCES debts(id) ON DELETE CASCADE
    );

    CREATE TABLE IF NOT EXISTS goals(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        source TEXT NOT NULL,
        target_amount INTEGER NOT NULL,
        deadline TEXT NOT NULL,
        is_emergency_fund INTEGER NOT NULL DEFAULT 0
    );

    CREATE TABLE IF NOT EXISTS goal_contributions(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        goal_id INTEGER NOT NULL,
        date TEXT NOT NULL,
        amount INTEGER NOT NULL,
        FOREIGN KEY(goal_id) REFERENCES goals(id) ON DELETE CASCADE
    );
    "#,
    )?;
    Ok(())
}

fn parse_stored_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").with_context(|| format!("Invalid stored date '{}'", s))
}

pub fn load_accounts(conn: &Connection) -> Result<Vec<Account>> {
    let mut stmt = conn.prepare("SELECT id, name, type, balance FROM accounts ORDER BY name")?;
    let rows = stmt.query_map([], |r| {
        Ok((
            r.get::<_, i64>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, String>(2)?,
            r.get::<_, i64>(3)?,
        ))
    })?;
    let mut out = Vec::new();
    for row in rows {
        let (id, name, typ, balance) = row?;
        let kind = AccountKind::parse(&typ)
            .ok_or_else(|| anyhow!("Invalid account type '{}' for {}", typ, name))?;
        out.push(Account {
            id,
            name,
            kind,
            balance,
        });
    }
    Ok(out)
}

const TRANSACTION_COLUMNS: &str =
    "SELECT id, date, description, amount, type, category, account_id FROM transactions";

type TransactionRow = (i64, String, String, i64, String, String, Option<i64>);

fn read_transaction_row(r: &rusqlite::Row<'_>) -> rusqlite::Result<TransactionRow> {
    Ok((
        r.get(0)?,
        r.get(1)?,
        r.get(2)?,
        r.get(3)?,
        r.get(4)?,
        r.get(5)?,
        r.get(6)?,
    ))
}

fn into_transaction(row: TransactionRow) -> Result<Transaction> {
    let (id, d, description, amount, typ, category, account_id) = row;
    let kind =
        TxKind::parse(&typ).ok_or_else(|| anyhow!("Invalid transaction type '{}' on #{}", typ, id))?;
    Ok(Transaction {
        id,
        date: parse_stored_date(&d)?,
        description,
        amount,
        kind,
        category,
        account_id,
    })
}

pub fn load_transactions(conn: &Connection) -> Result<Vec<Transaction>> {
    let mut stmt = conn.prepare(&format!("{} ORDER BY date, id", TRANSACTION_COLUMNS))?;
    let rows = stmt.query_map([], read_transaction_row)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(into_transaction(row?)?);
    }
    Ok(out)
}

pub fn insert_transaction(conn: &Connection, tx: &Transaction) -> Result<i64> {
    conn.execute(
        "INSERT INTO transactions(date, description, amount, type, category, account_id)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            tx.date.to_string(),
            tx.description,
            tx.amount,
            tx.kind.as_str(),
            tx.category,
            tx.account_id
        ],
    )?;
    let id = conn.last_insert_rowid();
    if let Some(acct) = tx.account_id {
        adjust_balance(conn, acct, signed_amount(tx))?;
    }
    Ok(id)
}

/// Replace a stored transaction by id, moving its effect between accounts.
pub fn replace_transaction(conn: &Connection, tx: &Transaction) -> Result<()> {
    let old = transaction_by_id(conn, tx.id)?;
    let db_tx = conn.unchecked_transaction()?;
    if let Some(acct) = old.account_id {
        adjust_balance(&db_tx, acct, -signed_amount(&old))?;
    }
    db_tx.execute(
        "UPDATE transactions SET date=?1, description=?2, amount=?3, type=?4, category=?5, account_id=?6
         WHERE id=?7",
        params![
            tx.date.to_string(),
            tx.description,
            tx.amount,
            tx.kind.as_str(),
            tx.category,
            tx.account_id,
            tx.id
        ],
    )?;
    if let Some(acct) = tx.account_id {
        adjust_balance(&db_tx, acct, signed_amount(tx))?;
    }
    db_tx.commit()?;
    Ok(())
}

pub fn delete_transaction(conn: &Connection, id: i64) -> Result<()> {
    let old = transaction_by_id(conn, id)?;
    let db_tx = conn.unchecked_transaction()?;
    if let Some(acct) = old.account_id {
        adjust_balance(&db_tx, acct, -signed_amount(&old))?;
    }
    db_tx.execute("DELETE FROM transactions WHERE id=?1", params![id])?;
    db_tx.commit()?;
    Ok(())
}

pub fn transaction_by_id(conn: &Connection, id: i64) -> Result<Transaction> {
    let row = conn
        .query_row(
            &format!("{} WHERE id=?1", TRANSACTION_COLUMNS),
            params![id],
            read_transaction_row,
        )
        .optional()?
        .ok_or_else(|| anyhow!("Transaction #{} not found", id))?;
    into_transaction(row)
}

fn signed_amount(tx: &Transaction) -> i64 {
    match tx.kind {
        TxKind::Income => tx.amount,
        TxKind::Expense => -tx.amount,
    }
}

fn adjust_balance(conn: &Connection, account_id: i64, delta: i64) -> Result<()> {
    conn.execute(
        "UPDATE accounts SET balance = balance + ?1 WHERE id=?2",
        params![delta, account_id],
    )?;
    Ok(())
}

pub fn load_targets(conn: &Connection) -> Result<TargetArchive> {
    let mut stmt = conn.prepare("SELECT month_year, body FROM targets ORDER BY month_year")?;
    let rows = stmt.query_map([], |r| Ok((r.get::<_, String>(0)?, r.get::<_, String>(1)?)))?;
    let mut out = TargetArchive::new();
    for row in rows {
        let (month, body) = row?;
        let target: MonthlyTarget = serde_json::from_str(&body)
            .with_context(|| format!("Invalid target body for {}", month))?;
        out.insert(month, target);
    }
    Ok(out)
}

pub fn save_target(conn: &Connection, month: &str, target: &MonthlyTarget) -> Result<()> {
    conn.execute(
        "INSERT INTO targets(month_year, body) VALUES (?1, ?2)
         ON CONFLICT(month_year) DO UPDATE SET body=excluded.body",
        params![month, serde_json::to_string(target)?],
    )?;
    Ok(())
}

pub fn load_reports(conn: &Connection) -> Result<ActualArchive> {
    let mut stmt =
        conn.prepare("SELECT month_year, target, actuals FROM actual_reports ORDER BY month_year")?;
    let rows = stmt.query_map([], |r| {
        Ok((
            r.get::<_, String>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, String>(2)?,
        ))
    })?;
    let mut out = ActualArchive::new();
    for row in rows {
        let (month, target, actuals) = row?;
        let report = ArchivedActualReport {
            month_year: month.clone(),
            target: serde_json::from_str(&target)
                .with_context(|| format!("Invalid target snapshot for {}", month))?,
            actuals: serde_json::from_str(&actuals)
                .with_context(|| format!("Invalid actuals for {}", month))?,
        };
        out.insert(month, report);
    }
    Ok(out)
}

pub fn save_report(conn: &Connection, report: &ArchivedActualReport) -> Result<()> {
    conn.execute(
        "INSERT INTO actual_reports(month_year, target, actuals) VALUES (?1, ?2, ?3)
         ON CONFLICT(month_year) DO UPDATE SET target=excluded.target, actuals=excluded.actuals",
        params![
            report.month_year,
            serde_json::to_string(&report.target)?,
            serde_json::to_string(&report.actuals)?
        ],
    )?;
    Ok(())
}

const DEBT_COLUMNS: &str =
    "SELECT id, name, source, total_amount, monthly_installment, tenor, due_date FROM debts";

fn read_debt_row(r: &rusqlite::Row<'_>) -> rusqlite::Result<DebtItem> {
    Ok(DebtItem {
        id: r.get(0)?,
        name: r.get(1)?,
        source: r.get(2)?,
        total_amount: r.get(3)?,
        monthly_installment: r.get(4)?,
        tenor: r.get(5)?,
        due_date: r.get(6)?,
        payments: Vec::new(),
    })
}

pub fn load_debts(conn: &Connection) -> Result<Vec<DebtItem>> {
    let mut stmt = conn.prepare(&format!("{} ORDER BY id", DEBT_COLUMNS))?;
    let rows = stmt.query_map([], read_debt_row)?;
    let mut debts = Vec::new();
    for row in rows {
        debts.push(row?);
    }

    let mut pstmt =
        conn.prepare("SELECT debt_id, date, amount FROM debt_payments ORDER BY date, id")?;
    let mut cur = pstmt.query([])?;
    while let Some(r) = cur.next()? {
        let debt_id: i64 = r.get(0)?;
        let d: String = r.get(1)?;
        let amount: i64 = r.get(2)?;
        if let Some(debt) = debts.iter_mut().find(|x| x.id == debt_id) {
            debt.payments.push(Payment {
                date: parse_stored_date(&d)?,
                amount,
            });
        }
    }
    Ok(debts)
}

pub fn debt_by_id(conn: &Connection, id: i64) -> Result<DebtItem> {
    let mut debt = conn
        .query_row(&format!("{} WHERE id=?1", DEBT_COLUMNS), params![id], read_debt_row)
        .optional()?
        .ok_or_else(|| anyhow!("Debt #{} not found", id))?;
    let mut stmt =
        conn.prepare("SELECT date, amount FROM debt_payments WHERE debt_id=?1 ORDER BY date, id")?;
    let rows = stmt.query_map(params![id], |r| Ok((r.get::<_, String>(0)?, r.get::<_, i64>(1)?)))?;
    for row in rows {
        let (d, amount) = row?;
        debt.payments.push(Payment {
            date: parse_stored_date(&d)?,
            amount,
        });
    }
    Ok(debt)
}

/// Insert a new debt with its payment log and return the assigned id.
pub fn insert_debt(conn: &Connection, debt: &DebtItem) -> Result<i64> {
    let db_tx = conn.unchecked_transaction()?;
    db_tx.execute(
        "INSERT INTO debts(name, source, total_amount, monthly_installment, tenor, due_date)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            debt.name,
            debt.source,
            debt.total_amount,
            debt.monthly_installment,
            debt.tenor,
            debt.due_date
        ],
    )?;
    let id = db_tx.last_insert_rowid();
    for p in &debt.payments {
        insert_payment(&db_tx, id, p)?;
    }
    db_tx.commit()?;
    Ok(id)
}

pub fn insert_payment(conn: &Connection, debt_id: i64, payment: &Payment) -> Result<()> {
    conn.execute(
        "INSERT INTO debt_payments(debt_id, date, amount) VALUES (?1, ?2, ?3)",
        params![debt_id, payment.date.to_string(), payment.amount],
    )?;
    Ok(())
}

const GOAL_COLUMNS: &str =
    "SELECT id, name, source, target_amount, deadline, is_emergency_fund FROM goals";

type GoalRow = (i64, String, String, i64, String, bool);

fn read_goal_row(r: &rusqlite::Row<'_>) -> rusqlite::Result<GoalRow> {
    Ok((r.get(0)?, r.get(1)?, r.get(2)?, r.get(3)?, r.get(4)?, r.get(5)?))
}

fn into_goal(row: GoalRow) -> Result<SavingsGoal> {
    let (id, name, source, target_amount, deadline, is_emergency_fund) = row;
    Ok(SavingsGoal {
        id,
        name,
        source,
        target_amount,
        deadline: parse_stored_date(&deadline)?,
        contributions: Vec::new(),
        is_emergency_fund,
    })
}

pub fn load_goals(conn: &Connection) -> Result<Vec<SavingsGoal>> {
    let mut stmt = conn.prepare(&format!("{} ORDER BY id", GOAL_COLUMNS))?;
    let rows = stmt.query_map([], read_goal_row)?;
    let mut goals = Vec::new();
    for row in rows {
        goals.push(into_goal(row?)?);
    }

    let mut cstmt =
        conn.prepare("SELECT goal_id, date, amount FROM goal_contributions ORDER BY date, id")?;
    let mut cur = cstmt.query([])?;
    while let Some(r) = cur.next()? {
        let goal_id: i64 = r.get(0)?;
        let d: String = r.get(1)?;
        let amount: i64 = r.get(2)?;
        if let Some(goal) = goals.iter_mut().find(|g| g.id == goal_id) {
            goal.contributions.push(Contribution {
                date: parse_stored_date(&d)?,
                amount,
            });
        }
    }
    Ok(goals)
}

pub fn goal_by_id(conn: &Connection, id: i64) -> Result<SavingsGoal> {
    let row = conn
        .query_row(&format!("{} WHERE id=?1", GOAL_COLUMNS), params![id], read_goal_row)
        .optional()?
        .ok_or_else(|| anyhow!("Goal #{} not found", id))?;
    let mut goal = into_goal(row)?;
    let mut stmt = conn.prepare(
        "SELECT date, amount FROM goal_contributions WHERE goal_id=?1 ORDER BY date, id",
    )?;
    let rows = stmt.query_map(params![id], |r| Ok((r.get::<_, String>(0)?, r.get::<_, i64>(1)?)))?;
    for row in rows {
        let (d, amount) = row?;
        goal.contributions.push(Contribution {
            date: parse_stored_date(&d)?,
            amount,
        });
    }
    Ok(goal)
}

pub fn insert_goal(conn: &Connection, goal: &SavingsGoal) -> Result<i64> {
    let db_tx = conn.unchecked_transaction()?;
    db_tx.execute(
        "INSERT INTO goals(name, source, target_amount, deadline, is_emergency_fund)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            goal.name,
            goal.source,
            goal.target_amount,
            goal.deadline.to_string(),
            goal.is_emergency_fund
        ],
    )?;
    let id = db_tx.last_insert_rowid();
    for c in &goal.contributions {
        insert_contribution(&db_tx, id, c)?;
    }
    db_tx.commit()?;
    Ok(id)
}

pub fn insert_contribution(conn: &Connection, goal_id: i64, c: &Contribution) -> Result<()> {
    conn.execute(
        "INSERT INTO goal_contributions(goal_id, date, amount) VALUES (?1, ?2, ?3)",
        params![goal_id, c.date.to_string(), c.amount],
    )?;
    Ok(())
}

/// Load every record the engine works on.
pub fn load_household(conn: &Connection) -> Result<Household> {
    Ok(Household {
        transactions: load_transactions(conn)?,
        debts: load_debts(conn)?,
        goals: load_goals(conn)?,
        targets: load_targets(conn)?,
        reports: load_reports(conn)?,
    })
}
