// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use dompet::models::{Transaction, TxKind};
use dompet::{cli, commands::exporter, db};
use rusqlite::Connection;
use serde_json::json;
use tempfile::tempdir;

fn base_conn() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    conn.execute(
        "INSERT INTO accounts(id,name,type,balance) VALUES (1,'GoPay','E-Wallet',0)",
        [],
    )
    .unwrap();
    db::insert_transaction(
        &conn,
        &Transaction {
            id: 0,
            date: NaiveDate::from_ymd_opt(2025, 1, 2).unwrap(),
            description: "Warung Bu Sri".into(),
            amount: 35_000,
            kind: TxKind::Expense,
            category: "Makan".into(),
            account_id: Some(1),
        },
    )
    .unwrap();
    conn
}

fn export(conn: &Connection, format: &str, out: &str) -> anyhow::Result<()> {
    let cli = cli::build_cli();
    let matches = cli.get_matches_from([
        "dompet",
        "export",
        "transactions",
        "--format",
        format,
        "--out",
        out,
    ]);
    if let Some(("export", export_m)) = matches.subcommand() {
        exporter::handle(conn, export_m)
    } else {
        panic!("no export subcommand");
    }
}

#[test]
fn export_transactions_writes_pretty_json() {
    let conn = base_conn();
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("export.json");
    export(&conn, "json", &out_path.to_string_lossy()).unwrap();

    let contents = std::fs::read_to_string(&out_path).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&contents).unwrap();
    assert_eq!(
        parsed,
        json!([
            {
                "id": 1,
                "date": "2025-01-02",
                "description": "Warung Bu Sri",
                "amount": 35000,
                "type": "EXPENSE",
                "category": "Makan",
                "account": "GoPay"
            }
        ])
    );
}

#[test]
fn export_transactions_writes_importable_csv() {
    let conn = base_conn();
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("export.csv");
    export(&conn, "CSV", &out_path.to_string_lossy()).unwrap();

    let contents = std::fs::read_to_string(&out_path).unwrap();
    let mut lines = contents.lines();
    assert_eq!(lines.next(), Some("date,description,amount,type,category,account"));
    assert_eq!(lines.next(), Some("2025-01-02,Warung Bu Sri,35000,EXPENSE,Makan,GoPay"));
    assert_eq!(lines.next(), None);
}

#[test]
fn export_transactions_rejects_unknown_format() {
    let conn = base_conn();
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("export.unknown");
    assert!(export(&conn, "xml", &out_path.to_string_lossy()).is_err());
    assert!(!out_path.exists());
}
