// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use dompet::commands::{actuals, doctor, settings, targets};
use dompet::engine::reconcile::reconcile;
use dompet::engine::targets::{record_actuals, resolve_target, save_target};
use dompet::error::EngineError;
use dompet::models::{
    ActualArchive, ArchivedActualReport, MonthlyTarget, Polarity, Section, TargetArchive,
    TargetLineItem,
};
use dompet::{cli, db, utils};
use rusqlite::Connection;
use std::collections::BTreeMap;

fn item(id: &str, amount: &str) -> TargetLineItem {
    TargetLineItem {
        id: id.into(),
        name: id.into(),
        amount: amount.into(),
    }
}

fn plan() -> MonthlyTarget {
    MonthlyTarget {
        pendapatan: vec![item("gaji", "10000000")],
        cicilan_utang: vec![item("motor", "1000000")],
        kebutuhan: vec![item("belanja", "2000000"), item("listrik", "500000")],
        tabungan: vec![item("darurat", "1000000")],
        ..Default::default()
    }
}

fn setup() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    conn
}

fn run(conn: &Connection, args: &[&str]) -> anyhow::Result<()> {
    let matches = cli::build_cli().get_matches_from(args);
    match matches.subcommand() {
        Some(("target", m)) => targets::handle(conn, m),
        Some(("actual", m)) => actuals::handle(conn, m),
        Some(("config", m)) => settings::handle(conn, m),
        _ => panic!("unexpected subcommand"),
    }
}

#[test]
fn resolve_falls_back_to_latest_earlier_month() {
    let archive = save_target(&TargetArchive::new(), "2024-01", plan()).unwrap();

    let resolved = resolve_target("2024-03", &archive).unwrap();
    assert!(resolved.is_provisional);
    assert_eq!(resolved.source_month, "2024-01");
    assert_eq!(resolved.month_year, "2024-03");
    assert_eq!(resolved.target, plan());

    let own = resolve_target("2024-01", &archive).unwrap();
    assert!(!own.is_provisional);

    assert!(resolve_target("2023-12", &archive).is_none());
    assert!(resolve_target("2024-03", &TargetArchive::new()).is_none());
}

#[test]
fn resolve_prefers_the_closest_earlier_month() {
    let mut later = plan();
    later.pendapatan = vec![item("gaji", "12000000")];
    let archive = save_target(&TargetArchive::new(), "2023-11", plan()).unwrap();
    let archive = save_target(&archive, "2024-02", later.clone()).unwrap();

    let resolved = resolve_target("2024-05", &archive).unwrap();
    assert_eq!(resolved.source_month, "2024-02");
    assert_eq!(resolved.target, later);
}

#[test]
fn save_target_rejects_malformed_month() {
    let err = save_target(&TargetArchive::new(), "2024-1", plan()).unwrap_err();
    assert_eq!(err, EngineError::InvalidMonth("2024-1".into()));
}

#[test]
fn actuals_require_a_target() {
    let mut actuals = BTreeMap::new();
    actuals.insert("gaji".to_string(), "100".to_string());
    let err = record_actuals("2024-01", &TargetArchive::new(), &ActualArchive::new(), actuals)
        .unwrap_err();
    assert_eq!(err, EngineError::NoApplicableTarget("2024-01".into()));
}

#[test]
fn actuals_snapshot_the_resolved_target() {
    let archive = save_target(&TargetArchive::new(), "2024-01", plan()).unwrap();
    let mut actuals = BTreeMap::new();
    actuals.insert("gaji".to_string(), "9.500.000".to_string());
    let (report, reports) =
        record_actuals("2024-02", &archive, &ActualArchive::new(), actuals).unwrap();
    assert_eq!(report.target, plan());
    assert_eq!(reports.get("2024-02"), Some(&report));

    // later edits to the target do not rewrite the saved report
    let archive = save_target(&archive, "2024-02", MonthlyTarget::default()).unwrap();
    assert!(archive.get("2024-02").unwrap().is_empty());
    assert_eq!(reports.get("2024-02").unwrap().target, plan());
}

#[test]
fn reconcile_applies_section_polarity() {
    let mut actuals = BTreeMap::new();
    actuals.insert("gaji".to_string(), "9000000".to_string());
    actuals.insert("motor".to_string(), "1000000".to_string());
    actuals.insert("belanja".to_string(), "1800000".to_string());
    actuals.insert("listrik".to_string(), "abc".to_string());
    actuals.insert("darurat".to_string(), "1500000".to_string());
    let report = ArchivedActualReport {
        month_year: "2024-01".into(),
        target: plan(),
        actuals,
    };
    let rec = reconcile(&report);
    assert_eq!(rec.sections.len(), 7);

    let income = rec.section(Section::Pendapatan).unwrap();
    assert_eq!(income.polarity, Polarity::Higher);
    assert_eq!(income.difference, -1_000_000);
    assert!(!income.is_achieved);

    let needs = rec.section(Section::Kebutuhan).unwrap();
    assert_eq!(needs.polarity, Polarity::Lower);
    assert_eq!(needs.target, 2_500_000);
    assert_eq!(needs.actual, 1_800_000);
    assert!(needs.is_achieved);
    assert_eq!(needs.lines[1].actual, 0);

    assert!(rec.section(Section::CicilanUtang).unwrap().is_achieved);
    assert!(rec.section(Section::Tabungan).unwrap().is_achieved);
    // empty spending sections are trivially within budget
    assert!(rec.section(Section::Pendidikan).unwrap().is_achieved);
    assert!(!rec.is_achieved);
}

#[test]
fn cli_target_edits_start_from_provisional_copy() {
    let conn = setup();
    run(
        &conn,
        &[
            "dompet", "target", "set-item", "--month", "2024-01", "--section", "pendapatan",
            "--name", "Gaji", "--amount", "10.000.000", "--id", "gaji",
        ],
    )
    .unwrap();
    run(
        &conn,
        &[
            "dompet", "target", "set-item", "--month", "2024-03", "--section", "Kebutuhan",
            "--name", "Belanja", "--amount", "2000000",
        ],
    )
    .unwrap();

    let archive = db::load_targets(&conn).unwrap();
    assert_eq!(archive.len(), 2);
    let march = archive.get("2024-03").unwrap();
    assert_eq!(march.pendapatan.len(), 1);
    assert_eq!(march.kebutuhan[0].id, "kebutuhan-1");
    assert!(archive.get("2024-01").unwrap().kebutuhan.is_empty());

    run(&conn, &["dompet", "target", "rm-item", "--month", "2024-03", "--id", "gaji"]).unwrap();
    assert!(db::load_targets(&conn).unwrap()["2024-03"].pendapatan.is_empty());
    assert!(run(&conn, &["dompet", "target", "rm-item", "--month", "2024-03", "--id", "gaji"]).is_err());
    assert!(run(
        &conn,
        &["dompet", "target", "set-item", "--month", "2024-03", "--section", "hiburan", "--name", "X", "--amount", "1"],
    )
    .is_err());
}

#[test]
fn cli_actuals_keep_their_first_snapshot() {
    let conn = setup();
    let err = run(&conn, &["dompet", "actual", "set", "--month", "2024-01", "--item", "gaji", "--amount", "1"])
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<EngineError>(),
        Some(EngineError::NoApplicableTarget(_))
    ));

    db::save_target(&conn, "2024-01", &plan()).unwrap();
    run(&conn, &["dompet", "actual", "set", "--month", "2024-02", "--item", "gaji", "--amount", "9000000"]).unwrap();
    db::save_target(&conn, "2024-02", &MonthlyTarget::default()).unwrap();
    run(&conn, &["dompet", "actual", "set", "--month", "2024-02", "--item", "belanja", "--amount", "1500000"]).unwrap();

    let reports = db::load_reports(&conn).unwrap();
    let feb = reports.get("2024-02").unwrap();
    assert_eq!(feb.target, plan());
    assert_eq!(feb.actuals.len(), 2);
    assert_eq!(feb.actuals["belanja"], "1500000");

    assert!(run(&conn, &["dompet", "actual", "set", "--month", "2024-02", "--item", "nope", "--amount", "1"]).is_err());
}

#[test]
fn doctor_flags_inconsistent_records() {
    let conn = setup();
    let mut actuals = BTreeMap::new();
    actuals.insert("ghost".to_string(), "10".to_string());
    db::save_report(
        &conn,
        &ArchivedActualReport {
            month_year: "2024-04".into(),
            target: plan(),
            actuals,
        },
    )
    .unwrap();
    let household = db::load_household(&conn).unwrap();
    let issues = doctor::find_issues(&household);
    let kinds: Vec<&str> = issues.iter().map(|row| row[0].as_str()).collect();
    assert_eq!(kinds, vec!["actual_unknown_item", "actual_without_target"]);

    db::save_target(&conn, "2024-04", &plan()).unwrap();
    let household = db::load_household(&conn).unwrap();
    assert_eq!(doctor::find_issues(&household).len(), 1);
}

#[test]
fn config_overrides_category_tags() {
    let conn = setup();
    assert_eq!(utils::savings_category(&conn).unwrap(), "Tabungan");
    run(&conn, &["dompet", "config", "set", "savings_category", "Investasi"]).unwrap();
    assert_eq!(utils::savings_category(&conn).unwrap(), "Investasi");
    assert_eq!(utils::debt_category(&conn).unwrap(), "Cicilan Utang");
    assert!(run(&conn, &["dompet", "config", "set", "currency", "IDR"]).is_err());
    assert!(run(&conn, &["dompet", "config", "get", "savings_category"]).is_ok());
}
