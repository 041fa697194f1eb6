// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TxKind {
    Income,
    Expense,
}

impl TxKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TxKind::Income => "INCOME",
            TxKind::Expense => "EXPENSE",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "INCOME" => Some(TxKind::Income),
            "EXPENSE" => Some(TxKind::Expense),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: i64,
    pub date: NaiveDate,
    pub description: String,
    pub amount: i64,
    #[serde(rename = "type")]
    pub kind: TxKind,
    pub category: String,
    pub account_id: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccountKind {
    Bank,
    #[serde(rename = "E-Wallet")]
    EWallet,
}

impl AccountKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountKind::Bank => "Bank",
            AccountKind::EWallet => "E-Wallet",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bank" => Some(AccountKind::Bank),
            "e-wallet" | "ewallet" | "wallet" => Some(AccountKind::EWallet),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: AccountKind,
    pub balance: i64,
}

/// Whether a higher actual than planned counts as good for a section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Polarity {
    /// Meeting or exceeding the target is achieved (income, debt paydown, savings).
    Higher,
    /// Staying at or under the target is achieved (spending groups).
    Lower,
}

impl Polarity {
    pub fn is_achieved(&self, target: i64, actual: i64) -> bool {
        match self {
            Polarity::Higher => actual >= target,
            Polarity::Lower => actual <= target,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Section {
    Pendapatan,
    CicilanUtang,
    PengeluaranUtama,
    Kebutuhan,
    Penunjang,
    Pendidikan,
    Tabungan,
}

impl Section {
    pub const ALL: [Section; 7] = [
        Section::Pendapatan,
        Section::CicilanUtang,
        Section::PengeluaranUtama,
        Section::Kebutuhan,
        Section::Penunjang,
        Section::Pendidikan,
        Section::Tabungan,
    ];

    /// The four spending groups that are neither debt installments nor savings.
    pub const SPENDING: [Section; 4] = [
        Section::PengeluaranUtama,
        Section::Kebutuhan,
        Section::Penunjang,
        Section::Pendidikan,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Section::Pendapatan => "pendapatan",
            Section::CicilanUtang => "cicilanUtang",
            Section::PengeluaranUtama => "pengeluaranUtama",
            Section::Kebutuhan => "kebutuhan",
            Section::Penunjang => "penunjang",
            Section::Pendidikan => "pendidikan",
            Section::Tabungan => "tabungan",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Section::Pendapatan => "Pendapatan",
            Section::CicilanUtang => "Cicilan Utang",
            Section::PengeluaranUtama => "Pengeluaran Utama",
            Section::Kebutuhan => "Kebutuhan",
            Section::Penunjang => "Penunjang",
            Section::Pendidikan => "Pendidikan",
            Section::Tabungan => "Tabungan",
        }
    }

    pub fn polarity(&self) -> Polarity {
        match self {
            Section::Pendapatan | Section::CicilanUtang | Section::Tabungan => Polarity::Higher,
            Section::PengeluaranUtama
            | Section::Kebutuhan
            | Section::Penunjang
            | Section::Pendidikan => Polarity::Lower,
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        let wanted = s.trim();
        Section::ALL.into_iter().find(|sec| {
            sec.key().eq_ignore_ascii_case(wanted) || sec.label().eq_ignore_ascii_case(wanted)
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetLineItem {
    pub id: String,
    pub name: String,
    /// Digits as typed by the user; parsed with `utils::parse_amount`.
    pub amount: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyTarget {
    #[serde(default)]
    pub pendapatan: Vec<TargetLineItem>,
    #[serde(default)]
    pub cicilan_utang: Vec<TargetLineItem>,
    #[serde(default)]
    pub pengeluaran_utama: Vec<TargetLineItem>,
    #[serde(default)]
    pub kebutuhan: Vec<TargetLineItem>,
    #[serde(default)]
    pub penunjang: Vec<TargetLineItem>,
    #[serde(default)]
    pub pendidikan: Vec<TargetLineItem>,
    #[serde(default)]
    pub tabungan: Vec<TargetLineItem>,
}

impl MonthlyTarget {
    pub fn items(&self, section: Section) -> &[TargetLineItem] {
        match section {
            Section::Pendapatan => &self.pendapatan,
            Section::CicilanUtang => &self.cicilan_utang,
            Section::PengeluaranUtama => &self.pengeluaran_utama,
            Section::Kebutuhan => &self.kebutuhan,
            Section::Penunjang => &self.penunjang,
            Section::Pendidikan => &self.pendidikan,
            Section::Tabungan => &self.tabungan,
        }
    }

    pub fn items_mut(&mut self, section: Section) -> &mut Vec<TargetLineItem> {
        match section {
            Section::Pendapatan => &mut self.pendapatan,
            Section::CicilanUtang => &mut self.cicilan_utang,
            Section::PengeluaranUtama => &mut self.pengeluaran_utama,
            Section::Kebutuhan => &mut self.kebutuhan,
            Section::Penunjang => &mut self.penunjang,
            Section::Pendidikan => &mut self.pendidikan,
            Section::Tabungan => &mut self.tabungan,
        }
    }

    pub fn find_item(&self, id: &str) -> Option<(Section, &TargetLineItem)> {
        Section::ALL
            .into_iter()
            .find_map(|sec| self.items(sec).iter().find(|i| i.id == id).map(|i| (sec, i)))
    }

    pub fn is_empty(&self) -> bool {
        Section::ALL.iter().all(|s| self.items(*s).is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchivedMonthlyTarget {
    pub month_year: String,
    pub target: MonthlyTarget,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchivedActualReport {
    pub month_year: String,
    /// Snapshot of the target at the time the actuals were saved.
    pub target: MonthlyTarget,
    /// Line item id -> amount string.
    pub actuals: BTreeMap<String, String>,
}

/// Saved targets keyed by `YYYY-MM`.
pub type TargetArchive = BTreeMap<String, MonthlyTarget>;
/// Saved actual reports keyed by `YYYY-MM`.
pub type ActualArchive = BTreeMap<String, ArchivedActualReport>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    pub date: NaiveDate,
    pub amount: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DebtItem {
    pub id: i64,
    pub name: String,
    pub source: String,
    pub total_amount: i64,
    pub monthly_installment: i64,
    pub tenor: i64,
    /// Day of month the installment is due (1-31).
    pub due_date: u32,
    #[serde(default)]
    pub payments: Vec<Payment>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contribution {
    pub date: NaiveDate,
    /// Deposits positive, withdrawals negative.
    pub amount: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingsGoal {
    pub id: i64,
    pub name: String,
    pub source: String,
    pub target_amount: i64,
    pub deadline: NaiveDate,
    #[serde(default)]
    pub contributions: Vec<Contribution>,
    #[serde(default)]
    pub is_emergency_fund: bool,
}

impl SavingsGoal {
    /// Always recomputed from the contribution log.
    pub fn current_amount(&self) -> i64 {
        self.contributions.iter().map(|c| c.amount).sum()
    }
}

/// The records handed to the engine on each invocation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Household {
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    #[serde(default)]
    pub debts: Vec<DebtItem>,
    #[serde(default)]
    pub goals: Vec<SavingsGoal>,
    #[serde(default)]
    pub targets: TargetArchive,
    #[serde(default)]
    pub reports: ActualArchive,
}
