// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod accounts;
pub mod transactions;
pub mod targets;
pub mod actuals;
pub mod debts;
pub mod goals;
pub mod reports;
pub mod importer;
pub mod exporter;
pub mod doctor;
pub mod settings;

/// Calendar date used when a command is not given one explicitly.
pub(crate) fn today() -> chrono::NaiveDate {
    chrono::Local::now().date_naive()
}

pub(crate) fn date_or_today(sub: &clap::ArgMatches, key: &str) -> anyhow::Result<chrono::NaiveDate> {
    match sub.get_one::<String>(key) {
        Some(s) => crate::utils::parse_date(s),
        None => Ok(today()),
    }
}
