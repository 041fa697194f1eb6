// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Target vs. actual comparison for a saved month.
//!
//! Each section is judged by its polarity: income, debt installments and
//! savings are achieved at or above target, the four spending groups at or
//! below it. The month is achieved only when every section is.

use crate::models::{ArchivedActualReport, MonthlyTarget, Polarity, Section};
use crate::utils::parse_amount;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineReconciliation {
    pub id: String,
    pub name: String,
    pub target: i64,
    pub actual: i64,
    pub difference: i64,
    pub is_achieved: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionReconciliation {
    pub section: Section,
    pub polarity: Polarity,
    pub target: i64,
    pub actual: i64,
    pub difference: i64,
    pub is_achieved: bool,
    pub lines: Vec<LineReconciliation>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Reconciliation {
    pub month_year: String,
    pub sections: Vec<SectionReconciliation>,
    pub is_achieved: bool,
}

impl Reconciliation {
    pub fn section(&self, section: Section) -> Option<&SectionReconciliation> {
        self.sections.iter().find(|s| s.section == section)
    }
}

/// Planned and realized totals for one section. Missing or unparsable actuals
/// count as zero.
pub fn section_totals(
    target: &MonthlyTarget,
    actuals: &BTreeMap<String, String>,
    section: Section,
) -> (i64, i64) {
    target.items(section).iter().fold((0, 0), |(t, a), item| {
        let actual = actuals.get(&item.id).map(|s| parse_amount(s)).unwrap_or(0);
        (t + parse_amount(&item.amount), a + actual)
    })
}

pub fn reconcile(report: &ArchivedActualReport) -> Reconciliation {
    let sections: Vec<SectionReconciliation> = Section::ALL
        .into_iter()
        .map(|section| {
            let polarity = section.polarity();
            let lines: Vec<LineReconciliation> = report
                .target
                .items(section)
                .iter()
                .map(|item| {
                    let target = parse_amount(&item.amount);
                    let actual = report
                        .actuals
                        .get(&item.id)
                        .map(|s| parse_amount(s))
                        .unwrap_or(0);
                    LineReconciliation {
                        id: item.id.clone(),
                        name: item.name.clone(),
                        target,
                        actual,
                        difference: actual - target,
                        is_achieved: polarity.is_achieved(target, actual),
                    }
                })
                .collect();
            let (target, actual) = section_totals(&report.target, &report.actuals, section);
            SectionReconciliation {
                section,
                polarity,
                target,
                actual,
                difference: actual - target,
                is_achieved: polarity.is_achieved(target, actual),
                lines,
            }
        })
        .collect();
    let is_achieved = sections.iter().all(|s| s.is_achieved);
    tracing::debug!(month = %report.month_year, is_achieved, "reconciled actuals");
    Reconciliation {
        month_year: report.month_year.clone(),
        sections,
        is_achieved,
    }
}
