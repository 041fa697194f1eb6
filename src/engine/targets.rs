// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::{EngineError, EngineResult};
use crate::models::{ActualArchive, ArchivedActualReport, MonthlyTarget, TargetArchive};
use crate::utils::month_start;
use serde::Serialize;
use std::collections::BTreeMap;
use std::ops::Bound;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedTarget {
    /// The month that was asked for.
    pub month_year: String,
    /// The month whose saved entry supplied the target.
    pub source_month: String,
    pub target: MonthlyTarget,
    /// True when copied forward from an earlier month and not yet saved.
    pub is_provisional: bool,
}

/// Target for `month`: its own entry if saved, otherwise the latest earlier one
/// marked provisional. `None` means budgeting has not started for that month.
pub fn resolve_target(month: &str, archive: &TargetArchive) -> Option<ResolvedTarget> {
    if let Some(target) = archive.get(month) {
        return Some(ResolvedTarget {
            month_year: month.to_string(),
            source_month: month.to_string(),
            target: target.clone(),
            is_provisional: false,
        });
    }
    // Keys are zero-padded YYYY-MM, so string order is calendar order.
    let (prior, target) = archive
        .range::<str, _>((Bound::Unbounded, Bound::Excluded(month)))
        .next_back()?;
    tracing::debug!(month, from = %prior, "target copied forward as provisional");
    Some(ResolvedTarget {
        month_year: month.to_string(),
        source_month: prior.clone(),
        target: target.clone(),
        is_provisional: true,
    })
}

/// Store `target` under `month`, replacing any earlier entry for that key.
pub fn save_target(
    archive: &TargetArchive,
    month: &str,
    target: MonthlyTarget,
) -> EngineResult<TargetArchive> {
    month_start(month)?;
    let mut next = archive.clone();
    next.insert(month.to_string(), target);
    Ok(next)
}

/// Build the actual report for `month` against the target that resolves for it.
/// The resolved target is snapshotted into the report so later target edits do
/// not rewrite history.
pub fn record_actuals(
    month: &str,
    targets: &TargetArchive,
    reports: &ActualArchive,
    actuals: BTreeMap<String, String>,
) -> EngineResult<(ArchivedActualReport, ActualArchive)> {
    month_start(month)?;
    let resolved = resolve_target(month, targets).ok_or_else(|| {
        tracing::debug!(month, "actuals rejected: no target resolves");
        EngineError::NoApplicableTarget(month.to_string())
    })?;
    let report = ArchivedActualReport {
        month_year: month.to_string(),
        target: resolved.target,
        actuals,
    };
    let mut next = reports.clone();
    next.insert(month.to_string(), report.clone());
    Ok((report, next))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TargetLineItem;

    fn target_with_income(amount: &str) -> MonthlyTarget {
        MonthlyTarget {
            pendapatan: vec![TargetLineItem {
                id: "gaji".into(),
                name: "Gaji".into(),
                amount: amount.into(),
            }],
            ..Default::default()
        }
    }

    #[test]
    fn resolve_never_writes_the_archive() {
        let mut archive = TargetArchive::new();
        archive.insert("2024-01".into(), target_with_income("100"));
        let resolved = resolve_target("2024-05", &archive).unwrap();
        assert!(resolved.is_provisional);
        assert_eq!(resolved.source_month, "2024-01");
        assert_eq!(archive.len(), 1);
    }

    #[test]
    fn save_overwrites_existing_month() {
        let mut archive = TargetArchive::new();
        archive.insert("2024-01".into(), target_with_income("100"));
        let next = save_target(&archive, "2024-01", target_with_income("250")).unwrap();
        assert_eq!(next.len(), 1);
        assert_eq!(next["2024-01"].pendapatan[0].amount, "250");
        assert_eq!(archive["2024-01"].pendapatan[0].amount, "100");
    }

    #[test]
    fn save_rejects_malformed_month() {
        let archive = TargetArchive::new();
        assert_eq!(
            save_target(&archive, "2024-1", MonthlyTarget::default()),
            Err(EngineError::InvalidMonth("2024-1".into()))
        );
    }
}
