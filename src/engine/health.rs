// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::percent_of;
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HealthInputs {
    pub total_income: i64,
    pub debt_installments: i64,
    pub total_savings: i64,
    /// `income - expense`.
    pub net_cash_flow: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HealthStatus {
    #[serde(rename = "Data Tidak Cukup")]
    DataTidakCukup,
    #[serde(rename = "Sehat")]
    Sehat,
    #[serde(rename = "Cukup Sehat")]
    CukupSehat,
    #[serde(rename = "Perlu Perhatian")]
    PerluPerhatian,
}

impl HealthStatus {
    pub fn label(&self) -> &'static str {
        match self {
            HealthStatus::DataTidakCukup => "Data Tidak Cukup",
            HealthStatus::Sehat => "Sehat",
            HealthStatus::CukupSehat => "Cukup Sehat",
            HealthStatus::PerluPerhatian => "Perlu Perhatian",
        }
    }

    /// Fixed (explanation, recommendation) text for the status.
    pub fn advice(&self) -> (&'static str, &'static str) {
        match self {
            HealthStatus::DataTidakCukup => (
                "Belum ada pemasukan tercatat bulan ini.",
                "Catat pemasukan dan pengeluaran agar kondisi keuangan dapat dinilai.",
            ),
            HealthStatus::Sehat => (
                "Cicilan di bawah 35% pemasukan, tabungan minimal 10%, dan arus kas positif.",
                "Pertahankan kebiasaan ini dan pertimbangkan menambah dana darurat atau investasi.",
            ),
            HealthStatus::CukupSehat => (
                "Arus kas masih positif, tetapi rasio cicilan atau tabungan belum ideal.",
                "Kurangi porsi cicilan di bawah 35% dan sisihkan minimal 10% pemasukan untuk tabungan.",
            ),
            HealthStatus::PerluPerhatian => (
                "Pengeluaran menyamai atau melebihi pemasukan bulan ini.",
                "Tinjau pengeluaran non-esensial dan susun ulang target bulanan.",
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthReport {
    pub status: HealthStatus,
    pub debt_ratio: Decimal,
    pub savings_ratio: Decimal,
    pub net_cash_flow: i64,
    pub explanation: &'static str,
    pub recommendation: &'static str,
}

const MAX_DEBT_RATIO: i128 = 35;
const MIN_SAVINGS_RATIO: i128 = 10;

/// `part / whole * 100 < limit`, compared on the exact ratio.
fn ratio_below(part: i64, whole: i64, limit: i128) -> bool {
    i128::from(part) * 100 < limit * i128::from(whole)
}

/// First matching rule wins: no income, healthy ratios with positive cash flow,
/// positive cash flow alone, everything else.
///
/// The thresholds are tested on the unrounded ratios; the two-decimal figures in
/// the report are for display only.
pub fn classify_health(inputs: &HealthInputs) -> HealthReport {
    let debt_ratio = percent_of(inputs.debt_installments, inputs.total_income);
    let savings_ratio = percent_of(inputs.total_savings, inputs.total_income);

    let status = if inputs.total_income <= 0 {
        HealthStatus::DataTidakCukup
    } else if ratio_below(inputs.debt_installments, inputs.total_income, MAX_DEBT_RATIO)
        && !ratio_below(inputs.total_savings, inputs.total_income, MIN_SAVINGS_RATIO)
        && inputs.net_cash_flow > 0
    {
        HealthStatus::Sehat
    } else if inputs.net_cash_flow > 0 {
        HealthStatus::CukupSehat
    } else {
        HealthStatus::PerluPerhatian
    };
    let (explanation, recommendation) = status.advice();
    HealthReport {
        status,
        debt_ratio,
        savings_ratio,
        net_cash_flow: inputs.net_cash_flow,
        explanation,
        recommendation,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs(income: i64, debt: i64, savings: i64) -> HealthInputs {
        HealthInputs {
            total_income: income,
            debt_installments: debt,
            total_savings: savings,
            net_cash_flow: 1,
        }
    }

    #[test]
    fn debt_just_under_limit_is_healthy_even_when_display_rounds_up() {
        let report = classify_health(&inputs(1_000_000, 349_999, 100_000));
        assert_eq!(report.debt_ratio, Decimal::from(35));
        assert_eq!(report.status, HealthStatus::Sehat);
    }

    #[test]
    fn savings_just_under_minimum_is_not_healthy_even_when_display_rounds_up() {
        let report = classify_health(&inputs(1_000_000, 0, 99_999));
        assert_eq!(report.savings_ratio, Decimal::from(10));
        assert_eq!(report.status, HealthStatus::CukupSehat);
    }

    #[test]
    fn ratio_below_handles_extreme_amounts() {
        assert!(ratio_below(i64::MAX / 3, i64::MAX, 35));
        assert!(!ratio_below(i64::MAX, i64::MAX, 35));
    }
}
