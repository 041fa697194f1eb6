// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Pure computation over the household records.
//!
//! Nothing in here touches storage or the clock: callers hand in the records
//! and, where needed, today's date, and get immutable summaries back.

pub mod aggregate;
pub mod analytics;
pub mod debt;
pub mod health;
pub mod reconcile;
pub mod savings;
pub mod targets;

pub use aggregate::{aggregate_month, MonthlySummary};
pub use analytics::{analyze_period, yearly_trend, PeriodAnalysis};
pub use debt::{append_payment, compute_debt_progress, reconstruct_from_partial_state, DebtProgress};
pub use health::{classify_health, HealthReport, HealthStatus};
pub use reconcile::{reconcile, Reconciliation};
pub use savings::{append_contribution, compute_savings_progress, SavingsProgress};
pub use targets::{record_actuals, resolve_target, save_target, ResolvedTarget};
