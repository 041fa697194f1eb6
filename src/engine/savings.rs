// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::{EngineError, EngineResult};
use crate::models::{Contribution, SavingsGoal};
use crate::utils::percent_of;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingsProgress {
    pub current_amount: i64,
    pub remaining: i64,
    pub progress_pct: Decimal,
    pub is_achieved: bool,
    pub days_remaining: i64,
    /// Amount to set aside per day to reach the target by the deadline,
    /// rounded up to a whole unit.
    pub daily_target: i64,
}

pub fn compute_savings_progress(goal: &SavingsGoal, today: NaiveDate) -> SavingsProgress {
    let current = goal.current_amount();
    let remaining = (goal.target_amount - current).max(0);
    let progress_pct = if goal.target_amount > 0 {
        percent_of(current, goal.target_amount).min(Decimal::ONE_HUNDRED)
    } else {
        Decimal::ZERO
    };
    let is_achieved = current >= goal.target_amount;
    let days_remaining = (goal.deadline - today).num_days().max(0);
    let daily_target = if is_achieved || days_remaining == 0 {
        0
    } else {
        (remaining + days_remaining - 1) / days_remaining
    };
    SavingsProgress {
        current_amount: current,
        remaining,
        progress_pct,
        is_achieved,
        days_remaining,
        daily_target,
    }
}

/// Append a deposit (positive) or withdrawal (negative). A withdrawal larger
/// than the current balance is refused and the goal is left untouched.
pub fn append_contribution(
    goal: &SavingsGoal,
    amount: i64,
    date: NaiveDate,
) -> EngineResult<SavingsGoal> {
    if amount == 0 {
        return Err(EngineError::InvalidAmount(amount));
    }
    let balance = goal.current_amount();
    if balance + amount < 0 {
        tracing::debug!(goal = goal.id, balance, amount, "withdrawal exceeds balance");
        return Err(EngineError::InsufficientFunds {
            balance,
            requested: -amount,
        });
    }
    let mut next = goal.clone();
    next.contributions.push(Contribution { date, amount });
    Ok(next)
}

/// Combined balance of every goal flagged as an emergency fund.
pub fn emergency_fund_balance(goals: &[SavingsGoal]) -> i64 {
    goals
        .iter()
        .filter(|g| g.is_emergency_fund)
        .map(SavingsGoal::current_amount)
        .sum()
}

/// Combined target of every goal flagged as an emergency fund.
pub fn emergency_fund_target(goals: &[SavingsGoal]) -> i64 {
    goals
        .iter()
        .filter(|g| g.is_emergency_fund)
        .map(|g| g.target_amount)
        .sum()
}
