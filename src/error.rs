// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Errors raised by the computation engine.
//!
//! All of them are validation failures on the current call's input; the caller
//! fixes the input (or creates a target first) and calls again.
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("Invalid amount {0}: must be greater than zero")]
    InvalidAmount(i64),
    #[error("Insufficient funds: balance {balance}, requested withdrawal {requested}")]
    InsufficientFunds { balance: i64, requested: i64 },
    #[error("No target applies to {0}; save a target for this month first")]
    NoApplicableTarget(String),
    #[error("Invalid tenor {0}: must be between 0 and 600 months")]
    InvalidTenor(i64),
    #[error("Invalid month '{0}', expected YYYY-MM")]
    InvalidMonth(String),
}

pub type EngineResult<T> = Result<T, EngineError>;
