//! Bill domain errors

use thiserror::Error;

use core_kernel::{AccountId, MoneyError};
use domain_account::DispatchError;

use crate::violation::Violation;

/// Collaborator failures while allocating
///
/// Invalid requests are not errors; they produce an invalid
/// [`AllocationResult`](crate::AllocationResult). Amounts too large to sum
/// can only arrive by bypassing the bounded parsers, so they are reported
/// as an error rather than a violation.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// Errors raised by the bill aggregate
#[derive(Debug, Error)]
pub enum BillError {
    #[error("Missing required field: {0}")]
    MissingRequiredField(String),

    #[error("Validation error: {0}")]
    Validation(String),

    /// The primary account cannot also be a secondary split
    #[error("Account {0} is the bill's primary account")]
    PrimaryAsSecondary(AccountId),

    #[error("Account {0} already has a secondary split")]
    DuplicateSplit(AccountId),

    /// The result being applied failed validation
    #[error("Allocation is invalid ({} violation(s))", .0.len())]
    InvalidAllocation(Vec<Violation>),

    /// The result does not match this bill's current allocation request
    #[error("Allocation does not match the bill: {0}")]
    AllocationMismatch(String),

    #[error(transparent)]
    Money(#[from] MoneyError),

    #[error(transparent)]
    Temporal(#[from] core_kernel::TemporalError),
}

impl BillError {
    pub fn validation(message: impl Into<String>) -> Self {
        BillError::Validation(message.into())
    }
}
