//! Allocation violations
//!
//! Violations are data, not errors: the engine collects every one it finds
//! and returns them together in an invalid result.

use serde::{Deserialize, Serialize};
use std::fmt;

use core_kernel::{AccountId, AccountTypeKey, Money};

/// One reason an allocation request is invalid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Violation {
    /// A second (or later) implicit entry
    MultipleImplicit { account_id: AccountId },

    /// The account already appeared earlier in the request
    DuplicateAccount { account_id: AccountId },

    /// An explicit amount below zero
    NegativeAmount { account_id: AccountId, amount: Money },

    /// The total itself is below zero
    NegativeTotal { total: Money },

    /// The account collaborator does not know the account
    AccountNotFound { account_id: AccountId },

    /// The account's type refused the split
    UnsupportedAccountType {
        account_id: AccountId,
        account_type: AccountTypeKey,
        reason: String,
    },

    /// Explicit amounts exceed the total; `residual` is negative
    Overallocated { account_id: AccountId, residual: Money },

    /// No implicit entry and the explicit amounts do not add up
    SumMismatch { expected: Money, actual: Money },
}

impl Violation {
    /// The account this violation is about, if any
    pub fn account_id(&self) -> Option<AccountId> {
        match self {
            Violation::MultipleImplicit { account_id }
            | Violation::DuplicateAccount { account_id }
            | Violation::NegativeAmount { account_id, .. }
            | Violation::AccountNotFound { account_id }
            | Violation::UnsupportedAccountType { account_id, .. }
            | Violation::Overallocated { account_id, .. } => Some(*account_id),
            Violation::NegativeTotal { .. } | Violation::SumMismatch { .. } => None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Violation::MultipleImplicit { .. } => "multiple_implicit",
            Violation::DuplicateAccount { .. } => "duplicate_account",
            Violation::NegativeAmount { .. } => "negative_amount",
            Violation::NegativeTotal { .. } => "negative_total",
            Violation::AccountNotFound { .. } => "account_not_found",
            Violation::UnsupportedAccountType { .. } => "unsupported_account_type",
            Violation::Overallocated { .. } => "overallocated",
            Violation::SumMismatch { .. } => "sum_mismatch",
        }
    }

    /// Violations detected before any collaborator is consulted
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Violation::MultipleImplicit { .. }
                | Violation::DuplicateAccount { .. }
                | Violation::NegativeAmount { .. }
                | Violation::NegativeTotal { .. }
        )
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::MultipleImplicit { account_id } => {
                write!(f, "{} is a second implicit allocation", account_id)
            }
            Violation::DuplicateAccount { account_id } => {
                write!(f, "{} appears more than once", account_id)
            }
            Violation::NegativeAmount { account_id, amount } => {
                write!(f, "{} has negative amount {}", account_id, amount)
            }
            Violation::NegativeTotal { total } => write!(f, "total {} is negative", total),
            Violation::AccountNotFound { account_id } => write!(f, "{} not found", account_id),
            Violation::UnsupportedAccountType {
                account_id,
                account_type,
                reason,
            } => write!(f, "{} ({}) cannot take a split: {}", account_id, account_type, reason),
            Violation::Overallocated { account_id, residual } => {
                write!(f, "explicit allocations exceed the total; {} would receive {}", account_id, residual)
            }
            Violation::SumMismatch { expected, actual } => {
                write!(f, "allocations sum to {}, expected {}", actual, expected)
            }
        }
    }
}
