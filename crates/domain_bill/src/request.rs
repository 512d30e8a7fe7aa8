//! Allocation requests
//!
//! A request is a total plus an ordered list of (account, amount) entries.
//! An entry without an amount is implicit: it absorbs whatever the explicit
//! entries leave over.

use serde::{Deserialize, Serialize};

use core_kernel::{AccountId, Money};

/// Amount of a single allocation entry
///
/// Serialized as the amount string, or `null` for an implicit entry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "Option<Money>", into = "Option<Money>")]
pub enum AllocationAmount {
    Explicit(Money),
    Implicit,
}

impl AllocationAmount {
    pub fn explicit(&self) -> Option<Money> {
        match self {
            AllocationAmount::Explicit(amount) => Some(*amount),
            AllocationAmount::Implicit => None,
        }
    }

    pub fn is_implicit(&self) -> bool {
        matches!(self, AllocationAmount::Implicit)
    }
}

impl From<Option<Money>> for AllocationAmount {
    fn from(amount: Option<Money>) -> Self {
        amount.map_or(AllocationAmount::Implicit, AllocationAmount::Explicit)
    }
}

impl From<AllocationAmount> for Option<Money> {
    fn from(amount: AllocationAmount) -> Self {
        amount.explicit()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AllocationEntry {
    pub account_id: AccountId,
    pub amount: AllocationAmount,
}

/// Total and partial allocations submitted to the engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationRequest {
    pub total_amount: Money,
    pub allocations: Vec<AllocationEntry>,
}

impl AllocationRequest {
    pub fn new(total_amount: Money) -> Self {
        Self {
            total_amount,
            allocations: Vec::new(),
        }
    }

    /// Appends an entry with a caller-supplied amount
    pub fn explicit(mut self, account_id: AccountId, amount: Money) -> Self {
        self.allocations.push(AllocationEntry {
            account_id,
            amount: AllocationAmount::Explicit(amount),
        });
        self
    }

    /// Appends the residual-absorbing entry
    pub fn implicit(mut self, account_id: AccountId) -> Self {
        self.allocations.push(AllocationEntry {
            account_id,
            amount: AllocationAmount::Implicit,
        });
        self
    }

    pub fn implicit_count(&self) -> usize {
        self.allocations.iter().filter(|e| e.amount.is_implicit()).count()
    }

    pub fn explicit_amounts(&self) -> impl Iterator<Item = Money> + '_ {
        self.allocations.iter().filter_map(|e| e.amount.explicit())
    }
}
