//! Allocation results

use serde::{Deserialize, Serialize};

use core_kernel::{AccountId, Money};

use crate::violation::Violation;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllocationStatus {
    Valid,
    Invalid,
}

/// A fully resolved allocation at display precision
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResolvedAllocation {
    pub account_id: AccountId,
    pub amount: Money,
}

/// Outcome of [`SplitAllocationEngine::allocate`](crate::SplitAllocationEngine::allocate)
///
/// A valid result carries every allocation in request order and no
/// violations; an invalid one carries violations and no allocations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationResult {
    pub status: AllocationStatus,
    #[serde(default)]
    pub allocations: Vec<ResolvedAllocation>,
    #[serde(default)]
    pub violations: Vec<Violation>,
}

impl AllocationResult {
    pub fn valid(allocations: Vec<ResolvedAllocation>) -> Self {
        Self {
            status: AllocationStatus::Valid,
            allocations,
            violations: Vec::new(),
        }
    }

    pub fn invalid(violations: Vec<Violation>) -> Self {
        Self {
            status: AllocationStatus::Invalid,
            allocations: Vec::new(),
            violations,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.status == AllocationStatus::Valid
    }

    /// Resolved amount for one account
    pub fn amount_for(&self, account_id: AccountId) -> Option<Money> {
        self.allocations
            .iter()
            .find(|a| a.account_id == account_id)
            .map(|a| a.amount)
    }

    /// Sum of resolved amounts
    pub fn allocated_total(&self) -> Money {
        self.allocations.iter().map(|a| a.amount).sum()
    }

    pub fn into_allocations(self) -> Result<Vec<ResolvedAllocation>, Vec<Violation>> {
        match self.status {
            AllocationStatus::Valid => Ok(self.allocations),
            AllocationStatus::Invalid => Err(self.violations),
        }
    }
}
