//! Test Data Builders
//!
//! Provides builder patterns for constructing test data with sensible defaults.
//! Tests specify only the accounts and amounts they care about.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use core_kernel::{AccountId, AccountTypeKey, Money};
use domain_account::AccountTypeRegistry;
use domain_bill::{AllocationRequest, AllocationResult, Bill, BillError, EngineError, SplitAllocationEngine};
use domain_feature::{EvaluationContext, FeatureGate, FlagSnapshot};

use crate::fixtures::{FlagFixtures, IdFixtures, MoneyFixtures, TemporalFixtures};

/// Builds an account directory alongside an allocation request
///
/// Each added entry registers its account's type in the directory, so the
/// pair can go straight into [`SplitAllocationEngine::allocate`].
pub struct TestSplitBuilder {
    total: Money,
    request: AllocationRequest,
    directory: HashMap<AccountId, AccountTypeKey>,
    next_id: u128,
}

impl Default for TestSplitBuilder {
    fn default() -> Self {
        Self::new(MoneyFixtures::bill_total())
    }
}

impl TestSplitBuilder {
    pub fn new(total: Money) -> Self {
        Self {
            total,
            request: AllocationRequest::new(total),
            directory: HashMap::new(),
            next_id: 1,
        }
    }

    fn next_account(&mut self, account_type: &str) -> AccountId {
        let id = IdFixtures::account_id(self.next_id);
        self.next_id += 1;
        self.directory.insert(id, AccountTypeKey::new(account_type));
        id
    }

    /// Adds a fresh account of `account_type` with an explicit amount
    pub fn explicit(mut self, account_type: &str, amount: Money) -> Self {
        let id = self.next_account(account_type);
        self.request = self.request.explicit(id, amount);
        self
    }

    /// Adds a fresh account of `account_type` that takes the residual
    pub fn implicit(mut self, account_type: &str) -> Self {
        let id = self.next_account(account_type);
        self.request = self.request.implicit(id);
        self
    }

    /// Adds an entry for an account that is deliberately missing from the directory
    pub fn unknown_account(mut self, amount: Option<Money>) -> Self {
        let id = IdFixtures::account_id(self.next_id);
        self.next_id += 1;
        self.request = match amount {
            Some(amount) => self.request.explicit(id, amount),
            None => self.request.implicit(id),
        };
        self
    }

    /// Adds another entry for an already-added account
    pub fn repeat(mut self, account_id: AccountId, amount: Option<Money>) -> Self {
        self.request = match amount {
            Some(amount) => self.request.explicit(account_id, amount),
            None => self.request.implicit(account_id),
        };
        self
    }

    pub fn total(&self) -> Money {
        self.total
    }

    /// Account IDs in the order they were added
    pub fn account_ids(&self) -> Vec<AccountId> {
        self.request.allocations.iter().map(|e| e.account_id).collect()
    }

    pub fn build(self) -> (AllocationRequest, HashMap<AccountId, AccountTypeKey>) {
        (self.request, self.directory)
    }
}

/// Builds a [`FeatureGate`] pinned to a fixed instant
pub struct TestGateBuilder {
    snapshot: FlagSnapshot,
    now: DateTime<Utc>,
}

impl Default for TestGateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestGateBuilder {
    /// Every gated operation off, evaluated mid-launch
    pub fn new() -> Self {
        Self {
            snapshot: FlagFixtures::all_off(),
            now: TemporalFixtures::mid_launch(),
        }
    }

    pub fn with_snapshot(mut self, snapshot: FlagSnapshot) -> Self {
        self.snapshot = snapshot;
        self
    }

    pub fn all_on(self) -> Self {
        self.with_snapshot(FlagFixtures::all_on())
    }

    pub fn at(mut self, now: DateTime<Utc>) -> Self {
        self.now = now;
        self
    }

    pub fn build(self) -> FeatureGate {
        FeatureGate::new(self.snapshot).at(self.now)
    }
}

/// Runs a split through an engine over the built-in registry
pub fn allocate_with(
    builder: TestSplitBuilder,
    gate: &FeatureGate,
    context: &EvaluationContext,
) -> Result<AllocationResult, EngineError> {
    let engine = SplitAllocationEngine::with_registry(AccountTypeRegistry::builtin());
    let (request, directory) = builder.build();
    engine.allocate(&request, &directory, gate, context)
}

/// Builds a bill with a primary account and defaults for everything else
pub fn test_bill(total: Money) -> Result<Bill, BillError> {
    Bill::builder()
        .name("Electricity")
        .total_amount(total)
        .due_date(TemporalFixtures::due_date())
        .primary_account(IdFixtures::primary_account())
        .category("utilities")
        .build()
}
