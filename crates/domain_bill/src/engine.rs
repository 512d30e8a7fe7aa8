//! Split allocation engine
//!
//! Resolves the implicit entry of an [`AllocationRequest`] and checks that
//! the allocations add up to the total.
//!
//! # Steps
//!
//! 1. Structural checks: at most one implicit entry, no repeated account,
//!    no negative explicit amount, no negative total. Any failure here ends
//!    the run with the structural violations only.
//! 2. Per account: type lookup through the [`AccountDirectory`], then the
//!    `split_allocation` handler from the [`Dispatcher`].
//! 3. Explicit amounts are summed at display precision.
//! 4. With an implicit entry it receives `total - explicit_sum`, which must
//!    not be negative.
//! 5. Without one the explicit sum must equal the total.
//!
//! Steps 2 to 5 all run before the result is decided, so an invalid result
//! lists every problem at once.

use std::collections::HashSet;
use tracing::{debug, info, instrument};

use core_kernel::{AccountDirectory, AccountId, Money};
use domain_account::{AccountTypeRegistry, Dispatcher, OperationInput, OperationOutcome, SPLIT_ALLOCATION};
use domain_feature::{EvaluationContext, FeatureGate};

use crate::error::EngineError;
use crate::request::{AllocationAmount, AllocationRequest};
use crate::result::{AllocationResult, ResolvedAllocation};
use crate::violation::Violation;

/// Validates and resolves allocation requests
#[derive(Debug, Clone)]
pub struct SplitAllocationEngine {
    dispatcher: Dispatcher,
}

impl SplitAllocationEngine {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self { dispatcher }
    }

    pub fn with_registry(registry: AccountTypeRegistry) -> Self {
        Self::new(Dispatcher::new(registry))
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Allocates `request.total_amount` across the requested accounts
    ///
    /// Validation failures come back as an invalid [`AllocationResult`].
    /// `Err` is reserved for collaborator failures such as an account type
    /// missing from the registry or a feature missing from the gate, and
    /// for amounts whose sum overflows.
    #[instrument(
        skip(self, request, directory, gate, context),
        fields(total = %request.total_amount, entries = request.allocations.len())
    )]
    pub fn allocate<D>(
        &self,
        request: &AllocationRequest,
        directory: &D,
        gate: &FeatureGate,
        context: &EvaluationContext,
    ) -> Result<AllocationResult, EngineError>
    where
        D: AccountDirectory + ?Sized,
    {
        let structural = structural_violations(request);
        if !structural.is_empty() {
            debug!(violations = structural.len(), "Request failed structural checks");
            return Ok(AllocationResult::invalid(structural));
        }

        let mut violations = Vec::new();

        for entry in &request.allocations {
            let Some(account_type) = directory.account_type(&entry.account_id) else {
                violations.push(Violation::AccountNotFound {
                    account_id: entry.account_id,
                });
                continue;
            };

            let resolution = self
                .dispatcher
                .resolve(&account_type, SPLIT_ALLOCATION, gate, context)?;
            let input = OperationInput::new(entry.amount.explicit().map(|m| m.rounded_to_display()));
            if let OperationOutcome::Rejected { reason } = resolution.invoke(&input) {
                violations.push(Violation::UnsupportedAccountType {
                    account_id: entry.account_id,
                    account_type,
                    reason,
                });
            }
        }

        let total = request.total_amount.rounded_to_display();
        let explicit_sum =
            Money::checked_sum(request.explicit_amounts().map(|m| m.rounded_to_display()))?;
        let implicit = request
            .allocations
            .iter()
            .find(|e| e.amount.is_implicit())
            .map(|e| e.account_id);

        let residual = match implicit {
            Some(account_id) => {
                let residual = total.checked_sub(&explicit_sum)?;
                if residual.is_negative() {
                    violations.push(Violation::Overallocated { account_id, residual });
                }
                Some(residual)
            }
            None => {
                if explicit_sum != total {
                    violations.push(Violation::SumMismatch {
                        expected: total,
                        actual: explicit_sum,
                    });
                }
                None
            }
        };

        if !violations.is_empty() {
            debug!(violations = violations.len(), "Allocation invalid");
            return Ok(AllocationResult::invalid(violations));
        }

        let allocations: Vec<ResolvedAllocation> = request
            .allocations
            .iter()
            .map(|entry| ResolvedAllocation {
                account_id: entry.account_id,
                amount: match entry.amount {
                    AllocationAmount::Explicit(amount) => amount.rounded_to_display(),
                    AllocationAmount::Implicit => residual.unwrap_or_else(Money::zero),
                },
            })
            .collect();

        info!(
            total = %total,
            allocations = allocations.len(),
            residual = ?residual.map(|r| r.to_string()),
            "Allocation valid"
        );
        Ok(AllocationResult::valid(allocations))
    }
}

/// Checks that need nothing but the request itself
fn structural_violations(request: &AllocationRequest) -> Vec<Violation> {
    let mut violations = Vec::new();
    let mut seen: HashSet<AccountId> = HashSet::new();
    let mut implicit_seen = false;

    if request.total_amount.is_negative() {
        violations.push(Violation::NegativeTotal {
            total: request.total_amount.rounded_to_display(),
        });
    }

    for entry in &request.allocations {
        if !seen.insert(entry.account_id) {
            violations.push(Violation::DuplicateAccount {
                account_id: entry.account_id,
            });
        }

        match entry.amount {
            AllocationAmount::Implicit if implicit_seen => {
                violations.push(Violation::MultipleImplicit {
                    account_id: entry.account_id,
                });
            }
            AllocationAmount::Implicit => implicit_seen = true,
            AllocationAmount::Explicit(amount) if amount.is_negative() => {
                violations.push(Violation::NegativeAmount {
                    account_id: entry.account_id,
                    amount,
                });
            }
            AllocationAmount::Explicit(_) => {}
        }
    }

    violations
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain_feature::{FeatureFlagState, FlagSnapshot};
    use rust_decimal_macros::dec;
    use std::collections::HashMap;

    fn money(value: rust_decimal::Decimal) -> Money {
        Money::display(value)
    }

    fn setup(types: &[&str]) -> (SplitAllocationEngine, HashMap<AccountId, core_kernel::AccountTypeKey>, Vec<AccountId>) {
        let ids: Vec<AccountId> = types.iter().map(|_| AccountId::new()).collect();
        let directory = ids.iter().copied().zip(types.iter().map(|t| (*t).into())).collect();
        (SplitAllocationEngine::with_registry(AccountTypeRegistry::builtin()), directory, ids)
    }

    fn gate() -> FeatureGate {
        FeatureGate::new(FlagSnapshot::new([FeatureFlagState::boolean("split_allocation", true)]).unwrap())
    }

    #[test]
    fn test_structural_violations_collected_together() {
        let a = AccountId::new();
        let b = AccountId::new();
        let request = AllocationRequest::new(money(dec!(-5)))
            .explicit(a, money(dec!(-1)))
            .implicit(b)
            .implicit(a);

        let kinds: Vec<_> = structural_violations(&request).iter().map(|v| v.kind()).collect();
        assert_eq!(
            kinds,
            vec!["negative_total", "negative_amount", "duplicate_account", "multiple_implicit"]
        );
    }

    #[test]
    fn test_structural_failure_skips_directory() {
        let (engine, _, ids) = setup(&["checking", "checking"]);
        let empty: HashMap<AccountId, core_kernel::AccountTypeKey> = HashMap::new();
        let request = AllocationRequest::new(money(dec!(10)))
            .explicit(ids[0], money(dec!(-1)))
            .implicit(ids[1]);

        let result = engine.allocate(&request, &empty, &gate(), &EvaluationContext::new()).unwrap();
        assert_eq!(result.violations.len(), 1);
        assert_eq!(result.violations[0].kind(), "negative_amount");
    }

    #[test]
    fn test_all_later_violations_reported() {
        let (engine, directory, ids) = setup(&["checking", "credit"]);
        let stranger = AccountId::new();
        let request = AllocationRequest::new(money(dec!(10)))
            .explicit(ids[0], money(dec!(8)))
            .explicit(stranger, money(dec!(8)))
            .implicit(ids[1]);

        let result = engine.allocate(&request, &directory, &gate(), &EvaluationContext::new()).unwrap();
        let kinds: Vec<_> = result.violations.iter().map(|v| v.kind()).collect();
        assert_eq!(kinds, vec!["account_not_found", "overallocated"]);
    }

    #[test]
    fn test_storage_precision_inputs_compared_at_display() {
        let (engine, directory, ids) = setup(&["checking", "savings"]);
        let request = AllocationRequest::new(Money::new(dec!(10.004)))
            .explicit(ids[0], Money::new(dec!(3.3333)))
            .explicit(ids[1], Money::new(dec!(6.6666)));

        let result = engine.allocate(&request, &directory, &gate(), &EvaluationContext::new()).unwrap();
        assert!(result.is_valid(), "{:?}", result.violations);
        assert_eq!(result.allocations[0].amount.to_string(), "3.33");
        assert_eq!(result.allocations[1].amount.to_string(), "6.67");
    }
}
