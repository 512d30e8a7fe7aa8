//! Custom Test Assertions
//!
//! Provides specialized assertion helpers for allocation results that give
//! more meaningful error messages than standard assertions.

use core_kernel::{AccountId, Money};
use domain_bill::{AllocationResult, Violation};

/// Asserts that two Money values agree at display precision
///
/// # Panics
///
/// Panics if the rounded values differ
pub fn assert_money_eq(actual: Money, expected: Money) {
    assert_eq!(
        actual.rounded_to_display().amount(),
        expected.rounded_to_display().amount(),
        "Money mismatch: actual={}, expected={}",
        actual,
        expected
    );
}

/// Asserts that a result is valid and its allocations add up to `total`
///
/// # Panics
///
/// Panics with the reported violations if the result is invalid, or if the
/// allocations do not sum to the total
pub fn assert_valid_allocation(result: &AllocationResult, total: Money) {
    assert!(
        result.is_valid(),
        "Expected a valid allocation, got violations: {:?}",
        result.violations
    );
    assert_money_eq(result.allocated_total(), total);
}

/// Asserts that the account received exactly `expected`
pub fn assert_allocated(result: &AllocationResult, account_id: AccountId, expected: Money) {
    match result.amount_for(account_id) {
        Some(actual) => assert_money_eq(actual, expected),
        None => panic!(
            "No allocation for {} in {:?}",
            account_id, result.allocations
        ),
    }
}

/// Asserts that the result is invalid and reports a violation of `kind`
///
/// Returns the first matching violation for further inspection.
pub fn assert_violation<'r>(result: &'r AllocationResult, kind: &str) -> &'r Violation {
    assert!(!result.is_valid(), "Expected an invalid allocation, got {:?}", result.allocations);
    assert!(
        result.allocations.is_empty(),
        "Invalid results must not carry allocations: {:?}",
        result.allocations
    );
    result
        .violations
        .iter()
        .find(|v| v.kind() == kind)
        .unwrap_or_else(|| {
            panic!(
                "Expected a {} violation, got {:?}",
                kind,
                result.violations.iter().map(Violation::kind).collect::<Vec<_>>()
            )
        })
}

/// Asserts that the result reports exactly these violation kinds, in order
pub fn assert_violation_kinds(result: &AllocationResult, kinds: &[&str]) {
    let actual: Vec<&str> = result.violations.iter().map(Violation::kind).collect();
    assert_eq!(actual, kinds, "Violation kinds differ");
}
