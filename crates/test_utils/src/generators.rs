//! Property-Based Test Generators
//!
//! Provides proptest strategies for generating random test data
//! that maintains domain invariants.

use core_kernel::{AccountTypeKey, Money, Percentage};
use domain_account::builtin;
use proptest::prelude::*;
use rust_decimal::Decimal;

/// Strategy for non-negative amounts in minor units
pub fn amount_cents_strategy() -> impl Strategy<Value = i64> {
    0i64..10_000_000i64
}

/// Strategy for non-negative display-precision Money
pub fn money_strategy() -> impl Strategy<Value = Money> {
    amount_cents_strategy().prop_map(Money::from_minor)
}

/// Strategy for strictly positive display-precision Money
pub fn positive_money_strategy() -> impl Strategy<Value = Money> {
    (1i64..10_000_000i64).prop_map(Money::from_minor)
}

/// Strategy for negative display-precision Money
pub fn negative_money_strategy() -> impl Strategy<Value = Money> {
    (-10_000_000i64..0i64).prop_map(Money::from_minor)
}

/// Strategy for storage-precision Money with four fractional digits
pub fn storage_money_strategy() -> impl Strategy<Value = Money> {
    (0i64..1_000_000_000i64).prop_map(|n| Money::new(Decimal::new(n, 4)))
}

/// Strategy for rollout percentages with up to two fractional digits
pub fn percentage_strategy() -> impl Strategy<Value = Percentage> {
    (0u32..=10000u32).prop_filter_map("in range", |n| Percentage::new(Decimal::new(n as i64, 2)).ok())
}

/// Strategy for rollout subject identifiers
pub fn subject_id_strategy() -> impl Strategy<Value = String> {
    "[a-z0-9]{1,16}"
}

/// Strategy over every built-in account type key
pub fn account_type_strategy() -> impl Strategy<Value = AccountTypeKey> {
    let keys: Vec<AccountTypeKey> = builtin::descriptors().into_iter().map(|d| d.key).collect();
    proptest::sample::select(keys)
}

/// Strategy for a total split into `parts` explicit amounts plus a residual
///
/// Yields `(total, explicit_amounts)` where the explicit amounts never
/// exceed the total, so an implicit entry always has a non-negative residual.
pub fn covered_split_strategy(max_parts: usize) -> impl Strategy<Value = (Money, Vec<Money>)> {
    proptest::collection::vec(0i64..100_000i64, 0..=max_parts).prop_flat_map(|parts| {
        let allocated: i64 = parts.iter().sum();
        (allocated..allocated + 100_000i64).prop_map(move |total| {
            (
                Money::from_minor(total),
                parts.iter().copied().map(Money::from_minor).collect(),
            )
        })
    })
}
