//! Integration Tests for the bill split core
//!
//! These tests verify cross-domain workflows that involve the feature gate,
//! the account type registry and the allocation engine working together.

use std::sync::Arc;

use core_kernel::{AccountTypeKey, Money};
use domain_account::{AccountCategory, AccountTypeDescriptor, AccountTypeRegistry, Capability};
use domain_bill::SplitAllocationEngine;
use domain_feature::{EvaluationContext, FeatureGate};
use rust_decimal_macros::dec;
use test_utils::*;

mod bill_split_workflow {
    use super::*;

    /// A bill's secondary splits flow through the engine and back onto the bill
    #[test]
    fn test_allocate_and_apply() {
        let mut bill = test_bill(MoneyFixtures::bill_total()).unwrap();
        let secondary = IdFixtures::secondary_account();
        bill.add_secondary_split(secondary, MoneyFixtures::explicit_share())
            .unwrap();

        let directory = [
            (IdFixtures::primary_account(), AccountTypeFixtures::checking()),
            (secondary, AccountTypeFixtures::credit()),
        ]
        .into_iter()
        .collect::<std::collections::HashMap<_, _>>();

        let engine = SplitAllocationEngine::with_registry(AccountTypeRegistry::builtin());
        let gate = TestGateBuilder::new().build();
        let result = engine
            .allocate(&bill.allocation_request(), &directory, &gate, &EvaluationContext::new())
            .unwrap();

        assert_valid_allocation(&result, MoneyFixtures::bill_total());
        assert_allocated(&result, IdFixtures::primary_account(), MoneyFixtures::residual_share());

        let splits = bill.apply_allocation(&result).unwrap();
        assert_eq!(splits.len(), 2);
        assert!(splits[0].is_primary);
        assert_money_eq(splits[0].amount, MoneyFixtures::residual_share());
        assert!(bill.is_allocated());
    }

    /// Changing the secondary splits drops the applied allocation
    #[test]
    fn test_editing_splits_requires_reallocation() {
        let mut bill = test_bill(MoneyFixtures::bill_total()).unwrap();
        let secondary = IdFixtures::secondary_account();
        bill.add_secondary_split(secondary, MoneyFixtures::explicit_share())
            .unwrap();

        let directory = [
            (IdFixtures::primary_account(), AccountTypeFixtures::checking()),
            (secondary, AccountTypeFixtures::savings()),
        ]
        .into_iter()
        .collect::<std::collections::HashMap<_, _>>();

        let engine = SplitAllocationEngine::with_registry(AccountTypeRegistry::builtin());
        let gate = TestGateBuilder::new().build();
        let result = engine
            .allocate(&bill.allocation_request(), &directory, &gate, &EvaluationContext::new())
            .unwrap();
        bill.apply_allocation(&result).unwrap();

        assert!(bill.remove_secondary_split(secondary));
        assert!(!bill.is_allocated());

        // The old result no longer matches the bill's accounts.
        assert!(bill.apply_allocation(&result).is_err());
    }

    /// An overrun reported by the engine cannot be applied to the bill
    #[test]
    fn test_invalid_result_rejected_by_bill() {
        let mut bill = test_bill(Money::display(dec!(30.00))).unwrap();
        let secondary = IdFixtures::secondary_account();
        bill.add_secondary_split(secondary, MoneyFixtures::explicit_share())
            .unwrap();

        let directory = [
            (IdFixtures::primary_account(), AccountTypeFixtures::checking()),
            (secondary, AccountTypeFixtures::savings()),
        ]
        .into_iter()
        .collect::<std::collections::HashMap<_, _>>();

        let engine = SplitAllocationEngine::with_registry(AccountTypeRegistry::builtin());
        let gate = TestGateBuilder::new().build();
        let result = engine
            .allocate(&bill.allocation_request(), &directory, &gate, &EvaluationContext::new())
            .unwrap();

        let violation = assert_violation(&result, "overallocated");
        assert_eq!(violation.account_id(), Some(IdFixtures::primary_account()));
        assert!(bill.apply_allocation(&result).is_err());
    }
}

mod feature_gated_dispatch {
    use super::*;

    fn ewa_split(gate: &FeatureGate, context: &EvaluationContext) -> bool {
        let builder = TestSplitBuilder::default()
            .explicit("ewa", Money::display(dec!(25.00)))
            .implicit("checking");
        allocate_with(builder, gate, context).unwrap().is_valid()
    }

    /// Scoping a flag to one type enables only that type's module
    #[test]
    fn test_scoped_flag() {
        let gate = TestGateBuilder::new()
            .with_snapshot(FlagFixtures::split_scoped_to(&["ewa"]))
            .build();
        assert!(ewa_split(&gate, &EvaluationContext::new()));

        let builder = TestSplitBuilder::default()
            .explicit("bnpl", Money::display(dec!(25.00)))
            .implicit("checking");
        let result = allocate_with(builder, &gate, &EvaluationContext::new()).unwrap();
        assert_violation(&result, "unsupported_account_type");
    }

    /// Percentage rollouts follow the subject; 0 and 100 are absolute
    #[test]
    fn test_percentage_rollout() {
        let everyone = TestGateBuilder::new()
            .with_snapshot(FlagFixtures::split_rollout(100))
            .build();
        let nobody = TestGateBuilder::new()
            .with_snapshot(FlagFixtures::split_rollout(0))
            .build();
        let subject = EvaluationContext::for_subject("user-42");

        assert!(ewa_split(&everyone, &subject));
        assert!(!ewa_split(&nobody, &subject));
        // Without a subject a percentage flag is off.
        assert!(!ewa_split(&everyone, &EvaluationContext::new()));
    }

    /// Segment flags consult the context's segment
    #[test]
    fn test_segment_flag() {
        let gate = TestGateBuilder::new()
            .with_snapshot(FlagFixtures::split_for_beta())
            .build();

        assert!(ewa_split(&gate, &EvaluationContext::new().with_segment("beta")));
        assert!(!ewa_split(&gate, &EvaluationContext::new().with_segment("ga")));
    }

    /// Time-window flags are evaluated at the gate's instant
    #[test]
    fn test_time_window_flag() {
        let during = TestGateBuilder::new()
            .with_snapshot(FlagFixtures::split_during_launch())
            .at(TemporalFixtures::mid_launch())
            .build();
        let after = TestGateBuilder::new()
            .with_snapshot(FlagFixtures::split_during_launch())
            .at(TemporalFixtures::after_launch())
            .build();

        assert!(ewa_split(&during, &EvaluationContext::new()));
        assert!(!ewa_split(&after, &EvaluationContext::new()));
    }

    /// A generic-only request never consults the gate
    #[test]
    fn test_generic_types_ignore_missing_flags() {
        let gate = FeatureGate::new(domain_feature::FlagSnapshot::empty());
        let builder = TestSplitBuilder::default()
            .explicit("checking", MoneyFixtures::explicit_share())
            .implicit("savings");

        let result = allocate_with(builder, &gate, &EvaluationContext::new()).unwrap();
        assert_valid_allocation(&result, MoneyFixtures::bill_total());
    }

    /// A specialized type with no flag defined is a hard error
    #[test]
    fn test_missing_flag_for_specialized_type() {
        let gate = FeatureGate::new(domain_feature::FlagSnapshot::empty());
        let builder = TestSplitBuilder::default()
            .explicit("ewa", MoneyFixtures::explicit_share())
            .implicit("savings");

        assert!(allocate_with(builder, &gate, &EvaluationContext::new()).is_err());
    }
}

mod flag_store_workflow {
    use super::*;
    use domain_feature::{CachedFlagStore, FeatureFlagStore, JsonFileFlagStore};

    /// Flags loaded from a JSON file drive the engine
    #[tokio::test]
    async fn test_json_file_to_engine() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("flags.json");
        std::fs::write(&path, FlagFixtures::all_on_json()).unwrap();

        let store = CachedFlagStore::new(Arc::new(JsonFileFlagStore::new(&path)));
        let snapshot = store.snapshot().await.unwrap();
        assert_eq!(snapshot.len(), 3);

        let gate = FeatureGate::new(snapshot);
        let builder = TestSplitBuilder::default()
            .explicit("bnpl", Money::display(dec!(30.00)))
            .implicit("checking");
        let result = allocate_with(builder, &gate, &EvaluationContext::new()).unwrap();
        assert_valid_allocation(&result, MoneyFixtures::bill_total());
    }

    /// A refreshed cache sees an updated file
    #[tokio::test]
    async fn test_refresh_sees_file_changes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("flags.json");
        std::fs::write(&path, FlagFixtures::all_on_json()).unwrap();

        let store = CachedFlagStore::new(JsonFileFlagStore::new(&path));
        assert_eq!(store.snapshot().await.unwrap().len(), 3);

        std::fs::write(&path, r#"{"flags": []}"#).unwrap();
        assert_eq!(store.snapshot().await.unwrap().len(), 3);

        store.invalidate().await;
        assert!(store.snapshot().await.unwrap().is_empty());
    }
}

mod custom_registry {
    use super::*;

    /// Registries built by hand plug into the same engine
    #[test]
    fn test_custom_type_splits_generically() {
        let mut builder = AccountTypeRegistry::builder();
        builder
            .register_all(domain_account::builtin::descriptors())
            .unwrap()
            .register(
                AccountTypeDescriptor::new("gift_card", "Gift Card", AccountCategory::Banking)
                    .with_capabilities([Capability::SplitAllocation]),
            )
            .unwrap();
        let registry = builder.build();
        assert!(registry.contains(&AccountTypeKey::new("gift_card")));

        let engine = SplitAllocationEngine::with_registry(registry);
        let gate = TestGateBuilder::new().build();
        let (request, directory) = TestSplitBuilder::default()
            .explicit("gift_card", Money::display(dec!(15.00)))
            .implicit("checking")
            .build();

        let result = engine
            .allocate(&request, &directory, &gate, &EvaluationContext::new())
            .unwrap();
        assert_valid_allocation(&result, MoneyFixtures::bill_total());
    }

    /// Entries for types the registry lacks fail the whole call
    #[test]
    fn test_unregistered_type_is_error() {
        let builder = TestSplitBuilder::default()
            .explicit(AccountTypeFixtures::unregistered().as_str(), MoneyFixtures::explicit_share())
            .implicit("checking");
        let gate = TestGateBuilder::new().build();

        assert!(allocate_with(builder, &gate, &EvaluationContext::new()).is_err());
    }
}
