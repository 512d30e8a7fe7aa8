//! Comprehensive tests for domain_account

use core_kernel::{AccountTypeKey, Money};
use domain_account::dispatch::modules;
use domain_account::{
    AccountCategory, AccountTypeDescriptor, AccountTypeRegistry, Capability, DispatchError, Dispatcher,
    HandlerSource, OperationInput, OperationOutcome, RegistryError, AUTOPAY, BALANCE_VALIDATION,
    SPLIT_ALLOCATION,
};
use domain_feature::{
    EvaluationContext, FeatureError, FeatureFlagState, FeatureGate, FlagSnapshot, UnknownFeaturePolicy,
};
use rust_decimal_macros::dec;

fn all_on() -> FeatureGate {
    FeatureGate::new(
        FlagSnapshot::new([
            FeatureFlagState::boolean("split_allocation", true),
            FeatureFlagState::boolean("typed_balance_validation", true),
            FeatureFlagState::boolean("autopay", true),
        ])
        .unwrap(),
    )
}

fn all_off() -> FeatureGate {
    FeatureGate::new(
        FlagSnapshot::new([
            FeatureFlagState::boolean("split_allocation", false),
            FeatureFlagState::boolean("typed_balance_validation", false),
            FeatureFlagState::boolean("autopay", false),
        ])
        .unwrap(),
    )
}

// ============================================================================
// Registry Tests
// ============================================================================

mod registry_tests {
    use super::*;

    #[test]
    fn test_builtin_table() {
        let registry = AccountTypeRegistry::builtin();
        assert_eq!(registry.len(), 17);

        let banking: Vec<_> = registry
            .list_by_category(AccountCategory::Banking)
            .into_iter()
            .map(|d| d.key.as_str())
            .collect();
        assert_eq!(banking, vec!["bnpl", "checking", "credit", "ewa", "payment_app", "savings"]);

        assert_eq!(registry.list_by_category(AccountCategory::Loan).len(), 4);
        assert_eq!(registry.list_by_category(AccountCategory::Investment).len(), 3);
        assert_eq!(registry.list_by_category(AccountCategory::Obligation).len(), 4);
    }

    #[test]
    fn test_unknown_account_type() {
        let registry = AccountTypeRegistry::builtin();
        let err = registry.get(&AccountTypeKey::new("crypto_wallet")).unwrap_err();
        assert!(matches!(err, RegistryError::UnknownAccountType(ref key) if key == "crypto_wallet"));
        assert_eq!(err.to_string(), "Unknown account type: crypto_wallet");
    }

    #[test]
    fn test_builtin_modules_exist() {
        let registry = AccountTypeRegistry::builtin();
        for descriptor in registry.descriptors() {
            if let Some(module) = &descriptor.specialized_module {
                assert!(modules::find(module).is_some(), "missing module {}", module);
            }
        }
        assert_eq!(modules::all().len(), 3);
    }

    #[test]
    fn test_register_all_stops_at_duplicate() {
        let mut builder = AccountTypeRegistry::builder();
        let result = builder.register_all([
            AccountTypeDescriptor::new("checking", "Checking", AccountCategory::Banking),
            AccountTypeDescriptor::new("savings", "Savings", AccountCategory::Banking),
            AccountTypeDescriptor::new("CHECKING", "Checking again", AccountCategory::Banking),
        ]);
        assert!(matches!(result, Err(RegistryError::DuplicateType(_))));
    }

    #[test]
    fn test_descriptor_json() {
        let registry = AccountTypeRegistry::builtin();
        let json = serde_json::to_value(registry.get(&"payment_app".into()).unwrap()).unwrap();

        assert_eq!(json["category"], "banking");
        assert_eq!(json["specialized_module"], "payment_app");
        assert_eq!(json["capabilities"][0], "supports_split_allocation");
    }
}

// ============================================================================
// Dispatch Tests
// ============================================================================

mod dispatch_tests {
    use super::*;

    #[test]
    fn test_every_pair_resolves_without_flags_for_generic_types() {
        let dispatcher = Dispatcher::new(AccountTypeRegistry::builtin());
        let empty = FeatureGate::new(FlagSnapshot::empty());
        let ctx = EvaluationContext::new();

        for descriptor in dispatcher.registry().descriptors() {
            if descriptor.specialized_module.is_some() {
                continue;
            }
            for op in Dispatcher::operations() {
                let resolution = dispatcher.resolve(&descriptor.key, op.name, &empty, &ctx).unwrap();
                assert_eq!(resolution.source, HandlerSource::Generic);
            }
        }
    }

    #[test]
    fn test_fallback_for_undeclared_operation() {
        let dispatcher = Dispatcher::new(AccountTypeRegistry::builtin());
        let resolution = dispatcher
            .resolve(&"bnpl".into(), BALANCE_VALIDATION, &all_on(), &EvaluationContext::new())
            .unwrap();
        assert_eq!(resolution.source, HandlerSource::Generic);
    }

    #[test]
    fn test_bnpl_split_depends_on_gate() {
        let dispatcher = Dispatcher::new(AccountTypeRegistry::builtin());
        let ctx = EvaluationContext::new();
        let share = OperationInput::with_amount(Money::new(dec!(40)));

        let on = dispatcher.resolve(&"bnpl".into(), SPLIT_ALLOCATION, &all_on(), &ctx).unwrap();
        assert!(on.invoke(&share).is_permitted());

        let off = dispatcher.resolve(&"bnpl".into(), SPLIT_ALLOCATION, &all_off(), &ctx).unwrap();
        assert!(matches!(off.invoke(&share), OperationOutcome::Rejected { .. }));
    }

    #[test]
    fn test_scoped_flag_applies_per_type() {
        let dispatcher = Dispatcher::new(AccountTypeRegistry::builtin());
        let gate = FeatureGate::new(
            FlagSnapshot::new([FeatureFlagState::boolean("split_allocation", true).for_account_types(["ewa"])])
                .unwrap(),
        );
        let ctx = EvaluationContext::for_subject("user-1");

        let ewa = dispatcher.resolve(&"ewa".into(), SPLIT_ALLOCATION, &gate, &ctx).unwrap();
        let bnpl = dispatcher.resolve(&"bnpl".into(), SPLIT_ALLOCATION, &gate, &ctx).unwrap();

        assert_eq!(ewa.source, HandlerSource::Specialized("ewa"));
        assert_eq!(bnpl.source, HandlerSource::Generic);
    }

    #[test]
    fn test_payment_app_autopay_override() {
        let dispatcher = Dispatcher::new(AccountTypeRegistry::builtin());
        let ctx = EvaluationContext::new();

        let specialized = dispatcher.resolve(&"payment_app".into(), AUTOPAY, &all_on(), &ctx).unwrap();
        assert!(!specialized.invoke(&OperationInput::default()).is_permitted());
        assert!(specialized
            .invoke(&OperationInput::with_amount(Money::new(dec!(15))))
            .is_permitted());

        let generic = dispatcher.resolve(&"payment_app".into(), AUTOPAY, &all_off(), &ctx).unwrap();
        assert!(generic.invoke(&OperationInput::default()).is_permitted());
    }

    #[test]
    fn test_unknown_feature_propagates() {
        let dispatcher = Dispatcher::new(AccountTypeRegistry::builtin());
        let empty = FeatureGate::new(FlagSnapshot::empty());

        let err = dispatcher
            .resolve(&"ewa".into(), SPLIT_ALLOCATION, &empty, &EvaluationContext::new())
            .unwrap_err();
        assert!(matches!(err, DispatchError::Feature(FeatureError::UnknownFeature(ref f)) if f == "split_allocation"));

        let lenient = FeatureGate::new(FlagSnapshot::empty()).with_unknown_policy(UnknownFeaturePolicy::DefaultTo(false));
        let resolution = dispatcher
            .resolve(&"ewa".into(), SPLIT_ALLOCATION, &lenient, &EvaluationContext::new())
            .unwrap();
        assert_eq!(resolution.source, HandlerSource::Generic);
    }

    #[test]
    fn test_unknown_account_type_propagates() {
        let dispatcher = Dispatcher::new(AccountTypeRegistry::builtin());
        let err = dispatcher
            .resolve(&"crypto_wallet".into(), SPLIT_ALLOCATION, &all_on(), &EvaluationContext::new())
            .unwrap_err();
        assert!(matches!(err, DispatchError::Registry(RegistryError::UnknownAccountType(_))));
    }

    #[test]
    fn test_specialized_pairs() {
        let dispatcher = Dispatcher::new(AccountTypeRegistry::builtin());
        let pairs: Vec<(String, &str)> = dispatcher
            .specialized_pairs()
            .into_iter()
            .map(|(key, op)| (key.to_string(), op))
            .collect();

        assert_eq!(
            pairs,
            vec![
                ("bnpl".to_string(), "split_allocation"),
                ("ewa".to_string(), "split_allocation"),
                ("payment_app".to_string(), "split_allocation"),
                ("payment_app".to_string(), "autopay"),
            ]
        );
    }

    #[test]
    fn test_negative_balance_capability() {
        let dispatcher = Dispatcher::new(AccountTypeRegistry::builtin());
        let overdrawn = OperationInput::with_amount(Money::new(dec!(-100)));
        let ctx = EvaluationContext::new();

        for (key, permitted) in [("credit", true), ("mortgage", true), ("savings", false), ("checking", false)] {
            let resolution = dispatcher.resolve(&key.into(), BALANCE_VALIDATION, &all_on(), &ctx).unwrap();
            assert_eq!(resolution.invoke(&overdrawn).is_permitted(), permitted, "{}", key);
        }

        let credit = dispatcher.registry().get(&"credit".into()).unwrap();
        assert!(credit.has(Capability::NegativeBalance));
    }
}

// ============================================================================
// Property Tests
// ============================================================================

mod property_tests {
    use super::*;
    use proptest::prelude::*;

    fn builtin_keys() -> Vec<String> {
        AccountTypeRegistry::builtin().keys().map(|k| k.to_string()).collect()
    }

    proptest! {
        #[test]
        fn generic_fallback_never_fails(index in 0usize..17, op_index in 0usize..3) {
            let dispatcher = Dispatcher::new(AccountTypeRegistry::builtin());
            let key = AccountTypeKey::new(&builtin_keys()[index]);
            let op = Dispatcher::operations()[op_index].name;

            let resolution = dispatcher.resolve(&key, op, &all_off(), &EvaluationContext::new());
            prop_assert!(resolution.is_ok());
            prop_assert_eq!(resolution.unwrap().source, HandlerSource::Generic);
        }

        #[test]
        fn non_negative_balances_always_pass(cents in 0i64..10_000_000, index in 0usize..17) {
            let dispatcher = Dispatcher::new(AccountTypeRegistry::builtin());
            let key = AccountTypeKey::new(&builtin_keys()[index]);
            let resolution = dispatcher
                .resolve(&key, BALANCE_VALIDATION, &all_on(), &EvaluationContext::new())
                .unwrap();
            prop_assert!(resolution.invoke(&OperationInput::with_amount(Money::from_minor(cents))).is_permitted());
        }
    }
}
