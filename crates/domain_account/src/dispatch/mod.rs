//! Per-type operation dispatch
//!
//! Every operation has a generic rule driven by capability flags. An account
//! type may name a specialized module that overrides some operations; the
//! override is used only while the operation's feature is enabled for that
//! account type.
//!
//! ```text
//! resolve(type, op)
//!   -> descriptor = registry.get(type)          (UnknownAccountType)
//!   -> operation  = OPERATIONS[op]              (UnknownOperation)
//!   -> module declares op && gate(operation.feature) => specialized handler
//!   -> otherwise                                 => generic handler
//! ```
//!
//! Handlers are plain `fn` pointers held in static tables, so every
//! (type, operation) pair can be listed up front.

pub mod generic;
pub mod modules;

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, warn};

use core_kernel::{AccountTypeKey, Money};
use domain_feature::{EvaluationContext, FeatureGate};

use crate::descriptor::AccountTypeDescriptor;
use crate::error::DispatchError;
use crate::registry::AccountTypeRegistry;

pub const SPLIT_ALLOCATION: &str = "split_allocation";
pub const BALANCE_VALIDATION: &str = "balance_validation";
pub const AUTOPAY: &str = "autopay";

/// Signature shared by generic and specialized handlers
pub type Handler = fn(&AccountTypeDescriptor, &OperationInput) -> OperationOutcome;

/// Input handed to an operation handler
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct OperationInput {
    /// Amount the operation concerns; `None` for an implicit split entry or
    /// an autopay of the full statement balance
    pub amount: Option<Money>,
}

impl OperationInput {
    pub fn new(amount: Option<Money>) -> Self {
        Self { amount }
    }

    pub fn with_amount(amount: Money) -> Self {
        Self { amount: Some(amount) }
    }
}

/// What a handler decided
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum OperationOutcome {
    Permitted,
    Rejected { reason: String },
}

impl OperationOutcome {
    pub fn rejected(reason: impl Into<String>) -> Self {
        OperationOutcome::Rejected { reason: reason.into() }
    }

    pub fn is_permitted(&self) -> bool {
        matches!(self, OperationOutcome::Permitted)
    }
}

/// A named operation with its gate feature and generic fallback
#[derive(Clone, Copy)]
pub struct OperationSpec {
    pub name: &'static str,
    /// Feature that must be on for a specialized handler to be used
    pub feature: &'static str,
    pub generic: Handler,
}

impl fmt::Debug for OperationSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperationSpec")
            .field("name", &self.name)
            .field("feature", &self.feature)
            .finish_non_exhaustive()
    }
}

static OPERATIONS: [OperationSpec; 3] = [
    OperationSpec {
        name: SPLIT_ALLOCATION,
        feature: "split_allocation",
        generic: generic::split_allocation,
    },
    OperationSpec {
        name: BALANCE_VALIDATION,
        feature: "typed_balance_validation",
        generic: generic::balance_validation,
    },
    OperationSpec {
        name: AUTOPAY,
        feature: "autopay",
        generic: generic::autopay,
    },
];

/// Where a resolved handler came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "source", content = "module", rename_all = "snake_case")]
pub enum HandlerSource {
    Specialized(&'static str),
    Generic,
}

/// A handler bound to the descriptor it was resolved for
pub struct Resolution<'r> {
    pub descriptor: &'r AccountTypeDescriptor,
    pub operation: &'static str,
    pub source: HandlerSource,
    handler: Handler,
}

impl Resolution<'_> {
    pub fn invoke(&self, input: &OperationInput) -> OperationOutcome {
        (self.handler)(self.descriptor, input)
    }

    pub fn is_specialized(&self) -> bool {
        matches!(self.source, HandlerSource::Specialized(_))
    }
}

impl fmt::Debug for Resolution<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolution")
            .field("account_type", &self.descriptor.key)
            .field("operation", &self.operation)
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}

/// Resolves (account type, operation) pairs to handlers
#[derive(Debug, Clone)]
pub struct Dispatcher {
    registry: AccountTypeRegistry,
}

impl Dispatcher {
    pub fn new(registry: AccountTypeRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &AccountTypeRegistry {
        &self.registry
    }

    /// Every operation with a generic fallback
    pub fn operations() -> &'static [OperationSpec] {
        &OPERATIONS
    }

    pub fn operation(name: &str) -> Result<&'static OperationSpec, DispatchError> {
        OPERATIONS
            .iter()
            .find(|op| op.name == name)
            .ok_or_else(|| DispatchError::UnknownOperation(name.to_string()))
    }

    /// Picks the handler for `operation` on `account_type`
    ///
    /// The gate is only consulted when the type's module overrides the
    /// operation. The context is narrowed to `account_type` before
    /// evaluation so scoped flags apply.
    pub fn resolve(
        &self,
        account_type: &AccountTypeKey,
        operation: &str,
        gate: &FeatureGate,
        context: &EvaluationContext,
    ) -> Result<Resolution<'_>, DispatchError> {
        let descriptor = self.registry.get(account_type)?;
        let spec = Self::operation(operation)?;

        if let Some(module_key) = descriptor.specialized_module.as_deref() {
            match modules::find(module_key) {
                Some(module) => {
                    if let Some(handler) = module.handler(spec.name) {
                        if gate.is_enabled(spec.feature, &context.scoped_to(&descriptor.key))? {
                            debug!(
                                account_type = %descriptor.key,
                                operation = spec.name,
                                module = module.key,
                                "Resolved specialized handler"
                            );
                            return Ok(Resolution {
                                descriptor,
                                operation: spec.name,
                                source: HandlerSource::Specialized(module.key),
                                handler,
                            });
                        }
                    }
                }
                None => {
                    warn!(account_type = %descriptor.key, module = module_key, "Unknown specialized module");
                }
            }
        }

        debug!(account_type = %descriptor.key, operation = spec.name, "Resolved generic handler");
        Ok(Resolution {
            descriptor,
            operation: spec.name,
            source: HandlerSource::Generic,
            handler: spec.generic,
        })
    }

    /// Registered (type, operation) pairs that have a specialized override
    pub fn specialized_pairs(&self) -> Vec<(AccountTypeKey, &'static str)> {
        self.registry
            .descriptors()
            .filter_map(|d| {
                let module = modules::find(d.specialized_module.as_deref()?)?;
                Some(module.operations().map(move |op| (d.key.clone(), op)))
            })
            .flatten()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain_feature::{FeatureFlagState, FlagSnapshot};

    fn gate(split_on: bool) -> FeatureGate {
        FeatureGate::new(
            FlagSnapshot::new([
                FeatureFlagState::boolean("split_allocation", split_on),
                FeatureFlagState::boolean("autopay", true),
                FeatureFlagState::boolean("typed_balance_validation", true),
            ])
            .unwrap(),
        )
    }

    #[test]
    fn test_operation_table() {
        let names: Vec<_> = Dispatcher::operations().iter().map(|op| op.name).collect();
        assert_eq!(names, vec!["split_allocation", "balance_validation", "autopay"]);
        assert_eq!(Dispatcher::operation("balance_validation").unwrap().feature, "typed_balance_validation");
    }

    #[test]
    fn test_unknown_operation() {
        let dispatcher = Dispatcher::new(AccountTypeRegistry::builtin());
        let err = dispatcher
            .resolve(&"checking".into(), "refund", &gate(true), &EvaluationContext::new())
            .unwrap_err();
        assert!(matches!(err, DispatchError::UnknownOperation(op) if op == "refund"));
    }

    #[test]
    fn test_specialized_only_when_enabled() {
        let dispatcher = Dispatcher::new(AccountTypeRegistry::builtin());
        let ctx = EvaluationContext::new();

        let on = dispatcher.resolve(&"bnpl".into(), SPLIT_ALLOCATION, &gate(true), &ctx).unwrap();
        assert_eq!(on.source, HandlerSource::Specialized("bnpl"));

        let off = dispatcher.resolve(&"bnpl".into(), SPLIT_ALLOCATION, &gate(false), &ctx).unwrap();
        assert_eq!(off.source, HandlerSource::Generic);
    }

    #[test]
    fn test_gate_not_consulted_without_override() {
        let dispatcher = Dispatcher::new(AccountTypeRegistry::builtin());
        let empty = FeatureGate::new(FlagSnapshot::empty());

        let resolution = dispatcher
            .resolve(&"checking".into(), SPLIT_ALLOCATION, &empty, &EvaluationContext::new())
            .unwrap();
        assert!(!resolution.is_specialized());
    }

    #[test]
    fn test_unknown_module_falls_back() {
        let mut builder = AccountTypeRegistry::builder();
        builder
            .register(
                AccountTypeDescriptor::new("crypto", "Crypto", crate::AccountCategory::Investment)
                    .with_specialized_module("does_not_exist"),
            )
            .unwrap();
        let dispatcher = Dispatcher::new(builder.build());

        let resolution = dispatcher
            .resolve(&"crypto".into(), AUTOPAY, &gate(true), &EvaluationContext::new())
            .unwrap();
        assert_eq!(resolution.source, HandlerSource::Generic);
    }
}
