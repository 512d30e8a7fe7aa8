//! Specialized dispatch modules
//!
//! A module overrides a subset of operations for the account types that name
//! it. Operations a module leaves out fall through to the generic rule.

use crate::descriptor::AccountTypeDescriptor;

use super::{Handler, OperationInput, OperationOutcome, AUTOPAY, SPLIT_ALLOCATION};

pub const BNPL: &str = "bnpl";
pub const EWA: &str = "ewa";
pub const PAYMENT_APP: &str = "payment_app";

/// A named set of operation overrides
pub struct SpecializedModule {
    pub key: &'static str,
    handlers: &'static [(&'static str, Handler)],
}

impl SpecializedModule {
    pub fn handler(&self, operation: &str) -> Option<Handler> {
        self.handlers
            .iter()
            .find(|(name, _)| *name == operation)
            .map(|(_, handler)| *handler)
    }

    /// Names of the operations this module overrides
    pub fn operations(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.handlers.iter().map(|(name, _)| *name)
    }
}

impl std::fmt::Debug for SpecializedModule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpecializedModule")
            .field("key", &self.key)
            .field("operations", &self.operations().collect::<Vec<_>>())
            .finish()
    }
}

static MODULES: [SpecializedModule; 3] = [
    SpecializedModule {
        key: BNPL,
        handlers: &[(SPLIT_ALLOCATION, bnpl_split as Handler)],
    },
    SpecializedModule {
        key: EWA,
        handlers: &[(SPLIT_ALLOCATION, ewa_split as Handler)],
    },
    SpecializedModule {
        key: PAYMENT_APP,
        handlers: &[
            (SPLIT_ALLOCATION, payment_app_split as Handler),
            (AUTOPAY, payment_app_autopay as Handler),
        ],
    },
];

pub fn all() -> &'static [SpecializedModule] {
    &MODULES
}

pub fn find(key: &str) -> Option<&'static SpecializedModule> {
    MODULES.iter().find(|m| m.key == key)
}

/// Installment plans take only positive explicit shares
fn bnpl_split(descriptor: &AccountTypeDescriptor, input: &OperationInput) -> OperationOutcome {
    match input.amount {
        Some(amount) if !amount.is_positive() => OperationOutcome::rejected(format!(
            "{} allocations must be positive, got {}",
            descriptor.display_name, amount
        )),
        _ => OperationOutcome::Permitted,
    }
}

fn ewa_split(_descriptor: &AccountTypeDescriptor, _input: &OperationInput) -> OperationOutcome {
    OperationOutcome::Permitted
}

fn payment_app_split(_descriptor: &AccountTypeDescriptor, _input: &OperationInput) -> OperationOutcome {
    OperationOutcome::Permitted
}

/// Wallet autopay pulls a fixed amount, never "the full balance"
fn payment_app_autopay(descriptor: &AccountTypeDescriptor, input: &OperationInput) -> OperationOutcome {
    match input.amount {
        Some(amount) if amount.is_positive() => OperationOutcome::Permitted,
        Some(amount) => OperationOutcome::rejected(format!(
            "{} autopay amount must be positive, got {}",
            descriptor.display_name, amount
        )),
        None => OperationOutcome::rejected(format!(
            "{} autopay requires a fixed amount",
            descriptor.display_name
        )),
    }
}
