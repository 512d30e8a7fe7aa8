//! Capability-driven fallback rules

use crate::descriptor::{AccountTypeDescriptor, Capability};

use super::{OperationInput, OperationOutcome};

fn requires(descriptor: &AccountTypeDescriptor, capability: Capability, action: &str) -> OperationOutcome {
    if descriptor.has(capability) {
        OperationOutcome::Permitted
    } else {
        OperationOutcome::rejected(format!(
            "account type '{}' does not support {}",
            descriptor.key, action
        ))
    }
}

pub fn split_allocation(descriptor: &AccountTypeDescriptor, _input: &OperationInput) -> OperationOutcome {
    requires(descriptor, Capability::SplitAllocation, "split allocation")
}

/// Balances must be non-negative unless the type allows negative balances
pub fn balance_validation(descriptor: &AccountTypeDescriptor, input: &OperationInput) -> OperationOutcome {
    match input.amount {
        None => OperationOutcome::rejected("a balance is required"),
        Some(balance) if balance.is_negative() && !descriptor.has(Capability::NegativeBalance) => {
            OperationOutcome::rejected(format!(
                "account type '{}' cannot carry a negative balance ({})",
                descriptor.key, balance
            ))
        }
        Some(_) => OperationOutcome::Permitted,
    }
}

pub fn autopay(descriptor: &AccountTypeDescriptor, _input: &OperationInput) -> OperationOutcome {
    requires(descriptor, Capability::Autopay, "autopay")
}
