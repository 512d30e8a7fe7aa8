//! Account type descriptors
//!
//! A descriptor says what an account type *is*: its category, the operations
//! it supports in principle, and which specialized dispatch module (if any)
//! handles it. Descriptors carry no behavior of their own.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use core_kernel::AccountTypeKey;

use crate::error::RegistryError;

/// Closed set of account categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountCategory {
    /// Deposit, card and wallet style accounts
    Banking,
    /// Amortizing debt
    Loan,
    /// Brokerage and tax-advantaged accounts
    Investment,
    /// Recurring payees such as utilities and subscriptions
    Obligation,
}

impl AccountCategory {
    pub const ALL: [AccountCategory; 4] = [
        AccountCategory::Banking,
        AccountCategory::Loan,
        AccountCategory::Investment,
        AccountCategory::Obligation,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AccountCategory::Banking => "banking",
            AccountCategory::Loan => "loan",
            AccountCategory::Investment => "investment",
            AccountCategory::Obligation => "obligation",
        }
    }
}

impl fmt::Display for AccountCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AccountCategory::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown account category '{}'", s))
    }
}

/// Capability flags an account type may declare
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Capability {
    #[serde(rename = "supports_split_allocation")]
    SplitAllocation,
    #[serde(rename = "supports_autopay")]
    Autopay,
    #[serde(rename = "supports_negative_balance")]
    NegativeBalance,
    #[serde(rename = "supports_interest_accrual")]
    InterestAccrual,
    #[serde(rename = "supports_statement_cycle")]
    StatementCycle,
}

impl Capability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::SplitAllocation => "supports_split_allocation",
            Capability::Autopay => "supports_autopay",
            Capability::NegativeBalance => "supports_negative_balance",
            Capability::InterestAccrual => "supports_interest_accrual",
            Capability::StatementCycle => "supports_statement_cycle",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Static description of one account type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountTypeDescriptor {
    pub key: AccountTypeKey,
    pub display_name: String,
    pub category: AccountCategory,
    pub capabilities: BTreeSet<Capability>,
    /// Key of the specialized dispatch module handling this type
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specialized_module: Option<String>,
}

impl AccountTypeDescriptor {
    pub fn new(
        key: impl Into<AccountTypeKey>,
        display_name: impl Into<String>,
        category: AccountCategory,
    ) -> Self {
        Self {
            key: key.into(),
            display_name: display_name.into(),
            category,
            capabilities: BTreeSet::new(),
            specialized_module: None,
        }
    }

    pub fn with_capabilities(mut self, capabilities: impl IntoIterator<Item = Capability>) -> Self {
        self.capabilities.extend(capabilities);
        self
    }

    pub fn with_specialized_module(mut self, module: impl Into<String>) -> Self {
        self.specialized_module = Some(module.into());
        self
    }

    pub fn has(&self, capability: Capability) -> bool {
        self.capabilities.contains(&capability)
    }

    pub(crate) fn validate(&self) -> Result<(), RegistryError> {
        if !self.key.is_well_formed() {
            return Err(RegistryError::invalid_descriptor(
                &self.key,
                "key must be lowercase letters, digits or underscores",
            ));
        }
        if self.display_name.trim().is_empty() {
            return Err(RegistryError::invalid_descriptor(&self.key, "display name must not be empty"));
        }
        if matches!(&self.specialized_module, Some(m) if m.trim().is_empty()) {
            return Err(RegistryError::invalid_descriptor(&self.key, "specialized module key must not be blank"));
        }
        Ok(())
    }
}
