//! Account type DTOs

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use core_kernel::AccountTypeKey;
use domain_account::dispatch::modules;
use domain_account::{AccountCategory, AccountTypeDescriptor, Capability};

#[derive(Debug, Default, Deserialize)]
pub struct ListAccountTypesQuery {
    pub category: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AccountTypeResponse {
    pub key: AccountTypeKey,
    pub display_name: String,
    pub category: AccountCategory,
    pub capabilities: BTreeSet<Capability>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specialized_module: Option<String>,
    /// Operations the specialized module may take over
    pub specialized_operations: Vec<&'static str>,
}

impl From<&AccountTypeDescriptor> for AccountTypeResponse {
    fn from(descriptor: &AccountTypeDescriptor) -> Self {
        let specialized_operations = descriptor
            .specialized_module
            .as_deref()
            .and_then(modules::find)
            .map(|m| m.operations().collect())
            .unwrap_or_default();

        Self {
            key: descriptor.key.clone(),
            display_name: descriptor.display_name.clone(),
            category: descriptor.category,
            capabilities: descriptor.capabilities.clone(),
            specialized_module: descriptor.specialized_module.clone(),
            specialized_operations,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AccountTypeListResponse {
    pub account_types: Vec<AccountTypeResponse>,
    pub count: usize,
}
