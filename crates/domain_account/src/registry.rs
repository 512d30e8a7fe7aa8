//! Account type registry
//!
//! Registration only happens on [`AccountTypeRegistryBuilder`]. Calling
//! `build()` freezes the table into an [`AccountTypeRegistry`], which has no
//! mutating methods and is shared behind an `Arc`, so reads never lock.

use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, error};

use core_kernel::AccountTypeKey;

use crate::builtin;
use crate::descriptor::{AccountCategory, AccountTypeDescriptor};
use crate::error::RegistryError;

/// Collects descriptors during startup
#[derive(Debug, Default)]
pub struct AccountTypeRegistryBuilder {
    types: BTreeMap<AccountTypeKey, AccountTypeDescriptor>,
}

impl AccountTypeRegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a descriptor; fails with `DuplicateType` if its key is taken
    pub fn register(&mut self, descriptor: AccountTypeDescriptor) -> Result<&mut Self, RegistryError> {
        descriptor.validate()?;
        if self.types.contains_key(&descriptor.key) {
            return Err(RegistryError::DuplicateType(descriptor.key.to_string()));
        }
        debug!(account_type = %descriptor.key, category = %descriptor.category, "Registered account type");
        self.types.insert(descriptor.key.clone(), descriptor);
        Ok(self)
    }

    /// Registers every descriptor, stopping at the first failure
    pub fn register_all(
        &mut self,
        descriptors: impl IntoIterator<Item = AccountTypeDescriptor>,
    ) -> Result<&mut Self, RegistryError> {
        for descriptor in descriptors {
            self.register(descriptor)?;
        }
        Ok(self)
    }

    pub fn build(self) -> AccountTypeRegistry {
        AccountTypeRegistry {
            types: Arc::new(self.types),
        }
    }
}

/// Immutable map from type key to descriptor
#[derive(Debug, Clone, Default)]
pub struct AccountTypeRegistry {
    types: Arc<BTreeMap<AccountTypeKey, AccountTypeDescriptor>>,
}

impl AccountTypeRegistry {
    pub fn builder() -> AccountTypeRegistryBuilder {
        AccountTypeRegistryBuilder::new()
    }

    /// Registry holding the built-in account type table
    pub fn builtin() -> Self {
        let mut builder = Self::builder();
        for descriptor in builtin::descriptors() {
            // Unreachable while `test_builtin_table_registers_every_entry` passes.
            if let Err(e) = builder.register(descriptor) {
                error!(error = %e, "Skipping invalid built-in account type");
            }
        }
        builder.build()
    }

    /// Looks up a descriptor by key
    pub fn get(&self, key: &AccountTypeKey) -> Result<&AccountTypeDescriptor, RegistryError> {
        self.types.get(key).ok_or_else(|| RegistryError::unknown(key))
    }

    /// Descriptors in one category, ordered by key
    pub fn list_by_category(&self, category: AccountCategory) -> Vec<&AccountTypeDescriptor> {
        self.types.values().filter(|d| d.category == category).collect()
    }

    pub fn descriptors(&self) -> impl Iterator<Item = &AccountTypeDescriptor> {
        self.types.values()
    }

    pub fn keys(&self) -> impl Iterator<Item = &AccountTypeKey> {
        self.types.keys()
    }

    pub fn contains(&self, key: &AccountTypeKey) -> bool {
        self.types.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}
