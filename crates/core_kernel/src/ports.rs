//! Collaborator ports
//!
//! The allocation core is pure: anything it needs from persistence is
//! supplied through the traits here. Each domain crate defines further ports
//! of its own on top of [`PortError`].
//!
//! ```rust,ignore
//! // Resolve account types up front (e.g. one query per request) ...
//! let directory: HashMap<AccountId, AccountTypeKey> = repo.account_types(&ids).await?;
//!
//! // ... then hand the snapshot to the engine as its account collaborator.
//! let result = engine.allocate(&request, &directory, &gate, &context)?;
//! ```

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use thiserror::Error;

use crate::identifiers::{AccountId, AccountTypeKey};

/// Error type for port operations
#[derive(Debug, Error)]
pub enum PortError {
    /// The requested entity was not found
    #[error("Not found: {entity_type} with id {id}")]
    NotFound {
        entity_type: String,
        id: String,
    },

    /// Connection to the underlying system failed
    #[error("Connection error: {message}")]
    Connection {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl PortError {
    /// Creates a NotFound error
    pub fn not_found(entity_type: impl Into<String>, id: impl fmt::Display) -> Self {
        PortError::NotFound {
            entity_type: entity_type.into(),
            id: id.to_string(),
        }
    }

    pub fn connection(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        PortError::Connection {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Returns true if retrying the operation may succeed
    pub fn is_transient(&self) -> bool {
        matches!(self, PortError::Connection { .. })
    }
}

/// Lookup of an account's type by id
///
/// Returns `None` when the account does not exist. Implementations are
/// expected to be snapshots already fetched for the current request; the
/// lookup itself performs no I/O.
pub trait AccountDirectory {
    fn account_type(&self, account_id: &AccountId) -> Option<AccountTypeKey>;
}

impl AccountDirectory for HashMap<AccountId, AccountTypeKey> {
    fn account_type(&self, account_id: &AccountId) -> Option<AccountTypeKey> {
        self.get(account_id).cloned()
    }
}

impl AccountDirectory for BTreeMap<AccountId, AccountTypeKey> {
    fn account_type(&self, account_id: &AccountId) -> Option<AccountTypeKey> {
        self.get(account_id).cloned()
    }
}

impl<T: AccountDirectory + ?Sized> AccountDirectory for &T {
    fn account_type(&self, account_id: &AccountId) -> Option<AccountTypeKey> {
        (**self).account_type(account_id)
    }
}
