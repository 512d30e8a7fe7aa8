//! Account type domain errors

use thiserror::Error;

use domain_feature::FeatureError;

/// Errors raised by the account type registry
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// No descriptor is registered under this key
    #[error("Unknown account type: {0}")]
    UnknownAccountType(String),

    /// A descriptor is already registered under this key
    #[error("Account type already registered: {0}")]
    DuplicateType(String),

    /// Descriptor failed validation at registration
    #[error("Invalid descriptor for '{key}': {reason}")]
    InvalidDescriptor { key: String, reason: String },
}

impl RegistryError {
    pub fn unknown(key: impl std::fmt::Display) -> Self {
        RegistryError::UnknownAccountType(key.to_string())
    }

    pub fn invalid_descriptor(key: impl std::fmt::Display, reason: impl Into<String>) -> Self {
        RegistryError::InvalidDescriptor {
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}

/// Errors raised while resolving an operation for an account type
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The operation has no generic fallback
    #[error("Unknown operation: {0}")]
    UnknownOperation(String),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Feature(#[from] FeatureError),
}
