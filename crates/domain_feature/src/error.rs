//! Feature domain errors

use core_kernel::PortError;
use thiserror::Error;

/// Errors that can occur while loading or evaluating feature flags
#[derive(Debug, Error)]
pub enum FeatureError {
    /// No flag with this name exists in the snapshot
    #[error("Unknown feature: {0}")]
    UnknownFeature(String),

    /// A flag definition is malformed
    #[error("Invalid flag '{name}': {reason}")]
    InvalidFlag {
        name: String,
        reason: String,
    },

    /// A flag document could not be decoded
    #[error("Failed to parse flags: {0}")]
    Parse(String),

    /// The backing store failed
    #[error("Flag store error: {0}")]
    Store(#[from] PortError),
}

impl FeatureError {
    pub fn invalid_flag(name: impl Into<String>, reason: impl Into<String>) -> Self {
        FeatureError::InvalidFlag {
            name: name.into(),
            reason: reason.into(),
        }
    }
}
