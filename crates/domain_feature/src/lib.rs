//! Feature Gate Domain
//!
//! This crate decides whether a capability is currently switched on. Flags
//! are explicit data handed to the gate as a snapshot, never ambient global
//! state, so evaluation is a pure function of its inputs.
//!
//! # Key Concepts
//!
//! - **FeatureFlagState**: a flag's name, evaluation mode and optional
//!   account-type scope
//! - **FlagSnapshot**: a validated, immutable set of flags
//! - **FeatureGate**: evaluates a flag for an [`EvaluationContext`]
//! - **FeatureFlagStore**: async port that produces snapshots
//!
//! # Example
//!
//! ```rust
//! use domain_feature::{EvaluationContext, FeatureFlagState, FeatureGate, FlagSnapshot};
//!
//! let snapshot = FlagSnapshot::new([FeatureFlagState::boolean("autopay", true)]).unwrap();
//! let gate = FeatureGate::new(snapshot);
//!
//! assert!(gate.is_enabled("autopay", &EvaluationContext::new()).unwrap());
//! assert!(gate.is_enabled("unknown", &EvaluationContext::new()).is_err());
//! ```

pub mod flag;
pub mod snapshot;
pub mod gate;
pub mod store;
pub mod error;

pub use flag::{EvaluationMode, FeatureFlagState};
pub use snapshot::{FlagDocument, FlagSnapshot};
pub use gate::{rollout_bucket, EvaluationContext, FeatureGate, UnknownFeaturePolicy};
pub use store::{CachedFlagStore, FeatureFlagStore, InMemoryFlagStore, JsonFileFlagStore};
pub use error::FeatureError;
