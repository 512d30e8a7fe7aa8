//! Account Type Domain
//!
//! Account types are described by data rather than modelled as a type
//! hierarchy. Each type has an [`AccountTypeDescriptor`] (category plus
//! capability flags) registered once at startup, and behavior is looked up
//! per (type, operation) through the [`Dispatcher`].
//!
//! # Example
//!
//! ```rust
//! use domain_account::{AccountTypeRegistry, Dispatcher, OperationInput, SPLIT_ALLOCATION};
//! use domain_feature::{EvaluationContext, FeatureFlagState, FeatureGate, FlagSnapshot};
//!
//! let dispatcher = Dispatcher::new(AccountTypeRegistry::builtin());
//! let gate = FeatureGate::new(
//!     FlagSnapshot::new([FeatureFlagState::boolean("split_allocation", true)]).unwrap(),
//! );
//!
//! let resolution = dispatcher
//!     .resolve(&"ewa".into(), SPLIT_ALLOCATION, &gate, &EvaluationContext::new())
//!     .unwrap();
//! assert!(resolution.is_specialized());
//! assert!(resolution.invoke(&OperationInput::default()).is_permitted());
//! ```

pub mod descriptor;
pub mod registry;
pub mod builtin;
pub mod dispatch;
pub mod error;

pub use descriptor::{AccountCategory, AccountTypeDescriptor, Capability};
pub use registry::{AccountTypeRegistry, AccountTypeRegistryBuilder};
pub use dispatch::{
    Dispatcher, Handler, HandlerSource, OperationInput, OperationOutcome, OperationSpec, Resolution,
    AUTOPAY, BALANCE_VALIDATION, SPLIT_ALLOCATION,
};
pub use dispatch::modules::SpecializedModule;
pub use error::{DispatchError, RegistryError};
