//! Bill Domain
//!
//! Splitting a bill across accounts. The [`SplitAllocationEngine`] takes a
//! total and a list of partial allocations, resolves the single implicit
//! entry to the remainder and reports every violation it finds as data.
//!
//! The engine is a pure function of its inputs: the request, the account
//! directory, the feature gate and the evaluation context. It performs no
//! I/O, so the same inputs always yield the same [`AllocationResult`].
//!
//! # Example
//!
//! ```rust
//! use std::collections::HashMap;
//! use core_kernel::{AccountId, AccountTypeKey, Money};
//! use domain_account::AccountTypeRegistry;
//! use domain_bill::{AllocationRequest, SplitAllocationEngine};
//! use domain_feature::{EvaluationContext, FeatureGate, FlagSnapshot};
//!
//! let (a, b) = (AccountId::new(), AccountId::new());
//! let directory: HashMap<AccountId, AccountTypeKey> =
//!     [(a, "checking".into()), (b, "savings".into())].into_iter().collect();
//!
//! let request = AllocationRequest::new(Money::parse_strict("100.00").unwrap())
//!     .explicit(a, Money::parse_strict("40.00").unwrap())
//!     .implicit(b);
//!
//! let engine = SplitAllocationEngine::with_registry(AccountTypeRegistry::builtin());
//! let gate = FeatureGate::new(FlagSnapshot::empty());
//! let result = engine.allocate(&request, &directory, &gate, &EvaluationContext::new()).unwrap();
//!
//! assert!(result.is_valid());
//! assert_eq!(result.amount_for(b).unwrap().to_string(), "60.00");
//! ```

pub mod request;
pub mod result;
pub mod violation;
pub mod engine;
pub mod bill;
pub mod error;

pub use request::{AllocationAmount, AllocationEntry, AllocationRequest};
pub use result::{AllocationResult, AllocationStatus, ResolvedAllocation};
pub use violation::Violation;
pub use engine::SplitAllocationEngine;
pub use bill::{Bill, BillBuilder, BillSplit, SecondarySplit};
pub use error::{BillError, EngineError};
