//! Test Utilities Crate
//!
//! Provides shared test infrastructure, fixtures, and helpers for the
//! bill split test suite.
//!
//! # Modules
//!
//! - `fixtures`: Pre-built amounts, accounts, dates and flag snapshots
//! - `builders`: Builder patterns for account directories and split requests
//! - `assertions`: Custom assertion helpers for allocation results
//! - `generators`: Property-based test data generators

pub mod fixtures;
pub mod builders;
pub mod assertions;
pub mod generators;

pub use fixtures::*;
pub use builders::*;
pub use assertions::*;
pub use generators::*;
