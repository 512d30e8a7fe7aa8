//! Core Kernel - Foundational types for the bill split core
//!
//! This crate provides the building blocks used across all domain crates:
//! - Money and Percentage types with fixed display/storage precision
//! - UTC temporal helpers and half-open time windows
//! - Typed identifiers and account type keys
//! - Collaborator ports for data the pure core does not own

pub mod money;
pub mod temporal;
pub mod identifiers;
pub mod ports;

pub use money::{Money, MoneyError, Percentage, Precision, DISPLAY_PRECISION, MAX_AMOUNT, STORAGE_PRECISION};
pub use temporal::{TemporalError, TimeWindow, Timezone};
pub use identifiers::{AccountId, AccountTypeKey, BillId, BillSplitId};
pub use ports::{AccountDirectory, PortError};
