//! Request and response bodies

pub mod account_types;
pub mod features;
pub mod splits;
