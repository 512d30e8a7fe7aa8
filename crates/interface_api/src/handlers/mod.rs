//! Request handlers

pub mod health;
pub mod account_types;
pub mod features;
pub mod splits;
