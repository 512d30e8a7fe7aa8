//! Built-in account type table
//!
//! | category   | types                                                   |
//! |------------|---------------------------------------------------------|
//! | banking    | checking, savings, credit, payment_app, bnpl, ewa       |
//! | loan       | personal_loan, auto_loan, mortgage, student_loan        |
//! | investment | brokerage, retirement, hsa                              |
//! | obligation | utility, subscription, insurance, tax                   |
//!
//! `bnpl` and `ewa` do not declare split allocation. They only accept splits
//! through their specialized modules while the `split_allocation` feature is
//! on for them.

use crate::descriptor::{AccountCategory, AccountTypeDescriptor, Capability};
use crate::dispatch::modules;

use AccountCategory::*;
use Capability::*;

/// Descriptors registered by [`AccountTypeRegistry::builtin`](crate::AccountTypeRegistry::builtin)
pub fn descriptors() -> Vec<AccountTypeDescriptor> {
    vec![
        // Banking
        AccountTypeDescriptor::new("checking", "Checking", Banking)
            .with_capabilities([SplitAllocation, Autopay]),
        AccountTypeDescriptor::new("savings", "Savings", Banking)
            .with_capabilities([SplitAllocation, InterestAccrual]),
        AccountTypeDescriptor::new("credit", "Credit Card", Banking)
            .with_capabilities([SplitAllocation, Autopay, NegativeBalance, InterestAccrual, StatementCycle]),
        AccountTypeDescriptor::new("payment_app", "Payment App", Banking)
            .with_capabilities([SplitAllocation, Autopay])
            .with_specialized_module(modules::PAYMENT_APP),
        AccountTypeDescriptor::new("bnpl", "Buy Now, Pay Later", Banking)
            .with_capabilities([NegativeBalance, StatementCycle])
            .with_specialized_module(modules::BNPL),
        AccountTypeDescriptor::new("ewa", "Earned Wage Access", Banking)
            .with_capabilities([NegativeBalance])
            .with_specialized_module(modules::EWA),
        // Loans
        AccountTypeDescriptor::new("personal_loan", "Personal Loan", Loan)
            .with_capabilities([Autopay, NegativeBalance, InterestAccrual, StatementCycle]),
        AccountTypeDescriptor::new("auto_loan", "Auto Loan", Loan)
            .with_capabilities([Autopay, NegativeBalance, InterestAccrual, StatementCycle]),
        AccountTypeDescriptor::new("mortgage", "Mortgage", Loan)
            .with_capabilities([Autopay, NegativeBalance, InterestAccrual, StatementCycle]),
        AccountTypeDescriptor::new("student_loan", "Student Loan", Loan)
            .with_capabilities([Autopay, NegativeBalance, InterestAccrual, StatementCycle]),
        // Investments
        AccountTypeDescriptor::new("brokerage", "Brokerage", Investment)
            .with_capabilities([SplitAllocation]),
        AccountTypeDescriptor::new("retirement", "Retirement", Investment),
        AccountTypeDescriptor::new("hsa", "Health Savings Account", Investment)
            .with_capabilities([SplitAllocation, InterestAccrual]),
        // Obligations
        AccountTypeDescriptor::new("utility", "Utility", Obligation)
            .with_capabilities([Autopay, StatementCycle]),
        AccountTypeDescriptor::new("subscription", "Subscription", Obligation)
            .with_capabilities([Autopay, StatementCycle]),
        AccountTypeDescriptor::new("insurance", "Insurance", Obligation)
            .with_capabilities([Autopay, StatementCycle]),
        AccountTypeDescriptor::new("tax", "Tax", Obligation)
            .with_capabilities([StatementCycle]),
    ]
}
