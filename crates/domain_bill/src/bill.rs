//! Bill aggregate
//!
//! A bill is paid from one primary account plus any number of secondary
//! splits. Secondary splits carry explicit amounts; the primary account is
//! always the implicit entry that absorbs the remainder.
//!
//! ```text
//! Bill::builder() ... build()
//!   -> allocation_request()  -> SplitAllocationEngine::allocate
//!   -> apply_allocation(&result) -> splits()
//! ```

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{AccountId, BillId, BillSplitId, Money, Timezone};

use crate::error::BillError;
use crate::request::AllocationRequest;
use crate::result::AllocationResult;

/// A requested secondary split
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SecondarySplit {
    pub account_id: AccountId,
    pub amount: Money,
}

/// A resolved share of a bill
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillSplit {
    pub id: BillSplitId,
    pub bill_id: BillId,
    pub account_id: AccountId,
    pub amount: Money,
    pub is_primary: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bill {
    id: BillId,
    name: String,
    total_amount: Money,
    /// Always stored in UTC
    due_date: DateTime<Utc>,
    primary_account_id: AccountId,
    category: Option<String>,
    secondary_splits: Vec<SecondarySplit>,
    splits: Vec<BillSplit>,
}

impl Bill {
    pub fn builder() -> BillBuilder {
        BillBuilder::new()
    }

    pub fn id(&self) -> BillId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn total_amount(&self) -> Money {
        self.total_amount
    }

    pub fn due_date(&self) -> DateTime<Utc> {
        self.due_date
    }

    pub fn primary_account_id(&self) -> AccountId {
        self.primary_account_id
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn secondary_splits(&self) -> &[SecondarySplit] {
        &self.secondary_splits
    }

    /// Resolved splits; empty until an allocation is applied
    pub fn splits(&self) -> &[BillSplit] {
        &self.splits
    }

    pub fn is_allocated(&self) -> bool {
        !self.splits.is_empty()
    }

    pub fn primary_split(&self) -> Option<&BillSplit> {
        self.splits.iter().find(|s| s.is_primary)
    }

    /// Adds a secondary split and discards any applied allocation
    pub fn add_secondary_split(&mut self, account_id: AccountId, amount: Money) -> Result<(), BillError> {
        if account_id == self.primary_account_id {
            return Err(BillError::PrimaryAsSecondary(account_id));
        }
        if self.secondary_splits.iter().any(|s| s.account_id == account_id) {
            return Err(BillError::DuplicateSplit(account_id));
        }
        self.secondary_splits.push(SecondarySplit { account_id, amount });
        self.splits.clear();
        Ok(())
    }

    /// Removes a secondary split; returns false if the account had none
    pub fn remove_secondary_split(&mut self, account_id: AccountId) -> bool {
        let before = self.secondary_splits.len();
        self.secondary_splits.retain(|s| s.account_id != account_id);
        let removed = self.secondary_splits.len() != before;
        if removed {
            self.splits.clear();
        }
        removed
    }

    /// Engine request: primary implicit first, then secondaries in order
    pub fn allocation_request(&self) -> AllocationRequest {
        self.secondary_splits.iter().fold(
            AllocationRequest::new(self.total_amount).implicit(self.primary_account_id),
            |request, split| request.explicit(split.account_id, split.amount),
        )
    }

    /// Stores the resolved splits from a valid result
    ///
    /// The result must cover exactly the accounts of
    /// [`allocation_request`](Self::allocation_request), in the same order.
    pub fn apply_allocation(&mut self, result: &AllocationResult) -> Result<&[BillSplit], BillError> {
        if !result.is_valid() {
            return Err(BillError::InvalidAllocation(result.violations.clone()));
        }

        let request = self.allocation_request();
        let expected: Vec<AccountId> = request.allocations.iter().map(|e| e.account_id).collect();
        let actual: Vec<AccountId> = result.allocations.iter().map(|a| a.account_id).collect();
        if expected != actual {
            return Err(BillError::AllocationMismatch(format!(
                "expected {} allocation(s), result has {}",
                expected.len(),
                actual.len()
            )));
        }
        if result.allocated_total() != self.total_amount.rounded_to_display() {
            return Err(BillError::AllocationMismatch(format!(
                "result allocates {}, bill total is {}",
                result.allocated_total(),
                self.total_amount
            )));
        }

        self.splits = result
            .allocations
            .iter()
            .map(|a| BillSplit {
                id: BillSplitId::new_v7(),
                bill_id: self.id,
                account_id: a.account_id,
                amount: a.amount,
                is_primary: a.account_id == self.primary_account_id,
            })
            .collect();
        Ok(&self.splits)
    }
}

/// Builder for [`Bill`]
#[derive(Debug, Default)]
pub struct BillBuilder {
    name: Option<String>,
    total_amount: Option<Money>,
    due_date: Option<DateTime<Utc>>,
    primary_account_id: Option<AccountId>,
    category: Option<String>,
    secondary_splits: Vec<SecondarySplit>,
}

impl BillBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn total_amount(mut self, amount: Money) -> Self {
        self.total_amount = Some(amount);
        self
    }

    pub fn due_date(mut self, due: DateTime<Utc>) -> Self {
        self.due_date = Some(due);
        self
    }

    /// Sets the due date from a wall-clock time in `timezone`
    ///
    /// # Errors
    ///
    /// Fails for local times skipped or repeated by a DST transition.
    pub fn due_local(mut self, local: NaiveDateTime, timezone: Timezone) -> Result<Self, BillError> {
        self.due_date = Some(timezone.to_utc(local)?);
        Ok(self)
    }

    pub fn primary_account(mut self, account_id: AccountId) -> Self {
        self.primary_account_id = Some(account_id);
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn secondary_split(mut self, account_id: AccountId, amount: Money) -> Self {
        self.secondary_splits.push(SecondarySplit { account_id, amount });
        self
    }

    /// # Errors
    ///
    /// Returns an error if a required field is missing, the name is blank,
    /// the total is negative or a secondary split repeats an account.
    pub fn build(self) -> Result<Bill, BillError> {
        let name = self
            .name
            .ok_or_else(|| BillError::MissingRequiredField("name".to_string()))?;
        let total_amount = self
            .total_amount
            .ok_or_else(|| BillError::MissingRequiredField("total_amount".to_string()))?;
        let due_date = self
            .due_date
            .ok_or_else(|| BillError::MissingRequiredField("due_date".to_string()))?;
        let primary_account_id = self
            .primary_account_id
            .ok_or_else(|| BillError::MissingRequiredField("primary_account_id".to_string()))?;

        if name.trim().is_empty() {
            return Err(BillError::validation("name must not be empty"));
        }
        if total_amount.is_negative() {
            return Err(BillError::validation(format!("total {} is negative", total_amount)));
        }

        let mut bill = Bill {
            id: BillId::new_v7(),
            name,
            total_amount,
            due_date,
            primary_account_id,
            category: self.category,
            secondary_splits: Vec::new(),
            splits: Vec::new(),
        };
        for split in self.secondary_splits {
            bill.add_secondary_split(split.account_id, split.amount)?;
        }
        Ok(bill)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};
    use rust_decimal_macros::dec;

    fn due() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_build_requires_fields() {
        let result = Bill::builder().name("Rent").build();
        assert!(matches!(result, Err(BillError::MissingRequiredField(f)) if f == "total_amount"));
    }

    #[test]
    fn test_primary_cannot_be_secondary() {
        let primary = AccountId::new();
        let result = Bill::builder()
            .name("Rent")
            .total_amount(Money::display(dec!(1200)))
            .due_date(due())
            .primary_account(primary)
            .secondary_split(primary, Money::display(dec!(100)))
            .build();
        assert!(matches!(result, Err(BillError::PrimaryAsSecondary(id)) if id == primary));
    }

    #[test]
    fn test_request_puts_primary_first() {
        let primary = AccountId::new();
        let roommate = AccountId::new();
        let bill = Bill::builder()
            .name("Rent")
            .total_amount(Money::display(dec!(1200)))
            .due_date(due())
            .primary_account(primary)
            .secondary_split(roommate, Money::display(dec!(600)))
            .build()
            .unwrap();

        let request = bill.allocation_request();
        assert_eq!(request.allocations.len(), 2);
        assert_eq!(request.allocations[0].account_id, primary);
        assert!(request.allocations[0].amount.is_implicit());
        assert_eq!(request.allocations[1].amount.explicit(), Some(Money::display(dec!(600))));
    }

    #[test]
    fn test_due_local_converts_to_utc() {
        let local = NaiveDate::from_ymd_opt(2025, 7, 1).unwrap().and_hms_opt(9, 0, 0).unwrap();
        let bill = Bill::builder()
            .name("Power")
            .total_amount(Money::display(dec!(80)))
            .due_local(local, "America/New_York".parse().unwrap())
            .unwrap()
            .primary_account(AccountId::new())
            .build()
            .unwrap();

        assert_eq!(bill.due_date(), Utc.with_ymd_and_hms(2025, 7, 1, 13, 0, 0).unwrap());
    }

    #[test]
    fn test_invalid_result_not_applied() {
        let mut bill = Bill::builder()
            .name("Rent")
            .total_amount(Money::display(dec!(100)))
            .due_date(due())
            .primary_account(AccountId::new())
            .build()
            .unwrap();

        let result = AllocationResult::invalid(vec![]);
        assert!(matches!(bill.apply_allocation(&result), Err(BillError::InvalidAllocation(_))));
        assert!(!bill.is_allocated());
    }
}
