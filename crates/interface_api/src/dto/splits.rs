//! Split validation DTOs

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use validator::Validate;

use core_kernel::{AccountId, AccountTypeKey, Money};
use domain_bill::AllocationRequest;
use domain_feature::EvaluationContext;

/// Body of `POST /api/v1/splits/validate`
///
/// Each entry carries its account's type so the request is self-contained.
/// An entry whose `amount` is `null` or absent is the implicit one.
#[derive(Debug, Deserialize, Validate)]
pub struct ValidateSplitRequest {
    pub total_amount: Money,
    #[validate(length(max = 100), nested)]
    pub allocations: Vec<SplitEntryRequest>,
    #[validate(length(min = 1, max = 128))]
    pub subject_id: Option<String>,
    #[validate(length(min = 1, max = 64))]
    pub segment: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct SplitEntryRequest {
    pub account_id: AccountId,
    #[validate(length(min = 1, max = 64))]
    pub account_type: String,
    #[serde(default)]
    pub amount: Option<Money>,
}

impl ValidateSplitRequest {
    /// Engine request plus the account directory the entries describe
    ///
    /// A repeated account keeps its first type; the engine reports the
    /// repetition itself.
    pub fn to_allocation(&self) -> (AllocationRequest, HashMap<AccountId, AccountTypeKey>) {
        let mut directory = HashMap::new();
        let request = self
            .allocations
            .iter()
            .fold(AllocationRequest::new(self.total_amount), |request, entry| {
                directory
                    .entry(entry.account_id)
                    .or_insert_with(|| AccountTypeKey::new(&entry.account_type));
                match entry.amount {
                    Some(amount) => request.explicit(entry.account_id, amount),
                    None => request.implicit(entry.account_id),
                }
            });
        (request, directory)
    }

    pub fn context(&self) -> EvaluationContext {
        EvaluationContext {
            account_type: None,
            subject_id: self.subject_id.clone(),
            segment: self.segment.clone(),
        }
    }
}
