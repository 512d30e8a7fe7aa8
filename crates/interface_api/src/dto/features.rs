//! Feature flag DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use domain_feature::EvaluationContext;

#[derive(Debug, Default, Deserialize)]
pub struct FeatureQuery {
    pub account_type: Option<String>,
    pub subject_id: Option<String>,
    pub segment: Option<String>,
}

impl FeatureQuery {
    pub fn into_context(self) -> EvaluationContext {
        EvaluationContext {
            account_type: self.account_type.map(Into::into),
            subject_id: self.subject_id,
            segment: self.segment,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FeatureResponse {
    pub feature: String,
    pub enabled: bool,
    pub context: EvaluationContext,
    pub evaluated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub flags: usize,
    pub loaded_at: DateTime<Utc>,
}
