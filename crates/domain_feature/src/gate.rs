//! Feature gate evaluation
//!
//! The gate answers "is this feature on for this context?" from an injected
//! [`FlagSnapshot`] and an injected evaluation instant. It never reaches for
//! global state and never writes anything, so the same inputs always give the
//! same answer.
//!
//! # Evaluation
//!
//! 1. Unknown flag: error, unless the caller opted into a default
//! 2. Account-type scope: a scoped flag is off outside its listed types
//! 3. Mode:
//!    - boolean: the stored value
//!    - percentage: stable bucket of `feature:subject_id` in `0..100`
//!      compared against the threshold
//!    - segment: the context segment is in the allow-list
//!    - time window: `start <= now < end`

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::sync::Arc;
use tracing::{debug, warn};

use core_kernel::{AccountTypeKey, TimeWindow};

use crate::error::FeatureError;
use crate::flag::EvaluationMode;
use crate::snapshot::FlagSnapshot;

/// Who and what a flag is being evaluated for
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationContext {
    /// Account type the operation targets
    pub account_type: Option<AccountTypeKey>,
    /// Stable subject identifier used for percentage rollouts
    pub subject_id: Option<String>,
    /// Named segment the subject belongs to
    pub segment: Option<String>,
}

impl EvaluationContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn for_subject(subject_id: impl Into<String>) -> Self {
        Self {
            subject_id: Some(subject_id.into()),
            ..Self::default()
        }
    }

    pub fn with_account_type(mut self, account_type: impl Into<AccountTypeKey>) -> Self {
        self.account_type = Some(account_type.into());
        self
    }

    pub fn with_subject(mut self, subject_id: impl Into<String>) -> Self {
        self.subject_id = Some(subject_id.into());
        self
    }

    pub fn with_segment(mut self, segment: impl Into<String>) -> Self {
        self.segment = Some(segment.into());
        self
    }

    /// Copy of this context narrowed to one account type
    pub fn scoped_to(&self, account_type: &AccountTypeKey) -> Self {
        Self {
            account_type: Some(account_type.clone()),
            ..self.clone()
        }
    }
}

/// What to do when asked about a flag the snapshot does not define
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "policy", content = "value")]
pub enum UnknownFeaturePolicy {
    /// Fail with `FeatureError::UnknownFeature`
    #[default]
    Fail,
    /// Answer with this value and log a warning
    DefaultTo(bool),
}

/// Evaluates feature flags against a snapshot
#[derive(Debug, Clone)]
pub struct FeatureGate {
    snapshot: Arc<FlagSnapshot>,
    now: DateTime<Utc>,
    unknown_policy: UnknownFeaturePolicy,
}

impl FeatureGate {
    /// Creates a gate evaluating at the current instant
    pub fn new(snapshot: impl Into<Arc<FlagSnapshot>>) -> Self {
        Self {
            snapshot: snapshot.into(),
            now: Utc::now(),
            unknown_policy: UnknownFeaturePolicy::Fail,
        }
    }

    /// Pins the instant used for time-window flags
    pub fn at(mut self, now: DateTime<Utc>) -> Self {
        self.now = now;
        self
    }

    /// Opts into a permissive or restrictive answer for unknown flags
    pub fn with_unknown_policy(mut self, policy: UnknownFeaturePolicy) -> Self {
        self.unknown_policy = policy;
        self
    }

    pub fn snapshot(&self) -> &FlagSnapshot {
        &self.snapshot
    }

    pub fn evaluated_at(&self) -> DateTime<Utc> {
        self.now
    }

    pub fn unknown_policy(&self) -> UnknownFeaturePolicy {
        self.unknown_policy
    }

    /// Returns whether `feature` is on for `context`
    pub fn is_enabled(&self, feature: &str, context: &EvaluationContext) -> Result<bool, FeatureError> {
        let Some(flag) = self.snapshot.get(feature) else {
            return match self.unknown_policy {
                UnknownFeaturePolicy::Fail => Err(FeatureError::UnknownFeature(feature.to_string())),
                UnknownFeaturePolicy::DefaultTo(value) => {
                    warn!(feature, default = value, "Unknown feature flag, using configured default");
                    Ok(value)
                }
            };
        };

        if !flag.admits(context.account_type.as_ref()) {
            debug!(feature, account_type = ?context.account_type, "Feature not scoped to account type");
            return Ok(false);
        }

        let enabled = match &flag.mode {
            EvaluationMode::Boolean { enabled } => *enabled,
            EvaluationMode::Percentage { percentage } => match context.subject_id.as_deref() {
                Some(subject) => Decimal::from(rollout_bucket(feature, subject)) < percentage.value(),
                None => false,
            },
            EvaluationMode::Segment { segments } => context
                .segment
                .as_ref()
                .is_some_and(|segment| segments.contains(segment)),
            EvaluationMode::TimeWindow { start, end } => TimeWindow {
                start: *start,
                end: *end,
            }
            .contains(self.now),
        };

        debug!(feature, mode = flag.mode.kind(), enabled, "Evaluated feature flag");
        Ok(enabled)
    }
}

/// Stable rollout bucket in `0..100` for a feature and subject
///
/// Hashing the feature name together with the subject keeps buckets
/// independent across features, so the same 10% of users are not the first
/// to receive every rollout.
pub fn rollout_bucket(feature: &str, subject_id: &str) -> u8 {
    let digest = Sha256::digest(format!("{}:{}", feature, subject_id).as_bytes());
    let mut prefix = [0u8; 8];
    prefix.copy_from_slice(&digest[..8]);
    (u64::from_be_bytes(prefix) % 100) as u8
}
