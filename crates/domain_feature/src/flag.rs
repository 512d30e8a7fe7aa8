//! Feature flag definitions
//!
//! A flag is pure data: a name, an evaluation mode with its parameters, and an
//! optional account-type scope. Flags are loaded from a store and evaluated by
//! the [`FeatureGate`](crate::gate::FeatureGate); nothing here mutates state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use core_kernel::{AccountTypeKey, Percentage, TimeWindow};

use crate::error::FeatureError;

/// How a flag decides whether it is on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EvaluationMode {
    /// Always on or always off
    Boolean { enabled: bool },

    /// On for a stable share of subjects
    Percentage { percentage: Percentage },

    /// On for subjects in one of the listed segments
    Segment { segments: BTreeSet<String> },

    /// On while `start <= now < end`
    TimeWindow {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
}

impl EvaluationMode {
    pub fn kind(&self) -> &'static str {
        match self {
            EvaluationMode::Boolean { .. } => "boolean",
            EvaluationMode::Percentage { .. } => "percentage",
            EvaluationMode::Segment { .. } => "segment",
            EvaluationMode::TimeWindow { .. } => "time_window",
        }
    }
}

/// The stored state of a single feature flag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureFlagState {
    /// Unique flag name, e.g. `split_allocation`
    pub name: String,

    /// Evaluation mode and its parameters
    pub mode: EvaluationMode,

    /// When set, the flag is only on for these account types
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_types: Option<BTreeSet<AccountTypeKey>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl FeatureFlagState {
    fn with_mode(name: impl Into<String>, mode: EvaluationMode) -> Self {
        Self {
            name: name.into(),
            mode,
            account_types: None,
            description: None,
        }
    }

    pub fn boolean(name: impl Into<String>, enabled: bool) -> Self {
        Self::with_mode(name, EvaluationMode::Boolean { enabled })
    }

    pub fn percentage(name: impl Into<String>, percentage: Percentage) -> Self {
        Self::with_mode(name, EvaluationMode::Percentage { percentage })
    }

    pub fn segment<I, S>(name: impl Into<String>, segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_mode(
            name,
            EvaluationMode::Segment {
                segments: segments.into_iter().map(Into::into).collect(),
            },
        )
    }

    pub fn time_window(name: impl Into<String>, window: TimeWindow) -> Self {
        Self::with_mode(
            name,
            EvaluationMode::TimeWindow {
                start: window.start,
                end: window.end,
            },
        )
    }

    /// Restricts the flag to the given account types
    pub fn for_account_types<I, K>(mut self, account_types: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<AccountTypeKey>,
    {
        self.account_types = Some(account_types.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Returns true if the scope admits this account type
    ///
    /// Unscoped flags admit every context. Scoped flags require the context
    /// to name one of the listed types.
    pub fn admits(&self, account_type: Option<&AccountTypeKey>) -> bool {
        match (&self.account_types, account_type) {
            (None, _) => true,
            (Some(scope), Some(key)) => scope.contains(key),
            (Some(_), None) => false,
        }
    }

    /// Checks the definition is internally consistent
    pub fn validate(&self) -> Result<(), FeatureError> {
        if self.name.trim().is_empty() {
            return Err(FeatureError::invalid_flag(&self.name, "name must not be empty"));
        }

        if let EvaluationMode::TimeWindow { start, end } = &self.mode {
            TimeWindow::new(*start, *end)
                .map_err(|e| FeatureError::invalid_flag(&self.name, e.to_string()))?;
        }

        if let Some(scope) = &self.account_types {
            if let Some(bad) = scope.iter().find(|k| !k.is_well_formed()) {
                return Err(FeatureError::invalid_flag(
                    &self.name,
                    format!("malformed account type '{}'", bad),
                ));
            }
        }

        Ok(())
    }
}
