//! Immutable flag snapshots
//!
//! A snapshot is what a store hands out at a request boundary. The gate reads
//! it; refreshing means building a new snapshot, never editing one in place.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::FeatureError;
use crate::flag::FeatureFlagState;

/// On-disk / over-the-wire shape of a flag document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FlagDocument {
    #[serde(default)]
    pub flags: Vec<FeatureFlagState>,
}

/// A validated, read-only set of flags keyed by name
#[derive(Debug, Clone)]
pub struct FlagSnapshot {
    flags: BTreeMap<String, FeatureFlagState>,
    loaded_at: DateTime<Utc>,
}

impl FlagSnapshot {
    /// Builds a snapshot, validating every flag and rejecting duplicate names
    pub fn new<I>(flags: I) -> Result<Self, FeatureError>
    where
        I: IntoIterator<Item = FeatureFlagState>,
    {
        let mut by_name = BTreeMap::new();
        for flag in flags {
            flag.validate()?;
            if by_name.contains_key(&flag.name) {
                return Err(FeatureError::invalid_flag(&flag.name, "defined more than once"));
            }
            by_name.insert(flag.name.clone(), flag);
        }

        Ok(Self {
            flags: by_name,
            loaded_at: Utc::now(),
        })
    }

    pub fn empty() -> Self {
        Self {
            flags: BTreeMap::new(),
            loaded_at: Utc::now(),
        }
    }

    /// Parses a JSON flag document (`{"flags": [...]}`)
    pub fn from_json(json: &str) -> Result<Self, FeatureError> {
        let document: FlagDocument =
            serde_json::from_str(json).map_err(|e| FeatureError::Parse(e.to_string()))?;
        Self::new(document.flags)
    }

    pub fn to_document(&self) -> FlagDocument {
        FlagDocument {
            flags: self.flags.values().cloned().collect(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&FeatureFlagState> {
        self.flags.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.flags.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.flags.keys().map(String::as_str)
    }

    pub fn flags(&self) -> impl Iterator<Item = &FeatureFlagState> {
        self.flags.values()
    }

    pub fn len(&self) -> usize {
        self.flags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    /// When this snapshot was built
    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }
}

impl Default for FlagSnapshot {
    fn default() -> Self {
        Self::empty()
    }
}
