//! Flag store port and adapters
//!
//! Stores are the only place flags are read from a backing source. The gate
//! itself never talks to a store; callers fetch a snapshot at the request
//! boundary and hand it over.
//!
//! ```rust,ignore
//! let store = CachedFlagStore::new(JsonFileFlagStore::new("flags.json"));
//! let gate = FeatureGate::new(store.snapshot().await?);
//! // ... after an administrative change:
//! store.invalidate().await;
//! ```

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

use core_kernel::PortError;

use crate::error::FeatureError;
use crate::snapshot::FlagSnapshot;

/// Source of the current flag snapshot
#[async_trait]
pub trait FeatureFlagStore: Send + Sync {
    /// Returns the current snapshot
    async fn snapshot(&self) -> Result<Arc<FlagSnapshot>, FeatureError>;
}

#[async_trait]
impl<T: FeatureFlagStore + ?Sized> FeatureFlagStore for Arc<T> {
    async fn snapshot(&self) -> Result<Arc<FlagSnapshot>, FeatureError> {
        (**self).snapshot().await
    }
}

/// Store holding a snapshot in memory
///
/// `replace` is the administrative write path; readers holding an older
/// snapshot keep it unchanged.
#[derive(Debug, Default)]
pub struct InMemoryFlagStore {
    current: RwLock<Arc<FlagSnapshot>>,
}

impl InMemoryFlagStore {
    pub fn new(snapshot: FlagSnapshot) -> Self {
        Self {
            current: RwLock::new(Arc::new(snapshot)),
        }
    }

    /// Swaps in a new snapshot
    pub async fn replace(&self, snapshot: FlagSnapshot) {
        *self.current.write().await = Arc::new(snapshot);
    }
}

#[async_trait]
impl FeatureFlagStore for InMemoryFlagStore {
    async fn snapshot(&self) -> Result<Arc<FlagSnapshot>, FeatureError> {
        Ok(self.current.read().await.clone())
    }
}

/// Store reading a JSON flag document from disk on every call
#[derive(Debug, Clone)]
pub struct JsonFileFlagStore {
    path: PathBuf,
}

impl JsonFileFlagStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl FeatureFlagStore for JsonFileFlagStore {
    async fn snapshot(&self) -> Result<Arc<FlagSnapshot>, FeatureError> {
        let contents = tokio::fs::read_to_string(&self.path).await.map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => PortError::not_found("flag file", self.path.display()),
            _ => PortError::connection(format!("failed to read {}", self.path.display()), e),
        })?;
        let snapshot = FlagSnapshot::from_json(&contents)?;
        debug!(path = %self.path.display(), flags = snapshot.len(), "Loaded feature flags");
        Ok(Arc::new(snapshot))
    }
}

/// Caches another store's snapshot until explicitly invalidated
#[derive(Debug)]
pub struct CachedFlagStore<S> {
    inner: S,
    cached: RwLock<Option<Arc<FlagSnapshot>>>,
}

impl<S: FeatureFlagStore> CachedFlagStore<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            cached: RwLock::new(None),
        }
    }

    /// Drops the cached snapshot; the next read reloads from the inner store
    pub async fn invalidate(&self) {
        *self.cached.write().await = None;
        info!("Feature flag cache invalidated");
    }

    pub async fn is_cached(&self) -> bool {
        self.cached.read().await.is_some()
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }
}

#[async_trait]
impl<S: FeatureFlagStore> FeatureFlagStore for CachedFlagStore<S> {
    async fn snapshot(&self) -> Result<Arc<FlagSnapshot>, FeatureError> {
        if let Some(snapshot) = self.cached.read().await.as_ref() {
            return Ok(snapshot.clone());
        }

        let mut slot = self.cached.write().await;
        // Another task may have filled the slot while we waited for the lock.
        if let Some(snapshot) = slot.as_ref() {
            return Ok(snapshot.clone());
        }
        let snapshot = self.inner.snapshot().await?;
        *slot = Some(snapshot.clone());
        Ok(snapshot)
    }
}
