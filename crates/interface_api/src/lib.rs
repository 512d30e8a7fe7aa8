//! HTTP API Layer
//!
//! A thin REST/JSON surface over the three public entry points: the account
//! type registry, the feature gate and the split allocation engine.
//!
//! # Architecture
//!
//! - **Handlers**: one module per resource
//! - **Middleware**: request ids, request logging, tracing
//! - **DTOs**: request/response bodies
//! - **Error Handling**: consistent error responses
//!
//! Each request fetches the current flag snapshot from the store and builds
//! a fresh [`FeatureGate`](domain_feature::FeatureGate) from it; the domain
//! crates never see the store.
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_api::{create_router, AppState};
//!
//! let state = AppState::new(config, Arc::new(InMemoryFlagStore::default()));
//! axum::serve(listener, create_router(state)).await?;
//! ```

pub mod config;
pub mod error;
pub mod middleware;
pub mod handlers;
pub mod dto;

use axum::{
    http::HeaderName,
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use domain_account::AccountTypeRegistry;
use domain_bill::SplitAllocationEngine;
use domain_feature::{
    CachedFlagStore, FeatureFlagState, FeatureFlagStore, FeatureGate, FlagSnapshot,
};

use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::handlers::{account_types, features, health, splits};
use crate::middleware::{request_logging, REQUEST_ID_HEADER};

/// Flag store used by the API: any backing store behind a cache
pub type SharedFlagStore = CachedFlagStore<Arc<dyn FeatureFlagStore>>;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub registry: AccountTypeRegistry,
    pub engine: SplitAllocationEngine,
    pub flags: Arc<SharedFlagStore>,
}

impl AppState {
    /// State over the built-in account types
    pub fn new(config: ApiConfig, flag_store: Arc<dyn FeatureFlagStore>) -> Self {
        let registry = AccountTypeRegistry::builtin();
        Self {
            config,
            engine: SplitAllocationEngine::with_registry(registry.clone()),
            registry,
            flags: Arc::new(CachedFlagStore::new(flag_store)),
        }
    }

    /// Gate over the current flag snapshot, evaluated now
    pub async fn gate(&self) -> Result<FeatureGate, ApiError> {
        let snapshot = self.flags.snapshot().await?;
        Ok(FeatureGate::new(snapshot).with_unknown_policy(self.config.unknown_feature_policy()))
    }
}

/// Flags served when no flag file is configured: every gated operation off
pub fn default_flags() -> FlagSnapshot {
    // Distinct, well-formed names cannot fail validation.
    FlagSnapshot::new([
        FeatureFlagState::boolean("split_allocation", false)
            .with_description("Specialized split handling for bnpl, ewa and payment_app"),
        FeatureFlagState::boolean("typed_balance_validation", false),
        FeatureFlagState::boolean("autopay", false),
    ])
    .unwrap_or_default()
}

/// Creates the main API router
pub fn create_router(state: AppState) -> Router {
    let account_type_routes = Router::new()
        .route("/", get(account_types::list_account_types))
        .route("/:key", get(account_types::get_account_type));

    let feature_routes = Router::new()
        .route("/refresh", post(features::refresh_flags))
        .route("/:name", get(features::evaluate_feature));

    let split_routes = Router::new().route("/validate", post(splits::validate_split));

    let api_routes = Router::new()
        .nest("/account-types", account_type_routes)
        .nest("/features", feature_routes)
        .nest("/splits", split_routes);

    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
        .nest("/api/v1", api_routes)
        .layer(axum_middleware::from_fn(request_logging))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::new(request_id.clone()))
        .layer(SetRequestIdLayer::new(request_id, MakeRequestUuid))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
