//! Feature flag handlers

use axum::{
    extract::{Path, Query, State},
    Json,
};
use tracing::{info, instrument};

use domain_feature::FeatureFlagStore;

use crate::dto::features::*;
use crate::{error::ApiError, AppState};

/// Evaluates one flag for the context given in the query string
#[instrument(skip(state, query))]
pub async fn evaluate_feature(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Query(query): Query<FeatureQuery>,
) -> Result<Json<FeatureResponse>, ApiError> {
    let gate = state.gate().await?;
    let context = query.into_context();
    let enabled = gate.is_enabled(&name, &context)?;

    Ok(Json(FeatureResponse {
        feature: name,
        enabled,
        context,
        evaluated_at: gate.evaluated_at(),
    }))
}

/// Drops the cached flag snapshot and loads a fresh one
pub async fn refresh_flags(State(state): State<AppState>) -> Result<Json<RefreshResponse>, ApiError> {
    state.flags.invalidate().await;
    let snapshot = state.flags.snapshot().await?;
    info!(flags = snapshot.len(), "Feature flags refreshed");

    Ok(Json(RefreshResponse {
        flags: snapshot.len(),
        loaded_at: snapshot.loaded_at(),
    }))
}
