//! Split validation handlers

use axum::{extract::State, Json};
use tracing::instrument;
use validator::Validate;

use domain_bill::AllocationResult;

use crate::dto::splits::ValidateSplitRequest;
use crate::{error::ApiError, AppState};

/// Validates a split and resolves its implicit entry
///
/// An invalid split is still a 200 response; its violations are in the
/// body. Errors are reserved for malformed input and collaborator failures.
#[instrument(skip_all)]
pub async fn validate_split(
    State(state): State<AppState>,
    Json(request): Json<ValidateSplitRequest>,
) -> Result<Json<AllocationResult>, ApiError> {
    request.validate()?;

    let gate = state.gate().await?;
    let (allocation, directory) = request.to_allocation();
    let result = state
        .engine
        .allocate(&allocation, &directory, &gate, &request.context())?;

    Ok(Json(result))
}
