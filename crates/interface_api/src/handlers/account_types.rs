//! Account type handlers

use axum::{
    extract::{Path, Query, State},
    Json,
};

use core_kernel::AccountTypeKey;
use domain_account::AccountCategory;

use crate::dto::account_types::*;
use crate::{error::ApiError, AppState};

/// Lists registered account types, optionally filtered by category
pub async fn list_account_types(
    State(state): State<AppState>,
    Query(query): Query<ListAccountTypesQuery>,
) -> Result<Json<AccountTypeListResponse>, ApiError> {
    let account_types: Vec<AccountTypeResponse> = match query.category.as_deref() {
        Some(raw) => {
            let category: AccountCategory = raw.parse().map_err(ApiError::BadRequest)?;
            state
                .registry
                .list_by_category(category)
                .into_iter()
                .map(AccountTypeResponse::from)
                .collect()
        }
        None => state.registry.descriptors().map(AccountTypeResponse::from).collect(),
    };

    Ok(Json(AccountTypeListResponse {
        count: account_types.len(),
        account_types,
    }))
}

/// Gets one account type by key
pub async fn get_account_type(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<AccountTypeResponse>, ApiError> {
    let descriptor = state.registry.get(&AccountTypeKey::new(key))?;
    Ok(Json(AccountTypeResponse::from(descriptor)))
}
