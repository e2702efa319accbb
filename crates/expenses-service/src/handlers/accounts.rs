//! Account management handlers.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use expenses_core::{Account, AccountId, AccountParams};
use expenses_store::Store;

use crate::error::ApiError;
use crate::state::AppState;

fn account_id(raw: &str) -> Result<AccountId, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::NotFound(format!("account not found: {raw}")))
}

/// List all accounts.
pub async fn list_accounts(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Account>>, ApiError> {
    Ok(Json(state.store.list_accounts()?))
}

/// Get a single account.
pub async fn get_account(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Account>, ApiError> {
    let account_id = account_id(&id)?;

    let account = state
        .store
        .get_account(&account_id)?
        .ok_or_else(|| ApiError::NotFound(format!("account not found: {account_id}")))?;

    Ok(Json(account))
}

/// Open a new account with an initial balance.
pub async fn create_account(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<AccountParams>, JsonRejection>,
) -> Result<Json<Account>, ApiError> {
    let Json(params) = payload?;
    let account = params.validate()?.into_account();

    state.store.create_account(&account)?;

    tracing::info!(
        account_id = %account.id,
        number = %account.number,
        balance = %account.balance,
        "Account created"
    );

    Ok(Json(account))
}

/// Delete an account and every expense recorded against it.
pub async fn delete_account(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let account_id = account_id(&id)?;

    let removed = state.store.delete_account(&account_id)?;

    tracing::info!(
        account_id = %account_id,
        expenses_removed = %removed,
        "Account deleted"
    );

    Ok(StatusCode::NO_CONTENT)
}
