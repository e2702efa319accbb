//! Expense handlers.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use expenses_core::{Expense, ExpenseId, ExpenseParams, LedgerError};
use expenses_store::Store;

use crate::error::{referencing_account, ApiError};
use crate::state::AppState;

/// Parse an expense ID from the path. A malformed ID can't name an expense.
fn expense_id(raw: &str) -> Result<ExpenseId, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::NotFound(format!("expense not found: {raw}")))
}

/// List all expenses, newest date first.
pub async fn list_expenses(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Expense>>, ApiError> {
    Ok(Json(state.store.list_expenses()?))
}

/// Get a single expense.
pub async fn get_expense(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Expense>, ApiError> {
    let expense_id = expense_id(&id)?;

    let expense = state
        .store
        .get_expense(&expense_id)?
        .ok_or_else(|| ApiError::NotFound(format!("expense not found: {expense_id}")))?;

    Ok(Json(expense))
}

/// Create an expense, debiting its account.
pub async fn create_expense(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ExpenseParams>, JsonRejection>,
) -> Result<Json<Expense>, ApiError> {
    let Json(params) = payload?;
    let new_expense = params.validate_new()?;

    let receipt = state
        .ledger
        .apply_debit(new_expense)
        .map_err(|err| match err {
            LedgerError::AccountNotFound { .. } => ApiError::missing_account(),
            other => other.into(),
        })?;

    Ok(Json(receipt.expense))
}

/// Update an expense with any subset of its fields.
///
/// The account balance is left as it is, whatever changed.
pub async fn update_expense(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: Result<Json<ExpenseParams>, JsonRejection>,
) -> Result<Json<Expense>, ApiError> {
    let expense_id = expense_id(&id)?;
    let Json(params) = payload?;
    let changes = params.validate_changes()?;

    if changes.is_empty() {
        return get_expense(State(state), Path(id)).await;
    }

    let expense = state
        .store
        .update_expense(&expense_id, &changes)
        .map_err(referencing_account)?;

    tracing::info!(expense_id = %expense_id, "Expense updated");

    Ok(Json(expense))
}

/// Delete an expense. The debited amount is not returned to the account.
pub async fn delete_expense(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let expense_id = expense_id(&id)?;

    state.store.delete_expense(&expense_id)?;

    tracing::info!(expense_id = %expense_id, "Expense deleted");

    Ok(StatusCode::NO_CONTENT)
}
