//! API error types and responses.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use expenses_core::validation::MUST_EXIST;
use expenses_core::{FieldErrors, LedgerError};
use expenses_store::{Entity, StoreError};

/// Message returned when a debit is refused.
pub const INSUFFICIENT_BALANCE_MESSAGE: &str = "Insufficient Balance";

/// API error type.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Resource not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// Bad request - the body could not be read.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// One or more fields failed validation.
    #[error("validation failed: {0}")]
    Validation(FieldErrors),

    /// The expense would overdraw its account.
    #[error("insufficient balance: balance={balance}, required={required}")]
    InsufficientBalance {
        /// Current balance.
        balance: i64,
        /// Required amount.
        required: i64,
    },

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// The referenced account does not exist, reported against the `account` field.
    #[must_use]
    pub fn missing_account() -> Self {
        Self::Validation(FieldErrors::single("account", MUST_EXIST))
    }
}

/// JSON error response body.
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: String,
    message: String,
}

/// Body of a refused debit: `{"status": 400, "message": "Insufficient Balance"}`.
#[derive(Debug, Serialize)]
struct StatusMessage {
    status: u16,
    message: &'static str,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            Self::InsufficientBalance { .. } => {
                let body = StatusMessage {
                    status: StatusCode::BAD_REQUEST.as_u16(),
                    message: INSUFFICIENT_BALANCE_MESSAGE,
                };
                return (StatusCode::BAD_REQUEST, Json(body)).into_response();
            }
            Self::Validation(errors) => {
                return (StatusCode::BAD_REQUEST, Json(errors)).into_response();
            }
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg),
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg),
            Self::Internal(msg) => {
                tracing::error!(error = %msg, "Internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = ErrorResponse {
            error: ErrorBody {
                code: code.to_string(),
                message,
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<FieldErrors> for ApiError {
    fn from(errors: FieldErrors) -> Self {
        Self::Validation(errors)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<LedgerError> for ApiError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::InsufficientBalance { balance, required } => {
                Self::InsufficientBalance { balance, required }
            }
            LedgerError::ValidationFailed(errors) => Self::Validation(errors),
            LedgerError::AccountNotFound { account_id } => {
                Self::NotFound(format!("account not found: {account_id}"))
            }
            LedgerError::ExpenseNotFound { expense_id } => {
                Self::NotFound(format!("expense not found: {expense_id}"))
            }
            LedgerError::InvalidId(e) => Self::BadRequest(e.to_string()),
            LedgerError::Storage(msg) => Self::Internal(msg),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { entity, id } => Self::NotFound(format!("{entity} not found: {id}")),
            StoreError::InsufficientBalance { balance, required } => {
                Self::InsufficientBalance { balance, required }
            }
            StoreError::DuplicateNumber { .. } => Self::Validation(FieldErrors::single(
                "number",
                expenses_core::validation::TAKEN,
            )),
            StoreError::Database(msg) | StoreError::Serialization(msg) => Self::Internal(msg),
        }
    }
}

/// Map a store error raised while writing an expense that references an account.
///
/// A missing account is a field error on the request, not a missing resource.
pub(crate) fn referencing_account(err: StoreError) -> ApiError {
    match err {
        StoreError::NotFound {
            entity: Entity::Account,
            ..
        } => ApiError::missing_account(),
        other => other.into(),
    }
}
