//! Error types for the expenses domain.

use crate::ids::IdError;
use crate::validation::FieldErrors;

/// Result type for domain operations.
pub type Result<T> = std::result::Result<T, LedgerError>;

/// Errors that can occur in domain operations.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// The debit would leave the account balance below zero.
    #[error("insufficient balance: balance={balance}, required={required}")]
    InsufficientBalance {
        /// Current balance in minor units.
        balance: i64,
        /// Amount that was requested.
        required: i64,
    },

    /// Account not found.
    #[error("account not found: {account_id}")]
    AccountNotFound {
        /// The account ID that was not found.
        account_id: String,
    },

    /// Expense not found.
    #[error("expense not found: {expense_id}")]
    ExpenseNotFound {
        /// The expense ID that was not found.
        expense_id: String,
    },

    /// One or more input fields failed validation.
    #[error("validation failed: {0}")]
    ValidationFailed(FieldErrors),

    /// Storage error.
    #[error("storage error: {0}")]
    Storage(String),

    /// Invalid identifier.
    #[error("invalid identifier: {0}")]
    InvalidId(#[from] IdError),
}

impl From<FieldErrors> for LedgerError {
    fn from(errors: FieldErrors) -> Self {
        Self::ValidationFailed(errors)
    }
}
