//! Error types for expense storage.

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur in storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Database operation failed.
    #[error("database error: {0}")]
    Database(String),

    /// Serialization/deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Record not found.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Kind of record that was looked up.
        entity: Entity,
        /// The identifier that did not resolve.
        id: String,
    },

    /// The debit would drive the account balance negative.
    #[error("insufficient balance: balance={balance}, required={required}")]
    InsufficientBalance {
        /// Current balance.
        balance: i64,
        /// Required amount.
        required: i64,
    },

    /// Another account already uses this number.
    #[error("account number already taken: {number}")]
    DuplicateNumber {
        /// The account number.
        number: String,
    },
}

/// Record kinds held by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    /// An account row.
    Account,
    /// An expense row.
    Expense,
}

impl std::fmt::Display for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Account => f.write_str("account"),
            Self::Expense => f.write_str("expense"),
        }
    }
}

impl StoreError {
    pub(crate) fn account_not_found(id: impl ToString) -> Self {
        Self::NotFound {
            entity: Entity::Account,
            id: id.to_string(),
        }
    }

    pub(crate) fn expense_not_found(id: impl ToString) -> Self {
        Self::NotFound {
            entity: Entity::Expense,
            id: id.to_string(),
        }
    }
}
