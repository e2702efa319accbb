//! Account types.
//!
//! An account is a named money container. Its balance only moves down, and only
//! when an expense is created against it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::LedgerError;
use crate::validation::{self, FieldErrors, BLANK};
use crate::AccountId;

/// A named account holding a balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Unique account ID.
    pub id: AccountId,

    /// Display name.
    pub name: String,

    /// Account number, unique across all accounts.
    pub number: String,

    /// Current balance in minor currency units.
    pub balance: i64,

    /// When the account was created.
    pub created_at: DateTime<Utc>,

    /// When the account was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Create a new account.
    #[must_use]
    pub fn new(name: impl Into<String>, number: impl Into<String>, balance: i64) -> Self {
        let now = Utc::now();
        Self {
            id: AccountId::generate(),
            name: name.into(),
            number: number.into(),
            balance,
            created_at: now,
            updated_at: now,
        }
    }

    /// Balance the account would hold after debiting `amount`.
    ///
    /// Returns `None` when the subtraction overflows.
    #[must_use]
    pub fn prospective_balance(&self, amount: i64) -> Option<i64> {
        self.balance.checked_sub(amount)
    }

    /// Check if the account can absorb a debit of `amount`.
    #[must_use]
    pub fn has_sufficient_balance(&self, amount: i64) -> bool {
        self.prospective_balance(amount).is_some_and(|b| b >= 0)
    }

    /// Debit the account, returning the new balance.
    ///
    /// The account is left untouched when the debit is refused.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::InsufficientBalance` if the balance would drop below zero.
    pub fn debit(&mut self, amount: i64) -> Result<i64, LedgerError> {
        match self.prospective_balance(amount) {
            Some(balance) if balance >= 0 => {
                self.balance = balance;
                self.updated_at = Utc::now();
                Ok(balance)
            }
            _ => Err(LedgerError::InsufficientBalance {
                balance: self.balance,
                required: amount,
            }),
        }
    }
}

/// A validated request to open an account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccount {
    /// Display name.
    pub name: String,
    /// Account number.
    pub number: String,
    /// Opening balance.
    pub balance: i64,
}

impl NewAccount {
    /// Build the account record with a fresh ID and timestamps.
    #[must_use]
    pub fn into_account(self) -> Account {
        Account::new(self.name, self.number, self.balance)
    }
}

/// Raw account parameters as received over the wire.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct AccountParams(Map<String, Value>);

impl AccountParams {
    /// Wrap a JSON object.
    #[must_use]
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Validate the parameters for opening an account.
    ///
    /// # Errors
    ///
    /// Returns the collected field errors if any required field is missing or malformed.
    pub fn validate(&self) -> Result<NewAccount, FieldErrors> {
        let mut errors = FieldErrors::new();

        let name = required(&self.0, "name", validation::text, &mut errors);
        let number = required(&self.0, "number", validation::text, &mut errors);
        let balance = required(&self.0, "balance", validation::integer, &mut errors);

        match (name, number, balance) {
            (Some(name), Some(number), Some(balance)) if errors.is_empty() => Ok(NewAccount {
                name,
                number: number.trim().to_string(),
                balance,
            }),
            _ => Err(errors),
        }
    }
}

fn required<T>(
    fields: &Map<String, Value>,
    field: &str,
    coerce: impl Fn(&Value) -> Result<T, &'static str>,
    errors: &mut FieldErrors,
) -> Option<T> {
    let Some(value) = validation::present(fields.get(field)) else {
        errors.add(field, BLANK);
        return None;
    };
    coerce(value)
        .map_err(|message| errors.add(field, message))
        .ok()
}
