//! Expense types.
//!
//! An expense is a dated, described debit against exactly one account.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::validation::{self, FieldErrors, BLANK, NEGATIVE};
use crate::{AccountId, ExpenseId};

/// A persisted expense.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    /// Unique expense ID.
    pub id: ExpenseId,

    /// The account this expense was debited from.
    pub account_id: AccountId,

    /// Debited amount in minor currency units.
    pub amount: i64,

    /// Calendar date of the expense.
    pub date: NaiveDate,

    /// Free-form description.
    pub description: String,

    /// When the expense was created.
    pub created_at: DateTime<Utc>,

    /// When the expense was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Expense {
    /// Apply a partial update.
    ///
    /// Balances are not touched here: an edited amount or account does not
    /// re-debit anything.
    pub fn apply(&mut self, changes: &ExpenseChanges) {
        if let Some(account_id) = changes.account_id {
            self.account_id = account_id;
        }
        if let Some(amount) = changes.amount {
            self.amount = amount;
        }
        if let Some(date) = changes.date {
            self.date = date;
        }
        if let Some(description) = &changes.description {
            self.description.clone_from(description);
        }
        self.updated_at = Utc::now();
    }
}

/// A validated request to create an expense.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewExpense {
    /// Account to debit.
    pub account_id: AccountId,
    /// Amount to debit.
    pub amount: i64,
    /// Calendar date.
    pub date: NaiveDate,
    /// Description.
    pub description: String,
}

impl NewExpense {
    /// Re-check the value rules that do not depend on parsing.
    ///
    /// # Errors
    ///
    /// Returns field errors for a negative amount or a blank description.
    pub fn check(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        if self.amount < 0 {
            errors.add("amount", NEGATIVE);
        }
        if self.description.trim().is_empty() {
            errors.add("description", BLANK);
        }
        errors.into_result(())
    }

    /// Build the expense record with a fresh ID and timestamps.
    #[must_use]
    pub fn into_expense(self) -> Expense {
        let now = Utc::now();
        Expense {
            id: ExpenseId::generate(),
            account_id: self.account_id,
            amount: self.amount,
            date: self.date,
            description: self.description,
            created_at: now,
            updated_at: now,
        }
    }
}

/// A validated partial update. `None` leaves the field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpenseChanges {
    /// New owning account.
    pub account_id: Option<AccountId>,
    /// New amount.
    pub amount: Option<i64>,
    /// New date.
    pub date: Option<NaiveDate>,
    /// New description.
    pub description: Option<String>,
}

impl ExpenseChanges {
    /// Whether the update changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.account_id.is_none()
            && self.amount.is_none()
            && self.date.is_none()
            && self.description.is_none()
    }
}

/// Raw expense parameters as received over the wire.
///
/// Only `amount`, `date`, `description` and `account_id` are read; any other
/// key is ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct ExpenseParams(Map<String, Value>);

impl ExpenseParams {
    /// Wrap a JSON object.
    #[must_use]
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Validate the parameters for creating an expense. Every field is required.
    ///
    /// # Errors
    ///
    /// Returns the collected field errors if any field is missing or malformed.
    pub fn validate_new(&self) -> Result<NewExpense, FieldErrors> {
        let mut errors = FieldErrors::new();
        let fields = self.read(&mut errors, true);

        let (Some(amount), Some(date), Some(description), Some(account_id)) =
            (fields.amount, fields.date, fields.description, fields.account_id)
        else {
            return Err(errors);
        };
        let new_expense = NewExpense {
            account_id,
            amount,
            date,
            description,
        };
        errors.into_result(new_expense)
    }

    /// Validate the parameters for a partial update.
    ///
    /// Absent fields are left unchanged; a field sent as `null` or blank is an error.
    ///
    /// # Errors
    ///
    /// Returns the collected field errors if any supplied field is malformed.
    pub fn validate_changes(&self) -> Result<ExpenseChanges, FieldErrors> {
        let mut errors = FieldErrors::new();
        let changes = self.read(&mut errors, false);
        errors.into_result(changes)
    }

    fn read(&self, errors: &mut FieldErrors, require_all: bool) -> ExpenseChanges {
        ExpenseChanges {
            amount: self
                .field("amount", require_all, validation::integer, errors)
                .filter(|amount| {
                    if *amount < 0 {
                        errors.add("amount", NEGATIVE);
                    }
                    *amount >= 0
                }),
            date: self.field("date", require_all, validation::date, errors),
            description: self.field("description", require_all, validation::text, errors),
            account_id: self.field(
                "account_id",
                require_all,
                |value| validation::parsed(value, |s| s.parse::<AccountId>().ok()),
                errors,
            ),
        }
    }

    fn field<T>(
        &self,
        field: &str,
        required: bool,
        coerce: impl Fn(&Value) -> Result<T, &'static str>,
        errors: &mut FieldErrors,
    ) -> Option<T> {
        let raw = self.0.get(field);
        let Some(value) = validation::present(raw) else {
            // Sending an explicit null is an attempt to clear the field.
            if required || raw.is_some() {
                errors.add(field, BLANK);
            }
            return None;
        };
        coerce(value)
            .map_err(|message| errors.add(field, message))
            .ok()
    }
}
