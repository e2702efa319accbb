//! Request types for the expenses client.

use chrono::NaiveDate;
use serde::Serialize;

use expenses_core::AccountId;

/// Expense fields sent on create and update.
///
/// Unset fields are left out of the body, which the server reads as
/// "unchanged" on update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExpenseInput {
    /// Amount in minor currency units.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<i64>,
    /// Calendar date.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    /// Description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Account to debit.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_id: Option<AccountId>,
}

impl ExpenseInput {
    /// Whether no field is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.amount.is_none()
            && self.date.is_none()
            && self.description.is_none()
            && self.account_id.is_none()
    }

    /// Fill every unset field from `base`.
    #[must_use]
    pub fn or(self, base: Self) -> Self {
        Self {
            amount: self.amount.or(base.amount),
            date: self.date.or(base.date),
            description: self.description.or(base.description),
            account_id: self.account_id.or(base.account_id),
        }
    }
}
