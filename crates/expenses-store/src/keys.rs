//! Key encoding utilities for `RocksDB`.
//!
//! Index keys are built so that the default bytewise comparator yields the
//! order the queries need.

use chrono::{Datelike, NaiveDate};

use expenses_core::{AccountId, ExpenseId};

use crate::error::{Result, StoreError};

const ID_LEN: usize = 16;
const DATE_LEN: usize = 4;

/// Create an account key from an account ID.
#[must_use]
pub fn account_key(account_id: &AccountId) -> Vec<u8> {
    account_id.to_bytes().to_vec()
}

/// Create an account-number index key.
#[must_use]
pub fn account_number_key(number: &str) -> Vec<u8> {
    number.as_bytes().to_vec()
}

/// Create an expense key from an expense ID.
#[must_use]
pub fn expense_key(expense_id: &ExpenseId) -> Vec<u8> {
    expense_id.to_bytes().to_vec()
}

/// Create an account-expense index key.
///
/// Format: `account_id (16 bytes) || expense_id (16 bytes)`
#[must_use]
pub fn account_expense_key(account_id: &AccountId, expense_id: &ExpenseId) -> Vec<u8> {
    let mut key = Vec::with_capacity(2 * ID_LEN);
    key.extend_from_slice(&account_id.to_bytes());
    key.extend_from_slice(&expense_id.to_bytes());
    key
}

/// Create a prefix for iterating all expenses of an account.
#[must_use]
pub fn account_expenses_prefix(account_id: &AccountId) -> Vec<u8> {
    account_id.to_bytes().to_vec()
}

/// Create a date-expense index key.
///
/// Format: `date (4 bytes, order-preserving) || expense_id (16 bytes)`
///
/// Iterating the column family backwards yields expenses by date descending,
/// and within a date, the most recently created first.
#[must_use]
pub fn date_expense_key(date: NaiveDate, expense_id: &ExpenseId) -> Vec<u8> {
    let mut key = Vec::with_capacity(DATE_LEN + ID_LEN);
    key.extend_from_slice(&encode_date(date));
    key.extend_from_slice(&expense_id.to_bytes());
    key
}

/// Extract the expense ID from the tail of an index key.
///
/// Both index formats end with the 16-byte expense ID.
///
/// # Errors
///
/// Returns `StoreError::Database` if the key is too short to hold an ID.
pub fn expense_id_from_index_key(key: &[u8]) -> Result<ExpenseId> {
    let start = key
        .len()
        .checked_sub(ID_LEN)
        .ok_or_else(|| StoreError::Database(format!("malformed index key ({} bytes)", key.len())))?;
    let mut bytes = [0u8; ID_LEN];
    bytes.copy_from_slice(&key[start..]);
    Ok(ExpenseId::from_bytes(bytes))
}

/// Big-endian day number with the sign bit flipped, so negative years sort first.
#[allow(clippy::cast_sign_loss)]
fn encode_date(date: NaiveDate) -> [u8; DATE_LEN] {
    ((date.num_days_from_ce() as u32) ^ 0x8000_0000).to_be_bytes()
}
