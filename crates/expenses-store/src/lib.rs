//! `RocksDB` storage layer for the expenses service.
//!
//! This crate provides persistent storage for accounts and expenses using
//! `RocksDB` with column families for secondary indexes.
//!
//! # Architecture
//!
//! The storage uses the following column families:
//!
//! - `accounts`: Account records, keyed by `account_id`
//! - `account_numbers`: Unique index from account number to `account_id`
//! - `expenses`: Expense records, keyed by `expense_id` (ULID)
//! - `expenses_by_account`: Index for cascading account deletion
//! - `expenses_by_date`: Index for listing expenses newest date first
//!
//! Every compound write is committed as one `WriteBatch`, and compound writes
//! are serialized against each other, so a read-check-write sequence such as
//! the balance check in [`Store::create_expense`] never races another writer.
//!
//! # Example
//!
//! ```no_run
//! use chrono::NaiveDate;
//! use expenses_core::{Account, NewExpense};
//! use expenses_store::{RocksStore, Store};
//!
//! let store = RocksStore::open("/tmp/expenses-db").unwrap();
//!
//! let account = Account::new("Checking", "001", 100);
//! store.create_account(&account).unwrap();
//!
//! let (expense, account) = store
//!     .create_expense(NewExpense {
//!         account_id: account.id,
//!         amount: 40,
//!         date: NaiveDate::from_ymd_opt(2020, 9, 23).unwrap(),
//!         description: "Groceries".into(),
//!     })
//!     .unwrap();
//! assert_eq!(account.balance, 60);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod keys;
pub mod rocks;
pub mod schema;

pub use error::{Entity, Result, StoreError};
pub use rocks::RocksStore;

use expenses_core::{Account, AccountId, Expense, ExpenseChanges, ExpenseId, NewExpense};

/// The storage trait defining all database operations.
///
/// This trait abstracts the storage layer, allowing for different implementations
/// (e.g., `RocksDB`, in-memory for testing).
pub trait Store: Send + Sync {
    // =========================================================================
    // Account Operations
    // =========================================================================

    /// Insert a new account.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::DuplicateNumber` if another account uses the same number.
    fn create_account(&self, account: &Account) -> Result<()>;

    /// Get an account by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_account(&self, account_id: &AccountId) -> Result<Option<Account>>;

    /// List all accounts, ordered by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn list_accounts(&self) -> Result<Vec<Account>>;

    /// Delete an account together with all of its expenses.
    ///
    /// Returns the number of expenses removed.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the account doesn't exist.
    fn delete_account(&self, account_id: &AccountId) -> Result<usize>;

    // =========================================================================
    // Expense Operations
    // =========================================================================

    /// Get an expense by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_expense(&self, expense_id: &ExpenseId) -> Result<Option<Expense>>;

    /// List all expenses, ordered by date (newest first).
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn list_expenses(&self) -> Result<Vec<Expense>>;

    /// Apply a partial update to an expense.
    ///
    /// Account balances are not adjusted.
    ///
    /// # Errors
    ///
    /// - `StoreError::NotFound` (expense) if the expense doesn't exist.
    /// - `StoreError::NotFound` (account) if the update points at a missing account.
    fn update_expense(&self, expense_id: &ExpenseId, changes: &ExpenseChanges) -> Result<Expense>;

    /// Delete an expense. The account balance is not restored.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the expense doesn't exist.
    fn delete_expense(&self, expense_id: &ExpenseId) -> Result<()>;

    // =========================================================================
    // Compound Operations
    // =========================================================================

    /// Create an expense and debit its account atomically.
    ///
    /// Returns the stored expense and the account with its new balance.
    ///
    /// # Errors
    ///
    /// - `StoreError::NotFound` if the account doesn't exist.
    /// - `StoreError::InsufficientBalance` if the debit would leave a negative balance.
    fn create_expense(&self, new_expense: NewExpense) -> Result<(Expense, Account)>;
}
