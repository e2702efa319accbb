//! `RocksDB` storage implementation.
//!
//! This module provides the `RocksStore` implementation of the `Store` trait.

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use rocksdb::{
    BoundColumnFamily, ColumnFamilyDescriptor, DBWithThreadMode, Direction, IteratorMode,
    MultiThreaded, Options, WriteBatch,
};

use expenses_core::{Account, AccountId, Expense, ExpenseChanges, ExpenseId, NewExpense};

use crate::error::{Result, StoreError};
use crate::keys;
use crate::schema::{all_column_families, cf};
use crate::Store;

/// RocksDB-backed storage implementation.
pub struct RocksStore {
    db: Arc<DBWithThreadMode<MultiThreaded>>,
    /// Held for the whole read-check-write span of every compound write.
    write_lock: Mutex<()>,
}

impl RocksStore {
    /// Open or create a `RocksDB` database at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or created.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_descriptors: Vec<_> = all_column_families()
            .into_iter()
            .map(|name| ColumnFamilyDescriptor::new(name, Options::default()))
            .collect();

        let db = DBWithThreadMode::open_cf_descriptors(&opts, path, cf_descriptors)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(Self {
            db: Arc::new(db),
            write_lock: Mutex::new(()),
        })
    }

    /// Get a column family handle.
    fn cf(&self, name: &str) -> Result<Arc<BoundColumnFamily<'_>>> {
        self.db
            .cf_handle(name)
            .ok_or_else(|| StoreError::Database(format!("column family not found: {name}")))
    }

    /// Serialize compound writes.
    fn lock_writes(&self) -> Result<MutexGuard<'_, ()>> {
        self.write_lock
            .lock()
            .map_err(|_| StoreError::Database("write lock poisoned".into()))
    }

    /// Serialize a value using CBOR.
    fn serialize<T: serde::Serialize>(value: &T) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        ciborium::into_writer(value, &mut buf)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        Ok(buf)
    }

    /// Deserialize a value from CBOR.
    fn deserialize<T: serde::de::DeserializeOwned>(data: &[u8]) -> Result<T> {
        ciborium::from_reader(data).map_err(|e| StoreError::Serialization(e.to_string()))
    }

    fn write(&self, batch: WriteBatch) -> Result<()> {
        self.db
            .write(batch)
            .map_err(|e| StoreError::Database(e.to_string()))
    }

    /// Collect index keys under `prefix` (all keys when empty), in key order.
    fn index_keys(&self, cf_name: &str, prefix: &[u8]) -> Result<Vec<Vec<u8>>> {
        let cf = self.cf(cf_name)?;
        let iter = self
            .db
            .iterator_cf(&cf, IteratorMode::From(prefix, Direction::Forward));

        let mut all_keys = Vec::new();
        for item in iter {
            let (key, _) = item.map_err(|e| StoreError::Database(e.to_string()))?;

            if !key.starts_with(prefix) {
                break;
            }

            all_keys.push(key.to_vec());
        }
        Ok(all_keys)
    }
}

impl Store for RocksStore {
    // =========================================================================
    // Account Operations
    // =========================================================================

    fn create_account(&self, account: &Account) -> Result<()> {
        let _guard = self.lock_writes()?;

        let cf_accounts = self.cf(cf::ACCOUNTS)?;
        let cf_numbers = self.cf(cf::ACCOUNT_NUMBERS)?;
        let number_key = keys::account_number_key(&account.number);

        let taken = self
            .db
            .get_cf(&cf_numbers, &number_key)
            .map_err(|e| StoreError::Database(e.to_string()))?
            .is_some();
        if taken {
            return Err(StoreError::DuplicateNumber {
                number: account.number.clone(),
            });
        }

        let mut batch = WriteBatch::default();
        batch.put_cf(
            &cf_accounts,
            keys::account_key(&account.id),
            Self::serialize(account)?,
        );
        batch.put_cf(&cf_numbers, &number_key, keys::account_key(&account.id));
        self.write(batch)?;

        tracing::debug!(account_id = %account.id, "Account stored");
        Ok(())
    }

    fn get_account(&self, account_id: &AccountId) -> Result<Option<Account>> {
        let cf = self.cf(cf::ACCOUNTS)?;
        let key = keys::account_key(account_id);

        self.db
            .get_cf(&cf, key)
            .map_err(|e| StoreError::Database(e.to_string()))?
            .map(|data| Self::deserialize(&data))
            .transpose()
    }

    fn list_accounts(&self) -> Result<Vec<Account>> {
        let cf = self.cf(cf::ACCOUNTS)?;

        let mut accounts = Vec::new();
        for item in self.db.iterator_cf(&cf, IteratorMode::Start) {
            let (_, value) = item.map_err(|e| StoreError::Database(e.to_string()))?;
            accounts.push(Self::deserialize::<Account>(&value)?);
        }

        accounts.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.number.cmp(&b.number)));
        Ok(accounts)
    }

    fn delete_account(&self, account_id: &AccountId) -> Result<usize> {
        let _guard = self.lock_writes()?;

        let account = self
            .get_account(account_id)?
            .ok_or_else(|| StoreError::account_not_found(account_id))?;

        let cf_accounts = self.cf(cf::ACCOUNTS)?;
        let cf_numbers = self.cf(cf::ACCOUNT_NUMBERS)?;
        let cf_expenses = self.cf(cf::EXPENSES)?;
        let cf_by_account = self.cf(cf::EXPENSES_BY_ACCOUNT)?;
        let cf_by_date = self.cf(cf::EXPENSES_BY_DATE)?;

        // Children first, then the parent, all in one batch.
        let index_keys =
            self.index_keys(cf::EXPENSES_BY_ACCOUNT, &keys::account_expenses_prefix(account_id))?;

        let mut batch = WriteBatch::default();
        for index_key in &index_keys {
            let expense_id = keys::expense_id_from_index_key(index_key)?;
            if let Some(expense) = self.get_expense(&expense_id)? {
                batch.delete_cf(&cf_by_date, keys::date_expense_key(expense.date, &expense_id));
            }
            batch.delete_cf(&cf_expenses, keys::expense_key(&expense_id));
            batch.delete_cf(&cf_by_account, index_key);
        }
        batch.delete_cf(&cf_numbers, keys::account_number_key(&account.number));
        batch.delete_cf(&cf_accounts, keys::account_key(account_id));
        self.write(batch)?;

        Ok(index_keys.len())
    }

    // =========================================================================
    // Expense Operations
    // =========================================================================

    fn get_expense(&self, expense_id: &ExpenseId) -> Result<Option<Expense>> {
        let cf = self.cf(cf::EXPENSES)?;
        let key = keys::expense_key(expense_id);

        self.db
            .get_cf(&cf, key)
            .map_err(|e| StoreError::Database(e.to_string()))?
            .map(|data| Self::deserialize(&data))
            .transpose()
    }

    fn list_expenses(&self) -> Result<Vec<Expense>> {
        let mut all_keys = self.index_keys(cf::EXPENSES_BY_DATE, &[])?;

        // Reverse to get newest date first
        all_keys.reverse();

        let mut expenses = Vec::with_capacity(all_keys.len());
        for key in all_keys {
            let expense_id = keys::expense_id_from_index_key(&key)?;
            if let Some(expense) = self.get_expense(&expense_id)? {
                expenses.push(expense);
            }
        }

        Ok(expenses)
    }

    fn update_expense(&self, expense_id: &ExpenseId, changes: &ExpenseChanges) -> Result<Expense> {
        let _guard = self.lock_writes()?;

        let mut expense = self
            .get_expense(expense_id)?
            .ok_or_else(|| StoreError::expense_not_found(expense_id))?;

        if let Some(account_id) = changes.account_id {
            if self.get_account(&account_id)?.is_none() {
                return Err(StoreError::account_not_found(account_id));
            }
        }

        let previous = expense.clone();
        expense.apply(changes);

        let cf_expenses = self.cf(cf::EXPENSES)?;
        let cf_by_account = self.cf(cf::EXPENSES_BY_ACCOUNT)?;
        let cf_by_date = self.cf(cf::EXPENSES_BY_DATE)?;

        let mut batch = WriteBatch::default();
        batch.put_cf(
            &cf_expenses,
            keys::expense_key(expense_id),
            Self::serialize(&expense)?,
        );
        if previous.account_id != expense.account_id {
            batch.delete_cf(
                &cf_by_account,
                keys::account_expense_key(&previous.account_id, expense_id),
            );
            batch.put_cf(
                &cf_by_account,
                keys::account_expense_key(&expense.account_id, expense_id),
                [],
            );
        }
        if previous.date != expense.date {
            batch.delete_cf(&cf_by_date, keys::date_expense_key(previous.date, expense_id));
            batch.put_cf(&cf_by_date, keys::date_expense_key(expense.date, expense_id), []);
        }
        self.write(batch)?;

        Ok(expense)
    }

    fn delete_expense(&self, expense_id: &ExpenseId) -> Result<()> {
        let _guard = self.lock_writes()?;

        let expense = self
            .get_expense(expense_id)?
            .ok_or_else(|| StoreError::expense_not_found(expense_id))?;

        let mut batch = WriteBatch::default();
        batch.delete_cf(&self.cf(cf::EXPENSES)?, keys::expense_key(expense_id));
        batch.delete_cf(
            &self.cf(cf::EXPENSES_BY_ACCOUNT)?,
            keys::account_expense_key(&expense.account_id, expense_id),
        );
        batch.delete_cf(
            &self.cf(cf::EXPENSES_BY_DATE)?,
            keys::date_expense_key(expense.date, expense_id),
        );
        self.write(batch)
    }

    // =========================================================================
    // Compound Operations
    // =========================================================================

    fn create_expense(&self, new_expense: NewExpense) -> Result<(Expense, Account)> {
        let _guard = self.lock_writes()?;

        // Get current account
        let mut account = self
            .get_account(&new_expense.account_id)?
            .ok_or_else(|| StoreError::account_not_found(new_expense.account_id))?;

        // Check and apply the debit in memory; nothing is written on refusal
        account
            .debit(new_expense.amount)
            .map_err(|_| StoreError::InsufficientBalance {
                balance: account.balance,
                required: new_expense.amount,
            })?;

        let expense = new_expense.into_expense();

        let cf_accounts = self.cf(cf::ACCOUNTS)?;
        let cf_expenses = self.cf(cf::EXPENSES)?;
        let cf_by_account = self.cf(cf::EXPENSES_BY_ACCOUNT)?;
        let cf_by_date = self.cf(cf::EXPENSES_BY_DATE)?;

        let account_value = Self::serialize(&account)?;
        let expense_value = Self::serialize(&expense)?;

        // Write atomically
        let mut batch = WriteBatch::default();
        batch.put_cf(&cf_accounts, keys::account_key(&account.id), &account_value);
        batch.put_cf(&cf_expenses, keys::expense_key(&expense.id), &expense_value);
        batch.put_cf(
            &cf_by_account,
            keys::account_expense_key(&account.id, &expense.id),
            [],
        );
        batch.put_cf(&cf_by_date, keys::date_expense_key(expense.date, &expense.id), []);
        self.write(batch)?;

        Ok((expense, account))
    }
}
