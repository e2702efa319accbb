//! Column families used in `RocksDB` storage.

/// Column family names for the `RocksDB` database.
pub mod cf {
    /// Account records, keyed by `account_id`.
    pub const ACCOUNTS: &str = "accounts";

    /// Index: account number → `account_id`. Enforces number uniqueness.
    pub const ACCOUNT_NUMBERS: &str = "account_numbers";

    /// Expense records, keyed by `expense_id` (ULID).
    pub const EXPENSES: &str = "expenses";

    /// Index: expenses by owning account, keyed by `account_id || expense_id`.
    /// Value is empty (index only). Drives cascade deletion.
    pub const EXPENSES_BY_ACCOUNT: &str = "expenses_by_account";

    /// Index: expenses by date, keyed by `date || expense_id`.
    /// Value is empty (index only). Drives date-descending listing.
    pub const EXPENSES_BY_DATE: &str = "expenses_by_date";
}

/// Returns all column family names for database initialization.
#[must_use]
pub fn all_column_families() -> Vec<&'static str> {
    vec![
        cf::ACCOUNTS,
        cf::ACCOUNT_NUMBERS,
        cf::EXPENSES,
        cf::EXPENSES_BY_ACCOUNT,
        cf::EXPENSES_BY_DATE,
    ]
}
