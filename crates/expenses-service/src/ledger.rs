//! Balance guard: the only path through which an account balance moves.
//!
//! Creating an expense debits its account. The debit is refused, with nothing
//! written, when it would leave the balance below zero; otherwise the expense
//! insert and the balance update are committed together by the store.

use std::sync::Arc;

use expenses_core::{Account, Expense, LedgerError, NewExpense};
use expenses_store::{Entity, Store, StoreError};

/// Outcome of an applied debit.
#[derive(Debug, Clone)]
pub struct DebitReceipt {
    /// The persisted expense.
    pub expense: Expense,
    /// The account after the debit.
    pub account: Account,
}

/// Gatekeeper for account balance mutation.
pub struct BalanceGuard<S> {
    store: Arc<S>,
}

impl<S> Clone for BalanceGuard<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: Store> BalanceGuard<S> {
    /// Create a guard over the given store.
    #[must_use]
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Record `new_expense` and debit its account by the expense amount.
    ///
    /// # Errors
    ///
    /// - `LedgerError::ValidationFailed` if the amount is negative or the description blank.
    /// - `LedgerError::AccountNotFound` if the account does not exist.
    /// - `LedgerError::InsufficientBalance` if the balance would drop below zero.
    /// - `LedgerError::Storage` if the store fails.
    pub fn apply_debit(&self, new_expense: NewExpense) -> Result<DebitReceipt, LedgerError> {
        new_expense.check().map_err(LedgerError::ValidationFailed)?;

        let account_id = new_expense.account_id;
        let amount = new_expense.amount;

        match self.store.create_expense(new_expense) {
            Ok((expense, account)) => {
                tracing::info!(
                    account_id = %account_id,
                    expense_id = %expense.id,
                    amount = %amount,
                    new_balance = %account.balance,
                    "Debit applied"
                );
                Ok(DebitReceipt { expense, account })
            }
            Err(StoreError::InsufficientBalance { balance, required }) => {
                tracing::warn!(
                    account_id = %account_id,
                    balance = %balance,
                    required = %required,
                    "Debit refused: insufficient balance"
                );
                Err(LedgerError::InsufficientBalance { balance, required })
            }
            Err(StoreError::NotFound {
                entity: Entity::Account,
                id,
            }) => Err(LedgerError::AccountNotFound { account_id: id }),
            Err(e) => Err(LedgerError::Storage(e.to_string())),
        }
    }
}
