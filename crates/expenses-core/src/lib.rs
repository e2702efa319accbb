//! Core types and rules for the expenses service.
//!
//! This crate provides the foundational types shared by the store, the HTTP service
//! and the client:
//!
//! - **Identifiers**: `AccountId`, `ExpenseId`
//! - **Accounts**: `Account`, `AccountParams`, `NewAccount`
//! - **Expenses**: `Expense`, `ExpenseParams`, `NewExpense`, `ExpenseChanges`
//! - **Validation**: `FieldErrors`
//!
//! # Balance rule
//!
//! Amounts and balances are integers in the minor currency unit (`i64`).
//! An expense debits its account when it is created, and creation is refused
//! when the debit would leave the balance below zero (see [`Account::debit`]).

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod account;
pub mod error;
pub mod expense;
pub mod ids;
pub mod validation;

pub use account::{Account, AccountParams, NewAccount};
pub use error::{LedgerError, Result};
pub use expense::{Expense, ExpenseChanges, ExpenseParams, NewExpense};
pub use ids::{AccountId, ExpenseId, IdError};
pub use validation::FieldErrors;
