//! Expenses HTTP API Service.
//!
//! This crate provides the HTTP API for the expenses service, including:
//!
//! - Expense listing, lookup, creation, update and deletion
//! - Account listing, lookup, creation and deletion (cascading to expenses)
//! - The balance guard that debits an account when an expense is created
//!
//! Validation failures and refused debits are ordinary `400` responses; they
//! are never logged as server errors.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
// Allow some pedantic lints that are noisy for Axum handler functions
#![allow(clippy::missing_errors_doc)] // Axum handlers all return Result
#![allow(clippy::unused_async)] // Handlers call the synchronous store

pub mod config;
pub mod error;
pub mod handlers;
pub mod ledger;
pub mod routes;
pub mod state;

pub use config::ServiceConfig;
pub use error::ApiError;
pub use ledger::{BalanceGuard, DebitReceipt};
pub use routes::create_router;
pub use state::AppState;
