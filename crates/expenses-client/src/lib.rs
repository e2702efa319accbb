//! Expenses Client SDK.
//!
//! This crate provides a typed HTTP client for the expenses API and
//! [`ExpenseEditor`], the headless state machine behind the expense form.
//!
//! # Example
//!
//! ```no_run
//! use expenses_client::{EditorContext, ExpenseEditor, ExpensesClient, FieldEdit};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = ExpensesClient::new("http://localhost:8080")?;
//! let (ctx, mut events) = EditorContext::channel();
//!
//! // A new expense: starts loaded with a blank draft.
//! let mut editor = ExpenseEditor::new(client, ctx, None);
//! editor.mount().await;
//!
//! let account_id = editor.accounts().first().map(|account| account.id);
//! if let Some(account_id) = account_id {
//!     editor.edit(FieldEdit::Account(account_id))?;
//! }
//! editor.edit(FieldEdit::Amount(1250))?;
//! editor.edit(FieldEdit::Description("Groceries".into()))?;
//! editor.save().await?;
//!
//! while let Ok(event) = events.try_recv() {
//!     println!("{event:?}");
//! }
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod client;
pub mod editor;
mod error;
mod types;

pub use client::{ClientOptions, ExpensesClient};
pub use editor::{
    Draft, EditorContext, EditorError, EditorEvent, EditorSnapshot, EditorState, ExpenseApi,
    ExpenseDoc, ExpenseEditor, Field, FieldEdit, Outcome, Route,
};
pub use error::ClientError;
pub use types::ExpenseInput;
