//! Expense editor state machine.
//!
//! [`ExpenseEditor`] drives the expense form: it loads the expense being
//! edited (or starts a blank draft), tracks pending edits, and runs save and
//! delete requests. Notifications and navigation go out through an
//! [`EditorContext`]; observers follow [`EditorSnapshot`]s on a watch channel.
//!
//! ```text
//!            mount ok                    save / delete
//! Loading ───────────▶ Loaded ◀──────────────────────────┐
//!    │                   │  saving / deleting flags ──────┘
//!    └──── any failure ──┴──▶ Error (accounts fetch failed)
//! ```

use std::fmt;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use tokio::sync::{mpsc, watch};

use expenses_core::{Account, AccountId, Expense, ExpenseId};

use crate::client::ExpensesClient;
use crate::error::ClientError;
use crate::types::ExpenseInput;

/// Notification shown when a save fails and the server sent no message.
pub const SAVE_FAILED: &str = "Failed to save expense. Please try again";
/// Notification shown when a save never reached the server.
pub const SAVE_OFFLINE: &str = "Failed to save expense. Please check your internet connection";
/// Notification shown when a delete fails.
pub const DELETE_FAILED: &str = "Failed to delete expense. Please try again";
/// Notification shown when a delete never reached the server.
pub const DELETE_OFFLINE: &str = "Failed to delete expense. Please check your internet connection";

/// The requests the editor issues.
#[async_trait]
pub trait ExpenseApi: Send + Sync {
    /// Fetch one expense.
    async fn get_expense(&self, id: &ExpenseId) -> Result<Expense, ClientError>;

    /// Fetch the accounts an expense can be debited from.
    async fn list_accounts(&self) -> Result<Vec<Account>, ClientError>;

    /// Create an expense.
    async fn create_expense(&self, input: &ExpenseInput) -> Result<Expense, ClientError>;

    /// Update an expense.
    async fn update_expense(
        &self,
        id: &ExpenseId,
        input: &ExpenseInput,
    ) -> Result<Expense, ClientError>;

    /// Delete an expense.
    async fn delete_expense(&self, id: &ExpenseId) -> Result<(), ClientError>;
}

#[async_trait]
impl ExpenseApi for ExpensesClient {
    async fn get_expense(&self, id: &ExpenseId) -> Result<Expense, ClientError> {
        ExpensesClient::get_expense(self, id).await
    }

    async fn list_accounts(&self) -> Result<Vec<Account>, ClientError> {
        ExpensesClient::list_accounts(self).await
    }

    async fn create_expense(&self, input: &ExpenseInput) -> Result<Expense, ClientError> {
        ExpensesClient::create_expense(self, input).await
    }

    async fn update_expense(
        &self,
        id: &ExpenseId,
        input: &ExpenseInput,
    ) -> Result<Expense, ClientError> {
        ExpensesClient::update_expense(self, id, input).await
    }

    async fn delete_expense(&self, id: &ExpenseId) -> Result<(), ClientError> {
        ExpensesClient::delete_expense(self, id).await
    }
}

/// Primary editor state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorState {
    /// Fetching the expense and accounts.
    Loading,
    /// Ready for editing.
    Loaded,
    /// A fetch failed. Terminal until the editor is recreated.
    Error,
}

/// A not-yet-persisted expense.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draft {
    /// Amount in minor currency units.
    pub amount: i64,
    /// Calendar date.
    pub date: NaiveDate,
    /// Description.
    pub description: String,
    /// Account to debit.
    pub account_id: Option<AccountId>,
}

impl Default for Draft {
    fn default() -> Self {
        Self {
            amount: 0,
            date: Utc::now().date_naive(),
            description: String::new(),
            account_id: None,
        }
    }
}

/// The document behind the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpenseDoc {
    /// A new expense.
    Draft(Draft),
    /// An expense as last returned by the server.
    Saved(Expense),
}

impl ExpenseDoc {
    fn as_input(&self) -> ExpenseInput {
        match self {
            Self::Draft(draft) => ExpenseInput {
                amount: Some(draft.amount),
                date: Some(draft.date),
                description: Some(draft.description.clone()),
                account_id: draft.account_id,
            },
            Self::Saved(expense) => ExpenseInput {
                amount: Some(expense.amount),
                date: Some(expense.date),
                description: Some(expense.description.clone()),
                account_id: Some(expense.account_id),
            },
        }
    }
}

/// An editable form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    /// The amount.
    Amount,
    /// The date.
    Date,
    /// The description.
    Description,
    /// The owning account.
    Account,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Amount => "amount",
            Self::Date => "date",
            Self::Description => "description",
            Self::Account => "account",
        };
        f.write_str(name)
    }
}

/// A single user edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldEdit {
    /// Set the amount.
    Amount(i64),
    /// Set the date.
    Date(NaiveDate),
    /// Set the description.
    Description(String),
    /// Set the owning account.
    Account(AccountId),
}

impl FieldEdit {
    /// The field this edit targets.
    #[must_use]
    pub fn field(&self) -> Field {
        match self {
            Self::Amount(_) => Field::Amount,
            Self::Date(_) => Field::Date,
            Self::Description(_) => Field::Description,
            Self::Account(_) => Field::Account,
        }
    }
}

/// Screens the editor can navigate to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// The expense list.
    Expenses,
}

/// Output of the editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorEvent {
    /// Show a message to the user.
    Notify(String),
    /// Leave the editor.
    Navigate(Route),
}

/// Channel through which the editor reports to its host.
#[derive(Debug, Clone)]
pub struct EditorContext {
    events: mpsc::UnboundedSender<EditorEvent>,
}

impl EditorContext {
    /// Wrap an existing sender.
    #[must_use]
    pub fn new(events: mpsc::UnboundedSender<EditorEvent>) -> Self {
        Self { events }
    }

    /// Create a context and the receiver its events arrive on.
    #[must_use]
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<EditorEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }

    fn emit(&self, event: EditorEvent) {
        if self.events.send(event).is_err() {
            tracing::debug!("Editor event dropped: host is gone");
        }
    }

    fn notify(&self, message: impl Into<String>) {
        self.emit(EditorEvent::Notify(message.into()));
    }

    fn navigate(&self, route: Route) {
        self.emit(EditorEvent::Navigate(route));
    }
}

/// Observable view of the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditorSnapshot {
    /// Primary state.
    pub state: EditorState,
    /// A save request is in flight.
    pub saving: bool,
    /// A delete request is in flight.
    pub deleting: bool,
    /// There are unsaved edits.
    pub dirty: bool,
}

/// Result of a save or delete that was allowed to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The server accepted the request.
    Completed,
    /// The request failed and the user was notified.
    Failed,
}

/// An action was attempted while its control is disabled or hidden.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum EditorError {
    /// The editor is loading or failed to load.
    #[error("editor is not loaded")]
    NotLoaded,

    /// A save or delete is already in flight.
    #[error("a request is already in flight")]
    Busy,

    /// There are no pending edits.
    #[error("nothing to save")]
    NothingToSave,

    /// Only saved expenses can be deleted.
    #[error("expense has not been saved")]
    NotSaved,

    /// The field can't change once the expense is saved.
    #[error("{0} can't be changed after the expense is saved")]
    Locked(Field),
}

/// State machine behind the expense form.
pub struct ExpenseEditor<A> {
    api: A,
    ctx: EditorContext,
    id: Option<ExpenseId>,
    state: EditorState,
    doc: ExpenseDoc,
    pending: ExpenseInput,
    accounts: Vec<Account>,
    saving: bool,
    deleting: bool,
    snapshots: watch::Sender<EditorSnapshot>,
}

impl<A: ExpenseApi> ExpenseEditor<A> {
    /// Create an editor for the expense `id`, or for a new expense.
    ///
    /// Nothing is fetched until [`mount`](Self::mount).
    #[must_use]
    pub fn new(api: A, ctx: EditorContext, id: Option<ExpenseId>) -> Self {
        let state = if id.is_some() {
            EditorState::Loading
        } else {
            EditorState::Loaded
        };
        let (snapshots, _) = watch::channel(EditorSnapshot {
            state,
            saving: false,
            deleting: false,
            dirty: false,
        });

        Self {
            api,
            ctx,
            id,
            state,
            doc: ExpenseDoc::Draft(Draft::default()),
            pending: ExpenseInput::default(),
            accounts: Vec::new(),
            saving: false,
            deleting: false,
            snapshots,
        }
    }

    /// Fetch the expense (when editing one) and the accounts, concurrently.
    pub async fn mount(&mut self) {
        let loaded = match self.id {
            Some(id) => {
                let (expense, accounts) =
                    tokio::join!(self.api.get_expense(&id), self.api.list_accounts());
                match (expense, accounts) {
                    (Ok(expense), Ok(accounts)) => Ok((Some(expense), accounts)),
                    (Err(err), _) | (_, Err(err)) => Err(err),
                }
            }
            None => self.api.list_accounts().await.map(|accounts| (None, accounts)),
        };

        match loaded {
            Ok((expense, accounts)) => {
                if let Some(expense) = expense {
                    self.doc = ExpenseDoc::Saved(expense);
                }
                self.accounts = accounts;
                self.state = EditorState::Loaded;
            }
            Err(err) => {
                tracing::warn!(expense_id = ?self.id, error = %err, "Expense editor failed to load");
                self.state = EditorState::Error;
            }
        }

        self.publish();
    }

    /// Record an edit.
    ///
    /// # Errors
    ///
    /// - `EditorError::NotLoaded` before a successful mount.
    /// - `EditorError::Locked` for amount, date or account on a saved expense.
    pub fn edit(&mut self, edit: FieldEdit) -> Result<(), EditorError> {
        if self.state != EditorState::Loaded {
            return Err(EditorError::NotLoaded);
        }
        let field = edit.field();
        if !self.is_editable(field) {
            return Err(EditorError::Locked(field));
        }

        match edit {
            FieldEdit::Amount(amount) => self.pending.amount = Some(amount),
            FieldEdit::Date(date) => self.pending.date = Some(date),
            FieldEdit::Description(description) => self.pending.description = Some(description),
            FieldEdit::Account(account_id) => self.pending.account_id = Some(account_id),
        }

        self.publish();
        Ok(())
    }

    /// Create or update the expense.
    ///
    /// A draft is created from its defaults merged with the pending edits; a
    /// saved expense sends only the pending edits. On success the server's
    /// expense replaces the local one.
    ///
    /// # Errors
    ///
    /// Returns an `EditorError`, without issuing a request, when the save
    /// control is disabled. Request failures are reported as
    /// `Ok(Outcome::Failed)` plus a notification.
    pub async fn save(&mut self) -> Result<Outcome, EditorError> {
        if self.state != EditorState::Loaded {
            return Err(EditorError::NotLoaded);
        }
        if self.saving || self.deleting {
            return Err(EditorError::Busy);
        }
        if self.pending.is_empty() {
            return Err(EditorError::NothingToSave);
        }

        self.saving = true;
        self.publish();

        let result = match &self.doc {
            ExpenseDoc::Draft(_) => {
                let input = self.pending.clone().or(self.doc.as_input());
                self.api.create_expense(&input).await
            }
            ExpenseDoc::Saved(expense) => self.api.update_expense(&expense.id, &self.pending).await,
        };

        self.saving = false;
        let outcome = match result {
            Ok(expense) => {
                tracing::debug!(expense_id = %expense.id, "Expense saved");
                self.id = Some(expense.id);
                self.doc = ExpenseDoc::Saved(expense);
                self.pending = ExpenseInput::default();
                Outcome::Completed
            }
            Err(err) => {
                let message = if err.is_transport() {
                    SAVE_OFFLINE.to_string()
                } else {
                    err.server_message().unwrap_or(SAVE_FAILED).to_string()
                };
                tracing::warn!(error = %err, "Expense save failed");
                self.ctx.notify(message);
                Outcome::Failed
            }
        };

        self.publish();
        Ok(outcome)
    }

    /// Delete the saved expense and, on success, navigate to the list.
    ///
    /// # Errors
    ///
    /// Returns an `EditorError`, without issuing a request, when the delete
    /// control is disabled or hidden.
    pub async fn delete(&mut self) -> Result<Outcome, EditorError> {
        if self.state != EditorState::Loaded {
            return Err(EditorError::NotLoaded);
        }
        let ExpenseDoc::Saved(expense) = &self.doc else {
            return Err(EditorError::NotSaved);
        };
        if self.saving || self.deleting {
            return Err(EditorError::Busy);
        }
        let id = expense.id;

        self.deleting = true;
        self.publish();

        let result = self.api.delete_expense(&id).await;

        self.deleting = false;
        let outcome = match result {
            Ok(()) => {
                tracing::debug!(expense_id = %id, "Expense deleted");
                self.ctx.navigate(Route::Expenses);
                Outcome::Completed
            }
            Err(err) => {
                let message = if err.is_transport() {
                    DELETE_OFFLINE
                } else {
                    DELETE_FAILED
                };
                tracing::warn!(expense_id = %id, error = %err, "Expense delete failed");
                self.ctx.notify(message);
                Outcome::Failed
            }
        };

        self.publish();
        Ok(outcome)
    }

    /// Whether the save control is enabled.
    #[must_use]
    pub fn can_save(&self) -> bool {
        self.state == EditorState::Loaded
            && !self.pending.is_empty()
            && !self.saving
            && !self.deleting
    }

    /// Whether the delete control is enabled.
    #[must_use]
    pub fn can_delete(&self) -> bool {
        self.state == EditorState::Loaded && self.shows_delete() && !self.saving && !self.deleting
    }

    /// Whether the delete control is shown at all.
    #[must_use]
    pub fn shows_delete(&self) -> bool {
        matches!(self.doc, ExpenseDoc::Saved(_))
    }

    /// Whether `field` accepts edits.
    #[must_use]
    pub fn is_editable(&self, field: Field) -> bool {
        field == Field::Description || matches!(self.doc, ExpenseDoc::Draft(_))
    }

    /// Values the form displays: the document with pending edits applied.
    #[must_use]
    pub fn form_data(&self) -> ExpenseInput {
        self.pending.clone().or(self.doc.as_input())
    }

    /// Subscribe to state snapshots.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<EditorSnapshot> {
        self.snapshots.subscribe()
    }

    /// Current snapshot.
    #[must_use]
    pub fn snapshot(&self) -> EditorSnapshot {
        EditorSnapshot {
            state: self.state,
            saving: self.saving,
            deleting: self.deleting,
            dirty: !self.pending.is_empty(),
        }
    }

    /// Primary state.
    #[must_use]
    pub fn state(&self) -> EditorState {
        self.state
    }

    /// The document behind the form.
    #[must_use]
    pub fn doc(&self) -> &ExpenseDoc {
        &self.doc
    }

    /// Accounts fetched on mount.
    #[must_use]
    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    fn publish(&self) {
        self.snapshots.send_replace(self.snapshot());
    }
}
