//! Expense editor tests against a mock expenses API.

use std::time::Duration;

use serde_json::{json, Value};
use wiremock::matchers::{body_json, method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

use expenses_client::editor::{DELETE_FAILED, DELETE_OFFLINE, SAVE_FAILED, SAVE_OFFLINE};
use expenses_client::{
    ClientOptions, EditorContext, EditorEvent, EditorState, ExpenseDoc, ExpenseEditor,
    ExpensesClient, FieldEdit, Outcome, Route,
};
use expenses_core::{AccountId, ExpenseId};

fn expense_json(id: ExpenseId, account_id: AccountId, description: &str) -> Value {
    json!({
        "id": id.to_string(),
        "account_id": account_id.to_string(),
        "amount": 40,
        "date": "2020-09-23",
        "description": description,
        "created_at": "2020-09-23T10:00:00Z",
        "updated_at": "2020-09-23T10:00:00Z",
    })
}

fn accounts_json(account_id: AccountId) -> Value {
    json!([{
        "id": account_id.to_string(),
        "name": "Checking",
        "number": "001",
        "balance": 100,
        "created_at": "2020-09-01T10:00:00Z",
        "updated_at": "2020-09-01T10:00:00Z",
    }])
}

async fn mock_accounts(server: &MockServer, account_id: AccountId) {
    Mock::given(method("GET"))
        .and(path("/accounts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(accounts_json(account_id)))
        .mount(server)
        .await;
}

async fn mock_expense(server: &MockServer, id: ExpenseId, account_id: AccountId) {
    Mock::given(method("GET"))
        .and(path(format!("/expenses/{id}")))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(expense_json(id, account_id, "Groceries")),
        )
        .mount(server)
        .await;
}

fn client(server: &MockServer) -> ExpensesClient {
    ExpensesClient::new(server.uri()).unwrap()
}

fn impatient_client(server: &MockServer) -> ExpensesClient {
    ExpensesClient::with_options(server.uri(), ClientOptions { timeout_seconds: 1 }).unwrap()
}

/// Editor over a persisted expense, already mounted.
async fn loaded_editor(
    server: &MockServer,
    api: ExpensesClient,
) -> (
    ExpenseEditor<ExpensesClient>,
    tokio::sync::mpsc::UnboundedReceiver<EditorEvent>,
    ExpenseId,
) {
    let id = ExpenseId::generate();
    let account_id = AccountId::generate();
    mock_expense(server, id, account_id).await;
    mock_accounts(server, account_id).await;

    let (ctx, events) = EditorContext::channel();
    let mut editor = ExpenseEditor::new(api, ctx, Some(id));
    editor.mount().await;
    assert_eq!(editor.state(), EditorState::Loaded);

    (editor, events, id)
}

// ============================================================================
// Mount
// ============================================================================

#[tokio::test]
async fn mount_existing_expense_loads() {
    let server = MockServer::start().await;
    let (editor, _events, id) = loaded_editor(&server, client(&server)).await;

    match editor.doc() {
        ExpenseDoc::Saved(expense) => {
            assert_eq!(expense.id, id);
            assert_eq!(expense.description, "Groceries");
        }
        ExpenseDoc::Draft(_) => panic!("expected the fetched expense"),
    }
    assert_eq!(editor.accounts().len(), 1);
    assert!(editor.shows_delete());
    assert!(editor.can_delete());
    assert!(!editor.can_save());
}

#[tokio::test]
async fn mount_missing_expense_errors() {
    let server = MockServer::start().await;
    mock_accounts(&server, AccountId::generate()).await;
    Mock::given(method("GET"))
        .and(path_regex(r"^/expenses/[0-9A-Z]+$"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": {"code": "not_found", "message": "expense not found"}
        })))
        .mount(&server)
        .await;

    let (ctx, _events) = EditorContext::channel();
    let mut editor = ExpenseEditor::new(client(&server), ctx, Some(ExpenseId::generate()));
    assert_eq!(editor.state(), EditorState::Loading);

    editor.mount().await;

    assert_eq!(editor.state(), EditorState::Error);
}

#[tokio::test]
async fn mount_accounts_failure_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/accounts"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let (ctx, _events) = EditorContext::channel();
    let mut editor = ExpenseEditor::new(client(&server), ctx, None);

    editor.mount().await;

    assert_eq!(editor.state(), EditorState::Error);
    assert!(!editor.can_save());
}

#[tokio::test]
async fn mount_transport_failure_errors() {
    let api = ExpensesClient::new("http://127.0.0.1:1").unwrap();
    let (ctx, _events) = EditorContext::channel();
    let mut editor = ExpenseEditor::new(api, ctx, Some(ExpenseId::generate()));

    editor.mount().await;

    assert_eq!(editor.state(), EditorState::Error);
}

// ============================================================================
// Save
// ============================================================================

#[tokio::test]
async fn save_draft_creates_and_reconciles() {
    let server = MockServer::start().await;
    let account_id = AccountId::generate();
    let created_id = ExpenseId::generate();
    mock_accounts(&server, account_id).await;

    let today = chrono::Utc::now().date_naive();
    Mock::given(method("POST"))
        .and(path("/expenses"))
        .and(body_json(json!({
            "amount": 40,
            "date": today.format("%Y-%m-%d").to_string(),
            "description": "",
            "account_id": account_id.to_string(),
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(expense_json(created_id, account_id, "Groceries")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let (ctx, mut events) = EditorContext::channel();
    let mut editor = ExpenseEditor::new(client(&server), ctx, None);
    editor.mount().await;

    editor.edit(FieldEdit::Account(account_id)).unwrap();
    editor.edit(FieldEdit::Amount(40)).unwrap();
    assert!(editor.can_save());

    assert_eq!(editor.save().await, Ok(Outcome::Completed));

    // The server's copy replaces the draft, including fields it filled in.
    match editor.doc() {
        ExpenseDoc::Saved(expense) => {
            assert_eq!(expense.id, created_id);
            assert_eq!(expense.description, "Groceries");
        }
        ExpenseDoc::Draft(_) => panic!("expected the saved expense"),
    }
    assert!(!editor.snapshot().dirty);
    assert!(!editor.can_save());
    assert!(editor.shows_delete());
    assert!(events.try_recv().is_err());
}

#[tokio::test]
async fn save_existing_sends_only_changes() {
    let server = MockServer::start().await;
    let (mut editor, _events, id) = loaded_editor(&server, client(&server)).await;

    Mock::given(method("PATCH"))
        .and(path(format!("/expenses/{id}")))
        .and(body_json(json!({"description": "Dinner"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(expense_json(
            id,
            AccountId::generate(),
            "Dinner",
        )))
        .expect(1)
        .mount(&server)
        .await;

    editor.edit(FieldEdit::Description("Dinner".into())).unwrap();
    assert_eq!(editor.save().await, Ok(Outcome::Completed));

    assert_eq!(editor.form_data().description.as_deref(), Some("Dinner"));
    assert!(!editor.can_save());
}

#[tokio::test]
async fn saving_flag_visible_while_in_flight() {
    let server = MockServer::start().await;
    let (mut editor, _events, id) = loaded_editor(&server, client(&server)).await;

    Mock::given(method("PATCH"))
        .and(path(format!("/expenses/{id}")))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(expense_json(id, AccountId::generate(), "Dinner"))
                .set_delay(Duration::from_millis(200)),
        )
        .mount(&server)
        .await;

    editor.edit(FieldEdit::Description("Dinner".into())).unwrap();
    let mut snapshots = editor.subscribe();

    let (outcome, saw_saving) = tokio::join!(editor.save(), async {
        snapshots.wait_for(|s| s.saving).await.is_ok()
    });

    assert_eq!(outcome, Ok(Outcome::Completed));
    assert!(saw_saving);
    assert!(!snapshots.borrow().saving);
}

#[tokio::test]
async fn save_failure_notifies_server_message() {
    let server = MockServer::start().await;
    let account_id = AccountId::generate();
    mock_accounts(&server, account_id).await;
    Mock::given(method("POST"))
        .and(path("/expenses"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(json!({"status": 400, "message": "Insufficient Balance"})),
        )
        .mount(&server)
        .await;

    let (ctx, mut events) = EditorContext::channel();
    let mut editor = ExpenseEditor::new(client(&server), ctx, None);
    editor.mount().await;
    editor.edit(FieldEdit::Account(account_id)).unwrap();
    editor.edit(FieldEdit::Amount(500)).unwrap();

    assert_eq!(editor.save().await, Ok(Outcome::Failed));

    assert_eq!(
        events.try_recv().unwrap(),
        EditorEvent::Notify("Insufficient Balance".into())
    );
    assert_eq!(editor.state(), EditorState::Loaded);
    assert!(!editor.snapshot().saving);
    // Edits survive for another attempt.
    assert_eq!(editor.form_data().amount, Some(500));
    assert!(editor.can_save());
}

#[tokio::test]
async fn save_failure_without_message_uses_fallback() {
    let server = MockServer::start().await;
    let (mut editor, mut events, id) = loaded_editor(&server, client(&server)).await;
    Mock::given(method("PATCH"))
        .and(path(format!("/expenses/{id}")))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({"date": ["is not a valid date"]})),
        )
        .mount(&server)
        .await;

    editor.edit(FieldEdit::Description("Dinner".into())).unwrap();
    assert_eq!(editor.save().await, Ok(Outcome::Failed));

    assert_eq!(events.try_recv().unwrap(), EditorEvent::Notify(SAVE_FAILED.into()));
}

#[tokio::test]
async fn save_transport_failure_notifies_connection_problem() {
    let server = MockServer::start().await;
    let (mut editor, mut events, id) = loaded_editor(&server, impatient_client(&server)).await;
    Mock::given(method("PATCH"))
        .and(path(format!("/expenses/{id}")))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
        .mount(&server)
        .await;

    editor.edit(FieldEdit::Description("Dinner".into())).unwrap();
    assert_eq!(editor.save().await, Ok(Outcome::Failed));

    assert_eq!(events.try_recv().unwrap(), EditorEvent::Notify(SAVE_OFFLINE.into()));
    assert!(!editor.snapshot().saving);
}

// ============================================================================
// Delete
// ============================================================================

#[tokio::test]
async fn delete_success_navigates_to_list() {
    let server = MockServer::start().await;
    let (mut editor, mut events, id) = loaded_editor(&server, client(&server)).await;
    Mock::given(method("DELETE"))
        .and(path(format!("/expenses/{id}")))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    assert_eq!(editor.delete().await, Ok(Outcome::Completed));

    assert_eq!(
        events.try_recv().unwrap(),
        EditorEvent::Navigate(Route::Expenses)
    );
    assert!(!editor.snapshot().deleting);
}

#[tokio::test]
async fn delete_failure_notifies_and_clears_flag() {
    let server = MockServer::start().await;
    let (mut editor, mut events, id) = loaded_editor(&server, client(&server)).await;
    Mock::given(method("DELETE"))
        .and(path(format!("/expenses/{id}")))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    assert_eq!(editor.delete().await, Ok(Outcome::Failed));

    assert_eq!(events.try_recv().unwrap(), EditorEvent::Notify(DELETE_FAILED.into()));
    assert!(!editor.snapshot().deleting);
    assert!(editor.can_delete());
}

#[tokio::test]
async fn delete_transport_failure_notifies_connection_problem() {
    let server = MockServer::start().await;
    let (mut editor, mut events, id) = loaded_editor(&server, impatient_client(&server)).await;
    Mock::given(method("DELETE"))
        .and(path(format!("/expenses/{id}")))
        .respond_with(ResponseTemplate::new(204).set_delay(Duration::from_secs(3)))
        .mount(&server)
        .await;

    assert_eq!(editor.delete().await, Ok(Outcome::Failed));

    assert_eq!(events.try_recv().unwrap(), EditorEvent::Notify(DELETE_OFFLINE.into()));
}

