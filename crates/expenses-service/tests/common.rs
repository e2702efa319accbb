//! Common test utilities for expenses integration tests.

#![allow(dead_code)] // Some utilities are used by different test files

use std::sync::Arc;

use axum::Router;
use axum_test::TestServer;
use serde_json::{json, Value};
use tempfile::TempDir;

use expenses_service::{create_router, AppState, ServiceConfig};
use expenses_store::RocksStore;

/// Test harness containing everything needed for integration tests.
pub struct TestHarness {
    /// The test server for making HTTP requests.
    pub server: TestServer,
    /// Temporary directory for the database (kept alive for test duration).
    pub _temp_dir: TempDir,
}

impl TestHarness {
    /// Create a new test harness with a fresh database.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let store = RocksStore::open(temp_dir.path()).expect("Failed to open store");

        let config = ServiceConfig {
            listen_addr: "127.0.0.1:0".into(),
            data_dir: temp_dir.path().to_string_lossy().to_string(),
            ..ServiceConfig::default()
        };

        let state = AppState::new(Arc::new(store), config);
        let router: Router = create_router(state);

        let server = TestServer::new(router).expect("Failed to create test server");

        Self {
            server,
            _temp_dir: temp_dir,
        }
    }

    /// Open an account and return its ID.
    pub async fn create_account(&self, number: &str, balance: i64) -> String {
        let response = self
            .server
            .post("/accounts")
            .json(&json!({
                "name": format!("Account {number}"),
                "number": number,
                "balance": balance,
            }))
            .await;
        response.assert_status_ok();

        let body: Value = response.json();
        body["id"].as_str().expect("account id").to_string()
    }

    /// Current balance of an account, read back through the API.
    pub async fn balance(&self, account_id: &str) -> i64 {
        let response = self.server.get(&format!("/accounts/{account_id}")).await;
        response.assert_status_ok();

        let body: Value = response.json();
        body["balance"].as_i64().expect("balance")
    }

    /// Record an expense, returning the raw response body.
    pub async fn create_expense(
        &self,
        account_id: &str,
        amount: i64,
        date: &str,
        description: &str,
    ) -> Value {
        let response = self
            .server
            .post("/expenses")
            .json(&json!({
                "account_id": account_id,
                "amount": amount,
                "date": date,
                "description": description,
            }))
            .await;
        response.assert_status_ok();
        response.json()
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}
