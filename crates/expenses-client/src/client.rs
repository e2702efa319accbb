//! Expenses HTTP client implementation.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;

use expenses_core::{Account, AccountId, Expense, ExpenseId, FieldErrors};

use crate::error::ClientError;
use crate::types::ExpenseInput;

/// Message the server sends when it refuses a debit.
const INSUFFICIENT_BALANCE: &str = "Insufficient Balance";

/// Expenses API client.
#[derive(Debug, Clone)]
pub struct ExpensesClient {
    client: Client,
    base_url: String,
}

impl ExpensesClient {
    /// Create a new client.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Base URL of the expenses service (e.g., `"http://localhost:8080"`)
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        Self::with_options(base_url, ClientOptions::default())
    }

    /// Create a new client with custom options.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn with_options(
        base_url: impl Into<String>,
        options: ClientOptions,
    ) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(options.timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// List all expenses, newest date first.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn list_expenses(&self) -> Result<Vec<Expense>, ClientError> {
        let url = format!("{}/expenses", self.base_url);
        let response = self.client.get(&url).send().await?;
        handle_response(response).await
    }

    /// Get a single expense.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::NotFound` if the expense does not exist.
    pub async fn get_expense(&self, id: &ExpenseId) -> Result<Expense, ClientError> {
        let url = format!("{}/expenses/{id}", self.base_url);
        let response = self.client.get(&url).send().await?;
        handle_response(response).await
    }

    /// Create an expense, debiting its account.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::InsufficientBalance` if the account cannot cover the
    /// amount, or `ClientError::Validation` if a field is rejected.
    pub async fn create_expense(&self, input: &ExpenseInput) -> Result<Expense, ClientError> {
        let url = format!("{}/expenses", self.base_url);
        let response = self.client.post(&url).json(input).send().await?;
        handle_response(response).await
    }

    /// Update the fields set in `input`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn update_expense(
        &self,
        id: &ExpenseId,
        input: &ExpenseInput,
    ) -> Result<Expense, ClientError> {
        let url = format!("{}/expenses/{id}", self.base_url);
        let response = self.client.patch(&url).json(input).send().await?;
        handle_response(response).await
    }

    /// Delete an expense.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn delete_expense(&self, id: &ExpenseId) -> Result<(), ClientError> {
        let url = format!("{}/expenses/{id}", self.base_url);
        let response = self.client.delete(&url).send().await?;

        if response.status().is_success() {
            return Ok(());
        }
        Err(error_from(response).await)
    }

    /// List all accounts.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn list_accounts(&self) -> Result<Vec<Account>, ClientError> {
        let url = format!("{}/accounts", self.base_url);
        let response = self.client.get(&url).send().await?;
        handle_response(response).await
    }

    /// Get a single account.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::NotFound` if the account does not exist.
    pub async fn get_account(&self, id: &AccountId) -> Result<Account, ClientError> {
        let url = format!("{}/accounts/{id}", self.base_url);
        let response = self.client.get(&url).send().await?;
        handle_response(response).await
    }
}

/// Decode a success body, or convert an error response.
async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ClientError> {
    if response.status().is_success() {
        return Ok(response.json().await?);
    }
    Err(error_from(response).await)
}

/// Convert an error response into a typed error.
///
/// The server answers in three shapes: `{"status", "message"}` for a refused
/// debit, a bare field map for validation failures, and
/// `{"error": {"code", "message"}}` for everything else.
async fn error_from(response: reqwest::Response) -> ClientError {
    let status = response.status();
    let body: Value = response.json().await.unwrap_or(Value::Null);

    let message = body
        .get("message")
        .or_else(|| body.pointer("/error/message"))
        .and_then(Value::as_str)
        .map(str::to_owned);

    tracing::debug!(status = %status, message = ?message, "Expenses API returned an error");

    match status {
        StatusCode::NOT_FOUND => ClientError::NotFound {
            message: message.unwrap_or_else(|| "not found".to_string()),
        },
        StatusCode::BAD_REQUEST if message.as_deref() == Some(INSUFFICIENT_BALANCE) => {
            ClientError::InsufficientBalance {
                message: INSUFFICIENT_BALANCE.to_string(),
            }
        }
        StatusCode::BAD_REQUEST if body.get("error").is_none() && message.is_none() => {
            match serde_json::from_value::<FieldErrors>(body) {
                Ok(errors) if !errors.is_empty() => ClientError::Validation { errors },
                _ => ClientError::Api {
                    status: status.as_u16(),
                    message: None,
                },
            }
        }
        _ => ClientError::Api {
            status: status.as_u16(),
            message,
        },
    }
}

/// Client options for customization.
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Request timeout in seconds (default: 30).
    pub timeout_seconds: u64,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
        }
    }
}
