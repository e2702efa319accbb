//! Client error types.

use expenses_core::FieldErrors;

/// Errors that can occur when using the expenses client.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// HTTP request failed, or the response body could not be read.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server refused a debit.
    #[error("insufficient balance: {message}")]
    InsufficientBalance {
        /// Message returned by the server.
        message: String,
    },

    /// One or more fields failed validation.
    #[error("validation failed: {errors}")]
    Validation {
        /// Messages per field.
        errors: FieldErrors,
    },

    /// The requested resource does not exist.
    #[error("not found: {message}")]
    NotFound {
        /// Message returned by the server.
        message: String,
    },

    /// Server returned any other error response.
    #[error("API error: HTTP {status}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Message returned by the server, if any.
        message: Option<String>,
    },
}

impl ClientError {
    /// Whether the request never got an answer from the server.
    ///
    /// Undecodable success bodies are `Http` errors too, but the server did answer.
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Http(e) if !e.is_decode())
    }

    /// The human-readable message the server sent with the error, if any.
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::InsufficientBalance { message } | Self::NotFound { message } => Some(message),
            Self::Api { message, .. } => message.as_deref(),
            Self::Http(_) | Self::Validation { .. } => None,
        }
    }
}
