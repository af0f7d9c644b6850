use bridge_traits::error::BridgeError;
use thiserror::Error;

/// Fallback used when the server does not explain a failed request.
pub const GENERIC_HTTP_MESSAGE: &str = "An error occurred.";

/// Message shown when the catalog API cannot be reached at all.
pub const NETWORK_ERROR_MESSAGE: &str = "Network error: Unable to reach the server.";

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP {status}: {}", .message.as_deref().unwrap_or(GENERIC_HTTP_MESSAGE))]
    Http {
        status: u16,
        message: Option<String>,
    },

    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error("Invalid input: {field} - {message}")]
    InvalidInput { field: String, message: String },

    #[error("Bridge error: {0}")]
    Bridge(BridgeError),
}

impl CatalogError {
    pub fn invalid_input(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Text shown to the user in place of the result list.
    pub fn user_message(&self) -> String {
        match self {
            CatalogError::Http { status, message } => {
                let message = message
                    .as_deref()
                    .filter(|m| !m.is_empty())
                    .unwrap_or(GENERIC_HTTP_MESSAGE);
                format!("Error: {} - {}", status, message)
            }
            CatalogError::Network(_) => NETWORK_ERROR_MESSAGE.to_string(),
            CatalogError::Parse(message) => format!("Error: {}", message),
            CatalogError::InvalidInput { message, .. } => format!("Error: {}", message),
            CatalogError::Bridge(err) => format!("Error: {}", err),
        }
    }
}

impl From<BridgeError> for CatalogError {
    fn from(err: BridgeError) -> Self {
        match err {
            BridgeError::Network(message) => CatalogError::Network(message),
            other => CatalogError::Bridge(other),
        }
    }
}

pub type Result<T> = std::result::Result<T, CatalogError>;
