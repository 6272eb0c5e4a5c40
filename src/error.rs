use serde::Deserialize;
use thiserror::Error;

/// A single entry of a GraphQL `errors` array, passed through as returned.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct GraphQlError {
    pub message: String,
    #[serde(default)]
    pub extensions: Option<serde_json::Value>,
}

#[derive(Debug, Error)]
pub enum MondayError {
    #[error("Rate limit exceeded, retry after {retry_after}s")]
    RateLimit { retry_after: u64 },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error: status {status}: {body}")]
    Api { status: u16, body: String },

    #[error("GraphQL error: {}", join_messages(.0))]
    GraphQl(Vec<GraphQlError>),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl MondayError {
    /// Seconds the caller should wait before retrying, for rate-limit errors only.
    pub fn retry_after(&self) -> Option<u64> {
        match self {
            MondayError::RateLimit { retry_after } => Some(*retry_after),
            _ => None,
        }
    }
}

fn join_messages(errors: &[GraphQlError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}
