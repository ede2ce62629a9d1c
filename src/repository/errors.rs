use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RepositoryError {
    /// No response was received.
    #[error("Network error: {0}")]
    Network(String),

    /// Credential missing, expired or rejected.
    #[error("Authentication error: {0}")]
    Auth(String),

    /// The remote service rejected one or more fields.
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Entity not found")]
    NotFound,

    #[error("Server error: {0}")]
    Server(String),

    /// A response arrived but could not be understood.
    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

impl From<reqwest::Error> for RepositoryError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            RepositoryError::Unexpected(format!("Malformed response: {err}"))
        } else if let Some(status) = err.status() {
            RepositoryError::from_status(status, "")
        } else {
            RepositoryError::Network(err.to_string())
        }
    }
}

impl RepositoryError {
    /// Maps a non-success HTTP status and its body onto the error taxonomy.
    pub fn from_status(status: StatusCode, body: &str) -> Self {
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                RepositoryError::Auth(reason_from_body(body).unwrap_or_else(|| status.to_string()))
            }
            StatusCode::NOT_FOUND => RepositoryError::NotFound,
            StatusCode::BAD_REQUEST | StatusCode::CONFLICT | StatusCode::UNPROCESSABLE_ENTITY => {
                RepositoryError::Validation(
                    reason_from_body(body).unwrap_or_else(|| status.to_string()),
                )
            }
            s if s.is_server_error() => RepositoryError::Server(status.to_string()),
            _ => RepositoryError::Unexpected(format!("Unexpected status {status}")),
        }
    }
}

/// Extracts a human readable reason from an error body.
///
/// Understands `{"detail": "..."}`, `{"error": "..."}` and per-field lists such as
/// `{"registration_number": ["vehicle with this Registration Number already exists."]}`.
fn reason_from_body(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    let object = value.as_object()?;

    for key in ["detail", "error", "non_field_errors"] {
        if let Some(reason) = object.get(key).and_then(first_message) {
            return Some(reason);
        }
    }

    let reasons: Vec<String> = object
        .iter()
        .filter_map(|(field, messages)| {
            first_message(messages).map(|message| format!("{field}: {message}"))
        })
        .collect();

    if reasons.is_empty() {
        None
    } else {
        Some(reasons.join("; "))
    }
}

fn first_message(value: &Value) -> Option<String> {
    match value {
        Value::String(message) => Some(message.clone()),
        Value::Array(items) => items.iter().find_map(first_message),
        _ => None,
    }
}
