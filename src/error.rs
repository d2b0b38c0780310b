//! Error types for resource mapping, lifecycle calls and the HTTP transport.

use thiserror::Error;

use crate::models::writable::{LifecycleState, Verb};

/// Errors raised by the Personio client and its resource models.
#[derive(Debug, Error)]
pub enum PersonioError {
    /// A custom field key lacks the `dynamic_<id>` form.
    #[error("dynamic attribute '{0}' does not start with 'dynamic_' followed by a numeric id")]
    MalformedFieldKey(String),

    /// A payload entry could not be read as a `{label, value}` pair.
    #[error("payload entry '{key}' is malformed: {reason}")]
    MalformedEntry { key: String, reason: String },

    /// A wire or local value does not fit its field mapping.
    #[error("field '{field}' expected {expected}, found {found}")]
    InvalidFieldValue {
        field: String,
        expected: &'static str,
        found: String,
    },

    /// The verb is disabled for the resource type, or the type has no hook for it.
    #[error("{verb} is not supported by {kind}")]
    UnsupportedOperation { verb: Verb, kind: &'static str },

    /// Neither an explicit nor a stored client was available.
    #[error("no Personio client configured")]
    NoClientConfigured,

    /// The verb is not allowed from the resource's current lifecycle state.
    #[error("cannot {verb} a {state} resource")]
    InvalidState { verb: Verb, state: LifecycleState },

    /// A lifecycle hook needs a field that is not set.
    #[error("{kind} has no value for '{field}'")]
    MissingField {
        kind: &'static str,
        field: &'static str,
    },

    /// The API refused the client credentials.
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// The request could not be sent or its body could not be read.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("Personio API error ({status}): {body}")]
    Api { status: u16, body: String },

    /// The API answered with a body of an unexpected shape.
    #[error("unexpected response from Personio: {0}")]
    UnexpectedResponse(String),

    /// Missing or invalid client configuration.
    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl PersonioError {
    pub(crate) fn invalid_value(
        field: &str,
        expected: &'static str,
        found: impl ToString,
    ) -> Self {
        PersonioError::InvalidFieldValue {
            field: field.to_string(),
            expected,
            found: found.to_string(),
        }
    }

    pub(crate) fn malformed_entry(key: &str, reason: impl Into<String>) -> Self {
        PersonioError::MalformedEntry {
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result type for Personio operations.
pub type Result<T> = std::result::Result<T, PersonioError>;
