//! Error types for the movies API client.
//!
//! # Design
//! `ApiError` is the error branch of every client call. `NotFound` and
//! `BadRequest` are the two contract-declared failures; the 404 carries no
//! body, the 400 carries an optional message. Anything the contract does not
//! declare lands in `UnexpectedStatus` with the raw status and body.

use serde_json::{json, Value};
use thiserror::Error;

/// Errors returned by `MoviesClient` parse methods, transports and accessors.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server returned 404 with no body.
    #[error("movie not found")]
    NotFound,

    /// The server returned 400. The message is absent when the body had none.
    #[error("bad request: {}", .error.as_deref().unwrap_or("no message"))]
    BadRequest { error: Option<String> },

    /// The server returned a status the contract does not declare for the
    /// endpoint.
    #[error("HTTP {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    /// The request never produced a response.
    #[error("transport failed: {0}")]
    Transport(String),

    #[error("deserialization failed: {0}")]
    Deserialization(String),

    #[error("serialization failed: {0}")]
    Serialization(String),

    /// Incremental fetching was requested for an endpoint that does not
    /// paginate.
    #[error("{path} does not support incremental fetching")]
    PaginationUnsupported { path: String },

    #[error(transparent)]
    Contract(#[from] ContractError),
}

impl ApiError {
    /// The error payload as the backend would have sent it.
    ///
    /// A 400 yields `{"error": msg}` (or `{}` when the message is absent), a
    /// bare 404 yields `null`, and client-side failures are wrapped as
    /// `{"error": "<display>"}`.
    pub fn payload(&self) -> Value {
        match self {
            ApiError::NotFound => Value::Null,
            ApiError::BadRequest { error: Some(msg) } => json!({ "error": msg }),
            ApiError::BadRequest { error: None } => json!({}),
            other => json!({ "error": other.to_string() }),
        }
    }
}

/// Problems with endpoint descriptors or the parameters rendered into them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContractError {
    #[error("duplicate endpoint {method} {path}")]
    DuplicateEndpoint { method: &'static str, path: &'static str },

    #[error("{path}: placeholder `{name}` has no declared path parameter")]
    UndeclaredPlaceholder { path: &'static str, name: String },

    #[error("{path}: path parameter `{name}` does not appear in the template")]
    UnusedParameter { path: &'static str, name: &'static str },

    #[error("{method} {path} declares no success response")]
    NoSuccessResponse { method: &'static str, path: &'static str },

    #[error("{method} {path}: request body does not match the method")]
    BodyMismatch { method: &'static str, path: &'static str },

    #[error("{path}: missing value for path parameter `{name}`")]
    MissingParameter { path: &'static str, name: &'static str },

    #[error("{path}: unknown path parameter `{name}`")]
    UnknownParameter { path: &'static str, name: String },
}

/// Client configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("invalid base URL `{0}`: expected an absolute http or https URL with a host")]
    InvalidBaseUrl(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_of_bad_request_is_the_error_envelope() {
        let err = ApiError::BadRequest {
            error: Some("title: must be provided".to_string()),
        };
        assert_eq!(err.payload(), json!({ "error": "title: must be provided" }));
    }

    #[test]
    fn payload_of_not_found_is_null() {
        assert_eq!(ApiError::NotFound.payload(), Value::Null);
    }

    #[test]
    fn payload_wraps_transport_failures() {
        let err = ApiError::Transport("connection refused".to_string());
        assert_eq!(
            err.payload(),
            json!({ "error": "transport failed: connection refused" })
        );
    }

    #[test]
    fn bad_request_display_without_message() {
        let err = ApiError::BadRequest { error: None };
        assert_eq!(err.to_string(), "bad request: no message");
    }
}
