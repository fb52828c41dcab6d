//! Error taxonomy for the API client.
//!
//! Three failure families, matching how the rest of the system treats
//! them: transport failures, non-2xx responses surfaced verbatim, and
//! local rejections that never reach the wire. Nothing here is fatal to
//! the process; every error is scoped to the operation that produced it.

/// Errors surfaced by [`ApiClient`](crate::client::ApiClient) operations.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend returned a non-2xx status code.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The payload was rejected locally before submission.
    #[error("Validation failed: {0}")]
    Validation(String),
}

/// Convenience alias for client results.
pub type ClientResult<T> = Result<T, ClientError>;

impl From<validator::ValidationErrors> for ClientError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ClientError::Validation(errors.to_string())
    }
}
