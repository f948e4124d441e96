use thiserror::Error;

/// Errors produced by the CloudLink client.
#[derive(Debug, Error)]
pub enum CloudLinkError {
    /// Argument validation failed; no request was made.
    #[error("validation failed: {0}")]
    Validation(#[from] validator::ValidationErrors),

    /// A required identifier parameter was empty; no request was made.
    #[error("{0} must not be empty")]
    EmptyIdentifier(&'static str),

    /// CloudLink answered with a non-200 status.
    #[error("CloudLink request failed with status {status} {reason}")]
    Status {
        status: u16,
        reason: String,
        body: Option<String>,
    },

    /// The request could not be sent or the connection failed.
    #[error("request to CloudLink failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// A response or stored payload could not be deserialized.
    #[error("failed to decode CloudLink response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl CloudLinkError {
    pub(crate) fn from_status(status: reqwest::StatusCode, body: String) -> Self {
        CloudLinkError::Status {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or("unknown").to_string(),
            body: if body.is_empty() { None } else { Some(body) },
        }
    }
}
