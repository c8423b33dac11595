use crate::schema::ChallengeStatus;

/// Failure while talking to the REST API.
///
/// Surfaced to the caller as-is; nothing in this crate retries.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The API answered with a non-2xx status code.
    #[error("API returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body was not the JSON we expected.
    #[error("Unable to decode response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Unable to encode request body: {0}")]
    Encode(#[source] serde_json::Error),
}

/// Errors produced while editing a form back into an entity.
#[derive(Debug, thiserror::Error)]
pub enum FormError {
    #[error("Invalid date-time `{value}`: {source}")]
    DateTime {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("Invalid {kind}: {value}")]
    UnknownLabel { kind: &'static str, value: String },
}

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// `update`, `partial_update` and status changes need a persisted entity.
    #[error("{entity} has no identifier; it must be created first")]
    MissingIdentifier { entity: &'static str },

    #[error("Challenge cannot move from {from} to {to}")]
    InvalidTransition {
        from: ChallengeStatus,
        to: ChallengeStatus,
    },

    #[error(transparent)]
    Form(#[from] FormError),
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        ClientError::Transport(TransportError::Request(e))
    }
}

pub type ClientResult<T> = Result<T, ClientError>;
