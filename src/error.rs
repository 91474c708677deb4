use thiserror::Error;

use crate::auth::role::Role;

pub type Result<T> = std::result::Result<T, ClientError>;

/// Every failure the client can report.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Unknown role, missing credential, bad URL or an operation used with
    /// parts its verb does not carry. Never retried.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Token endpoint rejected the credentials or answered without `access_token`.
    #[error("token exchange for role '{role}' failed: {reason}")]
    AuthExchange { role: Role, reason: String },

    /// Non-2xx answer from the platform API, status and body kept verbatim.
    #[error("platform responded with {status}: {body}")]
    Http { status: u16, body: String },

    /// Response body is empty or not JSON.
    #[error("cannot decode response: {0}")]
    Decode(String),

    #[error("request timed out: {0}")]
    Timeout(String),

    #[error("transport error: {0}")]
    Transport(String),

    /// Key material cannot be loaded or the token cannot be signed.
    #[error("signing error: {0}")]
    Signing(String),

    /// Freshly signed identity token did not pass its own verification.
    #[error("identity token self-verification failed: {0}")]
    Verification(String),

    /// Data model field rejected before anything is sent.
    #[error("validation error: {0}")]
    Validation(String),
}

impl ClientError {
    /// Maps a reqwest failure onto the timeout/transport split.
    pub(crate) fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ClientError::Timeout(err.to_string())
        } else {
            ClientError::Transport(err.to_string())
        }
    }

    /// Short label used for metrics and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            ClientError::Configuration(_) => "configuration",
            ClientError::AuthExchange { .. } => "auth_exchange",
            ClientError::Http { .. } => "http",
            ClientError::Decode(_) => "decode",
            ClientError::Timeout(_) => "timeout",
            ClientError::Transport(_) => "transport",
            ClientError::Signing(_) => "signing",
            ClientError::Verification(_) => "verification",
            ClientError::Validation(_) => "validation",
        }
    }

    /// HTTP status of a platform error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}
