use thiserror::Error;

/// Errors returned by a transport implementation.
pub type TransportError = Box<dyn std::error::Error + Send + Sync>;

/// Every way a notification can fail.
///
/// All variants are terminal for the current send; the caller decides how to
/// report them.
#[derive(Debug, Error)]
pub enum NotificationError {
    /// Connection failure, timeout or other transport-level problem.
    #[error("request to Slack failed: {0}")]
    Transport(#[source] TransportError),

    /// Non-2xx status after retries were exhausted.
    #[error("HTTP error from Slack: {status}")]
    HttpStatus { status: u16 },

    #[error("invalid JSON received from Slack")]
    InvalidResponse(#[source] serde_json::Error),

    /// The API answered with `ok: false`.
    #[error("Slack API error: {0}")]
    Api(String),

    #[error("Slack did not return a channel ID for the DM")]
    MissingChannel,

    #[error("could not read payload file {path}: {source}")]
    PayloadFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("could not read payload from stdin: {0}")]
    PayloadRead(#[source] std::io::Error),

    #[error("invalid JSON payload: {0}")]
    InvalidPayload(#[source] serde_json::Error),
}

impl NotificationError {
    /// The platform error code for [`NotificationError::Api`].
    pub fn api_error(&self) -> Option<&str> {
        match self {
            Self::Api(code) => Some(code.as_str()),
            _ => None,
        }
    }
}
