use thiserror::Error;

/// Errors surfaced by the interview client.
///
/// The variants mirror the three operator-visible failure classes:
/// session creation, the streaming transport, and end-of-session scoring.
/// All of them are reported to the caller for display; none trigger an
/// automatic retry.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("failed to start interview session: {0}")]
    Creation(String),

    #[error("socket transport error: {0}")]
    Transport(String),

    #[error("failed to end interview session: {0}")]
    Termination(String),

    #[error("request to {endpoint} failed: {detail}")]
    Api { endpoint: String, detail: String },

    #[error("http request failed")]
    Http(#[from] reqwest::Error),

    #[error("malformed payload")]
    MalformedPayload(#[from] serde_json::Error),

    #[error("session already disposed")]
    Disposed,
}

pub type Result<T> = std::result::Result<T, ClientError>;
