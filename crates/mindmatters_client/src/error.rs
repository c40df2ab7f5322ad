//! crates/mindmatters_client/src/error.rs

/// Errors surfaced by the session cache and the API client.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The server rejected the cached token. The session has already been
    /// cleared; the caller should send the user back to the login surface.
    #[error("Session expired: {0}")]
    SessionExpired(String),

    /// Any other non-success status, with the server's message. Rejected
    /// login or register credentials arrive here as a 401.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Session storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),
}

pub type ClientResult<T> = Result<T, ClientError>;
