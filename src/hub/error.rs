//! Error handling for the live update channel

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HubError {
    /// The negotiate request failed at the transport level.
    #[error("Negotiate request failed: {0}")]
    Negotiate(#[from] reqwest::Error),

    /// The negotiate endpoint answered with a non-success status.
    #[error("Negotiate rejected with status {status}: {message}")]
    NegotiateRejected { status: u16, message: String },

    /// WebSocket transport error.
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    /// The hub URL could not be turned into a WebSocket URL.
    #[error("Invalid hub URL: {0}")]
    Url(#[from] url::ParseError),

    /// A message could not be decoded.
    #[error("Decoding error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Protocol error: {0}")]
    Protocol(String),

    /// The server refused the protocol handshake.
    #[error("Handshake failed: {0}")]
    Handshake(String),

    /// Every allowed connection attempt failed.
    #[error("Gave up after {0} connection attempts")]
    AttemptsExhausted(u32),
}
