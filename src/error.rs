//! Error types for the phonics coach

use thiserror::Error;

/// Result type alias for coach operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the phonics coach
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error (missing credential, bad config file)
    #[error("configuration error: {0}")]
    Config(String),

    /// Microphone or playback device denied or unavailable
    #[error("permission error: {0}")]
    Permission(String),

    /// Live session open/auth failure or transport fault
    #[error("connection error: {0}")]
    Connection(String),

    /// Malformed audio payload
    #[error("decode error: {0}")]
    Decode(String),

    /// Synthesis response carried no audio
    #[error("synthesis error: {0}")]
    Synthesis(String),

    /// Requested voice/model is not provisioned for the credential
    #[error("model unavailable: {0}")]
    ModelUnavailable(String),

    /// Audio device error
    #[error("audio error: {0}")]
    Audio(String),

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP error
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),
}
