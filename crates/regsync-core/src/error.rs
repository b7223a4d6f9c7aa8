//! Error types for regsync
//!
//! Every failure a reconciliation or token request can hit is a variant of
//! [`Error`], so callers can branch on the kind instead of parsing messages.

use thiserror::Error;

/// Result type alias for regsync operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type
#[derive(Error, Debug)]
pub enum Error {
    /// The private key could not be parsed; no request was attempted
    #[error("Private key error: {0}")]
    KeyFormat(String),

    /// The auth endpoint rejected the signed login request
    #[error("Token request failed: {0}")]
    TokenRequest(String),

    /// Success status, but the body lacked the expected field
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// Fetching the current state of a domain failed
    #[error("Failed to fetch state of {domain}: {message}")]
    Fetch {
        /// Domain being reconciled
        domain: String,
        /// Provider-reported error text
        message: String,
    },

    /// Pushing the desired state of a domain failed
    #[error("Failed to update {domain}: {message}")]
    Update {
        /// Domain being reconciled
        domain: String,
        /// Provider-reported error text
        message: String,
    },

    /// A desired record marked `external` has no live counterpart
    #[error("No existing {record_type} record named '{name}' to inherit content from")]
    ExternalRecordNotFound {
        /// Record name
        name: String,
        /// Record type mnemonic
        record_type: String,
    },

    /// Desired state failed validation
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Transport-level failure (connect, timeout, TLS)
    #[error("HTTP error: {0}")]
    Http(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a key format error
    pub fn key_format(msg: impl Into<String>) -> Self {
        Self::KeyFormat(msg.into())
    }

    /// Create a token request error
    pub fn token_request(msg: impl Into<String>) -> Self {
        Self::TokenRequest(msg.into())
    }

    /// Create a malformed response error
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedResponse(msg.into())
    }

    /// Create a fetch error for `domain`
    pub fn fetch(domain: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Fetch {
            domain: domain.into(),
            message: message.into(),
        }
    }

    /// Create an update error for `domain`
    pub fn update(domain: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Update {
            domain: domain.into(),
            message: message.into(),
        }
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an HTTP error
    pub fn http(msg: impl Into<String>) -> Self {
        Self::Http(msg.into())
    }

    /// Whether the error was raised before any request reached the provider.
    ///
    /// Used by the CLI to pick between the configuration and runtime exit codes.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            Self::KeyFormat(_) | Self::InvalidInput(_) | Self::Config(_)
        )
    }
}
