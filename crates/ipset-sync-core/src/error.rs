//! Error types for the IP set sync system
//!
//! Errors fall into two tiers. `Config` errors are handled: the engine logs
//! them and skips the invocation. Everything else is operational and
//! propagates to the caller unchanged.

use thiserror::Error;

/// Result type alias for IP set sync operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the IP set sync system
#[derive(Error, Debug)]
pub enum Error {
    /// A domain name could not be resolved to any IPv4 address
    #[error("Failed to resolve {host}: {message}")]
    Resolve {
        /// Domain name that failed
        host: String,
        /// Resolver message
        message: String,
    },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// The lock token was rejected because the IP set changed after it was read
    #[error("Stale lock token: {0}")]
    StaleLockToken(String),

    /// IP set not found
    #[error("IP set not found: {0}")]
    NotFound(String),

    /// Provider-specific error
    #[error("Provider error ({provider}): {message}")]
    Provider {
        /// Provider name
        provider: String,
        /// Error message
        message: String,
    },

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a resolution error
    pub fn resolve(host: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Resolve {
            host: host.into(),
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a stale lock token error
    pub fn stale_lock_token(msg: impl Into<String>) -> Self {
        Self::StaleLockToken(msg.into())
    }

    /// Create a "not found" error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a provider-specific error
    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Whether this error belongs to the handled (validation) tier
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}

/// Helper for converting anyhow::Error to our Error type
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err.to_string())
    }
}
