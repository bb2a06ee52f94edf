//! Error types for the IPv6 updater
//!
//! Every variant is terminal for a run. The only local recovery is the
//! single fallback between IP sources and the best-effort logout on
//! failure paths.

use thiserror::Error;

/// Result type alias for updater operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the updater
#[derive(Error, Debug)]
pub enum Error {
    /// A required configuration value is missing or empty
    #[error("Missing configuration: {0}")]
    ConfigMissing(String),

    /// A configuration value is present but unusable
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Neither IP source produced an address
    #[error("No IPv6 address available: {0}")]
    NoAddressAvailable(String),

    /// Login was rejected or returned no session id
    #[error("Login failed: {0}")]
    LoginFailed(String),

    /// The record set for the domain could not be fetched or parsed
    #[error("Fetching DNS records failed: {0}")]
    FetchFailed(String),

    /// A record submission failed
    #[error("Updating DNS records failed: {0}")]
    UpdateFailed(String),

    /// The session could not be closed
    #[error("Logout failed: {0}")]
    LogoutFailed(String),

    /// Network-level failure (connect, status, body read)
    #[error("Transport error: {0}")]
    Transport(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a missing configuration error
    pub fn config_missing(msg: impl Into<String>) -> Self {
        Self::ConfigMissing(msg.into())
    }

    /// Create an invalid configuration error
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Create a "no address" error
    pub fn no_address(msg: impl Into<String>) -> Self {
        Self::NoAddressAvailable(msg.into())
    }

    /// Create a login error
    pub fn login(msg: impl Into<String>) -> Self {
        Self::LoginFailed(msg.into())
    }

    /// Create a fetch error
    pub fn fetch(msg: impl Into<String>) -> Self {
        Self::FetchFailed(msg.into())
    }

    /// Create an update error
    pub fn update(msg: impl Into<String>) -> Self {
        Self::UpdateFailed(msg.into())
    }

    /// Create a logout error
    pub fn logout(msg: impl Into<String>) -> Self {
        Self::LogoutFailed(msg.into())
    }

    /// Create a transport error
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Whether this error stems from configuration rather than the run itself
    pub fn is_config(&self) -> bool {
        matches!(self, Self::ConfigMissing(_) | Self::InvalidConfig(_))
    }
}
