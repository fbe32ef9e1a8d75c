//! Error taxonomy shared by the registry, the managers, and API clients.
//!
//! The core never retries; every failure is handed back to the caller as a
//! typed value, and a failure against one project must never disturb the
//! cached state of another.

use thiserror::Error;

/// Failures surfaced by the transport core.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The server identity or project name is empty or malformed. Fatal to
    /// the specific call, never to the process.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The transport could not reach the remote server. Transient; the
    /// manager that reported it stays usable.
    #[error("remote server unavailable: {0}")]
    RemoteUnavailable(String),

    /// The remote server answered with something that does not match the
    /// expected API shape.
    #[error("unexpected response from remote server: {0}")]
    RemoteProtocol(String),

    /// The remote job listing no longer contains the configured project.
    /// The manager stays usable, so a re-added job upstream recovers on a
    /// later poll without any reconfiguration.
    #[error("project `{0}` not found on the remote server")]
    ProjectNotFound(String),

    /// The caller abandoned the call before it completed. No cached state
    /// was mutated.
    #[error("status request cancelled before completion")]
    Cancelled,
}

/// Result alias used across the core.
pub type TransportResult<T> = std::result::Result<T, TransportError>;

impl TransportError {
    /// True for failures a later poll can clear without reconfiguration.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            TransportError::RemoteUnavailable(_)
                | TransportError::RemoteProtocol(_)
                | TransportError::ProjectNotFound(_)
        )
    }
}
