//! Capability traits the core consumes but does not implement.
//!
//! The HTTP transport and the remote API surface are both injected
//! through factories, so the managers stay oblivious to any concrete
//! server flavor and tests can substitute fakes.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::{Credentials, Job, ProjectStatus, ServerIdentity, SessionToken};
use crate::error::TransportResult;

/// Produces the HTTP client used by API clients.
pub trait HttpClientFactory: Send + Sync {
    /// Build a ready-to-use HTTP client.
    fn create(&self) -> reqwest::Client;
}

/// Remote API surface of one CI server.
///
/// Implementations are scoped to a single server; the identity and
/// credentials are fixed at construction through [`ApiClientFactory`].
#[async_trait]
pub trait ApiClient: Send + Sync {
    /// Perform the authentication handshake and return whatever session
    /// artifact the server hands out.
    async fn open_session(&self) -> TransportResult<SessionToken>;

    /// List every job the remote server currently exposes.
    async fn list_jobs(&self) -> TransportResult<Vec<Job>>;

    /// Fetch the current status of `job_name`.
    ///
    /// `previous` is the last status this process observed, if any;
    /// implementations may fold fields the server did not resend forward
    /// from it. Fails with [`TransportError::ProjectNotFound`] when the
    /// remote no longer lists the job.
    ///
    /// [`TransportError::ProjectNotFound`]: crate::error::TransportError::ProjectNotFound
    async fn fetch_status(
        &self,
        job_name: &str,
        previous: Option<&ProjectStatus>,
    ) -> TransportResult<ProjectStatus>;
}

/// Builds an [`ApiClient`] bound to one server and one credential set.
pub trait ApiClientFactory: Send + Sync {
    fn create(
        &self,
        identity: &ServerIdentity,
        credentials: &Credentials,
        http_factory: &dyn HttpClientFactory,
    ) -> Arc<dyn ApiClient>;
}
