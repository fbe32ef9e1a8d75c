//! Per-project polling unit.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::client::ApiClient;
use crate::domain::{Authorization, ProjectStatus, ServerIdentity};
use crate::error::{TransportError, TransportResult};

/// Where a project manager stands in its polling lifecycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PollState {
    /// No fetch has succeeded yet.
    #[default]
    Uninitialized,
    /// The most recent fetch succeeded.
    Active,
    /// A fetch failed after at least one success; the previous status is
    /// retained.
    Degraded,
}

#[derive(Debug, Default)]
struct PollCache {
    status: Option<ProjectStatus>,
    state: PollState,
}

/// Owns status queries for exactly one project on one server.
///
/// Managers are cached by their server manager and handed out as shared
/// references, so repeated retrievals observe the same instance and the
/// same status cache.
pub struct ProjectManager {
    server: ServerIdentity,
    project_name: String,
    authorization: Authorization,
    api: Arc<dyn ApiClient>,
    cache: RwLock<PollCache>,
}

impl fmt::Debug for ProjectManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProjectManager")
            .field("server", &self.server)
            .field("project_name", &self.project_name)
            .field("authorization", &self.authorization)
            .finish_non_exhaustive()
    }
}

impl ProjectManager {
    pub(crate) fn new(
        server: ServerIdentity,
        project_name: String,
        authorization: Authorization,
        api: Arc<dyn ApiClient>,
    ) -> Self {
        Self {
            server,
            project_name,
            authorization,
            api,
            cache: RwLock::new(PollCache::default()),
        }
    }

    pub fn project_name(&self) -> &str {
        &self.project_name
    }

    pub fn server(&self) -> &ServerIdentity {
        &self.server
    }

    /// Authorization context for this project. Present even for anonymous
    /// configurations.
    pub fn authorization(&self) -> &Authorization {
        &self.authorization
    }

    /// Last status observed by a successful fetch, if any.
    pub async fn last_status(&self) -> Option<ProjectStatus> {
        self.cache.read().await.status.clone()
    }

    pub async fn poll_state(&self) -> PollState {
        self.cache.read().await.state
    }

    /// Fetch the project's current status from the remote server.
    ///
    /// On success the cached status is replaced and a copy returned. On
    /// failure the cache keeps the previous status, the manager reports
    /// [`PollState::Degraded`], and the error is handed back; the manager
    /// stays usable for the next poll.
    pub async fn status(&self) -> TransportResult<ProjectStatus> {
        let previous = self.cache.read().await.status.clone();

        // The fetch runs with no lock held, so status reads and polls of
        // sibling projects are never blocked behind a slow server.
        let fetched = self
            .api
            .fetch_status(&self.project_name, previous.as_ref())
            .await;

        match fetched {
            Ok(fresh) => {
                let mut cache = self.cache.write().await;
                cache.status = Some(fresh.clone());
                cache.state = PollState::Active;
                debug!(
                    server = %self.server,
                    project = %self.project_name,
                    result = %fresh.last_result,
                    activity = %fresh.activity,
                    "project status refreshed"
                );
                Ok(fresh)
            }
            Err(err) => {
                let mut cache = self.cache.write().await;
                if cache.state != PollState::Uninitialized {
                    cache.state = PollState::Degraded;
                }
                warn!(
                    server = %self.server,
                    project = %self.project_name,
                    error = %err,
                    "status fetch failed, keeping last known status"
                );
                Err(err)
            }
        }
    }

    /// Like [`status`](Self::status), but bounded by `timeout`.
    ///
    /// An expired timeout abandons the in-flight fetch, leaves the cache
    /// untouched, and fails with [`TransportError::Cancelled`], which
    /// callers can tell apart from the remote being unreachable.
    pub async fn status_within(&self, timeout: Duration) -> TransportResult<ProjectStatus> {
        match tokio::time::timeout(timeout, self.status()).await {
            Ok(result) => result,
            Err(_) => Err(TransportError::Cancelled),
        }
    }
}
