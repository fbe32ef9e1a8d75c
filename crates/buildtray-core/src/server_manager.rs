//! Per-server session owner and project-manager cache.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

use crate::client::ApiClient;
use crate::domain::{
    Authorization, Credentials, Job, ProjectStatus, ServerIdentity, SessionToken,
};
use crate::error::{TransportError, TransportResult};
use crate::project_manager::ProjectManager;

/// Owns the session and the per-project managers for one CI server.
///
/// Created by the registry on first contact with a server identity and
/// shared from then on; construction performs no network activity.
pub struct ServerManager {
    identity: ServerIdentity,
    credentials: Credentials,
    authorization: Authorization,
    api: Arc<dyn ApiClient>,
    session: RwLock<Option<SessionToken>>,
    handshake: Mutex<()>,
    projects: DashMap<String, Arc<ProjectManager>>,
}

impl fmt::Debug for ServerManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerManager")
            .field("identity", &self.identity)
            .field("authorization", &self.authorization)
            .finish_non_exhaustive()
    }
}

impl ServerManager {
    pub(crate) fn new(
        identity: ServerIdentity,
        credentials: Credentials,
        api: Arc<dyn ApiClient>,
    ) -> Self {
        let authorization = Authorization::from_credentials(&credentials);
        Self {
            identity,
            credentials,
            authorization,
            api,
            session: RwLock::new(None),
            handshake: Mutex::new(()),
            projects: DashMap::new(),
        }
    }

    pub fn identity(&self) -> &ServerIdentity {
        &self.identity
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn authorization(&self) -> &Authorization {
        &self.authorization
    }

    /// Session artifact cached from the last handshake, if any.
    pub async fn session_token(&self) -> Option<SessionToken> {
        self.session.read().await.clone()
    }

    /// Drop the cached session so the next use runs a fresh handshake.
    pub async fn invalidate_session(&self) {
        *self.session.write().await = None;
        debug!(server = %self.identity, "session invalidated");
    }

    /// Make sure a session exists, running at most one handshake at a
    /// time; concurrent callers wait for the in-flight handshake and
    /// reuse its token.
    pub async fn ensure_session(&self) -> TransportResult<SessionToken> {
        if let Some(token) = self.session.read().await.clone() {
            return Ok(token);
        }

        let _guard = self.handshake.lock().await;
        // An earlier holder may have filled the slot while this caller
        // waited on the lock.
        if let Some(token) = self.session.read().await.clone() {
            return Ok(token);
        }

        let token = self.api.open_session().await?;
        *self.session.write().await = Some(token.clone());
        debug!(server = %self.identity, "session established");
        Ok(token)
    }

    /// Return the manager for `project_name`, creating it on first use.
    ///
    /// Repeated calls with the same name return the same instance, so
    /// callers can hold the reference and keep observing status updates
    /// through it. Creation is atomic per name; concurrent first calls
    /// observe a single manager.
    pub async fn project_manager(
        &self,
        project_name: &str,
    ) -> TransportResult<Arc<ProjectManager>> {
        if project_name.trim().is_empty() {
            return Err(TransportError::InvalidConfiguration(
                "project name must not be empty".to_string(),
            ));
        }

        let manager = self
            .projects
            .entry(project_name.to_string())
            .or_insert_with(|| {
                info!(server = %self.identity, project = %project_name, "creating project manager");
                Arc::new(ProjectManager::new(
                    self.identity.clone(),
                    project_name.to_string(),
                    self.authorization.clone(),
                    Arc::clone(&self.api),
                ))
            })
            .value()
            .clone();

        // The handshake is deferred to first real use of the server, so a
        // configured but never-queried server stays off the network. A
        // failed handshake is reported by the next status fetch instead of
        // breaking manager retrieval.
        if let Err(err) = self.ensure_session().await {
            warn!(
                server = %self.identity,
                error = %err,
                "session handshake failed, continuing without a session"
            );
        }

        Ok(manager)
    }

    /// Read-only view of every known project and its last fetched status.
    ///
    /// Never triggers a poll. Projects that were retrieved but have not
    /// been successfully polled yet map to `None`.
    pub async fn project_statuses(&self) -> HashMap<String, Option<ProjectStatus>> {
        let mut statuses = HashMap::with_capacity(self.projects.len());
        for entry in self.projects.iter() {
            statuses.insert(entry.key().clone(), entry.value().last_status().await);
        }
        statuses
    }

    /// Number of project managers currently cached.
    pub fn project_count(&self) -> usize {
        self.projects.len()
    }

    /// Jobs the remote server currently exposes. Always a live call; the
    /// result is not cached.
    pub async fn list_remote_projects(&self) -> TransportResult<Vec<Job>> {
        self.api.list_jobs().await
    }
}
