//! Host-facing transport facade.
//!
//! Holds the active host configuration and forwards manager lookups to
//! the registry. The facade carries no cached state of its own, so a
//! reconfiguration never invalidates managers already handed out.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::info;

use buildtray_core::{
    ApiClientFactory, Credentials, HttpClientFactory, Job, ProjectManager, ServerIdentity,
    ServerManager, ServerRegistry, TransportError, TransportResult,
};

use crate::factory::{DefaultHttpClientFactory, JenkinsApiClientFactory};

/// Connection settings as configured by the host.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransportSettings {
    pub server_url: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

struct Configured {
    settings: TransportSettings,
    identity: ServerIdentity,
    credentials: Credentials,
}

/// Entry point the host talks to.
pub struct JenkinsTransport {
    registry: Arc<ServerRegistry>,
    api_factory: Arc<dyn ApiClientFactory>,
    http_factory: Arc<dyn HttpClientFactory>,
    configured: RwLock<Option<Configured>>,
}

impl JenkinsTransport {
    pub fn new(
        registry: Arc<ServerRegistry>,
        api_factory: Arc<dyn ApiClientFactory>,
        http_factory: Arc<dyn HttpClientFactory>,
    ) -> Self {
        Self {
            registry,
            api_factory,
            http_factory,
            configured: RwLock::new(None),
        }
    }

    /// Transport with its own registry and the stock Jenkins factories.
    pub fn with_defaults() -> Self {
        Self::new(
            Arc::new(ServerRegistry::new()),
            Arc::new(JenkinsApiClientFactory),
            Arc::new(DefaultHttpClientFactory::default()),
        )
    }

    pub fn registry(&self) -> &Arc<ServerRegistry> {
        &self.registry
    }

    /// Apply new host settings.
    ///
    /// The server URL is validated eagerly so a broken configuration is
    /// reported here rather than on the next poll. Changing the URL only
    /// changes which registry entry subsequent lookups hit; the previous
    /// server's manager and caches stay intact under the old identity.
    pub async fn configure(&self, settings: TransportSettings) -> TransportResult<()> {
        let identity = ServerIdentity::parse(&settings.server_url)?;
        let credentials = Credentials::new(&settings.username, &settings.password);
        info!(
            server = %identity,
            anonymous = credentials.is_anonymous(),
            "transport configured"
        );
        *self.configured.write().await = Some(Configured {
            settings,
            identity,
            credentials,
        });
        Ok(())
    }

    /// Currently applied settings, if any.
    pub async fn settings(&self) -> Option<TransportSettings> {
        self.configured
            .read()
            .await
            .as_ref()
            .map(|c| c.settings.clone())
    }

    /// Manager for the configured server, created on first use.
    pub async fn server_manager(&self) -> TransportResult<Arc<ServerManager>> {
        let configured = self.configured.read().await;
        let Some(c) = configured.as_ref() else {
            return Err(TransportError::InvalidConfiguration(
                "transport is not configured with a server URL".to_string(),
            ));
        };
        Ok(self.registry.get_or_create(
            &c.identity,
            &c.credentials,
            self.api_factory.as_ref(),
            self.http_factory.as_ref(),
        ))
    }

    /// Manager for one project on the configured server.
    pub async fn project_manager(&self, project_name: &str) -> TransportResult<Arc<ProjectManager>> {
        self.server_manager().await?.project_manager(project_name).await
    }

    /// Jobs the configured server currently exposes; the host uses this
    /// to offer a project picker.
    pub async fn available_projects(&self) -> TransportResult<Vec<Job>> {
        self.server_manager().await?.list_remote_projects().await
    }
}
