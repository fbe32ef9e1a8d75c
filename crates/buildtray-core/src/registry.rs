//! Process-wide map from server identity to server manager.

use std::sync::Arc;

use dashmap::DashMap;
use tracing::{debug, info};

use crate::client::{ApiClientFactory, HttpClientFactory};
use crate::domain::{Credentials, ServerIdentity};
use crate::server_manager::ServerManager;

/// Registry of server managers, one per distinct server identity.
///
/// Explicitly constructed and owned by whoever drives the transport;
/// there is no process-global instance. Entries live until the registry
/// is dropped: the server population is bounded by host configuration,
/// so nothing is evicted.
#[derive(Default)]
pub struct ServerRegistry {
    servers: DashMap<ServerIdentity, Arc<ServerManager>>,
}

impl ServerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the manager for `identity`, creating it on first contact.
    ///
    /// The registry is keyed purely on identity: a later call with
    /// different credentials or factories returns the existing manager
    /// unchanged (first writer wins). Creation is atomic per identity;
    /// when first contacts race, exactly one manager is constructed and
    /// the losing factory call never happens.
    pub fn get_or_create(
        &self,
        identity: &ServerIdentity,
        credentials: &Credentials,
        api_factory: &dyn ApiClientFactory,
        http_factory: &dyn HttpClientFactory,
    ) -> Arc<ServerManager> {
        if let Some(existing) = self.servers.get(identity) {
            if existing.credentials() != credentials {
                debug!(
                    server = %identity,
                    "ignoring changed credentials for existing server entry"
                );
            }
            return Arc::clone(existing.value());
        }

        self.servers
            .entry(identity.clone())
            .or_insert_with(|| {
                info!(server = %identity, "creating server manager");
                let api = api_factory.create(identity, credentials, http_factory);
                Arc::new(ServerManager::new(
                    identity.clone(),
                    credentials.clone(),
                    api,
                ))
            })
            .value()
            .clone()
    }

    /// Manager for `identity` if one has already been created.
    pub fn get(&self, identity: &ServerIdentity) -> Option<Arc<ServerManager>> {
        self.servers.get(identity).map(|e| Arc::clone(e.value()))
    }

    /// Identities currently known to the registry.
    pub fn identities(&self) -> Vec<ServerIdentity> {
        self.servers.iter().map(|e| e.key().clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.servers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.servers.is_empty()
    }
}
