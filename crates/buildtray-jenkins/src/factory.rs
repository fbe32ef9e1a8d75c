//! Default factories wiring the Jenkins client into the core.

use std::sync::Arc;
use std::time::Duration;

use buildtray_core::{ApiClient, ApiClientFactory, Credentials, HttpClientFactory, ServerIdentity};

use crate::api::JenkinsApiClient;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Builds the shared HTTP client used for all Jenkins traffic.
pub struct DefaultHttpClientFactory {
    timeout: Duration,
}

impl DefaultHttpClientFactory {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Default for DefaultHttpClientFactory {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT)
    }
}

impl HttpClientFactory for DefaultHttpClientFactory {
    fn create(&self) -> reqwest::Client {
        reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(concat!("buildtray/", env!("CARGO_PKG_VERSION")))
            .build()
            .expect("Failed to build HTTP client")
    }
}

/// Produces a [`JenkinsApiClient`] per server identity.
#[derive(Default)]
pub struct JenkinsApiClientFactory;

impl ApiClientFactory for JenkinsApiClientFactory {
    fn create(
        &self,
        identity: &ServerIdentity,
        credentials: &Credentials,
        http_factory: &dyn HttpClientFactory,
    ) -> Arc<dyn ApiClient> {
        Arc::new(JenkinsApiClient::new(
            identity.clone(),
            credentials,
            http_factory.create(),
        ))
    }
}
