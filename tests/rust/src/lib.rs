//! Shared test utilities and fixtures for buildtray integration tests.

pub use buildtray_core::{
    BuildActivity, BuildResult, Credentials, Job, PollState, ProjectStatus, ServerIdentity,
    SessionToken, TransportError,
};

pub use mocks::{FakeApiClient, PlainHttpClientFactory, RecordingApiClientFactory};

/// Test fixture utilities
pub mod fixtures {
    use super::*;

    /// Parse a known-good server URL.
    pub fn identity(url: &str) -> ServerIdentity {
        ServerIdentity::parse(url).expect("valid test URL")
    }

    /// A job hosted on the fixture server.
    pub fn job(name: &str) -> Job {
        Job::new(name, format!("http://ci.local:8080/job/{name}/"))
    }

    /// A completed-build status with the given result.
    pub fn status(name: &str, result: BuildResult) -> ProjectStatus {
        let mut status = ProjectStatus::new(name, format!("http://ci.local:8080/job/{name}/"));
        status.last_result = result;
        status.last_build_label = Some("7".to_string());
        status
    }

    pub fn credentials() -> Credentials {
        Credentials::new("casey", "s3cret")
    }
}

/// Jenkins JSON payload builders for wiremock responses
pub mod payloads {
    use serde_json::{json, Value};

    /// Body of `GET /api/json?tree=jobs[name,url]`.
    pub fn job_listing(base_url: &str, names: &[&str]) -> Value {
        let jobs: Vec<Value> = names
            .iter()
            .map(|name| {
                json!({
                    "name": name,
                    "url": format!("{base_url}/job/{name}/"),
                })
            })
            .collect();
        json!({ "jobs": jobs })
    }

    /// Body of `GET /job/<name>/api/json` for a finished build.
    pub fn job_detail(base_url: &str, name: &str, color: &str, number: u64, result: &str) -> Value {
        json!({
            "name": name,
            "url": format!("{base_url}/job/{name}/"),
            "color": color,
            "inQueue": false,
            "lastBuild": {
                "number": number,
                "timestamp": 1_700_000_000_000_i64,
                "building": false,
                "result": result,
            }
        })
    }

    /// Body of `GET /crumbIssuer/api/json`.
    pub fn crumb(field: &str, value: &str) -> Value {
        json!({ "crumb": value, "crumbRequestField": field })
    }
}

/// Async test helpers
pub mod async_helpers {
    use std::time::Duration;
    use tokio::time::timeout;

    /// Run an async operation with a timeout
    pub async fn with_timeout<F, T>(duration: Duration, f: F) -> T
    where
        F: std::future::Future<Output = T>,
    {
        timeout(duration, f).await.expect("Operation timed out")
    }

    /// Default test timeout (5 seconds)
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);
}
