//! Jenkins remote API client.
//!
//! Talks the JSON remote-access API (`.../api/json` with `tree` filters)
//! and maps Jenkins ball colors and build results onto the transport's
//! status model. One client instance is bound to one server and one
//! credential set for its whole life.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::debug;

use buildtray_core::{
    ApiClient, Authorization, BuildActivity, BuildResult, Credentials, Job, ProjectStatus,
    ServerIdentity, SessionToken, TransportError, TransportResult,
};

/// Fields requested for a single job's status.
const JOB_STATUS_TREE: &str = "name,url,color,inQueue,lastBuild[number,timestamp,building,result]";

/// Fields requested for the job listing.
const JOB_LISTING_TREE: &str = "jobs[name,url]";

#[derive(Debug, Deserialize)]
struct JobListing {
    #[serde(default)]
    jobs: Vec<JobEntry>,
}

#[derive(Debug, Deserialize)]
struct JobEntry {
    name: String,
    url: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JobDetail {
    name: Option<String>,
    url: Option<String>,
    color: Option<String>,
    #[serde(default)]
    in_queue: bool,
    last_build: Option<LastBuild>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LastBuild {
    number: Option<u64>,
    timestamp: Option<i64>,
    #[serde(default)]
    building: bool,
    result: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CrumbResponse {
    crumb: String,
    crumb_request_field: String,
}

/// [`ApiClient`] for one Jenkins-compatible server.
pub struct JenkinsApiClient {
    identity: ServerIdentity,
    authorization: Authorization,
    http: reqwest::Client,
}

impl JenkinsApiClient {
    pub fn new(identity: ServerIdentity, credentials: &Credentials, http: reqwest::Client) -> Self {
        Self {
            identity,
            authorization: Authorization::from_credentials(credentials),
            http,
        }
    }

    /// Browsable URL of a job, with the name percent-encoded.
    fn job_url(&self, job_name: &str) -> String {
        self.identity
            .endpoint(&format!("job/{}/", urlencoding::encode(job_name)))
    }

    fn get(&self, url: &str) -> reqwest::RequestBuilder {
        let mut request = self.http.get(url);
        if let Some(value) = self.authorization.header_value() {
            request = request.header(reqwest::header::AUTHORIZATION, value);
        }
        request
    }

    fn status_from_detail(
        &self,
        job_name: &str,
        detail: JobDetail,
        previous: Option<&ProjectStatus>,
    ) -> ProjectStatus {
        let color = detail.color.as_deref().unwrap_or("");
        let building =
            detail.last_build.as_ref().is_some_and(|b| b.building) || is_animated(color);

        let activity = if building {
            BuildActivity::Building
        } else if detail.in_queue {
            BuildActivity::CheckingModifications
        } else {
            BuildActivity::Sleeping
        };

        // A running build reports no result yet; keep the previous outcome
        // on display until it completes.
        let last_result = match detail.last_build.as_ref().and_then(|b| b.result.as_deref()) {
            Some(text) => result_from_text(text),
            None if building => previous
                .map(|p| p.last_result)
                .unwrap_or_else(|| result_from_color(color)),
            None => result_from_color(color),
        };

        let last_build_label = detail
            .last_build
            .as_ref()
            .and_then(|b| b.number)
            .map(|n| n.to_string())
            .or_else(|| previous.and_then(|p| p.last_build_label.clone()));

        let last_build_time = detail
            .last_build
            .as_ref()
            .and_then(|b| b.timestamp)
            .and_then(DateTime::<Utc>::from_timestamp_millis)
            .or_else(|| previous.and_then(|p| p.last_build_time));

        ProjectStatus {
            name: detail.name.unwrap_or_else(|| job_name.to_string()),
            activity,
            last_result,
            last_build_label,
            last_build_time,
            web_url: detail.url.unwrap_or_else(|| self.job_url(job_name)),
        }
    }
}

#[async_trait]
impl ApiClient for JenkinsApiClient {
    async fn open_session(&self) -> TransportResult<SessionToken> {
        let url = self.identity.endpoint("crumbIssuer/api/json");
        debug!("Requesting CSRF crumb from {}", url);

        let response = self.get(&url).send().await.map_err(|e| {
            TransportError::RemoteUnavailable(format!("crumb request failed: {e}"))
        })?;

        // Servers with CSRF protection disabled have no crumb issuer.
        // That is a working anonymous session, not an error.
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            debug!(server = %self.identity, "no crumb issuer, continuing without a crumb");
            return Ok(SessionToken::none_required());
        }

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::RemoteProtocol(format!(
                "crumb request returned HTTP {status}"
            )));
        }

        let crumb: CrumbResponse = response.json().await.map_err(|e| {
            TransportError::RemoteProtocol(format!("invalid crumb payload: {e}"))
        })?;
        Ok(SessionToken::new(format!(
            "{}:{}",
            crumb.crumb_request_field, crumb.crumb
        )))
    }

    async fn list_jobs(&self) -> TransportResult<Vec<Job>> {
        let url = self.identity.endpoint("api/json");
        debug!("Fetching job listing from {}", url);

        let response = self
            .get(&url)
            .query(&[("tree", JOB_LISTING_TREE)])
            .send()
            .await
            .map_err(|e| {
                TransportError::RemoteUnavailable(format!("job listing request failed: {e}"))
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::RemoteProtocol(format!(
                "job listing returned HTTP {status}"
            )));
        }

        let listing: JobListing = response.json().await.map_err(|e| {
            TransportError::RemoteProtocol(format!("invalid job listing payload: {e}"))
        })?;
        Ok(listing
            .jobs
            .into_iter()
            .map(|j| Job::new(j.name, j.url))
            .collect())
    }

    async fn fetch_status(
        &self,
        job_name: &str,
        previous: Option<&ProjectStatus>,
    ) -> TransportResult<ProjectStatus> {
        let url = self
            .identity
            .endpoint(&format!("job/{}/api/json", urlencoding::encode(job_name)));
        debug!("Fetching status for `{}` from {}", job_name, url);

        let response = self
            .get(&url)
            .query(&[("tree", JOB_STATUS_TREE)])
            .send()
            .await
            .map_err(|e| {
                TransportError::RemoteUnavailable(format!(
                    "status request for `{job_name}` failed: {e}"
                ))
            })?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(TransportError::ProjectNotFound(job_name.to_string()));
        }
        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::RemoteProtocol(format!(
                "status request for `{job_name}` returned HTTP {status}"
            )));
        }

        let detail: JobDetail = response.json().await.map_err(|e| {
            TransportError::RemoteProtocol(format!("invalid status payload for `{job_name}`: {e}"))
        })?;
        Ok(self.status_from_detail(job_name, detail, previous))
    }
}

/// Jenkins signals a running build with an `_anime` color suffix.
fn is_animated(color: &str) -> bool {
    color.ends_with("_anime")
}

fn result_from_color(color: &str) -> BuildResult {
    let base = color.strip_suffix("_anime").unwrap_or(color);
    match base {
        "blue" | "green" => BuildResult::Success,
        "yellow" => BuildResult::Unstable,
        "red" => BuildResult::Failure,
        "aborted" => BuildResult::Aborted,
        "disabled" => BuildResult::Disabled,
        "notbuilt" => BuildResult::NotBuilt,
        _ => BuildResult::Unknown,
    }
}

fn result_from_text(text: &str) -> BuildResult {
    match text {
        "SUCCESS" => BuildResult::Success,
        "UNSTABLE" => BuildResult::Unstable,
        "FAILURE" => BuildResult::Failure,
        "ABORTED" => BuildResult::Aborted,
        "NOT_BUILT" => BuildResult::NotBuilt,
        _ => BuildResult::Unknown,
    }
}
