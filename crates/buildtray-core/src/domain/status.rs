//! Job descriptors and per-project build status records.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One buildable project as reported by the remote job listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    /// Job name, unique on the remote server.
    pub name: String,
    /// Browsable URL of the job.
    pub url: String,
}

impl Job {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

/// What a project is doing right now.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildActivity {
    /// Idle between builds.
    #[default]
    Sleeping,
    /// A build is currently running.
    Building,
    /// Work is pending; for Jenkins this covers jobs sitting in the
    /// build queue.
    CheckingModifications,
}

/// Outcome of the most recent completed build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildResult {
    Success,
    Unstable,
    Failure,
    Aborted,
    Disabled,
    NotBuilt,
    /// No build has completed yet, or the server reported a state the
    /// mapping does not recognize.
    #[default]
    Unknown,
}

impl fmt::Display for BuildActivity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BuildActivity::Sleeping => "sleeping",
            BuildActivity::Building => "building",
            BuildActivity::CheckingModifications => "checking_modifications",
        };
        f.write_str(s)
    }
}

impl fmt::Display for BuildResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BuildResult::Success => "success",
            BuildResult::Unstable => "unstable",
            BuildResult::Failure => "failure",
            BuildResult::Aborted => "aborted",
            BuildResult::Disabled => "disabled",
            BuildResult::NotBuilt => "not_built",
            BuildResult::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

/// Last known state of one project, refreshed in place on every poll.
///
/// Handed to callers by value; the cached copy is never aliased out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectStatus {
    /// Project name, matching the remote job name.
    pub name: String,
    pub activity: BuildActivity,
    pub last_result: BuildResult,
    /// Label of the last completed build; the build number for Jenkins.
    pub last_build_label: Option<String>,
    pub last_build_time: Option<DateTime<Utc>>,
    /// Browsable URL for the project.
    pub web_url: String,
}

impl ProjectStatus {
    /// Status of a project with no completed build on record.
    pub fn new(name: impl Into<String>, web_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            activity: BuildActivity::default(),
            last_result: BuildResult::default(),
            last_build_label: None,
            last_build_time: None,
            web_url: web_url.into(),
        }
    }

    pub fn is_building(&self) -> bool {
        self.activity == BuildActivity::Building
    }
}
