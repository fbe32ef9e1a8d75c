//! Core of the buildtray transport: in-memory mediation between a CI
//! dashboard host and Jenkins-compatible build servers.
//!
//! The shape is a two-level cache of long-lived managers. A
//! [`ServerRegistry`] maps each canonical [`ServerIdentity`] to one
//! [`ServerManager`], which owns the session for that server and a
//! [`ProjectManager`] per polled project. The remote API itself sits
//! behind the [`ApiClient`] trait and is injected through factories, so
//! the core stays independent of any concrete server flavor.
//!
//! Modules:
//! - `domain` - identities, credentials, session tokens, status records
//! - `error` - typed failure taxonomy
//! - `client` - capability traits for the HTTP transport and remote API
//! - `registry` - identity to server-manager map
//! - `server_manager` - per-server session and project cache
//! - `project_manager` - per-project polling unit

pub mod client;
pub mod domain;
pub mod error;
pub mod project_manager;
pub mod registry;
pub mod server_manager;

pub use client::{ApiClient, ApiClientFactory, HttpClientFactory};
pub use domain::{
    Authorization, BuildActivity, BuildResult, Credentials, Job, ProjectStatus, ServerIdentity,
    SessionToken,
};
pub use error::{TransportError, TransportResult};
pub use project_manager::{PollState, ProjectManager};
pub use registry::ServerRegistry;
pub use server_manager::ServerManager;
