//! Jenkins flavor of the buildtray transport.
//!
//! `api` implements the core's [`ApiClient`](buildtray_core::ApiClient)
//! trait against the Jenkins JSON remote-access API, `factory` provides
//! the stock wiring, and `transport` is the facade hosts configure and
//! query.

pub mod api;
pub mod factory;
pub mod transport;

pub use api::JenkinsApiClient;
pub use factory::{DefaultHttpClientFactory, JenkinsApiClientFactory};
pub use transport::{JenkinsTransport, TransportSettings};
