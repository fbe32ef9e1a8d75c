//! Domain types shared by the registry, the managers, and API clients.

mod credentials;
mod identity;
mod session;
mod status;

pub use credentials::{Authorization, Credentials};
pub use identity::ServerIdentity;
pub use session::SessionToken;
pub use status::{BuildActivity, BuildResult, Job, ProjectStatus};
