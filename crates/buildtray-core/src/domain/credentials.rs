//! Credentials and the authorization value derived from them.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

/// Username and password pair as configured by the host.
///
/// Both fields may be empty; fully empty credentials mean anonymous
/// access.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn is_anonymous(&self) -> bool {
        self.username.is_empty() && self.password.is_empty()
    }
}

/// Authorization context carried by every project manager.
///
/// Always a concrete value: anonymous access is represented explicitly,
/// never as an absent field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Authorization {
    /// No credentials configured; requests carry no authorization header.
    Anonymous,
    /// HTTP Basic authorization, header value precomputed.
    Basic(String),
}

impl Authorization {
    /// Derive the authorization value for a set of credentials.
    pub fn from_credentials(credentials: &Credentials) -> Self {
        if credentials.is_anonymous() {
            return Authorization::Anonymous;
        }
        let raw = format!("{}:{}", credentials.username, credentials.password);
        Authorization::Basic(format!("Basic {}", STANDARD.encode(raw)))
    }

    /// Header value to attach to outgoing requests, if any.
    pub fn header_value(&self) -> Option<&str> {
        match self {
            Authorization::Anonymous => None,
            Authorization::Basic(value) => Some(value),
        }
    }

    pub fn is_anonymous(&self) -> bool {
        matches!(self, Authorization::Anonymous)
    }
}
