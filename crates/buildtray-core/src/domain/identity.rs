//! Canonical identity of one remote CI server.

use std::fmt;

use url::Url;

use crate::error::{TransportError, TransportResult};

/// Registry key for one remote server.
///
/// Two configured URLs that differ only in trailing slashes, host casing,
/// or an explicit default port resolve to the same identity, so the
/// registry hands out the same server manager for both.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ServerIdentity(String);

impl ServerIdentity {
    /// Parse and canonicalize a configured server URL.
    ///
    /// The canonical form keeps scheme, lowercased host, any non-default
    /// port, and the path with trailing `/` removed; query and fragment
    /// are dropped. Empty or unparseable input fails with
    /// [`TransportError::InvalidConfiguration`].
    pub fn parse(raw: &str) -> TransportResult<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(TransportError::InvalidConfiguration(
                "server URL must not be empty".to_string(),
            ));
        }

        let mut url = Url::parse(trimmed).map_err(|e| {
            TransportError::InvalidConfiguration(format!("invalid server URL `{trimmed}`: {e}"))
        })?;
        if !url.has_host() {
            return Err(TransportError::InvalidConfiguration(format!(
                "server URL `{trimmed}` has no host"
            )));
        }
        url.set_query(None);
        url.set_fragment(None);

        Ok(Self(url.as_str().trim_end_matches('/').to_string()))
    }

    /// Canonical URL string, without a trailing slash.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Resolve a relative API path against this identity.
    ///
    /// `path` is appended verbatim; callers percent-encode any dynamic
    /// segments themselves.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.0, path.trim_start_matches('/'))
    }
}

impl fmt::Display for ServerIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
