//! Session artifact cached per server.

use serde::{Deserialize, Serialize};

/// Opaque token handed out by a server's authentication handshake.
///
/// A server manager caches one of these so that repeated polls do not
/// re-run the handshake. The content is server-specific and the core
/// never interprets it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Token for servers that hand out no session artifact, for example
    /// when the handshake endpoint is disabled.
    pub fn none_required() -> Self {
        Self(String::new())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
