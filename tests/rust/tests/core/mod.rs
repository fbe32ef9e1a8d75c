//! Core integration tests
//!
//! Tests for the server registry, server managers, and project managers
//! against fake API clients.

mod server_manager;
