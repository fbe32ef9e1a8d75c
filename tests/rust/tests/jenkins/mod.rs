//! Jenkins transport integration tests
//!
//! Wire-level API client tests against wiremock, plus facade tests with
//! fake factories.
