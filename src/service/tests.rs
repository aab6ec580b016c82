//! Services integration tests

mod auth;

use crate::config::{self, Transport};

/// Auth configuration for tests
fn auth_config(transport: Transport) -> config::Auth {
    config::Auth {
        secret: "test-secret".into(),
        transport,
        session_hours: 24,
        bootstrap: None,
    }
}
