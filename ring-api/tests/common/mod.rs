//! Shared setup for fixture-based integration tests
#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use ring_api::{ApiConfig, Credentials, SessionClient};
use transport::{Method, MockTransport, Transport};

pub const USERNAME: &str = "foo@bar.org";
pub const PASSWORD: &str = "bar";

/// Read a file from `tests/fixtures`
pub fn fixture(filename: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests/fixtures");
    path.push(filename);

    fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to load fixture {}: {}", filename, e))
}

/// Mock transport answering the session, device and history endpoints
pub fn mocked_account() -> Arc<MockTransport> {
    let transport = Arc::new(MockTransport::new());
    transport.respond(Method::Post, "/clients_api/session", 201, fixture("session.json"));
    transport.respond(
        Method::Get,
        "/clients_api/ring_devices",
        200,
        fixture("ring_devices.json"),
    );
    transport.respond(Method::Get, "/clients_api/doorbots", 200, fixture("history.json"));
    transport
}

pub fn session_client(transport: &Arc<MockTransport>) -> SessionClient {
    SessionClient::new(
        Arc::clone(transport) as Arc<dyn Transport>,
        Arc::new(ApiConfig::new().with_hardware_id("test-hardware")),
        Credentials::new(USERNAME, PASSWORD),
    )
}
