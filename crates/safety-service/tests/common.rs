//! Shared helpers for the HTTP integration tests.

#![allow(dead_code)]

use axum_test::TestServer;
use safety_service::build_router;
use safety_service_shared::test_utils::TestStores;

/// A server over fresh seeded stores. Keep the stores alive for as long as
/// the server is used.
pub fn seeded_server() -> (TestServer, TestStores) {
    let stores = TestStores::seeded();
    let server = TestServer::new(build_router(stores.state())).expect("test server");
    (server, stores)
}

/// A server over stores with no hotzones and no bell document.
pub fn empty_server() -> (TestServer, TestStores) {
    let stores = TestStores::empty();
    let server = TestServer::new(build_router(stores.state())).expect("test server");
    (server, stores)
}
