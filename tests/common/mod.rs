//! Shared utilities for integration testing.

use std::net::SocketAddr;

use schema_gate::{HttpServer, SchemaStrategy, ServerConfig};
use tokio::net::TcpListener;

/// A server with default configuration and the JSON strategy.
#[allow(dead_code)]
pub fn default_server() -> HttpServer {
    HttpServer::new(ServerConfig::default(), SchemaStrategy::json()).unwrap()
}

/// Serve on an ephemeral local port in a background task.
///
/// Returns the bound address; the server runs until the test runtime drops.
pub async fn spawn_server(server: HttpServer) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let _ = server.serve(listener).await;
    });

    addr
}
