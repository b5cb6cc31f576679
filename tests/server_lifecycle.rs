//! Bind and serve behavior of the server bootstrap.

use std::net::{IpAddr, Ipv4Addr};
use std::time::Duration;

use schema_gate::{HttpServer, SchemaStrategy, ServerConfig, ServerError};

mod common;

fn local_config(port: u16) -> ServerConfig {
    let mut config = ServerConfig::default();
    config.listener.bind_address = IpAddr::V4(Ipv4Addr::LOCALHOST);
    config.listener.port = port;
    config
}

#[tokio::test]
async fn test_listen_binds_the_configured_port() {
    let port = 33431;
    let server = HttpServer::new(local_config(port), SchemaStrategy::json()).unwrap();

    tokio::spawn(async move {
        let _ = server.listen().await;
    });
    tokio::time::sleep(Duration::from_millis(300)).await;

    let client = reqwest::Client::builder().no_proxy().build().unwrap();
    let res = client
        .get(format!("http://127.0.0.1:{}/", port))
        .send()
        .await
        .expect("Server unreachable on its configured port");

    // No routes registered in the bootstrap; a 404 still proves the socket
    // is accepting on exactly the configured port.
    assert_eq!(res.status(), 404);
}

#[tokio::test]
async fn test_listen_fails_when_port_is_taken() {
    let port = 33432;
    let _occupant = tokio::net::TcpListener::bind(("127.0.0.1", port))
        .await
        .unwrap();

    let server = HttpServer::new(local_config(port), SchemaStrategy::json()).unwrap();
    let err = server.listen().await.unwrap_err();

    match err {
        ServerError::Bind { addr, .. } => assert_eq!(addr.port(), port),
        other => panic!("expected Bind error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_identical_configuration_is_reproducible() {
    // Two servers built from the same literals behave identically.
    let a = common::spawn_server(common::default_server()).await;
    let b = common::spawn_server(common::default_server()).await;

    let client = reqwest::Client::builder().no_proxy().build().unwrap();
    for addr in [a, b] {
        let res = client
            .get(format!("http://{}/", addr))
            .header("Origin", "http://localhost:5173")
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), 404);
        assert_eq!(
            res.headers()
                .get("access-control-allow-origin")
                .and_then(|v| v.to_str().ok()),
            Some("http://localhost:5173")
        );
    }
}
