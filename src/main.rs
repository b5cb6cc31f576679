use schema_gate::config::ServerConfig;
use schema_gate::http::HttpServer;
use schema_gate::observability::logging;
use schema_gate::schema::SchemaStrategy;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = ServerConfig::default();

    logging::init(&config.observability);

    tracing::info!("schema-gate v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        port = config.listener.port,
        allowed_origin = %config.cors.allowed_origin,
        "Configuration loaded"
    );

    // No routes in the bootstrap; handlers register against the server
    // elsewhere, through the schema strategy installed here.
    let server = HttpServer::new(config, SchemaStrategy::json())?;
    server.listen().await?;

    Ok(())
}
