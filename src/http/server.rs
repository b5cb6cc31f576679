//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Validate configuration and construct the middleware chain
//! - Compile registered routes through the schema strategy
//! - Bind the listener and serve until the process is terminated
//!
//! # Design Decisions
//! - The server is an owned value, not a process-wide singleton; several
//!   instances can coexist (tests bind ephemeral ports)
//! - The strategy arrives at construction, so every route is compiled
//!   against an installed strategy
//! - Bind failure is an explicit `ServerError::Bind`, never an unhandled
//!   async failure

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::DefaultBodyLimit;
use axum::http::{header, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{on, MethodFilter};
use axum::Router;
use serde_json::{json, Value};
use thiserror::Error;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::{validate_config, ConfigError, ServerConfig};
use crate::http::cors;
use crate::http::request_id::UuidRequestId;
use crate::schema::{RouteSchema, SchemaStrategy, ValidationError};

/// Error type for server construction and serving.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The listener could not acquire the requested address.
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    /// The configured origin is not usable in a CORS header.
    #[error("invalid allowed origin {origin:?}: {reason}")]
    InvalidOrigin { origin: String, reason: String },

    /// The configuration failed semantic validation.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A route could not be registered.
    #[error("cannot register route {method} {path}: {reason}")]
    Route {
        method: Method,
        path: String,
        reason: String,
    },

    /// The accept loop failed after a successful bind.
    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}

/// HTTP server with a schema strategy governing every route.
///
/// Lifecycle is one-directional: construct (configuration and strategy
/// fixed), register routes, then `listen` consumes the server. There is no
/// stop operation; the process runs until externally terminated.
pub struct HttpServer {
    config: ServerConfig,
    strategy: SchemaStrategy,
    cors: CorsLayer,
    router: Router,
    routes: Vec<String>,
}

impl std::fmt::Debug for HttpServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpServer")
            .field("config", &self.config)
            .field("cors", &self.cors)
            .field("router", &self.router)
            .field("routes", &self.routes)
            .finish_non_exhaustive()
    }
}

impl HttpServer {
    /// Create a server from a validated configuration and a schema strategy.
    pub fn new(config: ServerConfig, strategy: SchemaStrategy) -> Result<Self, ServerError> {
        validate_config(&config).map_err(ConfigError::Validation)?;
        let cors = cors::layer(&config.cors)?;

        Ok(Self {
            config,
            strategy,
            cors,
            router: Router::new(),
            routes: Vec::new(),
        })
    }

    /// Register a route behind the schema gate.
    ///
    /// The compiled route runs the strategy's validator on the request body
    /// before `handler` (rejecting non-conforming payloads with 400), and
    /// the serializer on the handler's return value (a non-conforming
    /// return is a 500).
    pub fn route<H, Fut>(
        mut self,
        method: Method,
        path: &str,
        schema: RouteSchema,
        handler: H,
    ) -> Result<Self, ServerError>
    where
        H: Fn(Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Value> + Send + 'static,
    {
        let filter = MethodFilter::try_from(method.clone()).map_err(|e| ServerError::Route {
            method: method.clone(),
            path: path.to_string(),
            reason: e.to_string(),
        })?;

        let endpoint = {
            let strategy = self.strategy.clone();
            let schema = Arc::new(schema);
            let handler = Arc::new(handler);
            move |body: Bytes| {
                let strategy = strategy.clone();
                let schema = Arc::clone(&schema);
                let handler = Arc::clone(&handler);
                async move { run_gate(strategy, schema, handler, body).await }
            }
        };

        self.router = self.router.route(path, on(filter, endpoint));
        tracing::debug!(method = %method, path = %path, "Route registered");
        self.routes.push(format!("{} {}", method, path));
        Ok(self)
    }

    /// Bind the configured address and serve until process termination.
    pub async fn listen(self) -> Result<(), ServerError> {
        let addr = self.config.bind_addr();
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| ServerError::Bind { addr, source })?;
        self.serve(listener).await
    }

    /// Serve on an already-bound listener.
    pub async fn serve(self, listener: TcpListener) -> Result<(), ServerError> {
        let addr = listener.local_addr().map_err(ServerError::Serve)?;
        let routes = self.routes.len();
        let app = self.into_app();

        tracing::info!(address = %addr, routes, "HTTP server running");

        axum::serve(listener, app).await.map_err(ServerError::Serve)
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Assemble the final router with the middleware chain.
    fn into_app(self) -> Router {
        self.router.layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(UuidRequestId))
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(TraceLayer::new_for_http())
                .layer(self.cors)
                .layer(TimeoutLayer::new(Duration::from_secs(
                    self.config.timeouts.request_secs,
                )))
                .layer(DefaultBodyLimit::max(self.config.limits.max_body_bytes)),
        )
    }
}

/// Validator → handler → serializer, for one request.
async fn run_gate<H, Fut>(
    strategy: SchemaStrategy,
    schema: Arc<RouteSchema>,
    handler: Arc<H>,
    body: Bytes,
) -> Response
where
    H: Fn(Value) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Value> + Send + 'static,
{
    let input = match &schema.request {
        Some(request_schema) => match strategy.validate(request_schema, &body) {
            Ok(value) => value,
            Err(error) => return validation_failure(&error),
        },
        None => Value::Null,
    };

    let output = handler(input).await;

    match strategy.serialize(&schema.response, &output) {
        Ok(bytes) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/json")],
            bytes,
        )
            .into_response(),
        Err(error) => {
            tracing::error!(error = %error, "Handler response violates its declared schema");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "response serialization failed",
            )
                .into_response()
        }
    }
}

/// Client-facing 400 for a rejected payload. The handler has not run.
fn validation_failure(error: &ValidationError) -> Response {
    let issues = match error {
        ValidationError::Parse(e) => {
            json!([{ "path": "/", "message": format!("invalid JSON: {}", e) }])
        }
        ValidationError::Mismatch { issues } => serde_json::to_value(issues).unwrap_or(Value::Null),
    };

    tracing::debug!(error = %error, "Request rejected by schema validation");

    let body = json!({ "error": "validation_failed", "issues": issues });
    (
        StatusCode::BAD_REQUEST,
        [(header::CONTENT_TYPE, "application/json")],
        body.to_string(),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Schema;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn greet_server() -> HttpServer {
        let schema = RouteSchema::new(
            Schema::object().required("name", Schema::String),
            Schema::object().required("greeting", Schema::String),
        );
        HttpServer::new(ServerConfig::default(), SchemaStrategy::json())
            .unwrap()
            .route(Method::POST, "/greet", schema, |input| async move {
                json!({ "greeting": format!("hello {}", input["name"].as_str().unwrap_or("?")) })
            })
            .unwrap()
    }

    fn post(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_conforming_payload_reaches_handler() {
        let app = greet_server().into_app();
        let response = app.oneshot(post("/greet", r#"{"name":"ada"}"#)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let value: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value, json!({ "greeting": "hello ada" }));
    }

    #[tokio::test]
    async fn test_violating_payload_rejected_before_handler() {
        let app = greet_server().into_app();
        let response = app.oneshot(post("/greet", r#"{"name":42}"#)).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let value: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["error"], "validation_failed");
        assert_eq!(value["issues"][0]["path"], "/name");
    }

    #[tokio::test]
    async fn test_malformed_json_rejected() {
        let app = greet_server().into_app();
        let response = app.oneshot(post("/greet", "{not json")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_nonconforming_handler_output_is_server_fault() {
        let schema = RouteSchema::new(
            Schema::Any,
            Schema::object().required("greeting", Schema::String),
        );
        let server = HttpServer::new(ServerConfig::default(), SchemaStrategy::json())
            .unwrap()
            .route(Method::POST, "/broken", schema, |_| async move {
                json!({ "unexpected": true })
            })
            .unwrap();

        let response = server
            .into_app()
            .oneshot(post("/broken", "{}"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_allowed_origin_echoed() {
        let app = greet_server().into_app();
        let request = Request::builder()
            .uri("/greet")
            .method(Method::POST)
            .header(header::ORIGIN, "http://localhost:5173")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"name":"ada"}"#))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(
            response
                .headers()
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .unwrap(),
            "http://localhost:5173"
        );
    }

    #[tokio::test]
    async fn test_other_origin_gets_no_cors_header() {
        let app = greet_server().into_app();
        let request = Request::builder()
            .uri("/greet")
            .method(Method::POST)
            .header(header::ORIGIN, "http://evil.example")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"name":"ada"}"#))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert!(response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .is_none());
    }

    #[tokio::test]
    async fn test_response_carries_request_id() {
        let app = greet_server().into_app();
        let response = app.oneshot(post("/greet", r#"{"name":"ada"}"#)).await.unwrap();
        assert!(response.headers().get("x-request-id").is_some());
    }

    #[tokio::test]
    async fn test_invalid_config_rejected_at_construction() {
        let mut config = ServerConfig::default();
        config.cors.allowed_origin = "not a url".to_string();
        let err = HttpServer::new(config, SchemaStrategy::json()).unwrap_err();
        assert!(matches!(err, ServerError::Config(_)));
    }
}
