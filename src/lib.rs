//! Typed HTTP Server Bootstrap
//!
//! Produces a running HTTP server with a single-origin CORS policy and a
//! pluggable schema strategy: every route registered against the server
//! validates its request payload before the handler runs and serializes the
//! handler's result against the declared response schema.
//!
//! # Data Flow
//! ```text
//! Client request
//!     → middleware chain (request ID, trace, timeout, body limit, CORS)
//!     → compiled route (validator → handler → serializer)
//!     → response to client
//! ```
//!
//! Configuration is fully assembled before the server is built, and the
//! schema strategy is supplied at construction. Routes can only be
//! registered on an already-constructed server, so no route ever exists
//! without a governing strategy.

// Core subsystems
pub mod config;
pub mod http;
pub mod schema;

// Cross-cutting concerns
pub mod observability;

pub use config::ServerConfig;
pub use http::{HttpServer, ServerError};
pub use schema::{RouteSchema, Schema, SchemaStrategy};
