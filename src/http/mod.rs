//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware chain, bind)
//!     → request_id.rs (assign UUID, echo on response)
//!     → cors.rs (single-origin policy)
//!     → compiled route (validate → handler → serialize)
//!     → response to client
//! ```

pub mod cors;
pub mod request_id;
pub mod server;

pub use request_id::X_REQUEST_ID;
pub use server::{HttpServer, ServerError};
