//! Request identity.
//!
//! # Responsibilities
//! - Assign a unique request ID to every incoming request
//! - Echo the ID on the response so clients can correlate
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - Incoming x-request-id values from clients are overwritten, never trusted

use axum::http::Request;
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

/// Header carrying the request ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Generates a fresh UUID v4 per request.
#[derive(Clone, Copy, Debug, Default)]
pub struct UuidRequestId;

impl MakeRequestId for UuidRequestId {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string().parse().ok()?;
        Some(RequestId::new(id))
    }
}
