//! Single-origin CORS policy.
//!
//! # Responsibilities
//! - Translate the configured origin into a middleware layer
//! - Permit cross-origin requests from that exact origin only
//!
//! # Design Decisions
//! - One origin, compared exactly; all others receive no permissive headers
//!   and fail browser-side
//! - Methods and headers are the baseline permissive set for the allowed
//!   origin (no credentials, so wildcards are safe)
//! - Same-origin and non-browser clients are unaffected

use axum::http::HeaderValue;
use tower_http::cors::{Any, CorsLayer};

use crate::config::CorsConfig;
use crate::http::server::ServerError;

/// Build the CORS layer for the configured origin.
///
/// The origin has already passed URL validation; this can still fail if it
/// is not representable as a header value.
pub fn layer(config: &CorsConfig) -> Result<CorsLayer, ServerError> {
    let origin = HeaderValue::from_str(&config.allowed_origin).map_err(|e| {
        ServerError::InvalidOrigin {
            origin: config.allowed_origin.clone(),
            reason: e.to_string(),
        }
    })?;

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(Any)
        .allow_headers(Any))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_origin_builds() {
        assert!(layer(&CorsConfig::default()).is_ok());
    }

    #[test]
    fn test_unrepresentable_origin_rejected() {
        let config = CorsConfig {
            allowed_origin: "http://bad\norigin".to_string(),
        };
        let err = layer(&config).unwrap_err();
        assert!(matches!(err, ServerError::InvalidOrigin { .. }));
    }
}
