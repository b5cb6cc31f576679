//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (port non-zero, limits > 0)
//! - Check the allowed origin is a well-formed URL origin
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Validation is a pure function: ServerConfig → Result<(), Vec<ConfigIssue>>
//! - Runs before config is accepted into the system

use url::Url;

use crate::config::schema::ServerConfig;

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigIssue {
    /// Dotted path of the offending field (e.g. "cors.allowed_origin").
    pub field: &'static str,
    /// Human-readable description of the problem.
    pub message: String,
}

impl std::fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a configuration, collecting every issue found.
pub fn validate_config(config: &ServerConfig) -> Result<(), Vec<ConfigIssue>> {
    let mut issues = Vec::new();

    if config.listener.port == 0 {
        issues.push(ConfigIssue {
            field: "listener.port",
            message: "port must be in the range 1-65535".to_string(),
        });
    }

    check_origin(&config.cors.allowed_origin, &mut issues);

    if config.limits.max_body_bytes == 0 {
        issues.push(ConfigIssue {
            field: "limits.max_body_bytes",
            message: "body limit must be greater than zero".to_string(),
        });
    }

    if config.timeouts.request_secs == 0 {
        issues.push(ConfigIssue {
            field: "timeouts.request_secs",
            message: "request timeout must be greater than zero".to_string(),
        });
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(issues)
    }
}

/// An origin is scheme://host[:port] with nothing after the authority.
fn check_origin(origin: &str, issues: &mut Vec<ConfigIssue>) {
    let url = match Url::parse(origin) {
        Ok(url) => url,
        Err(e) => {
            issues.push(ConfigIssue {
                field: "cors.allowed_origin",
                message: format!("not a valid URL: {}", e),
            });
            return;
        }
    };

    if url.scheme() != "http" && url.scheme() != "https" {
        issues.push(ConfigIssue {
            field: "cors.allowed_origin",
            message: format!("unsupported scheme {:?}", url.scheme()),
        });
    }

    if url.host_str().is_none() {
        issues.push(ConfigIssue {
            field: "cors.allowed_origin",
            message: "origin has no host".to_string(),
        });
    }

    if url.path() != "/" && !url.path().is_empty() {
        issues.push(ConfigIssue {
            field: "cors.allowed_origin",
            message: format!("origin must not carry a path (found {:?})", url.path()),
        });
    }

    if url.query().is_some() || url.fragment().is_some() {
        issues.push(ConfigIssue {
            field: "cors.allowed_origin",
            message: "origin must not carry a query or fragment".to_string(),
        });
    }
}
