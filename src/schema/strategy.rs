//! Pluggable validation/serialization strategy.
//!
//! # Responsibilities
//! - Hold the validator and serializer function pair for a server
//! - Provide the default JSON strategy
//!
//! # Design Decisions
//! - Both halves are pure functions behind Arc, so a strategy clones cheaply
//!   into every compiled route
//! - The validator sees raw bytes; whether they are JSON is the strategy's
//!   business, not the server's

use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

use crate::schema::types::{Issue, Schema};

/// Failure produced by the validator half of a strategy.
///
/// Converted into a client-facing 400 response by the compiled route; the
/// handler never runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// The body could not be parsed at all.
    #[error("request body is not valid JSON: {0}")]
    Parse(#[source] serde_json::Error),

    /// The parsed body does not conform to the declared schema.
    #[error("payload does not match schema ({} issues)", .issues.len())]
    Mismatch { issues: Vec<Issue> },
}

/// Failure produced by the serializer half of a strategy.
///
/// A handler returned a value outside its declared response schema; this is
/// a server fault, surfaced as a 500.
#[derive(Debug, Error)]
pub enum SerializeError {
    #[error("response does not match schema ({} issues)", .issues.len())]
    Mismatch { issues: Vec<Issue> },

    #[error("response encoding failed: {0}")]
    Encode(#[source] serde_json::Error),
}

type Validator = Arc<dyn Fn(&Schema, &[u8]) -> Result<Value, ValidationError> + Send + Sync>;
type Serializer = Arc<dyn Fn(&Schema, &Value) -> Result<Vec<u8>, SerializeError> + Send + Sync>;

/// The validator/serializer pair governing every route on a server.
///
/// Installed once at server construction; every route registered afterwards
/// is compiled through it.
#[derive(Clone)]
pub struct SchemaStrategy {
    validator: Validator,
    serializer: Serializer,
}

impl SchemaStrategy {
    /// Build a strategy from a custom function pair.
    pub fn new<V, S>(validator: V, serializer: S) -> Self
    where
        V: Fn(&Schema, &[u8]) -> Result<Value, ValidationError> + Send + Sync + 'static,
        S: Fn(&Schema, &Value) -> Result<Vec<u8>, SerializeError> + Send + Sync + 'static,
    {
        Self {
            validator: Arc::new(validator),
            serializer: Arc::new(serializer),
        }
    }

    /// The default strategy: JSON in, JSON out.
    pub fn json() -> Self {
        Self::new(json_validate, json_serialize)
    }

    /// Run the validator against a raw request body.
    pub fn validate(&self, schema: &Schema, raw: &[u8]) -> Result<Value, ValidationError> {
        (self.validator)(schema, raw)
    }

    /// Run the serializer against a handler's return value.
    pub fn serialize(&self, schema: &Schema, value: &Value) -> Result<Vec<u8>, SerializeError> {
        (self.serializer)(schema, value)
    }
}

impl std::fmt::Debug for SchemaStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchemaStrategy").finish_non_exhaustive()
    }
}

/// Default validator: parse bytes as JSON, then check conformance.
pub fn json_validate(schema: &Schema, raw: &[u8]) -> Result<Value, ValidationError> {
    let value: Value = serde_json::from_slice(raw).map_err(ValidationError::Parse)?;
    let issues = schema.check(&value);
    if issues.is_empty() {
        Ok(value)
    } else {
        Err(ValidationError::Mismatch { issues })
    }
}

/// Default serializer: check conformance, then encode as JSON.
pub fn json_serialize(schema: &Schema, value: &Value) -> Result<Vec<u8>, SerializeError> {
    let issues = schema.check(value);
    if !issues.is_empty() {
        return Err(SerializeError::Mismatch { issues });
    }
    serde_json::to_vec(value).map_err(SerializeError::Encode)
}
