//! Payload schema subsystem.
//!
//! # Data Flow
//! ```text
//! Route registration declares:
//!     → RouteSchema (request shape + response shape)
//!
//! Per request:
//!     raw body bytes
//!     → strategy validator (parse + conformance check)
//!     → handler sees a validated Value
//!     → strategy serializer (conformance check + encode)
//!     → response bytes
//! ```
//!
//! # Design Decisions
//! - The strategy is a pair of pure functions, replaceable as a unit
//! - Schemas are plain values declared in code, not loaded from files
//! - Unknown object fields pass validation untouched

pub mod strategy;
pub mod types;

pub use strategy::{SchemaStrategy, SerializeError, ValidationError};
pub use types::{Issue, ObjectSchema, RouteSchema, Schema};
