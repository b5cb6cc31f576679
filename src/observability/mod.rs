//! Observability subsystem.
//!
//! # Design Decisions
//! - Structured logging via tracing; the fmt layer writes to stdout
//! - Request ID flows through all log events via the trace span
//! - Verbosity is overridable with RUST_LOG, falling back to the config

pub mod logging;
