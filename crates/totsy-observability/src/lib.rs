//! Observability infrastructure for TotsyList.
//!
//! This crate provides:
//! - `SessionId` - Client session identifier used to correlate log lines
//! - `StructuredLogger` - Structured logging with session context
//! - `LogBuilder` - Fluent construction of entries with typed fields

mod logging;
mod session;

pub use logging::*;
pub use session::*;
