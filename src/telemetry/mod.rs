//! Distributed tracing subsystem.
//!
//! # Data Flow
//! ```text
//! inbound headers
//!     → propagation.rs (extract → parent Context)
//!     → http::middleware (server span, derived Context)
//!     → http::client (client span, inject → outbound headers)
//!     → provider.rs (batch export to the OTLP collector)
//! ```
//!
//! # Design Decisions
//! - The tracer and carrier are explicit dependencies, built once in
//!   the binaries and threaded through constructors; no global state
//! - W3C trace-context is the default wire encoding; composite
//!   propagators are a construction-time option
//! - Span end is unconditional per request, on every exit path

pub mod propagation;
pub mod provider;

pub use propagation::TraceContextCarrier;
pub use provider::{Telemetry, TelemetryInitError};
