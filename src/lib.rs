//! CEP → weather service chain with distributed tracing.
//!
//! Two deployable roles built from one library:
//!
//! ```text
//!   client ──POST /cep──▶ ┌──────────────┐        ┌─────────────────────┐
//!                         │  front door  │──GET──▶│      resolver       │
//!                         │ (validate,   │ /clima │ (validate, lookup   │
//!                         │  forward)    │        │  city, fetch temp,  │
//!   client ◀──JSON──────  └──────────────┘        │  convert units)     │
//!                                                 └──────┬───────┬──────┘
//!                                                        │       │
//!                                              location  ▼       ▼  weather
//!                                              provider          provider
//! ```
//!
//! Every hop extracts the W3C trace context from the inbound headers,
//! opens a span, and injects the derived context into its outbound
//! calls, so one logical request reads as a single trace in the
//! collector. The tracer and propagator are explicit dependencies
//! built once per binary; no global lookups.

// Core subsystems
pub mod config;
pub mod domain;
pub mod error;
pub mod http;
pub mod providers;

// Cross-cutting concerns
pub mod observability;
pub mod telemetry;

pub use config::ServiceConfig;
pub use error::ServiceError;
pub use http::CityTemp;
pub use telemetry::Telemetry;
