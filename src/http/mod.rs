//! HTTP layer for both service roles.
//!
//! # Data Flow
//! ```text
//! inbound request
//!     → server.rs (router, timeout, request ID)
//!     → middleware.rs (extract context, open server span)
//!     → handlers.rs (validate → call collaborators → aggregate)
//!     → client.rs (client span, inject context, outbound GET)
//!     → response (span closed, metrics recorded)
//! ```

pub mod client;
pub mod handlers;
pub mod middleware;
pub mod server;

pub use client::TracedClient;
pub use handlers::{CityTemp, FrontDoorState, ResolverState};
pub use middleware::RequestContext;
pub use server::{front_door_router, resolver_router, run};
