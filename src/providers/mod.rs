//! Clients for the external collaborators.
//!
//! Each client wraps the shared [`TracedClient`] so every provider
//! call carries the request's trace context across the wire.
//!
//! [`TracedClient`]: crate::http::client::TracedClient

pub mod location;
pub mod weather;

pub use location::LocationClient;
pub use weather::WeatherClient;
