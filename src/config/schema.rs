//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config
//! files; every field has a default so a minimal config is valid. The
//! core never reads configuration itself — the binaries resolve a
//! `ServiceConfig` at startup and hand the values down.

use serde::{Deserialize, Serialize};

use crate::domain::KelvinPolicy;
use crate::error::NotFoundPolicy;

/// Root configuration for one service instance.
///
/// Both roles share the shape; a deployment only fills in the section
/// its binary reads.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServiceConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Span export and service identity.
    pub telemetry: TelemetryConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Metrics exposition settings.
    pub observability: ObservabilityConfig,

    /// Front-door role settings.
    pub front_door: FrontDoorConfig,

    /// Resolver role settings.
    pub resolver: ResolverConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Telemetry configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TelemetryConfig {
    /// Service name stamped on every exported span. Empty means the
    /// binary's role default applies.
    pub service_name: String,

    /// OTLP gRPC collector endpoint.
    pub otlp_endpoint: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: String::new(),
            otlp_endpoint: "http://otel-collector:4317".to_string(),
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Inbound request timeout in seconds.
    pub request_secs: u64,

    /// Outbound collaborator timeout in seconds. The inbound deadline
    /// still wins: an abandoned request aborts in-flight calls.
    pub upstream_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            request_secs: 60,
            upstream_secs: 10,
        }
    }
}

/// Metrics exposition settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Expose `GET /metrics` on this instance.
    pub metrics_enabled: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            metrics_enabled: true,
        }
    }
}

/// Front-door role settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FrontDoorConfig {
    /// Base URL of the next service in the chain.
    pub next_hop_url: String,
}

impl Default for FrontDoorConfig {
    fn default() -> Self {
        Self {
            next_hop_url: "http://localhost:8081".to_string(),
        }
    }
}

/// Resolver role settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Base URL of the postal-code provider.
    pub location_base_url: String,

    /// Base URL of the weather provider.
    pub weather_base_url: String,

    /// Weather provider API key.
    pub weather_api_key: String,

    /// Status answered when the provider does not know the CEP.
    pub not_found: NotFoundPolicy,

    /// Kelvin conversion behavior.
    pub kelvin: KelvinPolicy,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            location_base_url: "https://viacep.com.br".to_string(),
            weather_base_url: "https://api.weatherapi.com/v1".to_string(),
            weather_api_key: String::new(),
            not_found: NotFoundPolicy::default(),
            kelvin: KelvinPolicy::default(),
        }
    }
}
