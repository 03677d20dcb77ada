//! Configuration validation.
//!
//! Semantic checks on top of what serde already enforces. Runs before
//! a config is accepted into the system and reports every failure,
//! not just the first.

use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::config::schema::ServiceConfig;

/// A single semantic validation failure.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("{field}: not a valid socket address")]
    InvalidBindAddress { field: &'static str },

    #[error("{field}: invalid URL: {reason}")]
    InvalidUrl {
        field: &'static str,
        reason: String,
    },

    #[error("{field} must be greater than zero")]
    ZeroTimeout { field: &'static str },
}

/// Validate a loaded configuration.
pub fn validate_config(config: &ServiceConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress {
            field: "listener.bind_address",
        });
    }

    // service_name is deliberately not checked here: an empty name
    // means the binary's role default applies.
    check_url(&mut errors, "telemetry.otlp_endpoint", &config.telemetry.otlp_endpoint);

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout {
            field: "timeouts.request_secs",
        });
    }
    if config.timeouts.upstream_secs == 0 {
        errors.push(ValidationError::ZeroTimeout {
            field: "timeouts.upstream_secs",
        });
    }

    check_url(&mut errors, "front_door.next_hop_url", &config.front_door.next_hop_url);
    check_url(
        &mut errors,
        "resolver.location_base_url",
        &config.resolver.location_base_url,
    );
    check_url(
        &mut errors,
        "resolver.weather_base_url",
        &config.resolver.weather_base_url,
    );

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_url(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    if let Err(err) = Url::parse(value) {
        errors.push(ValidationError::InvalidUrl {
            field,
            reason: err.to_string(),
        });
    }
}
