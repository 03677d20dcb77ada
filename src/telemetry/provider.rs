//! Tracer provider setup.
//!
//! Spans are shipped to an OTLP gRPC collector through a batch
//! processor; export is fire-and-forget from the request path. A
//! broken exporter at startup is fatal — a service must not come up
//! untraced.

use opentelemetry::trace::TracerProvider as _;
use opentelemetry::KeyValue;
use opentelemetry_sdk::trace as sdktrace;
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::{runtime, Resource};
use opentelemetry_semantic_conventions::attribute::SERVICE_NAME;
use thiserror::Error;

use crate::telemetry::propagation::TraceContextCarrier;

/// Tracer or exporter initialization failure.
#[derive(Debug, Error)]
#[error("telemetry init failed: {0}")]
pub struct TelemetryInitError(String);

/// Tracing capability for one service instance.
///
/// Built once at startup and passed explicitly into the HTTP layer;
/// the handlers never reach for process-global tracer state, which
/// keeps them testable with a stub provider.
pub struct Telemetry {
    provider: sdktrace::TracerProvider,
    tracer: sdktrace::Tracer,
    carrier: TraceContextCarrier,
    service_name: String,
}

impl Telemetry {
    /// Build the OTLP-exporting telemetry stack for `service_name`,
    /// shipping spans to the gRPC collector at `endpoint`.
    pub fn init(service_name: &str, endpoint: &str) -> Result<Self, TelemetryInitError> {
        let exporter = opentelemetry_otlp::SpanExporter::builder()
            .with_tonic()
            .with_endpoint(endpoint)
            .build()
            .map_err(|err| TelemetryInitError(err.to_string()))?;

        let provider = sdktrace::TracerProvider::builder()
            .with_batch_exporter(exporter, runtime::Tokio)
            .with_resource(Resource::new(vec![KeyValue::new(
                SERVICE_NAME,
                service_name.to_string(),
            )]))
            .build();

        Ok(Self::with_provider(
            provider,
            TraceContextCarrier::w3c(),
            service_name,
        ))
    }

    /// Wrap an existing provider. Used by tests that bring an
    /// in-memory exporter, and by deployments with a non-default
    /// propagator.
    pub fn with_provider(
        provider: sdktrace::TracerProvider,
        carrier: TraceContextCarrier,
        service_name: &str,
    ) -> Self {
        let tracer = provider.tracer(service_name.to_string());
        Self {
            provider,
            tracer,
            carrier,
            service_name: service_name.to_string(),
        }
    }

    pub fn tracer(&self) -> &sdktrace::Tracer {
        &self.tracer
    }

    pub fn carrier(&self) -> &TraceContextCarrier {
        &self.carrier
    }

    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    /// Flush pending spans and shut the exporter pipeline down.
    pub fn shutdown(&self) {
        if let Err(err) = self.provider.shutdown() {
            tracing::warn!(error = %err, "tracer provider shutdown failed");
        }
    }
}

impl std::fmt::Debug for Telemetry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Telemetry")
            .field("service_name", &self.service_name)
            .finish_non_exhaustive()
    }
}
