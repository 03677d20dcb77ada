//! Request instrumentation middleware.
//!
//! # Responsibilities
//! - Extract the upstream trace context from propagation headers
//! - Open one server span per inbound request, close it on every exit
//! - Hand the derived context to the business handler
//! - Record request count and latency metrics
//!
//! # Design Decisions
//! - Span lifecycle is orthogonal to business logic: the span wrapper
//!   never inspects or alters the response status
//! - The derived context travels through request extensions, so the
//!   handlers stay plain axum handlers

use std::sync::Arc;
use std::time::Instant;

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use opentelemetry::trace::{Span, SpanKind, TraceContextExt, Tracer};
use opentelemetry::KeyValue;
use opentelemetry_semantic_conventions::attribute::{
    CLIENT_ADDRESS, HTTP_REQUEST_METHOD, URL_FULL,
};

use crate::observability::metrics;
use crate::telemetry::Telemetry;

/// Per-request trace context.
///
/// Stored in request extensions by [`span_middleware`]; handlers pull
/// it back out and issue every outbound call under it.
#[derive(Clone)]
pub struct RequestContext(pub opentelemetry::Context);

/// Wraps every business handler with span lifecycle management.
///
/// Extracts the caller's context, starts a server span named after
/// the service identity, records the standard request attributes and
/// a "request received" event, and runs the inner handler under the
/// derived context. The span is ended explicitly once the response is
/// back; should the handler panic, the dropped context ends it
/// instead, so exactly one span closes per request either way.
pub async fn span_middleware(
    State(telemetry): State<Arc<Telemetry>>,
    mut request: Request,
    next: Next,
) -> Response {
    let parent_cx = telemetry.carrier().extract(request.headers());

    let client_addr = request
        .headers()
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string();

    let tracer = telemetry.tracer();
    let mut span = tracer
        .span_builder(format!("SPAN_{}", telemetry.service_name()))
        .with_kind(SpanKind::Server)
        .with_attributes(vec![
            KeyValue::new(HTTP_REQUEST_METHOD, request.method().to_string()),
            KeyValue::new(URL_FULL, request.uri().to_string()),
            KeyValue::new(CLIENT_ADDRESS, client_addr),
            KeyValue::new("server.name", telemetry.service_name().to_string()),
        ])
        .start_with_context(tracer, &parent_cx);
    span.add_event("request received", vec![]);

    let cx = parent_cx.with_span(span);
    request.extensions_mut().insert(RequestContext(cx.clone()));

    let response = next.run(request).await;

    cx.span().end();
    response
}

/// Records one counter increment and one latency observation per
/// handled request.
pub async fn track_requests(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let path = request.uri().path().to_string();

    let response = next.run(request).await;

    metrics::record_request(&method, &path, response.status().as_u16(), start);
    response
}
