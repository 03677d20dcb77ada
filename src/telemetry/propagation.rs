//! Trace-context propagation across HTTP hops.

use axum::http::HeaderMap;
use opentelemetry::propagation::TextMapPropagator;
use opentelemetry::Context;
use opentelemetry_http::{HeaderExtractor, HeaderInjector};
use opentelemetry_sdk::propagation::TraceContextPropagator;

/// Bidirectional mapping between an in-process [`Context`] and the
/// flat header representation that crosses process boundaries.
///
/// Speaks the W3C `traceparent`/`tracestate` encoding by default; a
/// composite propagator can be supplied instead. One carrier is
/// constructed at startup and handed explicitly to whatever needs to
/// cross a hop — nothing in this crate consults the process-global
/// propagator.
pub struct TraceContextCarrier {
    propagator: Box<dyn TextMapPropagator + Send + Sync>,
}

impl TraceContextCarrier {
    /// Carrier speaking the W3C trace-context encoding.
    pub fn w3c() -> Self {
        Self {
            propagator: Box::new(TraceContextPropagator::new()),
        }
    }

    /// Carrier with a custom (e.g. composite) propagator.
    pub fn with_propagator(propagator: Box<dyn TextMapPropagator + Send + Sync>) -> Self {
        Self { propagator }
    }

    /// Reconstruct the upstream context from request headers.
    ///
    /// Returns a fresh root context when no recognizable propagation
    /// header is present; extraction never fails.
    pub fn extract(&self, headers: &HeaderMap) -> Context {
        self.propagator
            .extract_with_context(&Context::new(), &HeaderExtractor(headers))
    }

    /// Serialize `cx` into outbound request headers, overwriting any
    /// propagation keys already present.
    pub fn inject(&self, cx: &Context, headers: &mut HeaderMap) {
        self.propagator
            .inject_context(cx, &mut HeaderInjector(headers));
    }
}

impl Default for TraceContextCarrier {
    fn default() -> Self {
        Self::w3c()
    }
}

impl std::fmt::Debug for TraceContextCarrier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TraceContextCarrier").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use opentelemetry::trace::TraceContextExt;

    const TRACEPARENT: &str = "00-0af7651916cd43dd8448eb211c80319c-b7ad6b7169203331-01";

    #[test]
    fn test_extract_reads_w3c_traceparent() {
        let mut headers = HeaderMap::new();
        headers.insert("traceparent", HeaderValue::from_static(TRACEPARENT));

        let carrier = TraceContextCarrier::w3c();
        let cx = carrier.extract(&headers);
        let span_context = cx.span().span_context().clone();

        assert!(span_context.is_valid());
        assert_eq!(
            span_context.trace_id().to_string(),
            "0af7651916cd43dd8448eb211c80319c"
        );
        assert!(span_context.is_sampled());
    }

    #[test]
    fn test_extract_without_headers_yields_root_context() {
        let carrier = TraceContextCarrier::w3c();
        let cx = carrier.extract(&HeaderMap::new());
        assert!(!cx.span().span_context().is_valid());
    }

    #[test]
    fn test_round_trip_preserves_trace_id() {
        let mut inbound = HeaderMap::new();
        inbound.insert("traceparent", HeaderValue::from_static(TRACEPARENT));

        let carrier = TraceContextCarrier::w3c();
        let cx = carrier.extract(&inbound);

        let mut outbound = HeaderMap::new();
        carrier.inject(&cx, &mut outbound);

        let cx2 = carrier.extract(&outbound);
        assert_eq!(
            cx.span().span_context().trace_id(),
            cx2.span().span_context().trace_id()
        );
    }

    #[test]
    fn test_inject_overwrites_stale_propagation_keys() {
        let mut inbound = HeaderMap::new();
        inbound.insert("traceparent", HeaderValue::from_static(TRACEPARENT));

        let carrier = TraceContextCarrier::w3c();
        let cx = carrier.extract(&inbound);

        let mut outbound = HeaderMap::new();
        outbound.insert(
            "traceparent",
            HeaderValue::from_static("00-ffffffffffffffffffffffffffffffff-ffffffffffffffff-00"),
        );
        carrier.inject(&cx, &mut outbound);

        let got = outbound.get("traceparent").unwrap().to_str().unwrap();
        assert!(got.contains("0af7651916cd43dd8448eb211c80319c"));
    }
}
