//! HTTP server assembly for both service roles.
//!
//! # Responsibilities
//! - Build the axum Router for each role
//! - Wire up middleware (span instrumentation, metrics, request ID,
//!   timeout)
//! - Expose the Prometheus scrape endpoint
//! - Serve with graceful shutdown

use std::sync::Arc;
use std::time::Duration;

use axum::http::{HeaderValue, Request};
use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use metrics_exporter_prometheus::PrometheusHandle;
use tokio::net::TcpListener;
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::http::handlers::{handle_cep, handle_clima, FrontDoorState, ResolverState};
use crate::http::middleware::{span_middleware, track_requests};
use crate::telemetry::Telemetry;

/// UUID v4 request ids for the `x-request-id` header.
#[derive(Clone, Copy, Default)]
struct MakeRequestUuid;

impl MakeRequestId for MakeRequestUuid {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let id = HeaderValue::from_str(&uuid::Uuid::new_v4().to_string()).ok()?;
        Some(RequestId::new(id))
    }
}

/// Router for the front-door role (`POST /cep`).
pub fn front_door_router(
    state: FrontDoorState,
    request_timeout: Duration,
    metrics_handle: Option<PrometheusHandle>,
) -> Router {
    let telemetry = state.telemetry.clone();
    let routes = Router::new()
        .route("/cep", post(handle_cep))
        .with_state(state);
    instrument(routes, telemetry, request_timeout, metrics_handle)
}

/// Router for the resolver role (`GET /clima`).
pub fn resolver_router(
    state: ResolverState,
    request_timeout: Duration,
    metrics_handle: Option<PrometheusHandle>,
) -> Router {
    let telemetry = state.telemetry.clone();
    let routes = Router::new()
        .route("/clima", get(handle_clima))
        .with_state(state);
    instrument(routes, telemetry, request_timeout, metrics_handle)
}

/// Apply the shared middleware stack to a role's routes.
///
/// Layer order, outermost first: trace logging, timeout, request-id,
/// span instrumentation, metrics. The span middleware sits outside the
/// handlers so every business route is traced uniformly; the
/// `/metrics` scrape route is attached after the layers and stays
/// uninstrumented.
fn instrument(
    routes: Router,
    telemetry: Arc<Telemetry>,
    request_timeout: Duration,
    metrics_handle: Option<PrometheusHandle>,
) -> Router {
    let instrumented = routes
        .layer(middleware::from_fn(track_requests))
        .layer(middleware::from_fn_with_state(telemetry, span_middleware))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(TimeoutLayer::new(request_timeout))
        .layer(TraceLayer::new_for_http());

    match metrics_handle {
        Some(handle) => {
            instrumented.route("/metrics", get(move || async move { handle.render() }))
        }
        None => instrumented,
    }
}

/// Serve `router` on `listener` until a shutdown signal arrives.
pub async fn run(router: Router, listener: TcpListener) -> std::io::Result<()> {
    let addr = listener.local_addr()?;
    tracing::info!(address = %addr, "HTTP server starting");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("HTTP server stopped");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("failed to install Ctrl+C handler");
    tracing::info!("shutdown signal received");
}
