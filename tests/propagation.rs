//! End-to-end trace propagation across the two-service chain.

mod common;

use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::json;
use tower::ServiceExt;

use cep_weather::domain::KelvinPolicy;
use cep_weather::error::NotFoundPolicy;
use cep_weather::http::{
    front_door_router, resolver_router, FrontDoorState, ResolverState, TracedClient,
};
use cep_weather::providers::{LocationClient, WeatherClient};
use common::{body_json, spawn_service, spawn_stub, test_telemetry, Stub};

/// Front door → resolver → stub providers, each hop with its own
/// tracer, all spans stitched by one trace id.
#[tokio::test]
async fn test_trace_id_spans_the_whole_chain() {
    let location = Stub::new(StatusCode::OK, r#"{"localidade":"São Paulo"}"#);
    let weather = Stub::new(StatusCode::OK, r#"{"current":{"temp_c":25.0}}"#);
    let location_addr = spawn_stub(location).await;
    let weather_addr = spawn_stub(weather).await;

    let (resolver_telemetry, resolver_exporter) = test_telemetry("service-orchestrator");
    let resolver_client =
        TracedClient::new(resolver_telemetry.clone(), Duration::from_secs(5)).unwrap();
    let resolver_state = ResolverState {
        telemetry: resolver_telemetry,
        location: LocationClient::new(
            resolver_client.clone(),
            format!("http://{location_addr}"),
        ),
        weather: WeatherClient::new(
            resolver_client,
            format!("http://{weather_addr}"),
            "test-key",
        ),
        not_found_policy: NotFoundPolicy::default(),
        kelvin_policy: KelvinPolicy::default(),
    };
    let resolver_addr = spawn_service(resolver_router(
        resolver_state,
        Duration::from_secs(5),
        None,
    ))
    .await;

    let (front_telemetry, front_exporter) = test_telemetry("service-input");
    let front_client = TracedClient::new(front_telemetry.clone(), Duration::from_secs(5)).unwrap();
    let front_state = FrontDoorState {
        telemetry: front_telemetry,
        client: front_client,
        next_hop_url: format!("http://{resolver_addr}"),
    };
    let front_router = front_door_router(front_state, Duration::from_secs(5), None);

    let response = front_router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/cep")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"cep":"01001000"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({"city":"São Paulo","tempC":25.0,"tempF":77.0,"tempK":298.2})
    );

    let front_spans = front_exporter.get_finished_spans().unwrap();
    let resolver_spans = resolver_exporter.get_finished_spans().unwrap();

    // Exactly one server span per hop touched.
    assert_eq!(
        front_spans
            .iter()
            .filter(|span| span.name.starts_with("SPAN_"))
            .count(),
        1
    );
    assert_eq!(
        resolver_spans
            .iter()
            .filter(|span| span.name.starts_with("SPAN_"))
            .count(),
        1
    );

    // The root trace id is identical across every span of both
    // services, and every span closed after it opened.
    let trace_id = front_spans[0].span_context.trace_id();
    for span in front_spans.iter().chain(resolver_spans.iter()) {
        assert_eq!(span.span_context.trace_id(), trace_id, "span {}", span.name);
        assert!(span.end_time >= span.start_time);
    }
}

/// A caller-supplied traceparent becomes the root of every span in
/// the chain.
#[tokio::test]
async fn test_upstream_trace_id_is_preserved_end_to_end() {
    let location = Stub::new(StatusCode::OK, r#"{"localidade":"Recife"}"#);
    let weather = Stub::new(StatusCode::OK, r#"{"current":{"temp_c":20.0}}"#);
    let location_addr = spawn_stub(location).await;
    let weather_addr = spawn_stub(weather).await;

    let (resolver_telemetry, resolver_exporter) = test_telemetry("service-orchestrator");
    let resolver_client =
        TracedClient::new(resolver_telemetry.clone(), Duration::from_secs(5)).unwrap();
    let resolver_state = ResolverState {
        telemetry: resolver_telemetry,
        location: LocationClient::new(
            resolver_client.clone(),
            format!("http://{location_addr}"),
        ),
        weather: WeatherClient::new(
            resolver_client,
            format!("http://{weather_addr}"),
            "test-key",
        ),
        not_found_policy: NotFoundPolicy::default(),
        kelvin_policy: KelvinPolicy::default(),
    };
    let resolver_addr = spawn_service(resolver_router(
        resolver_state,
        Duration::from_secs(5),
        None,
    ))
    .await;

    let (front_telemetry, _front_exporter) = test_telemetry("service-input");
    let front_client = TracedClient::new(front_telemetry.clone(), Duration::from_secs(5)).unwrap();
    let front_state = FrontDoorState {
        telemetry: front_telemetry,
        client: front_client,
        next_hop_url: format!("http://{resolver_addr}"),
    };
    let front_router = front_door_router(front_state, Duration::from_secs(5), None);

    let response = front_router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/cep")
                .header("content-type", "application/json")
                .header(
                    "traceparent",
                    "00-4bf92f3577b34da6a3ce929d0e0e4736-00f067aa0ba902b7-01",
                )
                .body(Body::from(r#"{"cep":"01001000"}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    for span in resolver_exporter.get_finished_spans().unwrap() {
        assert_eq!(
            span.span_context.trace_id().to_string(),
            "4bf92f3577b34da6a3ce929d0e0e4736"
        );
    }
}
