//! Shared utilities for integration testing: stub collaborators and
//! an in-memory telemetry harness.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Router;
use opentelemetry_sdk::testing::trace::InMemorySpanExporter;
use opentelemetry_sdk::trace::TracerProvider;

use cep_weather::telemetry::{Telemetry, TraceContextCarrier};

/// Telemetry wired to an in-memory exporter so tests can assert on
/// finished spans.
pub fn test_telemetry(service_name: &str) -> (Arc<Telemetry>, InMemorySpanExporter) {
    let exporter = InMemorySpanExporter::default();
    let provider = TracerProvider::builder()
        .with_simple_exporter(exporter.clone())
        .build();
    let telemetry = Telemetry::with_provider(provider, TraceContextCarrier::w3c(), service_name);
    (Arc::new(telemetry), exporter)
}

/// A stub collaborator that answers every request with one fixed
/// response and records what it saw.
pub struct Stub {
    status: StatusCode,
    body: String,
    calls: AtomicUsize,
    last_traceparent: Mutex<Option<String>>,
    last_query: Mutex<Option<String>>,
    last_path: Mutex<Option<String>>,
}

impl Stub {
    pub fn new(status: StatusCode, body: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            status,
            body: body.into(),
            calls: AtomicUsize::new(0),
            last_traceparent: Mutex::new(None),
            last_query: Mutex::new(None),
            last_path: Mutex::new(None),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn traceparent(&self) -> Option<String> {
        self.last_traceparent.lock().unwrap().clone()
    }

    pub fn query(&self) -> Option<String> {
        self.last_query.lock().unwrap().clone()
    }

    pub fn path(&self) -> Option<String> {
        self.last_path.lock().unwrap().clone()
    }
}

async fn stub_handler(State(stub): State<Arc<Stub>>, request: Request) -> Response {
    stub.calls.fetch_add(1, Ordering::SeqCst);
    *stub.last_traceparent.lock().unwrap() = request
        .headers()
        .get("traceparent")
        .and_then(|value| value.to_str().ok())
        .map(String::from);
    *stub.last_query.lock().unwrap() = request.uri().query().map(String::from);
    *stub.last_path.lock().unwrap() = Some(request.uri().path().to_string());

    (stub.status, stub.body.clone()).into_response()
}

/// Serve a stub on an ephemeral local port and return its address.
pub async fn spawn_stub(stub: Arc<Stub>) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let router = Router::new().fallback(stub_handler).with_state(stub);
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

/// Serve a full service router on an ephemeral local port.
pub async fn spawn_service(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

/// Collect a response body as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Collect a response body as text.
pub async fn body_text(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}
