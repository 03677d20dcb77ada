//! Traced outbound HTTP client.

use std::sync::Arc;
use std::time::Duration;

use opentelemetry::trace::{SpanKind, Status, TraceContextExt, Tracer};
use opentelemetry::{Context, KeyValue};
use opentelemetry_semantic_conventions::attribute::{
    HTTP_REQUEST_METHOD, HTTP_RESPONSE_STATUS_CODE, URL_FULL,
};

use crate::error::ServiceError;
use crate::telemetry::Telemetry;

/// HTTP client for collaborator calls.
///
/// Every request goes out under a client span that is a child of the
/// caller's request context, with the propagation headers injected so
/// the receiving side can continue the trace. Calls are synchronous
/// from the handler's point of view; the configured timeout is the
/// only thing that cuts a hung collaborator short, and dropping the
/// request future aborts the call in flight.
#[derive(Clone)]
pub struct TracedClient {
    http: reqwest::Client,
    telemetry: Arc<Telemetry>,
}

impl TracedClient {
    pub fn new(telemetry: Arc<Telemetry>, timeout: Duration) -> reqwest::Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { http, telemetry })
    }

    /// GET `url` under `cx`, recording a client span named
    /// `span_name`. `target` names the collaborator in errors.
    pub async fn get(
        &self,
        cx: &Context,
        span_name: &'static str,
        target: &'static str,
        url: &str,
    ) -> Result<reqwest::Response, ServiceError> {
        let tracer = self.telemetry.tracer();
        let span = tracer
            .span_builder(span_name)
            .with_kind(SpanKind::Client)
            .with_attributes(vec![
                KeyValue::new(HTTP_REQUEST_METHOD, "GET"),
                KeyValue::new(URL_FULL, url.to_string()),
            ])
            .start_with_context(tracer, cx);
        let cx = cx.with_span(span);

        let mut request = self
            .http
            .get(url)
            .build()
            .map_err(|err| ServiceError::upstream(target, err))?;
        self.telemetry.carrier().inject(&cx, request.headers_mut());

        let result = self.http.execute(request).await;
        {
            let span = cx.span();
            match &result {
                Ok(response) => span.set_attribute(KeyValue::new(
                    HTTP_RESPONSE_STATUS_CODE,
                    i64::from(response.status().as_u16()),
                )),
                Err(err) => span.set_status(Status::error(err.to_string())),
            }
            span.end();
        }

        result.map_err(|err| ServiceError::upstream(target, err))
    }
}

impl std::fmt::Debug for TracedClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TracedClient").finish_non_exhaustive()
    }
}
