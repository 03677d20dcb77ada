//! Orchestration handlers for the two service roles.
//!
//! Both follow the same single-pass contract: validate, call the
//! collaborators under the request context, aggregate, respond. Every
//! branch is terminal; there is no retry loop.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Extension, Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;
use opentelemetry::trace::TraceContextExt;
use serde::{Deserialize, Serialize};

use crate::domain::{cep::Cep, location, units, KelvinPolicy};
use crate::error::{NotFoundPolicy, ServiceError};
use crate::http::client::TracedClient;
use crate::http::middleware::RequestContext;
use crate::providers::{LocationClient, WeatherClient};
use crate::telemetry::Telemetry;

/// Aggregated city-and-temperature payload returned to the original
/// caller. Constructed only once every contributing value is known
/// good; never partially filled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityTemp {
    pub city: String,
    #[serde(rename = "tempC")]
    pub temp_c: f64,
    #[serde(rename = "tempF")]
    pub temp_f: f64,
    #[serde(rename = "tempK")]
    pub temp_k: f64,
}

/// State for the front-door role.
#[derive(Clone)]
pub struct FrontDoorState {
    pub telemetry: Arc<Telemetry>,
    pub client: TracedClient,
    /// Base URL of the next service in the chain.
    pub next_hop_url: String,
}

/// State for the resolver role.
#[derive(Clone)]
pub struct ResolverState {
    pub telemetry: Arc<Telemetry>,
    pub location: LocationClient,
    pub weather: WeatherClient,
    pub not_found_policy: NotFoundPolicy,
    pub kelvin_policy: KelvinPolicy,
}

#[derive(Debug, Deserialize)]
pub struct CepRequest {
    #[serde(default)]
    pub cep: String,
}

#[derive(Debug, Deserialize)]
pub struct ClimaQuery {
    #[serde(default)]
    pub cep: String,
}

/// `POST /cep` — front-door variant.
///
/// Validates the CEP before anything touches the network, then issues
/// one traced GET to the next hop and passes its body through
/// verbatim. The body is decoded only to check it is usable; the
/// original bytes are forwarded, so fields this service does not know
/// about survive the hop. A non-2xx answer from downstream is
/// forwarded with its original status.
pub async fn handle_cep(
    State(state): State<FrontDoorState>,
    Extension(RequestContext(cx)): Extension<RequestContext>,
    body: Result<Json<CepRequest>, JsonRejection>,
) -> Result<Response, ServiceError> {
    let Json(body) = body.map_err(|_| ServiceError::InvalidBody)?;
    let cep = Cep::parse(&body.cep)?;

    let url = format!(
        "{}/clima?cep={}",
        state.next_hop_url.trim_end_matches('/'),
        cep
    );
    let response = state
        .client
        .get(&cx, "forward_clima", "next-hop service", &url)
        .await?;

    let status = response.status();
    if !status.is_success() {
        return Err(ServiceError::Downstream { status });
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|err| ServiceError::upstream("next-hop service", err))?;
    let city_temp: CityTemp = serde_json::from_slice(&bytes)
        .map_err(|_| ServiceError::Decode { target: "next-hop service" })?;
    if city_temp.city.is_empty() {
        return Err(ServiceError::upstream(
            "next-hop service",
            "empty city in response",
        ));
    }

    Ok(([(header::CONTENT_TYPE, "application/json")], bytes).into_response())
}

/// `GET /clima?cep=...` — resolver variant.
///
/// Re-validates the CEP even though the front door already did (the
/// endpoint is also reachable directly), resolves it to a city, then
/// queries the weather provider with the normalized token. Location
/// lookup strictly precedes the weather call; the query depends on
/// its result.
pub async fn handle_clima(
    State(state): State<ResolverState>,
    Extension(RequestContext(cx)): Extension<RequestContext>,
    Query(query): Query<ClimaQuery>,
) -> Result<Json<CityTemp>, ServiceError> {
    let cep = Cep::parse(&query.cep)?;

    let city = match state.location.lookup(&cx, &cep).await? {
        Some(city) => city,
        None => {
            cx.span().add_event("zipcode not found", vec![]);
            return Err(ServiceError::CepNotFound {
                policy: state.not_found_policy,
            });
        }
    };

    let token = location::query_token(&city);
    let celsius = state.weather.current_celsius(&cx, &token).await?;

    Ok(Json(CityTemp {
        city,
        temp_c: celsius,
        temp_f: units::to_fahrenheit(celsius),
        temp_k: units::to_kelvin(celsius, state.kelvin_policy),
    }))
}
