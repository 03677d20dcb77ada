//! Postal-code lookup client (ViaCEP-shaped contract).

use opentelemetry::Context;
use serde::Deserialize;

use crate::domain::Cep;
use crate::error::ServiceError;
use crate::http::client::TracedClient;

const TARGET: &str = "location provider";

/// Wire shape of the provider response. `erro: true` is how the
/// provider signals an unknown CEP; both fields default so a sparse
/// payload still decodes.
#[derive(Debug, Deserialize)]
struct LocationResponse {
    #[serde(default)]
    localidade: String,
    #[serde(default)]
    erro: bool,
}

/// Client for the postal-code provider.
#[derive(Debug, Clone)]
pub struct LocationClient {
    client: TracedClient,
    base_url: String,
}

impl LocationClient {
    pub fn new(client: TracedClient, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    /// Resolve a CEP to its city name.
    ///
    /// `Ok(None)` means the provider does not know the CEP, either by
    /// the explicit error flag or by an empty city; the caller decides
    /// which status that becomes.
    pub async fn lookup(&self, cx: &Context, cep: &Cep) -> Result<Option<String>, ServiceError> {
        let url = format!("{}/ws/{}/json/", self.base_url, cep);
        let response = self.client.get(cx, "lookup_location", TARGET, &url).await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ServiceError::upstream(TARGET, format!("status {status}")));
        }

        let body: LocationResponse = response
            .json()
            .await
            .map_err(|_| ServiceError::Decode { target: TARGET })?;

        if body.erro || body.localidade.is_empty() {
            return Ok(None);
        }
        Ok(Some(body.localidade))
    }
}
