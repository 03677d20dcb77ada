//! Current-weather client (WeatherAPI-shaped contract).

use opentelemetry::Context;
use serde::Deserialize;

use crate::error::ServiceError;
use crate::http::client::TracedClient;

const TARGET: &str = "weather provider";

#[derive(Debug, Deserialize)]
struct WeatherResponse {
    current: CurrentConditions,
}

#[derive(Debug, Deserialize)]
struct CurrentConditions {
    temp_c: f64,
}

/// Client for the weather provider.
#[derive(Debug, Clone)]
pub struct WeatherClient {
    client: TracedClient,
    base_url: String,
    api_key: String,
}

impl WeatherClient {
    pub fn new(
        client: TracedClient,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client,
            base_url,
            api_key: api_key.into(),
        }
    }

    /// Fetch the current temperature in Celsius for a normalized city
    /// token. The token goes into the query string verbatim; see
    /// [`crate::domain::location::query_token`] for the contract.
    pub async fn current_celsius(&self, cx: &Context, token: &str) -> Result<f64, ServiceError> {
        let url = format!(
            "{}/current.json?key={}&q={}",
            self.base_url, self.api_key, token
        );
        let response = self.client.get(cx, "fetch_weather", TARGET, &url).await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ServiceError::upstream(TARGET, format!("status {status}")));
        }

        let body: WeatherResponse = response
            .json()
            .await
            .map_err(|_| ServiceError::Decode { target: TARGET })?;
        Ok(body.current.temp_c)
    }
}
