//! Resolver service: resolves a CEP to a city, fetches the current
//! temperature and answers with all three units.

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cep_weather::config::{load_config, ServiceConfig};
use cep_weather::http::{resolver_router, run, ResolverState, TracedClient};
use cep_weather::observability::metrics;
use cep_weather::providers::{LocationClient, WeatherClient};
use cep_weather::telemetry::Telemetry;

/// Service name used when the config file does not set one.
const DEFAULT_SERVICE_NAME: &str = "service-orchestrator";

#[derive(Parser)]
#[command(name = "orchestrator-service", about = "CEP resolver service")]
struct Args {
    /// Path to the TOML configuration file.
    #[arg(long)]
    config: Option<std::path::PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cep_weather=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => ServiceConfig::default(),
    };
    let service_name = if config.telemetry.service_name.is_empty() {
        DEFAULT_SERVICE_NAME.to_string()
    } else {
        config.telemetry.service_name.clone()
    };

    tracing::info!(
        bind_address = %config.listener.bind_address,
        service_name = %service_name,
        location_base_url = %config.resolver.location_base_url,
        weather_base_url = %config.resolver.weather_base_url,
        "configuration loaded"
    );
    if config.resolver.weather_api_key.is_empty() {
        tracing::warn!("weather_api_key is empty; weather lookups will be rejected upstream");
    }

    // A broken exporter is fatal: this service must not start untraced.
    let telemetry = Arc::new(Telemetry::init(
        &service_name,
        &config.telemetry.otlp_endpoint,
    )?);

    let metrics_handle = if config.observability.metrics_enabled {
        Some(metrics::install_recorder()?)
    } else {
        None
    };

    let client = TracedClient::new(
        telemetry.clone(),
        Duration::from_secs(config.timeouts.upstream_secs),
    )?;
    let state = ResolverState {
        telemetry: telemetry.clone(),
        location: LocationClient::new(client.clone(), config.resolver.location_base_url.clone()),
        weather: WeatherClient::new(
            client,
            config.resolver.weather_base_url.clone(),
            config.resolver.weather_api_key.clone(),
        ),
        not_found_policy: config.resolver.not_found,
        kelvin_policy: config.resolver.kelvin,
    };

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let router = resolver_router(
        state,
        Duration::from_secs(config.timeouts.request_secs),
        metrics_handle,
    );
    run(router, listener).await?;

    telemetry.shutdown();
    Ok(())
}
