use anyhow::Context;
use opentelemetry_sdk::trace::{SdkTracerProvider, Tracer};
use std::sync::Arc;
use synesthesia_api::{
    config::{Config, DEFAULT_METRICS_AUTH},
    create_router,
    services::AppState,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().context("Failed to load configuration")?;

    // Optional OpenTelemetry export, only when an OTLP endpoint is configured
    let telemetry = config
        .otlp_endpoint
        .as_deref()
        .map(init_telemetry)
        .transpose()?;

    let (json_layer, text_layer) = if config.json_logs {
        (Some(tracing_subscriber::fmt::layer().json()), None)
    } else {
        (None, Some(tracing_subscriber::fmt::layer()))
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "synesthesia_api=debug,tower_http=debug".into()),
        )
        .with(json_layer)
        .with(text_layer)
        .with(
            telemetry
                .as_ref()
                .map(|(_, tracer)| tracing_opentelemetry::layer().with_tracer(tracer.clone())),
        )
        .init();

    tracing::info!("Starting Synesthesia API");
    tracing::info!(
        "Configuration loaded for environment: {:?}",
        std::env::var("APP_ENV").unwrap_or_else(|_| "dev".to_string())
    );
    if config.metrics_auth == DEFAULT_METRICS_AUTH {
        tracing::warn!("Using default metrics credentials (dev mode only!)");
    }

    let bind_addr = config.bind_addr.clone();
    let app_state = Arc::new(AppState::in_memory(config));
    let app = create_router(app_state);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", bind_addr))?;

    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    if let Some((provider, _)) = telemetry {
        tracing::info!("Shutting down OpenTelemetry");
        if let Err(e) = provider.shutdown() {
            tracing::warn!("OpenTelemetry shutdown failed: {}", e);
        }
    }

    Ok(())
}

fn init_telemetry(otlp_endpoint: &str) -> anyhow::Result<(SdkTracerProvider, Tracer)> {
    use opentelemetry::trace::TracerProvider as _;
    use opentelemetry::KeyValue;
    use opentelemetry_otlp::WithExportConfig;
    use opentelemetry_sdk::Resource;

    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_http()
        .with_endpoint(otlp_endpoint)
        .build()
        .context("Failed to create OTLP exporter")?;

    let resource = Resource::builder_empty()
        .with_service_name("synesthesia-api")
        .with_attributes(vec![KeyValue::new(
            "service.version",
            env!("CARGO_PKG_VERSION"),
        )])
        .build();

    let provider = SdkTracerProvider::builder()
        .with_batch_exporter(exporter)
        .with_resource(resource)
        .build();

    let tracer = provider.tracer("synesthesia-api");
    opentelemetry::global::set_tracer_provider(provider.clone());

    Ok((provider, tracer))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
    tracing::info!("Shutdown signal received");
}
