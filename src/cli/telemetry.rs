//! Logging to stderr and, when `OTEL_EXPORTER_OTLP_ENDPOINT` is set, span export over
//! OTLP/gRPC.
//!
//! Endpoint, headers and timeout come from the standard `OTEL_EXPORTER_OTLP_*` variables,
//! which the exporter reads itself. Each run is one short-lived process, so spans are
//! flushed when the [`Telemetry`] guard is dropped, whatever way `main` returns.

use anyhow::Result;
use opentelemetry::{KeyValue, global, trace::TracerProvider as _};
use opentelemetry_otlp::{Compression, WithTonicConfig};
use opentelemetry_sdk::{Resource, trace::SdkTracerProvider};
use std::env::var;
use tonic::transport::ClientTlsConfig;
use tracing::Level;
use tracing_subscriber::{EnvFilter, Registry, fmt, layer::SubscriberExt};
use ulid::Ulid;

const OTLP_ENDPOINT: &str = "OTEL_EXPORTER_OTLP_ENDPOINT";

/// Keeps the tracer provider alive for the duration of the command.
#[must_use = "dropping the guard flushes and stops span export"]
pub struct Telemetry {
    provider: Option<SdkTracerProvider>,
}

impl Telemetry {
    #[must_use]
    pub const fn is_exporting(&self) -> bool {
        self.provider.is_some()
    }
}

impl Drop for Telemetry {
    fn drop(&mut self) {
        if let Some(provider) = self.provider.take()
            && let Err(e) = provider.shutdown()
        {
            eprintln!("failed to flush spans: {e}");
        }
    }
}

/// Host to verify the collector certificate against; `None` for plain-text endpoints.
fn tls_domain(endpoint: &str) -> Option<&str> {
    endpoint
        .strip_prefix("https://")
        .and_then(|rest| rest.split(['/', ':']).next())
        .filter(|host| !host.is_empty())
}

fn resource(command: &str) -> Resource {
    let instance_id = var("OTEL_SERVICE_INSTANCE_ID").unwrap_or_else(|_| Ulid::new().to_string());

    Resource::builder_empty()
        .with_attributes(vec![
            KeyValue::new("service.name", env!("CARGO_PKG_NAME")),
            KeyValue::new("service.version", env!("CARGO_PKG_VERSION")),
            KeyValue::new("service.instance.id", instance_id),
            KeyValue::new("vcs.commit", crate::GIT_COMMIT_HASH),
            KeyValue::new("cli.command", command.to_string()),
        ])
        .build()
}

fn tracer_provider(command: &str) -> Result<SdkTracerProvider> {
    let mut builder = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_compression(Compression::Gzip);

    if let Ok(endpoint) = var(OTLP_ENDPOINT)
        && let Some(domain) = tls_domain(&endpoint)
    {
        let tls = ClientTlsConfig::new()
            .domain_name(domain.to_string())
            .with_native_roots();
        builder = builder.with_tls_config(tls);
    }

    let exporter = builder.build()?;

    Ok(SdkTracerProvider::builder()
        .with_batch_exporter(exporter)
        .with_resource(resource(command))
        .build())
}

/// Install the global subscriber for `command`.
///
/// # Errors
///
/// Returns an error if the exporter cannot be built or a subscriber is already installed.
pub fn init(verbosity_level: Option<Level>, command: &str) -> Result<Telemetry> {
    let verbosity_level = verbosity_level.unwrap_or(Level::ERROR);

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact();

    let filter = EnvFilter::builder()
        .with_default_directive(verbosity_level.into())
        .from_env_lossy()
        .add_directive("hyper=error".parse()?)
        .add_directive("reqwest=warn".parse()?)
        .add_directive("opentelemetry_sdk=warn".parse()?);

    if var(OTLP_ENDPOINT).is_err() {
        let subscriber = Registry::default().with(fmt_layer).with(filter);
        tracing::subscriber::set_global_default(subscriber)?;
        return Ok(Telemetry { provider: None });
    }

    let provider = tracer_provider(command)?;
    global::set_tracer_provider(provider.clone());
    let otel_layer = tracing_opentelemetry::layer().with_tracer(provider.tracer(env!("CARGO_PKG_NAME")));

    let subscriber = Registry::default()
        .with(fmt_layer)
        .with(otel_layer)
        .with(filter);
    tracing::subscriber::set_global_default(subscriber)?;

    Ok(Telemetry {
        provider: Some(provider),
    })
}
